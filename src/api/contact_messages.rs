use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::ContactMessage;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactMessageRequest {
    pub sender_name: String,
    pub sender_email: String,
    pub subject: Option<String>,
    pub message: String,
    pub foundation_id: Uuid,
}

impl CreateContactMessageRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("senderName", &self.sender_name)
            .length("senderName", Some(&self.sender_name), 0, 255)
            .required("senderEmail", &self.sender_email)
            .email("senderEmail", Some(&self.sender_email))
            .length("senderEmail", Some(&self.sender_email), 0, 255)
            .length("subject", self.subject.as_deref(), 0, 255)
            .required("message", &self.message)
            .length("message", Some(&self.message), 0, 2000)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContactMessageRequest {
    pub sender_name: Option<String>,
    pub sender_email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl UpdateContactMessageRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .length("senderName", self.sender_name.as_deref(), 1, 255)
            .email("senderEmail", self.sender_email.as_deref())
            .length("senderEmail", self.sender_email.as_deref(), 0, 255)
            .length("subject", self.subject.as_deref(), 0, 255)
            .length("message", self.message.as_deref(), 1, 2000)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    pub id: Uuid,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: Option<String>,
    pub message: String,
    pub foundation_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessage> for ContactMessageResponse {
    fn from(m: ContactMessage) -> Self {
        Self {
            id: m.id,
            sender_name: m.sender_name,
            sender_email: m.sender_email,
            subject: m.subject,
            message: m.message,
            foundation_id: m.foundation_id,
            is_read: m.is_read,
            read_at: m.read_at,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactSearchQuery {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_email_must_be_valid() {
        let request = CreateContactMessageRequest {
            sender_name: "Ana".to_string(),
            sender_email: "ana-at-example".to_string(),
            subject: None,
            message: "Is Luna still available?".to_string(),
            foundation_id: Uuid::new_v4(),
        };
        match request.validate() {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.contains_key("senderEmail"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
