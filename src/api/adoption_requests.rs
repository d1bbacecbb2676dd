use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::{AdoptionRequest, AdoptionRequestStatus};
use crate::services::ServiceError;

const TEXT_MAX: usize = 2000;

/// New adoption request. The requester is always the authenticated caller.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdoptionRequestRequest {
    pub pet_id: Uuid,
    pub message: String,
    pub experience: Option<String>,
    pub living_situation: Option<String>,
}

impl CreateAdoptionRequestRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("message", &self.message)
            .length("message", Some(&self.message), 0, TEXT_MAX)
            .length("experience", self.experience.as_deref(), 0, TEXT_MAX)
            .length("livingSituation", self.living_situation.as_deref(), 0, TEXT_MAX)
            .finish()
    }
}

/// Edits the free-text fields only.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdoptionRequestRequest {
    pub message: Option<String>,
    pub experience: Option<String>,
    pub living_situation: Option<String>,
}

impl UpdateAdoptionRequestRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        if let Some(message) = &self.message {
            v.required("message", message);
        }
        v.length("message", self.message.as_deref(), 0, TEXT_MAX)
            .length("experience", self.experience.as_deref(), 0, TEXT_MAX)
            .length("livingSituation", self.living_situation.as_deref(), 0, TEXT_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReviewRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub status: AdoptionRequestStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionRequestResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pet_id: Uuid,
    pub message: String,
    pub experience: Option<String>,
    pub living_situation: Option<String>,
    pub status: AdoptionRequestStatus,
    pub review_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl From<AdoptionRequest> for AdoptionRequestResponse {
    fn from(r: AdoptionRequest) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            pet_id: r.pet_id,
            message: r.message,
            experience: r.experience,
            living_situation: r.living_situation,
            status: r.status,
            review_notes: r.review_notes,
            created_at: r.created_at,
            updated_at: r.updated_at,
            reviewed_at: r.reviewed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_is_required_and_bounded() {
        let mut request = CreateAdoptionRequestRequest {
            pet_id: Uuid::new_v4(),
            message: "  ".to_string(),
            experience: Some("x".repeat(2001)),
            living_situation: None,
        };
        match request.validate() {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.contains_key("message"));
                assert!(errors.contains_key("experience"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }

        request.message = "We have a big garden".to_string();
        request.experience = None;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn review_body_is_optional_notes() {
        let review: ReviewRequest = serde_json::from_str("{}").unwrap();
        assert!(review.notes.is_none());
        let review: ReviewRequest = serde_json::from_str(r#"{"notes":"Home visit ok"}"#).unwrap();
        assert_eq!(review.notes.as_deref(), Some("Home visit ok"));
    }
}
