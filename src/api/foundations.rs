use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::Foundation;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoundationRequest {
    pub name: String,
    pub city: String,
    pub state: Option<String>,
    pub description: Option<String>,
    pub contact_email: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub verified: Option<bool>,
}

impl CreateFoundationRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("name", &self.name)
            .length("name", Some(&self.name), 0, 255)
            .required("city", &self.city)
            .length("city", Some(&self.city), 0, 100)
            .length("state", self.state.as_deref(), 0, 100)
            .required("contactEmail", &self.contact_email)
            .email("contactEmail", Some(&self.contact_email))
            .length("contactEmail", Some(&self.contact_email), 0, 255)
            .length("website", self.website.as_deref(), 0, 255)
            .length("phoneNumber", self.phone_number.as_deref(), 0, 20)
            .finish()
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFoundationRequest {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub verified: Option<bool>,
}

impl UpdateFoundationRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.required("name", name);
        }
        if let Some(city) = &self.city {
            v.required("city", city);
        }
        v.length("name", self.name.as_deref(), 0, 255)
            .length("city", self.city.as_deref(), 0, 100)
            .length("state", self.state.as_deref(), 0, 100)
            .email("contactEmail", self.contact_email.as_deref())
            .length("contactEmail", self.contact_email.as_deref(), 0, 255)
            .length("website", self.website.as_deref(), 0, 255)
            .length("phoneNumber", self.phone_number.as_deref(), 0, 20)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoundationResponse {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: Option<String>,
    pub description: Option<String>,
    pub contact_email: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Foundation> for FoundationResponse {
    fn from(f: Foundation) -> Self {
        Self {
            id: f.id,
            name: f.name,
            city: f.city,
            state: f.state,
            description: f.description,
            contact_email: f.contact_email,
            website: f.website,
            address: f.address,
            phone_number: f.phone_number,
            verified: f.verified,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_name_city_and_email() {
        let request: CreateFoundationRequest =
            serde_json::from_str(r#"{"name":"","city":"","contactEmail":"bad"}"#).unwrap();
        match request.validate() {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("city"));
                assert!(errors.contains_key("contactEmail"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let request = UpdateFoundationRequest {
            description: Some("Rescues street dogs".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());

        let request = UpdateFoundationRequest {
            phone_number: Some("0".repeat(21)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
