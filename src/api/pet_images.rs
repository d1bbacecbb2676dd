use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::PetImage;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetImageRequest {
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub pet_id: Uuid,
}

impl CreatePetImageRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("imageUrl", &self.image_url)
            .length("imageUrl", Some(&self.image_url), 0, 500)
            .length("altText", self.alt_text.as_deref(), 0, 255)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetImageRequest {
    pub image_url: Option<String>,
    pub is_primary: Option<bool>,
    pub alt_text: Option<String>,
}

impl UpdatePetImageRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        if let Some(url) = &self.image_url {
            v.required("imageUrl", url);
        }
        v.length("imageUrl", self.image_url.as_deref(), 0, 500)
            .length("altText", self.alt_text.as_deref(), 0, 255)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetImageResponse {
    pub id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub pet_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PetImage> for PetImageResponse {
    fn from(image: PetImage) -> Self {
        Self {
            id: image.id,
            image_url: image.image_url,
            is_primary: image.is_primary,
            alt_text: image.alt_text,
            pet_id: image.pet_id,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UrlQuery {
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_defaults_to_false() {
        let request: CreatePetImageRequest = serde_json::from_str(&format!(
            r#"{{"imageUrl":"https://cdn.example.com/luna.jpg","petId":"{}"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        assert!(!request.is_primary);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn url_length_is_bounded() {
        let request = UpdatePetImageRequest {
            image_url: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
