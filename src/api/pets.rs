use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::{Pet, PetGender, PetSize, PetSpecies, PetStatus};
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    pub name: String,
    pub species: PetSpecies,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<PetGender>,
    pub size: Option<PetSize>,
    pub description: Option<String>,
    pub status: Option<PetStatus>,
    pub foundation_id: Uuid,
}

impl CreatePetRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("name", &self.name)
            .length("name", Some(&self.name), 0, 100)
            .length("breed", self.breed.as_deref(), 0, 100)
            .positive("age", self.age)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetRequest {
    pub name: Option<String>,
    pub species: Option<PetSpecies>,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<PetGender>,
    pub size: Option<PetSize>,
    pub description: Option<String>,
    pub status: Option<PetStatus>,
    pub foundation_id: Option<Uuid>,
}

impl UpdatePetRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        if let Some(name) = &self.name {
            v.required("name", name);
        }
        v.length("name", self.name.as_deref(), 0, 100)
            .length("breed", self.breed.as_deref(), 0, 100)
            .positive("age", self.age)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePetStatusRequest {
    pub status: PetStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetResponse {
    pub id: Uuid,
    pub name: String,
    pub species: PetSpecies,
    pub breed: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<PetGender>,
    pub size: Option<PetSize>,
    pub description: Option<String>,
    pub status: PetStatus,
    pub foundation_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pet> for PetResponse {
    fn from(p: Pet) -> Self {
        Self {
            id: p.id,
            name: p.name,
            species: p.species,
            breed: p.breed,
            age: p.age,
            gender: p.gender,
            size: p.size,
            description: p.description,
            status: p.status,
            foundation_id: p.foundation_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeRangeQuery {
    pub min_age: Option<i32>,
    pub max_age: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailableFilterQuery {
    pub species: Option<PetSpecies>,
    pub size: Option<PetSize>,
    pub gender: Option<PetGender>,
    pub city: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_must_be_positive() {
        let request: CreatePetRequest = serde_json::from_str(&format!(
            r#"{{"name":"Luna","species":"DOG","age":0,"foundationId":"{}"}}"#,
            Uuid::new_v4()
        ))
        .unwrap();
        match request.validate() {
            Err(ServiceError::Validation(errors)) => assert!(errors.contains_key("age")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn unknown_species_is_rejected_at_parse_time() {
        let parsed = serde_json::from_str::<CreatePetRequest>(&format!(
            r#"{{"name":"Luna","species":"DRAGON","foundationId":"{}"}}"#,
            Uuid::new_v4()
        ));
        assert!(parsed.is_err());
    }

    #[test]
    fn age_range_query_is_camel_case() {
        let query: AgeRangeQuery = serde_json::from_str(r#"{"minAge":1,"maxAge":4}"#).unwrap();
        assert_eq!(query.min_age, Some(1));
        assert_eq!(query.max_age, Some(4));
    }
}
