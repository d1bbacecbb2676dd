use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::pets::{CreatePetRequest, UpdatePetRequest};
use crate::api::validation::clean;
use crate::database::models::{Pet, PetStatus};
use crate::database::{Page, PageRequest};
use crate::repositories::{FoundationRepository, PetFilter, PetRepository, PetStatistics};

#[derive(Clone)]
pub struct PetService {
    pets: PetRepository,
    foundations: FoundationRepository,
}

impl PetService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pets: PetRepository::new(pool.clone()),
            foundations: FoundationRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreatePetRequest) -> Result<Pet, ServiceError> {
        request.validate()?;
        self.require_foundation(request.foundation_id).await?;

        let now = Utc::now();
        let pet = Pet {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            species: request.species,
            breed: clean(request.breed.as_deref()),
            age: request.age,
            gender: request.gender,
            size: request.size,
            description: clean(request.description.as_deref()),
            status: request.status.unwrap_or(PetStatus::Available),
            foundation_id: request.foundation_id,
            created_at: now,
            updated_at: now,
        };

        let pet = self.pets.insert(&pet).await?;
        info!(pet_id = %pet.id, foundation_id = %pet.foundation_id, "Created pet");
        Ok(pet)
    }

    pub async fn get(&self, id: Uuid) -> Result<Pet, ServiceError> {
        Ok(self.pets.get(id).await?)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.pets.exists_by_id(id).await?)
    }

    /// Fails with 404 when the foundation a lookup is scoped to is unknown.
    pub async fn ensure_foundation(&self, foundation_id: Uuid) -> Result<(), ServiceError> {
        if self.foundations.exists_by_id(foundation_id).await? {
            Ok(())
        } else {
            Err(not_found("Foundation", "id", foundation_id))
        }
    }

    pub async fn list(&self, filter: &PetFilter) -> Result<Vec<Pet>, ServiceError> {
        check_age_range(filter)?;
        Ok(self.pets.find(filter).await?)
    }

    pub async fn page(&self, filter: &PetFilter, page: &PageRequest) -> Result<Page<Pet>, ServiceError> {
        check_age_range(filter)?;
        Ok(self.pets.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &PetFilter) -> Result<i64, ServiceError> {
        Ok(self.pets.count(filter).await?)
    }

    pub async fn statistics(&self, filter: &PetFilter) -> Result<PetStatistics, ServiceError> {
        Ok(self.pets.statistics(filter).await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdatePetRequest) -> Result<Pet, ServiceError> {
        request.validate()?;
        let mut pet = self.pets.get(id).await?;

        if let Some(foundation_id) = request.foundation_id {
            if foundation_id != pet.foundation_id {
                self.require_foundation(foundation_id).await?;
            }
            pet.foundation_id = foundation_id;
        }
        if let Some(name) = clean(request.name.as_deref()) {
            pet.name = name;
        }
        if let Some(species) = request.species {
            pet.species = species;
        }
        if request.breed.is_some() {
            pet.breed = clean(request.breed.as_deref());
        }
        if request.age.is_some() {
            pet.age = request.age;
        }
        if request.gender.is_some() {
            pet.gender = request.gender;
        }
        if request.size.is_some() {
            pet.size = request.size;
        }
        if request.description.is_some() {
            pet.description = clean(request.description.as_deref());
        }
        if let Some(status) = request.status {
            pet.status = status;
        }

        let pet = self.pets.update(&pet).await?;
        info!(pet_id = %pet.id, "Updated pet");
        Ok(pet)
    }

    pub async fn set_status(&self, id: Uuid, status: PetStatus) -> Result<Pet, ServiceError> {
        let pet = self.pets.update_status(id, status).await?;
        info!(pet_id = %id, status = ?status, "Changed pet status");
        Ok(pet)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.pets.delete(id).await? {
            return Err(not_found("Pet", "id", id));
        }
        info!(pet_id = %id, "Deleted pet");
        Ok(())
    }

    /// Referenced foundations must exist; an unknown one is a bad request
    /// rather than a missing resource.
    async fn require_foundation(&self, foundation_id: Uuid) -> Result<(), ServiceError> {
        if !self.foundations.exists_by_id(foundation_id).await? {
            return Err(ServiceError::bad_request(format!(
                "Foundation not found with id: {}",
                foundation_id
            )));
        }
        Ok(())
    }
}

fn check_age_range(filter: &PetFilter) -> Result<(), ServiceError> {
    match (filter.min_age, filter.max_age) {
        (Some(min), Some(max)) if min > max => Err(ServiceError::bad_request(
            "minAge must be less than or equal to maxAge",
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_age_range_is_rejected() {
        let filter = PetFilter {
            min_age: Some(5),
            max_age: Some(2),
            ..Default::default()
        };
        assert!(matches!(check_age_range(&filter), Err(ServiceError::BadRequest(_))));

        let filter = PetFilter {
            min_age: Some(2),
            ..Default::default()
        };
        assert!(check_age_range(&filter).is_ok());
    }
}
