use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::pet_images::{CreatePetImageRequest, UpdatePetImageRequest};
use crate::api::validation::clean;
use crate::database::models::PetImage;
use crate::database::{Page, PageRequest};
use crate::repositories::{PetImageFilter, PetImageRepository, PetImageStatistics, PetRepository};

#[derive(Clone)]
pub struct PetImageService {
    images: PetImageRepository,
    pets: PetRepository,
}

impl PetImageService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            images: PetImageRepository::new(pool.clone()),
            pets: PetRepository::new(pool),
        }
    }

    pub async fn create(&self, request: CreatePetImageRequest) -> Result<PetImage, ServiceError> {
        request.validate()?;
        self.ensure_pet(request.pet_id).await?;

        let now = Utc::now();
        let image = PetImage {
            id: Uuid::new_v4(),
            image_url: request.image_url.trim().to_string(),
            is_primary: request.is_primary,
            alt_text: clean(request.alt_text.as_deref()),
            pet_id: request.pet_id,
            created_at: now,
            updated_at: now,
        };

        let image = self.images.insert(&image).await?;
        info!(image_id = %image.id, pet_id = %image.pet_id, primary = image.is_primary, "Added pet image");
        Ok(image)
    }

    pub async fn get(&self, id: Uuid) -> Result<PetImage, ServiceError> {
        Ok(self.images.get(id).await?)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.images.exists_by_id(id).await?)
    }

    pub async fn ensure_pet(&self, pet_id: Uuid) -> Result<(), ServiceError> {
        if self.pets.exists_by_id(pet_id).await? {
            Ok(())
        } else {
            Err(not_found("Pet", "id", pet_id))
        }
    }

    pub async fn primary_for(&self, pet_id: Uuid) -> Result<PetImage, ServiceError> {
        let filter = PetImageFilter {
            is_primary: Some(true),
            ..PetImageFilter::for_pet(pet_id)
        };
        self.images
            .find_one(&filter)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("No primary image found for pet with id: {}", pet_id)))
    }

    pub async fn has_primary(&self, pet_id: Uuid) -> Result<bool, ServiceError> {
        let filter = PetImageFilter {
            is_primary: Some(true),
            ..PetImageFilter::for_pet(pet_id)
        };
        Ok(self.images.exists(&filter).await?)
    }

    pub async fn list(&self, filter: &PetImageFilter) -> Result<Vec<PetImage>, ServiceError> {
        Ok(self.images.find(filter).await?)
    }

    pub async fn page(&self, filter: &PetImageFilter, page: &PageRequest) -> Result<Page<PetImage>, ServiceError> {
        Ok(self.images.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &PetImageFilter) -> Result<i64, ServiceError> {
        Ok(self.images.count(filter).await?)
    }

    pub async fn statistics(&self, filter: &PetImageFilter) -> Result<PetImageStatistics, ServiceError> {
        Ok(self.images.statistics(filter).await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdatePetImageRequest) -> Result<PetImage, ServiceError> {
        request.validate()?;
        let mut image = self.images.get(id).await?;

        if let Some(url) = clean(request.image_url.as_deref()) {
            image.image_url = url;
        }
        if request.alt_text.is_some() {
            image.alt_text = clean(request.alt_text.as_deref());
        }
        if let Some(primary) = request.is_primary {
            image.is_primary = primary;
        }

        let image = self.images.update(&image).await?;
        info!(image_id = %image.id, "Updated pet image");
        Ok(image)
    }

    pub async fn set_primary(&self, id: Uuid) -> Result<PetImage, ServiceError> {
        let image = self.images.set_primary(id).await?;
        info!(image_id = %id, pet_id = %image.pet_id, "Set primary pet image");
        Ok(image)
    }

    pub async fn remove_primary(&self, id: Uuid) -> Result<PetImage, ServiceError> {
        let image = self.images.remove_primary(id).await?;
        info!(image_id = %id, "Removed primary flag");
        Ok(image)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.images.delete(id).await? {
            return Err(not_found("Pet image", "id", id));
        }
        info!(image_id = %id, "Deleted pet image");
        Ok(())
    }

    pub async fn delete_for_pet(&self, pet_id: Uuid) -> Result<u64, ServiceError> {
        self.ensure_pet(pet_id).await?;
        let removed = self.images.delete_for_pet(pet_id).await?;
        info!(pet_id = %pet_id, removed, "Deleted pet images");
        Ok(removed)
    }
}
