use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::models::PetImage;
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct PetImageFilter {
    pub pet_id: Option<Uuid>,
    pub is_primary: Option<bool>,
    pub url: Option<String>,
}

impl PetImageFilter {
    pub fn for_pet(pet_id: Uuid) -> Self {
        Self {
            pet_id: Some(pet_id),
            ..Default::default()
        }
    }

    fn criteria(&self) -> Criteria {
        Criteria::new()
            .eq_opt("pet_id", self.pet_id)
            .eq_opt("is_primary", self.is_primary)
            .contains_opt("image_url", self.url.clone())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetImageStatistics {
    pub total_images: i64,
    pub primary_images: i64,
    pub pets_with_images: i64,
    pub average_images_per_pet: f64,
}

#[derive(Clone)]
pub struct PetImageRepository {
    rows: Repository<PetImage>,
}

impl PetImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<PetImage, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn find_one(&self, filter: &PetImageFilter) -> Result<Option<PetImage>, DatabaseError> {
        self.rows.find_one(&filter.criteria()).await
    }

    pub async fn exists(&self, filter: &PetImageFilter) -> Result<bool, DatabaseError> {
        self.rows.exists(&filter.criteria()).await
    }

    pub async fn find(&self, filter: &PetImageFilter) -> Result<Vec<PetImage>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(
        &self,
        filter: &PetImageFilter,
        page: &PageRequest,
    ) -> Result<Page<PetImage>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &PetImageFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    /// Insert an image; a primary image first demotes the pet's current primary
    /// inside the same transaction.
    pub async fn insert(&self, image: &PetImage) -> Result<PetImage, DatabaseError> {
        let mut tx = self.rows.pool().begin().await?;
        if image.is_primary {
            Self::demote_primary(&mut tx, image.pet_id, image.id).await?;
        }

        let row = sqlx::query_as::<_, PetImage>(
            "INSERT INTO pet_images (id, image_url, is_primary, alt_text, pet_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(image.id)
        .bind(&image.image_url)
        .bind(image.is_primary)
        .bind(&image.alt_text)
        .bind(image.pet_id)
        .bind(image.created_at)
        .bind(image.updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Persist `image`, keeping the single-primary rule for its pet.
    pub async fn update(&self, image: &PetImage) -> Result<PetImage, DatabaseError> {
        let mut tx = self.rows.pool().begin().await?;
        if image.is_primary {
            Self::demote_primary(&mut tx, image.pet_id, image.id).await?;
        }

        let row = sqlx::query_as::<_, PetImage>(
            "UPDATE pet_images SET image_url = $2, is_primary = $3, alt_text = $4, pet_id = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(image.id)
        .bind(&image.image_url)
        .bind(image.is_primary)
        .bind(&image.alt_text)
        .bind(image.pet_id)
        .fetch_optional(&mut *tx)
        .await?;

        let row = row.ok_or_else(|| DatabaseError::NotFound(format!("Pet image not found with id: {}", image.id)))?;
        tx.commit().await?;
        Ok(row)
    }

    /// Make `id` the only primary image of its pet.
    pub async fn set_primary(&self, id: Uuid) -> Result<PetImage, DatabaseError> {
        let mut tx = self.rows.pool().begin().await?;

        let image = sqlx::query_as::<_, PetImage>("SELECT * FROM pet_images WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Pet image not found with id: {}", id)))?;

        Self::demote_primary(&mut tx, image.pet_id, id).await?;

        let row = sqlx::query_as::<_, PetImage>(
            "UPDATE pet_images SET is_primary = TRUE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    pub async fn remove_primary(&self, id: Uuid) -> Result<PetImage, DatabaseError> {
        let row = sqlx::query_as::<_, PetImage>(
            "UPDATE pet_images SET is_primary = FALSE, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Pet image not found with id: {}", id)))
    }

    /// Clear the pet's primary flag on every image except `keep`.
    ///
    /// Locks the parent pet row first so concurrent primary changes for the
    /// same pet run one after another.
    async fn demote_primary(
        tx: &mut Transaction<'_, Postgres>,
        pet_id: Uuid,
        keep: Uuid,
    ) -> Result<(), DatabaseError> {
        sqlx::query("SELECT id FROM pets WHERE id = $1 FOR UPDATE")
            .bind(pet_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            "UPDATE pet_images SET is_primary = FALSE, updated_at = NOW() \
             WHERE pet_id = $1 AND is_primary AND id <> $2",
        )
        .bind(pet_id)
        .bind(keep)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn delete_for_pet(&self, pet_id: Uuid) -> Result<u64, DatabaseError> {
        self.rows.delete_where(&PetImageFilter::for_pet(pet_id).criteria()).await
    }

    pub async fn statistics(&self, filter: &PetImageFilter) -> Result<PetImageStatistics, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) AS total_images, \
             COUNT(*) FILTER (WHERE is_primary) AS primary_images, \
             COUNT(DISTINCT pet_id) AS pets_with_images, \
             COALESCE(COUNT(*)::float8 / NULLIF(COUNT(DISTINCT pet_id), 0), 0)::float8 AS average_images_per_pet \
             FROM pet_images",
        );
        filter.criteria().push_where(&mut qb);
        let stats = qb.build_query_as::<PetImageStatistics>().fetch_one(self.rows.pool()).await?;
        Ok(stats)
    }
}
