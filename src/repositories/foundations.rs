use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::models::Foundation;
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct FoundationFilter {
    pub name: Option<String>,
    pub name_contains: Option<String>,
    pub contact_email: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub verified: Option<bool>,
    /// Only foundations with at least one AVAILABLE pet.
    pub with_available_pets: bool,
}

impl FoundationFilter {
    fn criteria(&self) -> Criteria {
        let criteria = Criteria::new()
            .eq_ignore_case_opt("name", self.name.clone())
            .contains_opt("name", self.name_contains.clone())
            .eq_ignore_case_opt("contact_email", self.contact_email.clone())
            .eq_ignore_case_opt("city", self.city.clone())
            .eq_ignore_case_opt("state", self.state.clone())
            .eq_opt("verified", self.verified);

        if self.with_available_pets {
            criteria.in_subquery_opt(
                "id",
                "SELECT foundation_id FROM pets WHERE status = ",
                Some(crate::database::models::PetStatus::Available),
            )
        } else {
            criteria
        }
    }
}

/// Pet and adoption counts for a single foundation.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoundationStatistics {
    pub total_pets: i64,
    pub available_pets: i64,
    pub adopted_pets: i64,
    pub pending_adoptions: i64,
}

/// Platform-wide foundation counts.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoundationOverview {
    pub total_foundations: i64,
    pub active_foundations: i64,
    pub foundations_with_available_pets: i64,
}

#[derive(Clone)]
pub struct FoundationRepository {
    rows: Repository<Foundation>,
}

impl FoundationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<Foundation, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn find_one(&self, filter: &FoundationFilter) -> Result<Option<Foundation>, DatabaseError> {
        self.rows.find_one(&filter.criteria()).await
    }

    pub async fn exists(&self, filter: &FoundationFilter) -> Result<bool, DatabaseError> {
        self.rows.exists(&filter.criteria()).await
    }

    pub async fn find(&self, filter: &FoundationFilter) -> Result<Vec<Foundation>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(
        &self,
        filter: &FoundationFilter,
        page: &PageRequest,
    ) -> Result<Page<Foundation>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &FoundationFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    pub async fn insert(&self, foundation: &Foundation) -> Result<Foundation, DatabaseError> {
        let row = sqlx::query_as::<_, Foundation>(
            "INSERT INTO foundations (id, name, city, state, description, contact_email, website, address, \
             phone_number, verified, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(foundation.id)
        .bind(&foundation.name)
        .bind(&foundation.city)
        .bind(&foundation.state)
        .bind(&foundation.description)
        .bind(&foundation.contact_email)
        .bind(&foundation.website)
        .bind(&foundation.address)
        .bind(&foundation.phone_number)
        .bind(foundation.verified)
        .bind(foundation.created_at)
        .bind(foundation.updated_at)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(row)
    }

    pub async fn update(&self, foundation: &Foundation) -> Result<Foundation, DatabaseError> {
        let row = sqlx::query_as::<_, Foundation>(
            "UPDATE foundations SET name = $2, city = $3, state = $4, description = $5, contact_email = $6, \
             website = $7, address = $8, phone_number = $9, verified = $10, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(foundation.id)
        .bind(&foundation.name)
        .bind(&foundation.city)
        .bind(&foundation.state)
        .bind(&foundation.description)
        .bind(&foundation.contact_email)
        .bind(&foundation.website)
        .bind(&foundation.address)
        .bind(&foundation.phone_number)
        .bind(foundation.verified)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Foundation not found with id: {}", foundation.id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn statistics(&self, id: Uuid) -> Result<FoundationStatistics, DatabaseError> {
        let stats = sqlx::query_as::<_, FoundationStatistics>(
            "SELECT \
             (SELECT COUNT(*) FROM pets WHERE foundation_id = $1) AS total_pets, \
             (SELECT COUNT(*) FROM pets WHERE foundation_id = $1 AND status = 'AVAILABLE') AS available_pets, \
             (SELECT COUNT(*) FROM pets WHERE foundation_id = $1 AND status = 'ADOPTED') AS adopted_pets, \
             (SELECT COUNT(*) FROM adoption_requests ar JOIN pets p ON p.id = ar.pet_id \
              WHERE p.foundation_id = $1 AND ar.status = 'PENDING') AS pending_adoptions",
        )
        .bind(id)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(stats)
    }

    pub async fn overview(&self) -> Result<FoundationOverview, DatabaseError> {
        let stats = sqlx::query_as::<_, FoundationOverview>(
            "SELECT COUNT(*) AS total_foundations, \
             COUNT(*) FILTER (WHERE verified) AS active_foundations, \
             COUNT(*) FILTER (WHERE EXISTS (SELECT 1 FROM pets p WHERE p.foundation_id = foundations.id \
              AND p.status = 'AVAILABLE')) AS foundations_with_available_pets \
             FROM foundations",
        )
        .fetch_one(self.rows.pool())
        .await?;
        Ok(stats)
    }
}
