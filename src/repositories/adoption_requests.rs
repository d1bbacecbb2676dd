use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::models::{AdoptionRequest, AdoptionRequestStatus};
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct AdoptionRequestFilter {
    pub user_id: Option<Uuid>,
    pub pet_id: Option<Uuid>,
    pub status: Option<AdoptionRequestStatus>,
    /// Foundation owning the requested pet.
    pub foundation_id: Option<Uuid>,
}

impl AdoptionRequestFilter {
    fn criteria(&self) -> Criteria {
        Criteria::new()
            .eq_opt("user_id", self.user_id)
            .eq_opt("pet_id", self.pet_id)
            .eq_opt("status", self.status)
            .in_subquery_opt("pet_id", "SELECT id FROM pets WHERE foundation_id = ", self.foundation_id)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdoptionStatistics {
    pub total_requests: i64,
    pub pending_requests: i64,
    pub approved_requests: i64,
    pub rejected_requests: i64,
    pub cancelled_requests: i64,
}

#[derive(Clone)]
pub struct AdoptionRequestRepository {
    rows: Repository<AdoptionRequest>,
}

impl AdoptionRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<AdoptionRequest, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn exists_for(&self, user_id: Uuid, pet_id: Uuid) -> Result<bool, DatabaseError> {
        self.rows
            .exists(&Criteria::new().eq("user_id", user_id).eq("pet_id", pet_id))
            .await
    }

    pub async fn find(&self, filter: &AdoptionRequestFilter) -> Result<Vec<AdoptionRequest>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(
        &self,
        filter: &AdoptionRequestFilter,
        page: &PageRequest,
    ) -> Result<Page<AdoptionRequest>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &AdoptionRequestFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    /// A concurrent duplicate for the same (user, pet) fails with
    /// `DatabaseError::UniqueViolation`.
    pub async fn insert(&self, request: &AdoptionRequest) -> Result<AdoptionRequest, DatabaseError> {
        let row = sqlx::query_as::<_, AdoptionRequest>(
            "INSERT INTO adoption_requests (id, user_id, pet_id, message, experience, living_situation, status, \
             review_notes, created_at, updated_at, reviewed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(request.id)
        .bind(request.user_id)
        .bind(request.pet_id)
        .bind(&request.message)
        .bind(&request.experience)
        .bind(&request.living_situation)
        .bind(request.status)
        .bind(&request.review_notes)
        .bind(request.created_at)
        .bind(request.updated_at)
        .bind(request.reviewed_at)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(row)
    }

    /// Rewrite the applicant-editable text fields.
    pub async fn update_details(&self, request: &AdoptionRequest) -> Result<AdoptionRequest, DatabaseError> {
        let row = sqlx::query_as::<_, AdoptionRequest>(
            "UPDATE adoption_requests SET message = $2, experience = $3, living_situation = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(request.id)
        .bind(&request.message)
        .bind(&request.experience)
        .bind(&request.living_situation)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Adoption request not found with id: {}", request.id)))
    }

    /// Compare-and-set the status. Returns `None` when the row is gone or its
    /// status is no longer `expected`.
    pub async fn transition(
        &self,
        id: Uuid,
        expected: AdoptionRequestStatus,
        next: AdoptionRequestStatus,
        review_notes: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<Option<AdoptionRequest>, DatabaseError> {
        let row = sqlx::query_as::<_, AdoptionRequest>(
            "UPDATE adoption_requests SET status = $3, review_notes = $4, reviewed_at = $5, updated_at = $5 \
             WHERE id = $1 AND status = $2 RETURNING *",
        )
        .bind(id)
        .bind(expected)
        .bind(next)
        .bind(review_notes)
        .bind(reviewed_at)
        .fetch_optional(self.rows.pool())
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn statistics(&self, filter: &AdoptionRequestFilter) -> Result<AdoptionStatistics, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) AS total_requests, \
             COUNT(*) FILTER (WHERE status = 'PENDING') AS pending_requests, \
             COUNT(*) FILTER (WHERE status = 'APPROVED') AS approved_requests, \
             COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected_requests, \
             COUNT(*) FILTER (WHERE status = 'CANCELLED') AS cancelled_requests \
             FROM adoption_requests",
        );
        filter.criteria().push_where(&mut qb);
        let stats = qb.build_query_as::<AdoptionStatistics>().fetch_one(self.rows.pool()).await?;
        Ok(stats)
    }
}
