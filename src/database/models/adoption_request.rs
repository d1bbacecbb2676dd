use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::AdoptionRequestStatus;
use crate::database::repository::Entity;

#[derive(Debug, Clone, FromRow)]
pub struct AdoptionRequest {
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

impl Entity for AdoptionRequest {
    const TABLE: &'static str = "adoption_requests";
    const LABEL: &'static str = "Adoption request";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("status", "status"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
        ("reviewedAt", "reviewed_at"),
    ];
}
