use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::Entity;

#[derive(Debug, Clone, FromRow)]
pub struct Foundation {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub state: Option<String>,
    pub description: Option<String>,
    pub contact_email: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    /// Exposed to clients as "active".
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Foundation {
    const TABLE: &'static str = "foundations";
    const LABEL: &'static str = "Foundation";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("name", "name"),
        ("city", "city"),
        ("state", "state"),
        ("contactEmail", "contact_email"),
        ("verified", "verified"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];
}
