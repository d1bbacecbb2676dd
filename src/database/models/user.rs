use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::Role;
use crate::database::repository::Entity;

/// Platform account. The password hash never leaves the service layer.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const LABEL: &'static str = "User";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("email", "email"),
        ("firstName", "first_name"),
        ("lastName", "last_name"),
        ("role", "role"),
        ("city", "city"),
        ("active", "active"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];
}
