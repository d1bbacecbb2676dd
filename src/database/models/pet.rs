use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::{PetGender, PetSize, PetSpecies, PetStatus};
use crate::database::repository::Entity;

#[derive(Debug, Clone, FromRow)]
pub struct Pet {
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

impl Entity for Pet {
    const TABLE: &'static str = "pets";
    const LABEL: &'static str = "Pet";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("name", "name"),
        ("species", "species"),
        ("breed", "breed"),
        ("age", "age"),
        ("gender", "gender"),
        ("size", "size"),
        ("status", "status"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];
}
