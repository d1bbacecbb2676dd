use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::Entity;

#[derive(Debug, Clone, FromRow)]
pub struct PetImage {
    pub id: Uuid,
    pub image_url: String,
    pub is_primary: bool,
    pub alt_text: Option<String>,
    pub pet_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for PetImage {
    const TABLE: &'static str = "pet_images";
    const LABEL: &'static str = "Pet image";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("imageUrl", "image_url"),
        ("isPrimary", "is_primary"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ];
}
