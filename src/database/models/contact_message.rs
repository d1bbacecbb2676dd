use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::Entity;

#[derive(Debug, Clone, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: Option<String>,
    pub message: String,
    pub foundation_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Entity for ContactMessage {
    const TABLE: &'static str = "contact_messages";
    const LABEL: &'static str = "Contact message";
    const SORTABLE: &'static [(&'static str, &'static str)] = &[
        ("id", "id"),
        ("senderName", "sender_name"),
        ("senderEmail", "sender_email"),
        ("subject", "subject"),
        ("isRead", "is_read"),
        ("readAt", "read_at"),
        ("createdAt", "created_at"),
    ];
}
