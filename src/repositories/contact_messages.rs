use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::models::ContactMessage;
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct ContactMessageFilter {
    pub foundation_id: Option<Uuid>,
    pub sender_email: Option<String>,
    pub sender_name: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub is_read: Option<bool>,
}

impl ContactMessageFilter {
    fn criteria(&self) -> Criteria {
        Criteria::new()
            .eq_opt("foundation_id", self.foundation_id)
            .eq_ignore_case_opt("sender_email", self.sender_email.clone())
            .contains_opt("sender_name", self.sender_name.clone())
            .contains_opt("subject", self.subject.clone())
            .contains_opt("message", self.message.clone())
            .eq_opt("is_read", self.is_read)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageStatistics {
    pub total_messages: i64,
    pub unread_messages: i64,
    pub read_messages: i64,
    pub messages_today: i64,
    pub messages_this_week: i64,
    pub messages_this_month: i64,
}

#[derive(Clone)]
pub struct ContactMessageRepository {
    rows: Repository<ContactMessage>,
}

impl ContactMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<ContactMessage, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn find(&self, filter: &ContactMessageFilter) -> Result<Vec<ContactMessage>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(
        &self,
        filter: &ContactMessageFilter,
        page: &PageRequest,
    ) -> Result<Page<ContactMessage>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &ContactMessageFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    pub async fn insert(&self, message: &ContactMessage) -> Result<ContactMessage, DatabaseError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            "INSERT INTO contact_messages (id, sender_name, sender_email, subject, message, foundation_id, \
             is_read, read_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(message.id)
        .bind(&message.sender_name)
        .bind(&message.sender_email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.foundation_id)
        .bind(message.is_read)
        .bind(message.read_at)
        .bind(message.created_at)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(row)
    }

    pub async fn update(&self, message: &ContactMessage) -> Result<ContactMessage, DatabaseError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET sender_name = $2, sender_email = $3, subject = $4, message = $5, \
             foundation_id = $6, is_read = $7, read_at = $8 WHERE id = $1 RETURNING *",
        )
        .bind(message.id)
        .bind(&message.sender_name)
        .bind(&message.sender_email)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(message.foundation_id)
        .bind(message.is_read)
        .bind(message.read_at)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Contact message not found with id: {}", message.id)))
    }

    /// Flip the read flag; `read_at` follows it.
    pub async fn set_read(&self, id: Uuid, read: bool) -> Result<ContactMessage, DatabaseError> {
        let row = sqlx::query_as::<_, ContactMessage>(
            "UPDATE contact_messages SET is_read = $2, \
             read_at = CASE WHEN $2 THEN COALESCE(read_at, NOW()) ELSE NULL END \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(read)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Contact message not found with id: {}", id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn statistics(&self, filter: &ContactMessageFilter) -> Result<ContactMessageStatistics, DatabaseError> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) AS total_messages, \
             COUNT(*) FILTER (WHERE NOT is_read) AS unread_messages, \
             COUNT(*) FILTER (WHERE is_read) AS read_messages, \
             COUNT(*) FILTER (WHERE created_at >= date_trunc('day', NOW())) AS messages_today, \
             COUNT(*) FILTER (WHERE created_at >= date_trunc('week', NOW())) AS messages_this_week, \
             COUNT(*) FILTER (WHERE created_at >= date_trunc('month', NOW())) AS messages_this_month \
             FROM contact_messages",
        );
        filter.criteria().push_where(&mut qb);
        let stats = qb
            .build_query_as::<ContactMessageStatistics>()
            .fetch_one(self.rows.pool())
            .await?;
        Ok(stats)
    }
}
