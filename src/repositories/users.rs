use serde::Serialize;
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::database::criteria::Criteria;
use crate::database::models::{Role, User};
use crate::database::pagination::{Page, PageRequest};
use crate::database::repository::Repository;
use crate::database::DatabaseError;

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
    /// Substring of "first last".
    pub name: Option<String>,
}

impl UserFilter {
    fn criteria(&self) -> Criteria {
        Criteria::new()
            .eq_ignore_case_opt("email", self.email.clone())
            .eq_opt("role", self.role)
            .eq_opt("active", self.active)
            .contains_opt("(first_name || ' ' || last_name)", self.name.clone())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatistics {
    pub total_users: i64,
    pub active_users: i64,
    pub visitors: i64,
    pub users: i64,
    pub foundation_admins: i64,
    pub super_admins: i64,
}

#[derive(Clone)]
pub struct UserRepository {
    rows: Repository<User>,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { rows: Repository::new(pool) }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DatabaseError> {
        self.rows.get(id).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.rows.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.rows.find_one(&Criteria::new().eq_ignore_case("email", email)).await
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, DatabaseError> {
        self.rows.exists(&Criteria::new().eq_ignore_case("email", email)).await
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.exists_by_id(id).await
    }

    pub async fn find(&self, filter: &UserFilter) -> Result<Vec<User>, DatabaseError> {
        self.rows.find_all(&filter.criteria()).await
    }

    pub async fn find_page(&self, filter: &UserFilter, page: &PageRequest) -> Result<Page<User>, DatabaseError> {
        self.rows.find_page(&filter.criteria(), page).await
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<i64, DatabaseError> {
        self.rows.count(&filter.criteria()).await
    }

    pub async fn insert(&self, user: &User) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, first_name, last_name, role, phone, city, active, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.rows.pool())
        .await?;
        Ok(row)
    }

    /// Persist every mutable column of `user`.
    pub async fn update(&self, user: &User) -> Result<User, DatabaseError> {
        let row = sqlx::query_as::<_, User>(
            "UPDATE users SET email = $2, password_hash = $3, first_name = $4, last_name = $5, role = $6, \
             phone = $7, city = $8, active = $9, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role)
        .bind(&user.phone)
        .bind(&user.city)
        .bind(user.active)
        .fetch_optional(self.rows.pool())
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("User not found with id: {}", user.id)))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.rows.delete_by_id(id).await
    }

    pub async fn statistics(&self) -> Result<UserStatistics, DatabaseError> {
        let stats = sqlx::query_as::<_, UserStatistics>(
            "SELECT COUNT(*) AS total_users, \
             COUNT(*) FILTER (WHERE active) AS active_users, \
             COUNT(*) FILTER (WHERE role = 'VISITOR') AS visitors, \
             COUNT(*) FILTER (WHERE role = 'USER') AS users, \
             COUNT(*) FILTER (WHERE role = 'FOUNDATION_ADMIN') AS foundation_admins, \
             COUNT(*) FILTER (WHERE role = 'SUPER_ADMIN') AS super_admins \
             FROM users",
        )
        .fetch_one(self.rows.pool())
        .await?;
        Ok(stats)
    }
}
