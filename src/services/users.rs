use chrono::Utc;
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

use super::{not_found, ServiceError};
use crate::api::users::{ChangePasswordRequest, CreateUserRequest, UpdateProfileRequest, UpdateUserRequest};
use crate::api::validation::{clean, normalize_email};
use crate::auth::password::{hash_password, verify_password};
use crate::database::models::{Role, User};
use crate::database::{DatabaseError, Page, PageRequest};
use crate::repositories::{UserFilter, UserRepository, UserStatistics};

pub const EMAIL_TAKEN: &str = "Error: Email is already taken!";

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Create an account. `default_role` applies when the request names none.
    pub async fn create(&self, request: CreateUserRequest, default_role: Role) -> Result<User, ServiceError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.users.exists_by_email(&email).await? {
            return Err(ServiceError::bad_request(EMAIL_TAKEN));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash: hash_password(&request.password)?,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            role: request.role.unwrap_or(default_role),
            phone: clean(request.phone.as_deref()),
            city: clean(request.city.as_deref()),
            active: request.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let user = self.users.insert(&user).await.map_err(email_taken)?;
        info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, ServiceError> {
        Ok(self.users.get(id).await?)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        Ok(self.users.find_by_id(id).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, ServiceError> {
        self.users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| not_found("User", "email", email))
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, ServiceError> {
        Ok(self.users.exists_by_id(id).await?)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool, ServiceError> {
        Ok(self.users.exists_by_email(&normalize_email(email)).await?)
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, ServiceError> {
        debug!(?filter, "Listing users");
        Ok(self.users.find(filter).await?)
    }

    pub async fn page(&self, filter: &UserFilter, page: &PageRequest) -> Result<Page<User>, ServiceError> {
        Ok(self.users.find_page(filter, page).await?)
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<i64, ServiceError> {
        Ok(self.users.count(filter).await?)
    }

    pub async fn statistics(&self) -> Result<UserStatistics, ServiceError> {
        Ok(self.users.statistics().await?)
    }

    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, ServiceError> {
        request.validate()?;
        let mut user = self.users.get(id).await?;

        if let Some(email) = request.email.as_deref().map(normalize_email) {
            if email != user.email && self.users.exists_by_email(&email).await? {
                return Err(ServiceError::bad_request(EMAIL_TAKEN));
            }
            user.email = email;
        }
        if let Some(first_name) = clean(request.first_name.as_deref()) {
            user.first_name = first_name;
        }
        if let Some(last_name) = clean(request.last_name.as_deref()) {
            user.last_name = last_name;
        }
        if let Some(password) = request.password.as_deref() {
            user.password_hash = hash_password(password)?;
        }
        if request.phone.is_some() {
            user.phone = clean(request.phone.as_deref());
        }
        if request.city.is_some() {
            user.city = clean(request.city.as_deref());
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(active) = request.active {
            user.active = active;
        }

        let user = self.users.update(&user).await.map_err(email_taken)?;
        info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<User, ServiceError> {
        let mut user = self.users.get(id).await?;
        user.active = active;
        let user = self.users.update(&user).await?;
        info!(user_id = %user.id, active, "Changed user activation");
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.users.delete(id).await? {
            return Err(not_found("User", "id", id));
        }
        info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Apply a self-service profile edit. Blank values leave the field as is.
    pub async fn update_profile(&self, id: Uuid, request: UpdateProfileRequest) -> Result<User, ServiceError> {
        request.validate()?;
        let mut user = self.users.get(id).await?;

        if let Some(first_name) = clean(request.first_name.as_deref()) {
            user.first_name = first_name;
        }
        if let Some(last_name) = clean(request.last_name.as_deref()) {
            user.last_name = last_name;
        }
        if let Some(phone) = clean(request.phone.as_deref()) {
            user.phone = Some(phone);
        }
        if let Some(city) = clean(request.city.as_deref()) {
            user.city = Some(city);
        }

        let user = self.users.update(&user).await?;
        info!(user_id = %user.id, "Updated profile");
        Ok(user)
    }

    pub async fn change_password(&self, id: Uuid, request: ChangePasswordRequest) -> Result<(), ServiceError> {
        request.validate()?;
        let mut user = self.users.get(id).await?;

        if !verify_password(&request.current_password, &user.password_hash) {
            return Err(ServiceError::bad_request("Current password is incorrect"));
        }

        user.password_hash = hash_password(&request.new_password)?;
        self.users.update(&user).await?;
        info!(user_id = %id, "Changed password");
        Ok(())
    }
}

/// A concurrent insert can slip past the existence check; the unique index
/// reports it instead.
fn email_taken(err: DatabaseError) -> ServiceError {
    if err.is_unique_violation() {
        ServiceError::bad_request(EMAIL_TAKEN)
    } else {
        err.into()
    }
}
