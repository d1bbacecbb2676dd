use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::validation::Validator;
use crate::database::models::{Role, User};
use crate::services::ServiceError;

const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 100;

/// Self-service sign-up payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        validate_identity(&mut v, &self.first_name, &self.last_name, &self.email);
        v.required("password", &self.password)
            .length("password", Some(&self.password), PASSWORD_MIN, PASSWORD_MAX)
            .phone("phone", self.phone.as_deref())
            .length("city", self.city.as_deref(), 0, 100)
            .finish()
    }
}

/// Administrator-created account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut v = Validator::new();
        validate_identity(&mut v, &self.first_name, &self.last_name, &self.email);
        v.required("password", &self.password)
            .length("password", Some(&self.password), PASSWORD_MIN, PASSWORD_MAX)
            .phone("phone", self.phone.as_deref())
            .length("city", self.city.as_deref(), 0, 100)
            .finish()
    }
}

impl From<RegisterRequest> for CreateUserRequest {
    fn from(r: RegisterRequest) -> Self {
        Self {
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            password: r.password,
            phone: r.phone,
            city: r.city,
            role: None,
            active: None,
        }
    }
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .length("firstName", self.first_name.as_deref(), 2, 50)
            .length("lastName", self.last_name.as_deref(), 2, 50)
            .length("email", self.email.as_deref(), 0, 255)
            .email("email", self.email.as_deref())
            .length("password", self.password.as_deref(), PASSWORD_MIN, PASSWORD_MAX)
            .phone("phone", self.phone.as_deref())
            .length("city", self.city.as_deref(), 0, 100)
            .finish()
    }
}

/// Fields a user may change on their own profile. Blank values are ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let non_blank = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
        Validator::new()
            .length("firstName", non_blank(&self.first_name).as_deref(), 2, 50)
            .length("lastName", non_blank(&self.last_name).as_deref(), 2, 50)
            .phone("phone", self.phone.as_deref())
            .length("city", non_blank(&self.city).as_deref(), 0, 100)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("currentPassword", &self.current_password)
            .required("newPassword", &self.new_password)
            .length("newPassword", Some(&self.new_password), PASSWORD_MIN, PASSWORD_MAX)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub role: Role,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            phone: user.phone,
            city: user.city,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExistsResponse {
    pub exists: bool,
}

fn validate_identity(v: &mut Validator, first_name: &str, last_name: &str, email: &str) {
    v.required("firstName", first_name)
        .length("firstName", Some(first_name), 2, 50)
        .required("lastName", last_name)
        .length("lastName", Some(last_name), 2, 50)
        .required("email", email)
        .email("email", Some(email))
        .length("email", Some(email), 0, 255);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register() -> RegisterRequest {
        RegisterRequest {
            first_name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            phone: Some("+573001112233".to_string()),
            city: Some("Medellin".to_string()),
        }
    }

    #[test]
    fn register_request_accepts_valid_payload() {
        assert!(register().validate().is_ok());
    }

    #[test]
    fn register_request_reports_each_bad_field() {
        let mut request = register();
        request.first_name = "A".to_string();
        request.email = "nope".to_string();
        request.password = "123".to_string();

        match request.validate() {
            Err(ServiceError::Validation(errors)) => {
                assert!(errors.contains_key("firstName"));
                assert!(errors.contains_key("email"));
                assert!(errors.contains_key("password"));
                assert!(!errors.contains_key("lastName"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn register_request_uses_camel_case() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Lopez","email":"ana@example.com","password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(request.first_name, "Ana");
        assert!(request.phone.is_none());
    }

    #[test]
    fn update_rejects_overlong_email() {
        let request = UpdateUserRequest {
            email: Some(format!("{}@example.com", "a".repeat(250))),
            ..Default::default()
        };
        match request.validate() {
            Err(ServiceError::Validation(errors)) => assert!(errors.contains_key("email")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn profile_update_ignores_blank_values() {
        let request = UpdateProfileRequest {
            first_name: Some("  ".to_string()),
            city: Some("".to_string()),
            ..Default::default()
        };
        assert!(request.validate().is_ok());
    }
}
