use tracing::{info, warn};

use super::{ServiceError, UserService};
use crate::api::auth::LoginRequest;
use crate::api::users::RegisterRequest;
use crate::auth::password::verify_password;
use crate::auth::{IssuedToken, JwtService};
use crate::database::models::{Role, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login and self-registration.
#[derive(Clone)]
pub struct AuthService {
    users: UserService,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(users: UserService, jwt: JwtService) -> Self {
        Self { users, jwt }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<IssuedToken, ServiceError> {
        request.validate()?;

        let user = match self.users.get_by_email(&request.email).await {
            Ok(user) => user,
            Err(ServiceError::NotFound(_)) => {
                warn!("Login attempt for unknown account");
                return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
            Err(e) => return Err(e),
        };

        if !user.active || !verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "Rejected login");
            return Err(ServiceError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.jwt.issue(&user)?;
        info!(user_id = %user.id, role = %user.role, "User logged in");
        Ok(token)
    }

    /// Register a new active account with `role`. The role is never taken
    /// from the request body.
    pub async fn register(&self, request: RegisterRequest, role: Role) -> Result<User, ServiceError> {
        self.users.create(request.into(), role).await
    }
}
