use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validation::Validator;
use crate::services::ServiceError;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "demo.user@petfriendly.dev")]
    pub email: String,
    #[schema(example = "DemoPa55!")]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ServiceError> {
        Validator::new()
            .required("email", &self.email)
            .required("password", &self.password)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JwtAuthenticationResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

impl JwtAuthenticationResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
