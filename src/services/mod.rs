//! Business rules for each entity. Services validate input, apply defaults
//! and status transitions, and delegate storage to the repositories.

mod adoption_requests;
mod auth;
mod contact_messages;
mod foundations;
mod pet_images;
mod pets;
pub mod seed;
mod users;

pub use adoption_requests::AdoptionRequestService;
pub use auth::AuthService;
pub use contact_messages::ContactMessageService;
pub use foundations::FoundationService;
pub use pet_images::PetImageService;
pub use pets::PetService;
pub use users::UserService;

use thiserror::Error;

use crate::auth::password::PasswordHashError;
use crate::auth::JwtError;
use crate::database::models::AdoptionRequestStatus;
use crate::database::DatabaseError;
use crate::error::FieldErrors;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Adoption request cannot move from {from} to {to}")]
    InvalidTransition {
        from: AdoptionRequestStatus,
        to: AdoptionRequestStatus,
    },

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Database(DatabaseError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ServiceError::BadRequest(message.into())
    }
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(message) => ServiceError::NotFound(message),
            other => ServiceError::Database(other),
        }
    }
}

impl From<PasswordHashError> for ServiceError {
    fn from(err: PasswordHashError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

pub(crate) fn not_found(label: &str, field: &str, value: impl std::fmt::Display) -> ServiceError {
    ServiceError::NotFound(format!("{} not found with {}: {}", label, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_not_found_becomes_service_not_found() {
        let err: ServiceError = DatabaseError::NotFound("Pet not found with id: 1".to_string()).into();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Pet not found with id: 1"));

        let err: ServiceError = DatabaseError::UniqueViolation("users_email_key".to_string()).into();
        assert!(matches!(err, ServiceError::Database(DatabaseError::UniqueViolation(_))));
    }

    #[test]
    fn invalid_transition_message_names_both_states() {
        let err = ServiceError::InvalidTransition {
            from: AdoptionRequestStatus::Approved,
            to: AdoptionRequestStatus::Cancelled,
        };
        assert_eq!(err.to_string(), "Adoption request cannot move from APPROVED to CANCELLED");
    }
}
