//! HTTP handlers, one module per resource under `/api/v1`.
//!
//! Handlers stay thin: extract, call the service, wrap the result in the
//! response envelope. Authorization happens earlier in the policy middleware.

pub mod adoption_requests;
pub mod auth;
pub mod contact_messages;
pub mod docs;
pub mod extract;
pub mod foundations;
pub mod pet_images;
pub mod pets;
pub mod system;
pub mod users;
