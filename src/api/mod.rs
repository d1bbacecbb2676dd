//! Request and response bodies exchanged over HTTP.

pub mod adoption_requests;
pub mod auth;
pub mod contact_messages;
pub mod foundations;
pub mod pet_images;
pub mod pets;
pub mod users;
pub mod validation;
