//! Per-entity persistence: filters, writes and aggregate queries on top of
//! the generic [`Repository`](crate::database::repository::Repository).

mod adoption_requests;
mod contact_messages;
mod foundations;
mod pet_images;
mod pets;
mod users;

pub use adoption_requests::{AdoptionRequestFilter, AdoptionRequestRepository, AdoptionStatistics};
pub use contact_messages::{ContactMessageFilter, ContactMessageRepository, ContactMessageStatistics};
pub use foundations::{FoundationFilter, FoundationOverview, FoundationRepository, FoundationStatistics};
pub use pet_images::{PetImageFilter, PetImageRepository, PetImageStatistics};
pub use pets::{PetFilter, PetRepository, PetStatistics};
pub use users::{UserFilter, UserRepository, UserStatistics};
