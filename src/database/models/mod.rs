mod adoption_request;
mod contact_message;
mod enums;
mod foundation;
mod pet;
mod pet_image;
mod user;

pub use adoption_request::AdoptionRequest;
pub use contact_message::ContactMessage;
pub use enums::{AdoptionRequestStatus, PetGender, PetSize, PetSpecies, PetStatus, Role};
pub use foundation::Foundation;
pub use pet::Pet;
pub use pet_image::PetImage;
pub use user::User;
