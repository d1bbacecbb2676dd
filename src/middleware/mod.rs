pub mod auth;
pub mod response;

pub use auth::authorize;
pub use response::{exists_status, ApiResponse, ApiResult};
