pub mod criteria;
pub mod manager;
pub mod models;
pub mod pagination;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use pagination::{Page, PageParams, PageRequest};
