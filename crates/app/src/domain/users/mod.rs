//! Users

pub mod models;
mod repository;

pub use models::{Role, UserProfile};
pub use repository::*;
