//! Authentication

mod errors;
mod models;
mod provider;
mod session;

pub use errors::*;
pub use models::*;
pub use provider::*;
pub use session::*;
