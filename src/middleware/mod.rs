pub mod auth;
pub mod permissions;

pub use auth::{require_auth, CurrentToken};
pub use permissions::{Authenticated, Authorized};
