//! Data models for users and sessions.

pub mod session;
pub mod user;

pub use session::*;
pub use user::*;
