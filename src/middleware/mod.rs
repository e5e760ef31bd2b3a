//! Request extractors and tower layers.

pub mod auth;
pub mod trace;

pub use auth::SessionUser;
