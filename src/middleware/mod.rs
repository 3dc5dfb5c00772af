//! Middleware for the AdMarket API
//!
//! Request tracing plus the authentication extractors used by
//! protected routes.

pub mod auth;
mod tracing;

pub use auth::{AdminUser, AuthenticatedUser};
pub use tracing::request_tracing;
