//! API handlers for the AdMarket backend

pub mod admin;
pub mod campaigns;
pub mod deals;

pub use admin::*;
pub use campaigns::*;
pub use deals::*;

// Re-export the auth extractors for handler use
pub use crate::middleware::auth::{AdminUser, AuthenticatedUser};
