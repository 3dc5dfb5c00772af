//! Authentication module
//!
//! Bearer-token verification for the API. Tokens are issued by the
//! identity subsystem; this module verifies them and exposes the
//! generator for tests and local tooling.

mod jwt;
mod service;

pub use jwt::{generate_token, verify_token, Claims, JwtError};
pub use service::{AuthService, TokenIdentity};
