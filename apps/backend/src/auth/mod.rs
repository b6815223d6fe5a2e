//! Bearer-token authentication.

pub mod jwt;
pub mod service;

pub use jwt::{mint_access_token, verify_access_token, Claims};
pub use service::{AuthGrant, AuthService, Identity, LocalAuth};
