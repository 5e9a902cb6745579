//! Session tokens for bearer authentication.

pub mod session;

pub use session::{SessionError, SessionTokens, DEFAULT_TOKEN_LIFETIME_DAYS};
