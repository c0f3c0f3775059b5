//! Password hashing and bearer tokens.

pub mod password;
pub mod token;
pub use token::{extract_token, Claims, TokenService};
