//! Marksheet API: accounts, sheets, and mark entries over PostgreSQL with bearer-token auth.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use auth::TokenService;
pub use error::{AppError, ConfigError};
pub use response::{success_many, success_one, Envelope};
pub use routes::{api_routes, app, common_routes};
pub use settings::Settings;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, MemoryStore, PgStore, Store};
