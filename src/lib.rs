//! Campus API: REST CRUD over students, professors and library memberships.

pub mod config;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod state;
pub mod store;

pub use config::{Config, StoreKind};
pub use error::{AppError, ConfigError, StoreError};
pub use gateway::{Gateway, MemoryGateway, PgGateway};
pub use routes::{app, campus_routes, common_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema};
