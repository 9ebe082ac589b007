//! Party registry: REST resources for organisations, users, credentials and accounts.

pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod password;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError, FieldErrors};
pub use migration::apply_migrations;
pub use password::{BcryptHasher, PasswordHasher};
pub use response::{error_body, list_response, resource_response, ResourceList};
pub use routes::{api_routes, app, common_routes, API_PREFIX};
pub use service::{CrudService, OrganisationService, Resource};
pub use settings::{HttpSettings, Settings, StoreBackend};
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};
