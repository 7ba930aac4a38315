//! Core data access layer for clients and their phone numbers.
//!
//! `ClientStore` is the caller-facing surface; everything else supports it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::{MissingTarget, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::client::{
    Client, ClientChanges, ClientField, ClientId, ClientRecord, ClientValidationError, NewClient,
};
pub use repo::client_repo::{ClientRepository, RepoError, RepoResult, SqliteClientRepository};
pub use repo::update_builder::ClientUpdate;
pub use search::client_search::{find_clients, ClientSearchQuery};
pub use service::client_store::ClientStore;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
