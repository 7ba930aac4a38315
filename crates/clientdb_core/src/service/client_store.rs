//! Client store: the caller-facing CRUD and search surface.
//!
//! # Responsibility
//! - Expose client/phone operations as single logical calls.
//! - Apply the configured missing-target policy on top of repository errors.
//!
//! # Invariants
//! - The store never bypasses repository validation or transactions.
//! - Errors other than a policy-ignored `NotFound` reach the caller unchanged.

use crate::config::{MissingTarget, StoreConfig};
use crate::model::client::{ClientChanges, ClientId, ClientRecord, NewClient};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};
use crate::search::client_search::ClientSearchQuery;
use log::debug;

/// Client store over any repository implementation.
pub struct ClientStore<R: ClientRepository> {
    repo: R,
    config: StoreConfig,
}

impl<R: ClientRepository> ClientStore<R> {
    /// Creates a store with the default policy.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, StoreConfig::default())
    }

    pub fn with_config(repo: R, config: StoreConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Ensures `client` and `phone` tables exist. Safe to call repeatedly.
    pub fn initialize(&mut self) -> RepoResult<()> {
        self.repo.initialize()
    }

    /// Adds a client with optional initial phones and returns its id.
    ///
    /// The client and all phones are committed together or not at all.
    ///
    /// # Errors
    /// - `Validation` for blank or over-long fields.
    /// - `ConstraintViolation` when the email is already taken.
    pub fn add_client(&mut self, client: &NewClient) -> RepoResult<ClientId> {
        self.repo.create_client(client)
    }

    /// Adds one phone to an existing client.
    ///
    /// # Errors
    /// - `ReferenceError` when `client_id` is unknown.
    pub fn add_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<()> {
        self.repo.add_phone(client_id, phone)
    }

    /// Applies a partial update.
    ///
    /// Absent fields stay untouched. `changes.phones = Some(list)` replaces
    /// the whole phone set, including with an empty list.
    ///
    /// # Errors
    /// - `NotFound` when `client_id` is unknown and the update policy is
    ///   `MissingTarget::Error`.
    /// - `ConstraintViolation` when the new email belongs to another client.
    pub fn change_client(
        &mut self,
        client_id: ClientId,
        changes: &ClientChanges,
    ) -> RepoResult<()> {
        let result = self.repo.update_client(client_id, changes);
        apply_policy(result, self.config.on_missing_update, "client_update")
    }

    /// Removes every phone of `client_id` equal to `phone`.
    ///
    /// Returns the number of rows removed; zero is not an error.
    pub fn delete_phone(&mut self, client_id: ClientId, phone: &str) -> RepoResult<usize> {
        self.repo.delete_phone(client_id, phone)
    }

    /// Removes a client together with all its phones.
    ///
    /// # Errors
    /// - `NotFound` when `client_id` is unknown and the delete policy is
    ///   `MissingTarget::Error`.
    pub fn delete_client(&mut self, client_id: ClientId) -> RepoResult<()> {
        let result = self.repo.delete_client(client_id);
        apply_policy(result, self.config.on_missing_delete, "client_delete")
    }

    /// Finds clients matching all supplied filters, ordered by id.
    pub fn find_clients(&self, query: &ClientSearchQuery) -> RepoResult<Vec<ClientRecord>> {
        self.repo.find_clients(query)
    }

    pub fn get_client(&self, client_id: ClientId) -> RepoResult<Option<ClientRecord>> {
        self.repo.get_client(client_id)
    }

    pub fn list_phones(&self, client_id: ClientId) -> RepoResult<Vec<String>> {
        self.repo.list_phones(client_id)
    }
}

fn apply_policy(result: RepoResult<()>, policy: MissingTarget, event: &str) -> RepoResult<()> {
    match result {
        Err(RepoError::NotFound(client_id)) if policy == MissingTarget::Ignore => {
            debug!(
                "event={event} module=service status=skipped reason=missing client_id={client_id}"
            );
            Ok(())
        }
        other => other,
    }
}
