//! Store behaviour configuration.
//!
//! # Responsibility
//! - Decide how update/delete calls treat a client id that does not exist.
//!
//! # Invariants
//! - Defaults: updates of a missing client fail with `NotFound`, deletes of a
//!   missing client succeed silently.
//! - Phone deletion is always silent on zero matches and is not configurable.

use serde::{Deserialize, Serialize};

/// Outcome for an operation whose target client does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTarget {
    /// Surface `RepoError::NotFound`.
    Error,
    /// Treat the call as a successful no-op.
    Ignore,
}

/// Configuration for `ClientStore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Applied to `change_client`.
    pub on_missing_update: MissingTarget,
    /// Applied to `delete_client`.
    pub on_missing_delete: MissingTarget,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            on_missing_update: MissingTarget::Error,
            on_missing_delete: MissingTarget::Ignore,
        }
    }
}

impl StoreConfig {
    /// Every missing target is an error.
    pub fn strict() -> Self {
        Self {
            on_missing_update: MissingTarget::Error,
            on_missing_delete: MissingTarget::Error,
        }
    }

    /// Every missing target is a no-op.
    pub fn idempotent() -> Self {
        Self {
            on_missing_update: MissingTarget::Ignore,
            on_missing_delete: MissingTarget::Ignore,
        }
    }
}
