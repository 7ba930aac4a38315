//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for clients and phones.
//! - Isolate SQLite query details from the caller-facing store.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `ReferenceError`,
//!   `ConstraintViolation`) in addition to DB transport errors.

pub mod client_repo;
pub mod update_builder;
