//! Domain model for clients and their phone numbers.
//!
//! # Invariants
//! - Every client is identified by a store-generated `ClientId`.
//! - A phone belongs to exactly one client and never outlives it.

pub mod client;
