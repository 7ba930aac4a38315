//! Caller-facing services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the client store API.
//! - Keep CLI and other callers decoupled from storage details.

pub mod client_store;
