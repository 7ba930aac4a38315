//! Client search entry points.
//!
//! # Responsibility
//! - Expose exact-match, multi-field client lookup.
//! - Keep result shaping (client plus full phone list) inside core.

pub mod client_search;
