//! # taskhub Shared Library
//!
//! Data-access layer for the taskhub API: models, slug derivation and
//! database plumbing.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and migrations
//! - `models`: users and tasks with their CRUD operations
//! - `slug`: deterministic slug derivation

pub mod db;
pub mod models;
pub mod slug;

/// Current version of the taskhub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
