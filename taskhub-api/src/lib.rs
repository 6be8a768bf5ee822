//! # taskhub API Server Library
//!
//! HTTP surface for users and tasks: list, fetch, create, update and
//! soft-delete, with per-request database sessions.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
