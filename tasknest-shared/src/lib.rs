//! # TaskNest Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the TaskNest API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and session tokens
//! - `db`: Connection pooling and migrations
//! - `slug`: URL slug derivation and uniqueness

pub mod auth;
pub mod db;
pub mod models;
pub mod slug;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
