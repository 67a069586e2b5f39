//! # Household Hero Shared Library
//!
//! Types, persistence and access-control logic used by the Household Hero API.
//!
//! ## Module Organization
//!
//! - `auth`: passwords, tokens, invitation codes and household access decisions
//! - `db`: connection pool and migrations
//! - `models`: database models and their queries

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
