//! # Daydash Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the daydash API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, JWT tokens, and the access-control policy
//! - `db`: Connection pool and migration helpers

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the daydash shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
