//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization, pragmas and create-if-absent migrations
//! - First-boot seeding of reference data
//! - A predicate builder for optional-filter listings
//! - Repository layer for database operations

pub mod error;
pub mod migrations;
pub mod query;
pub mod repo;
pub mod seed;

pub use error::StoreError;
pub use migrations::{init_db, init_db_with};
pub use repo::Repository;
pub use seed::{ensure_seeded, seed_defaults, SeedOptions, SeedReport};
