//! SQLite storage implementation for Wealthdesk.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `wealthdesk-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for every stored record
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!     core (domain, analytics)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```
//!
//! Reads use pooled connections. Every write is funnelled through a single
//! writer task (see [`db::spawn_writer`]).

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod commitments;
pub mod entities;
pub mod fx;
pub mod positions;
pub mod risks;
pub mod settings;
pub mod transactions;
pub mod valuations;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Core error types, so callers need not depend on wealthdesk-core directly.
pub use wealthdesk_core::errors::{DatabaseError, Error, Result};
