//! Database operations and SQLite management for staged plan items.
//!
//! This module owns the SQLite connection, schema management, and the
//! low-level queries over the two-tier `plan_items` table. The draft tier is
//! the mutable working copy; the published tier is only ever written by the
//! atomic publish in [`item_queries`].

use std::path::Path;

use rusqlite::Connection;

use crate::error::{DatabaseResultExt, Result};

pub mod item_queries;
pub mod migrations;

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).db_context("Failed to open database connection")?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }
}
