//! Database schema initialization and migrations.

use crate::error::{CadenceError, DatabaseResultExt, Result};

impl super::Database {
    /// Initializes the database schema using the embedded SQL file.
    pub(super) fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .db_context("Failed to enable foreign keys")?;

        // Execute the schema SQL
        let schema_sql = include_str!("../../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .db_context("Failed to initialize database schema")?;

        // Apply migrations for existing databases
        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Databases created before the two-tier layout carry no tier column
        let has_tier_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('plan_items') WHERE name = 'tier'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_tier_column {
            self.connection
                .execute(
                    "ALTER TABLE plan_items ADD COLUMN tier TEXT NOT NULL DEFAULT 'draft'",
                    [],
                )
                .map_err(|e| {
                    CadenceError::database_error("Failed to add tier column to plan_items", e)
                })?;
        }

        Ok(())
    }
}
