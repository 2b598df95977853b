//! Plan item queries over the two-tier staging table.

use jiff::civil::Date;
use jiff::Timestamp;
use rusqlite::{params, types::Type};

use crate::{
    error::{CadenceError, DatabaseResultExt, Result},
    models::{ItemKind, PlanItem, Tier},
    params::{OverwriteWindow, Window},
};

// Optimized SQL queries as const strings for compile-time optimization
const SELECT_WINDOW_SQL: &str = "SELECT id, subject_id, for_date, kind, payload, is_approved \
     FROM plan_items \
     WHERE subject_id = ?1 AND tier = ?2 AND for_date >= ?3 AND for_date <= ?4 \
     ORDER BY for_date ASC, id ASC";
const DELETE_WINDOW_SQL: &str = "DELETE FROM plan_items \
     WHERE subject_id = ?1 AND tier = ?2 AND for_date >= ?3 AND for_date <= ?4";
const INSERT_ITEM_SQL: &str = "INSERT INTO plan_items \
     (subject_id, for_date, kind, payload, is_approved, tier, created_at, updated_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const APPROVE_WINDOW_SQL: &str = "UPDATE plan_items SET is_approved = 1, updated_at = ?1 \
     WHERE subject_id = ?2 AND tier = 'draft' AND for_date >= ?3 AND for_date <= ?4";
const COPY_TO_PUBLISHED_SQL: &str = "INSERT INTO plan_items \
     (subject_id, for_date, kind, payload, is_approved, tier, created_at, updated_at) \
     SELECT subject_id, for_date, kind, payload, 1, 'published', created_at, ?1 \
     FROM plan_items \
     WHERE subject_id = ?2 AND tier = 'draft' AND for_date >= ?3 AND for_date <= ?4";

fn map_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<PlanItem> {
    let date_str: String = row.get(2)?;
    let for_date = date_str.parse::<Date>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e))
    })?;

    let kind_str: String = row.get(3)?;
    let kind = kind_str.parse::<ItemKind>().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Text,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid item kind: {kind_str}"),
            )),
        )
    })?;

    let payload_str: String = row.get(4)?;
    let payload = serde_json::from_str(&payload_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
    })?;

    Ok(PlanItem {
        id: row.get::<_, i64>(0)? as u64,
        subject_id: row.get(1)?,
        for_date,
        kind,
        payload,
        is_approved: row.get(5)?,
    })
}

impl super::Database {
    /// Retrieves the items of a window from one tier, ordered by day then id.
    ///
    /// Dates are stored as `YYYY-MM-DD` text, so the lexicographic range
    /// filter is exactly the calendar range filter.
    pub fn fetch_window(&self, window: &Window, tier: Tier) -> Result<Vec<PlanItem>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_WINDOW_SQL)
            .db_context("Failed to prepare window query")?;

        let items = stmt
            .query_map(
                params![
                    window.subject_id,
                    tier.as_str(),
                    window.start.to_string(),
                    window.end().to_string()
                ],
                map_item,
            )
            .db_context("Failed to query window items")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .db_context("Failed to fetch window items")?;

        Ok(items)
    }

    /// Replaces the draft items of a window in one transaction and returns
    /// the inserted items with their assigned ids.
    pub fn overwrite_window(&mut self, params: &OverwriteWindow) -> Result<Vec<PlanItem>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let window = &params.window;
        tx.execute(
            DELETE_WINDOW_SQL,
            rusqlite::params![
                window.subject_id,
                Tier::Draft.as_str(),
                window.start.to_string(),
                window.end().to_string()
            ],
        )
        .db_context("Failed to clear draft window")?;

        let mut inserted = Vec::with_capacity(params.items.len());
        for item in &params.items {
            let payload = serde_json::to_string(&item.payload)?;
            tx.execute(
                INSERT_ITEM_SQL,
                rusqlite::params![
                    window.subject_id,
                    item.for_date.to_string(),
                    item.kind.as_str(),
                    payload,
                    item.is_approved,
                    Tier::Draft.as_str(),
                    &now,
                    &now
                ],
            )
            .db_context("Failed to insert draft item")?;

            inserted.push(PlanItem {
                id: tx.last_insert_rowid() as u64,
                subject_id: window.subject_id,
                for_date: item.for_date,
                kind: item.kind,
                payload: item.payload.clone(),
                is_approved: item.is_approved,
            });
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(inserted)
    }

    /// Marks every draft item of a window approved. Returns the number of
    /// items updated.
    pub fn approve_window(&mut self, window: &Window) -> Result<usize> {
        let now = Timestamp::now().to_string();
        self.connection
            .execute(
                APPROVE_WINDOW_SQL,
                params![
                    &now,
                    window.subject_id,
                    window.start.to_string(),
                    window.end().to_string()
                ],
            )
            .db_context("Failed to approve draft window")
    }

    /// Publishes a window: approves its draft items, replaces the published
    /// copy of the window, and copies the drafts over, all in one
    /// transaction. A reader never observes a half-published window.
    ///
    /// Returns the number of items published.
    pub fn publish_window(&mut self, window: &Window) -> Result<usize> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let now = Timestamp::now().to_string();
        let (subject, start, end) = (
            window.subject_id,
            window.start.to_string(),
            window.end().to_string(),
        );

        tx.execute(APPROVE_WINDOW_SQL, params![&now, subject, &start, &end])
            .db_context("Failed to approve draft window")?;
        tx.execute(
            DELETE_WINDOW_SQL,
            params![subject, Tier::Published.as_str(), &start, &end],
        )
        .db_context("Failed to clear published window")?;
        let published = tx
            .execute(COPY_TO_PUBLISHED_SQL, params![&now, subject, &start, &end])
            .db_context("Failed to copy drafts to published tier")?;

        if published == 0 {
            // Dropping the transaction rolls back the cleared published copy.
            return Err(CadenceError::invalid_input(
                "window",
                format!("no draft items to publish for subject {subject} in {start}..={end}"),
            ));
        }

        tx.commit().db_context("Failed to commit transaction")?;
        Ok(published)
    }

    /// Deletes the draft items of a window. The published tier is untouched.
    /// Returns the number of items removed.
    pub fn discard_window(&mut self, window: &Window) -> Result<usize> {
        self.connection
            .execute(
                DELETE_WINDOW_SQL,
                params![
                    window.subject_id,
                    Tier::Draft.as_str(),
                    window.start.to_string(),
                    window.end().to_string()
                ],
            )
            .db_context("Failed to discard draft window")
    }
}
