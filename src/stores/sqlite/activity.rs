//! Implements a SQLite backed activity log store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, ToSql};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{ActivityKind, ActivityRecord, NewActivity},
    stores::ActivityStore,
};

use super::{lock, parse_column};

/// Appends and lists activity records in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteActivityStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteActivityStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Run a SELECT over the activity table, newest record first.
    fn select_where(
        &self,
        condition: &str,
        params: &[(&str, &dyn ToSql)],
    ) -> Result<Vec<ActivityRecord>, Error> {
        lock(&self.connection)?
            .prepare(&format!(
                "SELECT id, username, kind, recorded_at, description FROM activity
                 {condition}
                 ORDER BY recorded_at DESC, id DESC"
            ))?
            .query_map(params, Self::map_row)?
            .map(|maybe_record| maybe_record.map_err(|error| error.into()))
            .collect()
    }
}

impl ActivityStore for SQLiteActivityStore {
    fn append(&self, activity: NewActivity) -> Result<ActivityRecord, Error> {
        let connection = lock(&self.connection)?;

        connection.execute(
            "INSERT INTO activity (username, kind, recorded_at, description)
             VALUES (?1, ?2, ?3, ?4)",
            (
                &activity.username,
                activity.kind.code(),
                activity.recorded_at,
                &activity.description,
            ),
        )?;

        Ok(ActivityRecord {
            id: connection.last_insert_rowid(),
            username: activity.username,
            kind: activity.kind,
            recorded_at: activity.recorded_at,
            description: activity.description,
        })
    }

    fn get_all(&self) -> Result<Vec<ActivityRecord>, Error> {
        self.select_where("", &[])
    }

    fn get_by_username(&self, username: &str) -> Result<Vec<ActivityRecord>, Error> {
        self.select_where("WHERE username = :username", &[(":username", &username)])
    }

    fn get_by_kind(&self, kind: ActivityKind) -> Result<Vec<ActivityRecord>, Error> {
        self.select_where("WHERE kind = :kind", &[(":kind", &kind.code())])
    }
}

impl CreateTable for SQLiteActivityStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS activity (
                id INTEGER PRIMARY KEY,
                username TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('CREATE', 'UPDATE', 'DELETE', 'LOGIN')),
                recorded_at TEXT NOT NULL,
                description TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_activity_recorded_at ON activity(recorded_at);",
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteActivityStore {
    type ReturnType = ActivityRecord;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(ActivityRecord {
            id: row.get(offset)?,
            username: row.get(offset + 1)?,
            kind: parse_column(row, offset + 2)?,
            recorded_at: row.get(offset + 3)?,
            description: row.get(offset + 4)?,
        })
    }
}
