pub mod errors;
pub mod models;

use std::path::{Path, PathBuf};
use std::time::Duration;
use chrono::NaiveDateTime;
use log::error;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags, Row};
use crate::manager_db::errors::DBError;
use crate::manager_db::models::{ForecastRow, TableInfo};

/// Name of the table written by the upstream forecast pipeline
pub const FORECAST_TABLE: &str = "kp_forecasts_3day";

/// Format of the `forecast_timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read-only handle to the Kp forecast store.
///
/// Holds no connection; every query opens its own and drops it before returning.
#[derive(Clone, Debug)]
pub struct KpStore {
    db_path: PathBuf,
    busy_timeout: Duration,
}

impl KpStore {

    /// Creates a new instance of KpStore
    ///
    /// # Arguments
    ///
    /// * 'db_path' - full path to db file
    /// * 'busy_timeout' - how long a read may wait on a locked database
    pub fn new(db_path: &str, busy_timeout: Duration) -> Self {
        KpStore { db_path: PathBuf::from(db_path), busy_timeout }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn store_exists(&self) -> bool {
        self.db_path.exists()
    }

    /// Opens a read-only connection, refusing to create a missing database file
    ///
    fn open(&self) -> Result<Connection, DBError> {
        if !self.store_exists() {
            error!("database file not found: {}", self.db_path.display());
            return Err(DBError::StoreUnavailable(
                format!("Database file not found: {}", self.db_path.display())));
        }

        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ).map_err(|e| DBError::StoreUnavailable(e.to_string()))?;
        conn.busy_timeout(self.busy_timeout)?;

        Ok(conn)
    }

    /// Returns forecast rows at or after the given moment, oldest first
    ///
    /// # Arguments
    ///
    /// * 'now' - naive UTC datetime to start from
    /// * 'limit' - max number of rows to return
    pub fn upcoming_samples(&self, now: NaiveDateTime, limit: usize) -> Result<Vec<ForecastRow>, DBError> {
        let limit = sql_limit(limit)?;
        let conn = self.open()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT forecast_timestamp, kp_index
                FROM {}
                WHERE forecast_timestamp >= ?1
                ORDER BY forecast_timestamp
                LIMIT ?2;",
            FORECAST_TABLE,
        ))?;
        let mut rows = stmt.query(params![now.format(TIMESTAMP_FORMAT).to_string(), limit])?;

        let mut result: Vec<ForecastRow> = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(forecast_row(row)?);
        }

        Ok(result)
    }

    /// Returns the newest forecast row regardless of its age, if any
    ///
    pub fn latest_sample(&self) -> Result<Option<ForecastRow>, DBError> {
        let conn = self.open()?;

        Ok(newest_rows(&conn, 1)?.into_iter().next())
    }

    /// Collects diagnostic information about the store
    ///
    /// # Arguments
    ///
    /// * 'last_count' - number of newest forecast rows to include
    pub fn table_info(&self, last_count: usize) -> Result<TableInfo, DBError> {
        let conn = self.open()?;

        let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table';")?;
        let mut rows = stmt.query([])?;
        let mut tables: Vec<String> = Vec::new();
        while let Some(row) = rows.next()? {
            tables.push(row.get(0)?);
        }

        let mut info = TableInfo { tables, forecast_count: None, last5: None, error: None };

        if info.tables.iter().any(|t| t == FORECAST_TABLE) {
            let count: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {};", FORECAST_TABLE), [], |row| row.get(0))?;
            info.forecast_count = Some(count);
            info.last5 = Some(newest_rows(&conn, last_count)?);
        } else {
            info.error = Some(format!("Table {} not found", FORECAST_TABLE));
        }

        Ok(info)
    }
}

/// Returns up to `limit` rows, newest first
///
fn newest_rows(conn: &Connection, limit: usize) -> Result<Vec<ForecastRow>, DBError> {
    let limit = sql_limit(limit)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT forecast_timestamp, kp_index
            FROM {}
            ORDER BY forecast_timestamp DESC
            LIMIT ?1;",
        FORECAST_TABLE,
    ))?;
    let mut rows = stmt.query(params![limit])?;

    let mut result: Vec<ForecastRow> = Vec::new();
    while let Some(row) = rows.next()? {
        result.push(forecast_row(row)?);
    }

    Ok(result)
}

/// Converts a row count to an SQL LIMIT, rejecting counts SQLite cannot represent
///
fn sql_limit(limit: usize) -> Result<i64, DBError> {
    i64::try_from(limit).map_err(|e| DBError::Query(format!("invalid row limit {}: {}", limit, e)))
}

/// Maps a row leniently, leaving validation of odd values to the caller
///
/// SQLite columns are loosely typed, so a timestamp stored as a number or a
/// kp value stored as text must not fail the whole query.
fn forecast_row(row: &Row) -> rusqlite::Result<ForecastRow> {
    let timestamp = match row.get_ref(0)? {
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Null | ValueRef::Blob(_) => String::new(),
    };
    let kp_index = match row.get_ref(1)? {
        ValueRef::Real(r) => Some(r),
        ValueRef::Integer(i) => Some(i as f64),
        _ => None,
    };

    Ok(ForecastRow { timestamp, kp_index })
}
