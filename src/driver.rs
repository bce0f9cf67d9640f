//! Connection/statement/cursor plumbing behind the tabular serializer.
//!
//! Each resource is owned by the scope that acquired it and released when that
//! scope ends: a cursor borrows its statement, which borrows its connection,
//! so release always runs cursor first and connection last.

use std::collections::HashMap;
use std::sync::Arc;

// used for persistence
use rusqlite::types::ValueRef;
use tracing::{debug, warn};

use crate::error::{Result, ShapelessError};
use crate::settings::ConnectionSettings;

pub const SQLITE: &str = "sqlite";

pub trait Driver: Send + Sync {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>>;
}

pub trait Connection {
    fn prepare<'c>(&'c self, sql: &str) -> Result<Box<dyn Statement + 'c>>;
}

pub trait Statement {
    fn query<'s>(&'s mut self) -> Result<Box<dyn Cursor + 's>>;
    /// Runs a mutating statement and returns the affected-row count.
    fn execute(&mut self) -> Result<usize>;
}

pub trait Cursor {
    /// Column names from the result metadata, in projection order.
    fn columns(&self) -> &[String];
    /// The next row rendered as text, one entry per column; `None` is SQL NULL.
    fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>>;
}

/// Drivers keyed by the identifier used in [`ConnectionSettings::driver`].
#[derive(Clone)]
pub struct Drivers {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl Drivers {
    /// An empty set, without even SQLite.
    pub fn empty() -> Self {
        Self { drivers: HashMap::new() }
    }
    pub fn register(&mut self, identifier: &str, driver: impl Driver + 'static) {
        self.drivers.insert(identifier.to_string(), Arc::new(driver));
    }
    pub fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>> {
        let driver = self
            .drivers
            .get(&settings.driver)
            .ok_or_else(|| ShapelessError::UnknownDriver(settings.driver.clone()))?;
        debug!(driver = %settings.driver, url = %settings.url, "connecting");
        driver.connect(settings)
    }
}

impl Default for Drivers {
    fn default() -> Self {
        let mut drivers = Self::empty();
        drivers.register(SQLITE, SqliteDriver);
        drivers
    }
}

// ------------- SQLite -------------
pub struct SqliteDriver;

impl Driver for SqliteDriver {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>> {
        // SQLite has no notion of principal or secret, so those are not used
        let opened = if settings.url == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open(&settings.url)
        };
        let connection = opened.map_err(|e| ShapelessError::Connection(e.to_string()))?;
        Ok(Box::new(SqliteConnection { inner: Some(connection) }))
    }
}

pub struct SqliteConnection {
    inner: Option<rusqlite::Connection>,
}

impl Connection for SqliteConnection {
    fn prepare<'c>(&'c self, sql: &str) -> Result<Box<dyn Statement + 'c>> {
        let connection = self
            .inner
            .as_ref()
            .ok_or_else(|| ShapelessError::Connection("connection already closed".to_string()))?;
        let statement = connection
            .prepare(sql)
            .map_err(|e| ShapelessError::Statement(e.to_string()))?;
        Ok(Box::new(SqliteStatement { inner: statement }))
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if let Some(connection) = self.inner.take() {
            if let Err((_, e)) = connection.close() {
                warn!(error = %e, "could not close connection");
            }
        }
    }
}

pub struct SqliteStatement<'c> {
    inner: rusqlite::Statement<'c>,
}

impl Statement for SqliteStatement<'_> {
    fn query<'s>(&'s mut self) -> Result<Box<dyn Cursor + 's>> {
        let columns = self
            .inner
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let rows = self
            .inner
            .query([])
            .map_err(|e| ShapelessError::Statement(e.to_string()))?;
        Ok(Box::new(SqliteCursor { columns, rows }))
    }
    fn execute(&mut self) -> Result<usize> {
        self.inner
            .execute([])
            .map_err(|e| ShapelessError::Statement(e.to_string()))
    }
}

pub struct SqliteCursor<'s> {
    columns: Vec<String>,
    rows: rusqlite::Rows<'s>,
}

impl Cursor for SqliteCursor<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }
    fn next_row(&mut self) -> Result<Option<Vec<Option<String>>>> {
        let width = self.columns.len();
        let Some(row) = self.rows.next()? else {
            return Ok(None);
        };
        let mut values = Vec::with_capacity(width);
        for i in 0..width {
            values.push(render_value(row.get_ref(i)?));
        }
        Ok(Some(values))
    }
}

/// Column value as text: integers and reals in their shortest form, text as
/// stored, blobs as lowercase hex, NULL as `None`.
pub fn render_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(r.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Some(b.iter().map(|byte| format!("{:02x}", byte)).collect()),
    }
}
