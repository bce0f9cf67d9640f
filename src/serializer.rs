//! Schema-less rendering of query results into record text.
//!
//! A record is `{"column":"value",...}` with columns in projection order; the
//! records of one result are joined with `,`. The list form wraps that in
//! `[`/`]`. With [`Rendering::Raw`] nothing inside the quotes is escaped, so a
//! value holding `"` or a control character yields text that is not valid
//! JSON. [`Rendering::Escaped`] escapes names and values as JSON strings.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::driver::{Driver, Drivers};
use crate::error::{Result, ShapelessError};
use crate::settings::Settings;

/// Text used for SQL NULL inside a record.
pub const NULL_TEXT: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rendering {
    #[default]
    Raw,
    Escaped,
}

/// One result row: column names shared across the result, one text value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Option<String>>) -> Self {
        Self { columns, values }
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }
    pub fn get(&self, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.values.get(index)?.as_deref()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn push_quoted(out: &mut String, text: &str, rendering: Rendering) {
    match rendering {
        Rendering::Raw => {
            out.push('"');
            out.push_str(text);
            out.push('"');
        }
        Rendering::Escaped => out.push_str(&serde_json::Value::from(text).to_string()),
    }
}

pub fn render_record(row: &Row, rendering: Rendering) -> String {
    let mut out = String::from("{");
    for (i, (column, value)) in row.columns.iter().zip(row.values.iter()).enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_quoted(&mut out, column, rendering);
        out.push(':');
        push_quoted(&mut out, value.as_deref().unwrap_or(NULL_TEXT), rendering);
    }
    out.push('}');
    out
}

/// Records joined with `,`; an empty result renders as the empty string.
pub fn render_records(rows: &[Row], rendering: Rendering) -> String {
    rows.iter()
        .map(|row| render_record(row, rendering))
        .collect::<Vec<_>>()
        .join(",")
}

pub fn render_list(rows: &[Row], rendering: Rendering) -> String {
    format!("[{}]", render_records(rows, rendering))
}

/// Executes statements with the configured connection and renders results.
///
/// Every call connects, runs and releases on its own; nothing is kept between
/// calls.
pub struct Serializer<'s> {
    settings: &'s Settings,
    drivers: Drivers,
}

impl<'s> Serializer<'s> {
    pub fn new(settings: &'s Settings) -> Self {
        Self {
            settings,
            drivers: Drivers::default(),
        }
    }

    /// Makes an additional driver available under `identifier`.
    pub fn with_driver(mut self, identifier: &str, driver: impl Driver + 'static) -> Self {
        self.drivers.register(identifier, driver);
        self
    }

    /// Runs a query and returns its rows with column names from the result metadata.
    pub fn query_rows(&self, sql: &str) -> Result<Vec<Row>> {
        let started = Instant::now();
        let connection = self.drivers.connect(&self.settings.connection)?;
        let mut statement = connection.prepare(sql)?;
        let mut cursor = statement.query()?;
        let columns: Arc<[String]> = cursor.columns().into();
        let mut rows = Vec::new();
        while let Some(values) = cursor.next_row()? {
            if values.len() != columns.len() {
                return Err(ShapelessError::RowWidth {
                    expected: columns.len(),
                    found: values.len(),
                });
            }
            rows.push(Row::new(Arc::clone(&columns), values));
        }
        info!(statement = sql, rows = rows.len(), ms = started.elapsed().as_secs_f64() * 1000.0, "query complete");
        Ok(rows)
    }

    /// Runs a query and renders each row as a record, records joined with `,`.
    pub fn execute_query(&self, sql: &str) -> Result<String> {
        let rows = self.query_rows(sql)?;
        Ok(render_records(&rows, self.settings.rendering()))
    }

    /// Like [`execute_query`](Self::execute_query) but always wrapped as a list.
    pub fn execute_query_list(&self, sql: &str) -> Result<String> {
        let rows = self.query_rows(sql)?;
        Ok(render_list(&rows, self.settings.rendering()))
    }

    /// Runs a mutating statement and returns the affected-row count.
    pub fn execute_update(&self, sql: &str) -> Result<usize> {
        let started = Instant::now();
        let connection = self.drivers.connect(&self.settings.connection)?;
        let mut statement = connection.prepare(sql)?;
        let affected = statement.execute()?;
        info!(statement = sql, affected, ms = started.elapsed().as_secs_f64() * 1000.0, "update complete");
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(columns: &[&str], data: &[&[Option<&str>]]) -> Vec<Row> {
        let columns: Arc<[String]> = columns.iter().map(|c| c.to_string()).collect();
        data.iter()
            .map(|values| {
                Row::new(
                    Arc::clone(&columns),
                    values.iter().map(|v| v.map(String::from)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn two_rows_two_columns() {
        let rows = rows(&["id", "name"], &[&[Some("1"), Some("a")], &[Some("2"), Some("b")]]);
        assert_eq!(
            render_records(&rows, Rendering::Raw),
            r#"{"id":"1","name":"a"},{"id":"2","name":"b"}"#
        );
        assert_eq!(
            render_list(&rows, Rendering::Raw),
            r#"[{"id":"1","name":"a"},{"id":"2","name":"b"}]"#
        );
    }

    #[test]
    fn zero_rows() {
        assert_eq!(render_records(&[], Rendering::Raw), "");
        assert_eq!(render_list(&[], Rendering::Raw), "[]");
    }

    #[test]
    fn null_renders_as_text() {
        let rows = rows(&["id", "note"], &[&[Some("7"), None]]);
        assert_eq!(render_records(&rows, Rendering::Raw), r#"{"id":"7","note":"null"}"#);
        assert_eq!(rows[0].get("note"), None);
        assert_eq!(rows[0].get("id"), Some("7"));
    }

    #[test]
    fn get_on_a_short_row_is_absent() {
        let columns: Arc<[String]> = vec!["id".to_string(), "name".to_string()].into();
        let row = Row::new(columns, vec![Some("1".to_string())]);
        assert_eq!(row.get("id"), Some("1"));
        assert_eq!(row.get("name"), None);
    }

    #[test]
    fn raw_rendering_does_not_escape() {
        let rows = rows(&["quote"], &[&[Some("say \"hi\"\n")]]);
        assert_eq!(render_records(&rows, Rendering::Raw), "{\"quote\":\"say \"hi\"\n\"}");
    }

    #[test]
    fn escaped_rendering_is_valid_json() {
        let rows = rows(&["quote", "path"], &[&[Some("say \"hi\"\n"), Some("c:\\tmp")]]);
        let text = render_list(&rows, Rendering::Escaped);
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["quote"], "say \"hi\"\n");
        assert_eq!(parsed[0]["path"], "c:\\tmp");
    }
}
