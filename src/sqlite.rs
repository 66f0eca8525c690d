use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use crate::error::{ExportError, Result};

/// Owned SQLite scalar, as fetched from a backup table.
///
/// TEXT is kept as the stored bytes; SQLite does not guarantee they are
/// UTF-8, and each export decides how to decode them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(Vec<u8>),
    Blob(Vec<u8>),
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(bytes) => Value::Text(bytes.to_vec()),
            ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
        }
    }
}

/// Column names in declaration order plus every row of a `SELECT *`.
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Read-only handle on a backup database file.
///
/// The connection is closed when the reader is dropped, so every exit path
/// of an export releases it.
#[derive(Debug)]
pub struct BackupReader {
    conn: Connection,
}

impl BackupReader {
    /// Open the file at `path` without write access.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags)
            .map_err(|source| ExportError::DatabaseOpen { source })?;
        debug!(path = %path.display(), "opened backup database");
        Ok(Self { conn })
    }

    /// Names of all tables in the catalog.
    ///
    /// This is the first statement run against the file; SQLite only notices
    /// a file that is not a database here, so failures count as open errors.
    pub fn table_names(&self) -> Result<Vec<String>> {
        let open_err = |source: rusqlite::Error| ExportError::DatabaseOpen { source };
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .map_err(open_err)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(open_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(open_err)?;
        Ok(names)
    }

    /// Whether a table named exactly `name` exists (case-sensitive).
    pub fn table_exists(&self, name: &str) -> Result<bool> {
        let exists = self.table_names()?.iter().any(|t| t == name);
        debug!(table = name, exists, "checked table catalog");
        Ok(exists)
    }

    /// Run an unrestricted `SELECT *` on `table` and load every row.
    pub fn fetch_all(&self, table: &str) -> Result<TableData> {
        let query_err = |source: rusqlite::Error| ExportError::Query {
            table: table.to_string(),
            source,
        };
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let mut stmt = self.conn.prepare(&sql).map_err(query_err)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();
        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(Value::from))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })
            .map_err(query_err)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_err)?;
        debug!(table, columns = width, rows = rows.len(), "fetched table");
        Ok(TableData { columns, rows })
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
