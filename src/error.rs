use std::path::PathBuf;

use thiserror::Error;

/// Every way an export run can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("missing parameter <db-file-name>.")]
    Usage,

    #[error("given database file '{}' not found.", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to open sqlite database cause: {source}")]
    DatabaseOpen {
        #[source]
        source: rusqlite::Error,
    },

    #[error("missing table '{table}' - not a valid OVI backup database file")]
    SchemaMismatch { table: String },

    #[error("no {what} found in database.")]
    EmptyResult { what: String },

    #[error("failed to read table '{table}': {source}")]
    Query {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot serialize document: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;
