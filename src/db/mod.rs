pub mod sqlite;
pub mod repository;

pub use sqlite::*;
pub use repository::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Required collection missing: {0}")]
    MissingCollection(String),

    #[error("Collection {collection} is missing required column {column}")]
    MissingColumn { collection: String, column: String },
}
