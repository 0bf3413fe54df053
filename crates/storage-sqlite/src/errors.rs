//! Storage-specific error types for SQLite operations.
//!
//! Wraps diesel and r2d2 errors and converts them into the storage-agnostic
//! error types defined in `cotizaciones_core`.

use diesel::result::Error as DieselError;
use thiserror::Error;

use cotizaciones_core::errors::{Error, StorageError};

/// Errors raised inside this crate before they cross into core.
#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error(transparent)]
    CoreError(Box<Error>),
}

/// Lets jobs on the writer actor return core errors inside the transaction.
impl From<Error> for SqliteError {
    fn from(err: Error) -> Self {
        SqliteError::CoreError(Box::new(err))
    }
}

impl From<SqliteError> for Error {
    fn from(err: SqliteError) -> Self {
        let storage = match err {
            SqliteError::CoreError(e) => return *e,
            SqliteError::ConnectionFailed(e) => StorageError::ConnectionFailed(e.to_string()),
            SqliteError::PoolError(e) => StorageError::PoolCreationFailed(e.to_string()),
            SqliteError::QueryFailed(DieselError::RollbackTransaction) => {
                StorageError::TransactionFailed("rolled back".to_string())
            }
            SqliteError::QueryFailed(e) => StorageError::QueryFailed(e.to_string()),
            SqliteError::MigrationFailed(e) => StorageError::MigrationFailed(e),
        };
        Error::Storage(storage)
    }
}

/// Extension trait for converting diesel/r2d2 results into core results.
///
/// Orphan rules prevent `From<DieselError> for cotizaciones_core::Error`.
pub trait IntoCore<T> {
    fn into_core(self) -> cotizaciones_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> cotizaciones_core::Result<T> {
        self.map_err(|e| SqliteError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> cotizaciones_core::Result<T> {
        self.map_err(|e| SqliteError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, diesel::ConnectionError> {
    fn into_core(self) -> cotizaciones_core::Result<T> {
        self.map_err(|e| SqliteError::from(e).into())
    }
}
