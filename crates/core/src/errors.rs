//! Core error types for the quotes service.
//!
//! This module defines storage-agnostic error types. Backend-specific errors
//! (diesel, r2d2, csv, I/O) are converted to these types by the storage crates.

use rust_decimal::Error as DecimalError;
use thiserror::Error;

pub use cotizaciones_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the quotes service.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    DateFormat(#[from] DateFormatError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Storage-agnostic error type for series persistence.
///
/// Uses `String` details so the storage crates can convert their own error
/// types into it without this crate depending on them.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A write transaction failed and was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A persisted row could not be decoded.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// The store location is not usable (bad URL, missing directory).
    #[error("Invalid store location: {0}")]
    InvalidLocation(String),

    /// Internal/unexpected storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// A date string matched neither `DD-MM-YY` nor `DD-MM-YYYY`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date '{input}': expected DD-MM-YY or DD-MM-YYYY")]
pub struct DateFormatError {
    pub input: String,
}

impl DateFormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] DecimalError),

    /// Row numbers are 1-based and count data rows only.
    #[error("Invalid date format in rows {}. Expected DD-MM-YY or DD-MM-YYYY", join_rows(.rows))]
    InvalidDates { rows: Vec<usize> },

    #[error("Invalid value in rows {}", join_rows(.rows))]
    InvalidValues { rows: Vec<usize> },
}

fn join_rows(rows: &[usize]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<DecimalError> for Error {
    fn from(err: DecimalError) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}
