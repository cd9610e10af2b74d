/// Adapter Error Module
///
/// This module defines the error types for the Firebird adapter.
/// It provides structured error handling with proper error propagation and
/// user-friendly error messages.
use crate::core::db::driver::DriverError;
use thiserror::Error;

/// Comprehensive error type for the Firebird adapter.
///
/// This enum covers all error scenarios that can occur within the adapter:
/// - Connection availability (open failure, operating while closed)
/// - Statement execution (carries the offending SQL for diagnosis)
/// - Data integrity (row-index and value-conversion faults)
/// - Batch insertion and transaction control
/// - Schema metadata problems
#[derive(Error, Debug)]
pub enum FbError {
    /// The underlying engine refused to open or create the database.
    #[error("cannot open database connection to {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: DriverError,
    },

    /// An operation was invoked while the connection is closed.
    #[error("database is not open")]
    NotOpen,

    /// A statement failed to execute. The SQL text is attached to aid
    /// diagnosis; statements are never retried automatically.
    #[error("cannot execute the SQL statement\n{sql}\n{source}")]
    Statement {
        sql: String,
        #[source]
        source: DriverError,
    },

    /// Data-integrity fault: a row index beyond the recorded values, or a
    /// stored value that does not convert to the column's inferred type.
    #[error("data error: {0}")]
    Data(String),

    /// A batch insert aborted. The transaction has been rolled back before
    /// this error is surfaced.
    #[error("cannot insert rows into {table}: {source}")]
    BatchInsert {
        table: String,
        #[source]
        source: Box<FbError>,
    },

    /// A transaction control call (begin, commit, rollback) failed.
    #[error("transaction {op} failed: {source}")]
    Transaction {
        op: &'static str,
        #[source]
        source: DriverError,
    },

    /// Schema metadata errors (mismatched column/type lists, etc.).
    #[error("schema error: {0}")]
    Schema(String),

    /// Internal adapter faults that should not occur in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Type alias for Result to use FbError as the error type.
///
/// This provides a consistent error type across the entire adapter
/// instead of using `Result<T, String>` or mixed error types.
pub type Result<T> = std::result::Result<T, FbError>;
