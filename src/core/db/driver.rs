/// Engine Driver Boundary
///
/// This module defines the seam between the adapter and the native Firebird
/// driver. The driver is an opaque collaborator: it owns sockets,
/// authentication, protocol framing and connection-string assembly. The
/// adapter only needs the narrow capability surface below.
///
/// The crate ships no real driver; implementations plug in through
/// [`EngineDriver`] and tests use the scripted mock in `test_utils`.
use thiserror::Error;

/// A single cell exactly as the native engine hands it back.
///
/// The engine reports no column type up front, so every cell arrives as one
/// of these raw shapes and the value typing engine infers the column type
/// from the sequence of cells it sees.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Engine integer (any width; the adapter narrows on read-back).
    Integer(i64),
    /// Engine floating point value.
    Real(f64),
    /// Engine character data.
    Text(String),
    /// Engine binary data.
    Bytes(Vec<u8>),
    /// SQL NULL.
    Null,
}

/// One result set from the engine: column names in select order, rows in
/// fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

/// Engine-specific bind type plus bind value for one positional parameter
/// of a prepared statement.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// Text parameter. Also carries nulls (bound as empty text), symbolic
    /// names and formatted timestamps.
    Text(String),
    /// Native integer parameter.
    Integer(i32),
    /// Native single-precision parameter.
    Float(f32),
    /// Native double-precision parameter.
    Double(f64),
    /// Native binary parameter.
    Binary(Vec<u8>),
}

/// Failure reported by the native driver, wrapped so the adapter can attach
/// it as the cause of its own errors.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        DriverError {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DriverError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for results at the driver boundary.
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// An open session with the native engine.
///
/// Transaction control is part of the connection: the engine allows at most
/// one transaction per connection, and the adapter serializes every batch
/// around these calls.
pub trait EngineConnection: Send {
    /// Executes a statement that returns no rows.
    fn execute(&mut self, sql: &str) -> DriverResult<()>;

    /// Executes a statement and returns its result rows.
    fn query(&mut self, sql: &str) -> DriverResult<RowSet>;

    /// Prepares `sql`, binds the positional parameters (`@1`, `@2`, ...)
    /// in order and executes it.
    fn execute_with_params(&mut self, sql: &str, params: &[BindValue]) -> DriverResult<()>;

    /// Starts an engine-native transaction.
    fn begin_transaction(&mut self) -> DriverResult<()>;

    /// Commits the active transaction.
    fn commit(&mut self) -> DriverResult<()>;

    /// Rolls back the active transaction.
    fn rollback(&mut self) -> DriverResult<()>;
}

/// Factory for engine sessions.
pub trait EngineDriver: Send + Sync {
    /// Creates the backing store at `path` if it does not already exist.
    fn create_database(&self, path: &str) -> DriverResult<()>;

    /// Opens a session against the store at `path`.
    fn open(&self, path: &str) -> DriverResult<Box<dyn EngineConnection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::new("lock conflict on update");
        assert_eq!(err.to_string(), "lock conflict on update");
    }

    #[test]
    fn test_driver_error_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DriverError::with_source("cannot attach database", io);
        assert_eq!(err.to_string(), "cannot attach database");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_row_set_default_is_empty() {
        let rows = RowSet::default();
        assert!(rows.columns.is_empty());
        assert!(rows.rows.is_empty());
    }
}
