// Core infrastructure modules
pub mod core;

// Shared test fixtures (scripted mock engine driver)
pub mod test_utils;

// Re-export the public API at the crate root
pub use crate::core::db::connection::Database;
pub use crate::core::db::driver::{
    BindValue, DriverError, DriverResult, EngineConnection, EngineDriver, RawValue, RowSet,
};
pub use crate::core::db::params::SqlValue;
pub use crate::core::db::schema::{TableColumn, TableSchema};
pub use crate::core::db::values::{CanonicalValue, ColumnType, DataTable};
pub use crate::core::error::{FbError, Result};
