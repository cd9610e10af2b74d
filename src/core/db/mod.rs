/// Database Module
///
/// This module provides the core adapter functionality, organized into
/// focused submodules for better maintainability and separation of
/// concerns.
///
/// ## Architecture
///
/// The adapter layer is split into six concerns:
/// - **Driver Boundary** (`driver.rs`): the opaque native-engine capability surface
/// - **Value Typing** (`values.rs`): column type inference and canonical read-back
/// - **Statement Building** (`statement.rs`): dialect DDL/DML and catalog SQL text
/// - **Parameter Binding** (`params.rs`): caller values to engine bind types
/// - **Schema Evolution** (`schema.rs`): column removal planning and repair probes
/// - **Connection Management** (`connection.rs`): the state machine façade and transactions
///
/// ## Error Handling
///
/// All operations use the standardized `FbError` type for consistent error
/// propagation.
pub mod connection;
pub mod driver;
pub mod params;
pub mod schema;
pub mod statement;
pub mod values;

pub use connection::*;
pub use driver::*;
pub use params::*;
pub use schema::*;
pub use statement::*;
pub use values::*;
