/// Connection Management Module
///
/// This module provides the connection façade for the adapter: a single
/// live engine session behind a `{Closed, Open}` state machine, plus the
/// public query, DDL and batch-insert operations built on top of it.
///
/// Every public operation locks the internal state for its full duration,
/// so a batch insert's begin, bind, execute and commit steps are serialized
/// end to end. Concurrent writers queue on the lock instead of interleaving
/// statements on the shared engine transaction.
use crate::core::db::driver::{EngineConnection, EngineDriver};
use crate::core::db::params::{bind_values, SqlValue};
use crate::core::db::schema::{self, TableColumn, TableSchema};
use crate::core::db::statement;
use crate::core::db::values::{CanonicalValue, DataTable};
use crate::core::error::{FbError, Result};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Internal connection state guarded by the façade mutex.
struct Inner {
    /// Active engine session (None while closed).
    connection: Option<Box<dyn EngineConnection>>,
    /// Whether the database was opened read-only.
    read_only: bool,
}

/// Single-connection adapter façade.
///
/// One `Database` owns exactly one engine session. Opening creates the
/// backing store unless read-only, all operations require the open state,
/// and closing releases the session deterministically.
pub struct Database {
    driver: Box<dyn EngineDriver>,
    inner: Mutex<Inner>,
}

impl Database {
    /// Creates a closed façade over the given driver.
    pub fn new(driver: Box<dyn EngineDriver>) -> Self {
        Database {
            driver,
            inner: Mutex::new(Inner {
                connection: None,
                read_only: false,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| FbError::Internal("adapter state lock poisoned".to_string()))
    }

    /// Opens (and unless read-only, first creates) the database at `path`.
    ///
    /// On failure the façade stays closed and the error carries the path
    /// and the driver's cause.
    pub fn open_database(&self, path: &str, read_only: bool) -> Result<()> {
        let mut inner = self.lock()?;
        if !read_only {
            self.driver
                .create_database(path)
                .map_err(|e| FbError::Open {
                    path: path.to_string(),
                    source: e,
                })?;
        }
        let connection = self.driver.open(path).map_err(|e| FbError::Open {
            path: path.to_string(),
            source: e,
        })?;
        inner.connection = Some(connection);
        inner.read_only = read_only;
        debug!(path, read_only, "database opened");
        Ok(())
    }

    /// Closes the database. Closing an already closed façade is a no-op.
    pub fn close_database(&self) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.connection.take().is_some() {
            debug!("database closed");
        }
        inner.read_only = false;
        Ok(())
    }

    /// True while a session is open.
    pub fn is_open(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.connection.is_some())
            .unwrap_or(false)
    }

    /// True when the database was opened read-only.
    pub fn is_read_only(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.read_only)
            .unwrap_or(false)
    }

    /// Executes a statement that returns no rows.
    ///
    /// The SQL first passes through the square-bracket quote rewrite, so
    /// statements written for bracket-quoting dialects keep working.
    pub fn execute_non_query(&self, sql: &str) -> Result<()> {
        let mut inner = self.lock()?;
        let connection = inner.connection.as_mut().ok_or(FbError::NotOpen)?;
        let sql = statement::adjust_quoted_fields(sql);
        if let Err(e) = connection.execute(&sql) {
            return Err(FbError::Statement { sql, source: e });
        }
        Ok(())
    }

    /// Executes a query and materializes the result through type inference.
    pub fn execute_query(&self, sql: &str) -> Result<DataTable> {
        let mut inner = self.lock()?;
        let connection = inner.connection.as_mut().ok_or(FbError::NotOpen)?;
        let sql = statement::adjust_quoted_fields(sql);
        match connection.query(&sql) {
            Ok(rows) => Ok(DataTable::from_row_set(rows)),
            Err(e) => Err(FbError::Statement { sql, source: e }),
        }
    }

    /// Executes a query and returns the integer in `column` of the first
    /// row, or `None` when the query produced no rows.
    pub fn execute_query_return_int(&self, sql: &str, column: usize) -> Result<Option<i32>> {
        let table = self.execute_query(sql)?;
        if table.is_empty() {
            return Ok(None);
        }
        table.value(0, column)?.as_i32().map(Some)
    }

    /// Lists all non-system, non-view table names in sorted order.
    pub fn get_table_names(&self) -> Result<Vec<String>> {
        let table = self.execute_query(statement::TABLE_NAMES_SQL)?;
        first_column_names(&table)
    }

    /// Lists the column names of `table_name` in physical field order.
    /// Unknown tables yield an empty list.
    pub fn get_column_names(&self, table_name: &str) -> Result<Vec<String>> {
        let table = self.execute_query(&statement::column_names_sql(table_name))?;
        first_column_names(&table)
    }

    /// True when `table_name` exists. The catalog stores names uppercase,
    /// so the comparison is made against the uppercased input.
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let wanted = table_name.to_uppercase();
        Ok(self.get_table_names()?.iter().any(|name| *name == wanted))
    }

    /// True when `field_name` exists on `table_name`.
    pub fn field_exists(&self, table_name: &str, field_name: &str) -> Result<bool> {
        let sql = statement::field_exists_sql(table_name, field_name);
        Ok(matches!(
            self.execute_query_return_int(&sql, 0)?,
            Some(count) if count > 0
        ))
    }

    /// Tables left behind by an interrupted column removal; callers should
    /// check this at startup and repair before relying on the schema.
    pub fn stray_old_tables(&self) -> Result<Vec<String>> {
        Ok(schema::find_stray_old_tables(&self.get_table_names()?))
    }

    /// Creates a table from parallel column-name and type-name lists.
    /// A `None` type defaults to `INTEGER`.
    pub fn create_table<S, T>(
        &self,
        table_name: &str,
        column_names: &[S],
        column_types: &[Option<T>],
    ) -> Result<()>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        if column_names.len() != column_types.len() {
            return Err(FbError::Schema(format!(
                "table {}: {} column names but {} column types",
                table_name,
                column_names.len(),
                column_types.len()
            )));
        }
        let columns = column_names
            .iter()
            .zip(column_types)
            .map(|(name, type_name)| TableColumn {
                name: name.as_ref().to_string(),
                type_name: type_name.as_ref().map(|t| t.as_ref().to_string()),
            })
            .collect();
        let table = TableSchema::new(table_name, columns);
        debug!(table = table_name, "creating table");
        self.execute_non_query(&table.create_sql())
    }

    /// Inserts a batch of rows inside one engine transaction and returns
    /// the number of rows written.
    ///
    /// One INSERT statement is generated for the column list; every row is
    /// bound to its positional placeholders and executed. Any failure rolls
    /// the transaction back before the error propagates. The façade lock is
    /// held across the whole sequence, so concurrent callers cannot
    /// interleave statements on the shared transaction.
    pub fn insert_rows<S: AsRef<str>>(
        &self,
        table_name: &str,
        column_names: &[S],
        rows: &[Vec<SqlValue>],
    ) -> Result<usize> {
        let mut inner = self.lock()?;
        let connection = inner.connection.as_mut().ok_or(FbError::NotOpen)?;

        let sql = statement::create_insert_sql(table_name, column_names);
        connection
            .begin_transaction()
            .map_err(|e| FbError::Transaction {
                op: "begin",
                source: e,
            })?;

        for row in rows {
            let params = bind_values(row);
            if let Err(e) = connection.execute_with_params(&sql, &params) {
                rollback_quietly(&mut **connection);
                return Err(FbError::BatchInsert {
                    table: table_name.to_string(),
                    source: Box::new(FbError::Statement {
                        sql: sql.clone(),
                        source: e,
                    }),
                });
            }
        }

        if let Err(e) = connection.commit() {
            rollback_quietly(&mut **connection);
            return Err(FbError::Transaction {
                op: "commit",
                source: e,
            });
        }
        debug!(table = table_name, rows = rows.len(), "batch insert committed");
        Ok(rows.len())
    }

    /// Removes columns from a table via rename/recreate/drop.
    ///
    /// The retained columns keep their original relative order. The whole
    /// sequence runs inside one engine transaction; a failure at any step
    /// rolls back, so no `_old` intermediate survives an error on engines
    /// with transactional DDL. Removing every column is a documented no-op.
    pub fn drop_columns<S: AsRef<str>>(
        &self,
        table_name: &str,
        columns_to_remove: &[S],
    ) -> Result<()> {
        let current = self.get_column_names(table_name)?;
        let Some(plan) = schema::drop_columns_plan(table_name, &current, columns_to_remove) else {
            debug!(table = table_name, "no columns would remain; drop skipped");
            return Ok(());
        };

        let mut inner = self.lock()?;
        let connection = inner.connection.as_mut().ok_or(FbError::NotOpen)?;
        connection
            .begin_transaction()
            .map_err(|e| FbError::Transaction {
                op: "begin",
                source: e,
            })?;
        for sql in &plan.statements {
            debug!(table = table_name, sql = sql.as_str(), "schema evolution step");
            if let Err(e) = connection.execute(sql) {
                rollback_quietly(&mut **connection);
                return Err(FbError::Statement {
                    sql: sql.clone(),
                    source: e,
                });
            }
        }
        connection.commit().map_err(|e| FbError::Transaction {
            op: "commit",
            source: e,
        })?;
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("open", &self.is_open())
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

/// Rolls back after a failed batch or evolution step. The original error
/// is the one worth surfacing; a rollback failure is only logged.
fn rollback_quietly(connection: &mut dyn EngineConnection) {
    if let Err(e) = connection.rollback() {
        warn!(error = %e, "rollback failed after statement error");
    }
}

/// Collects the first column of an introspection result as identifier
/// strings. The catalog pads CHAR identifiers with spaces, so trailing
/// whitespace is trimmed.
fn first_column_names(table: &DataTable) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        match table.value(row, 0)? {
            CanonicalValue::Text(name) => names.push(name.trim_end().to_string()),
            other => {
                return Err(FbError::Data(format!(
                    "expected a text identifier in the catalog result, found {:?}",
                    other
                )))
            }
        }
    }
    Ok(names)
}
