/// # Test Utilities Module
///
/// Shared testing infrastructure for the adapter: a scripted mock engine
/// driver standing in for the native Firebird client, plus small helpers
/// for building catalog-shaped row sets.
///
/// The mock journals every statement, query, bound parameter row and
/// transaction control call, and can inject failures at each point, so
/// tests can assert on the exact SQL and sequencing the façade produces.
use crate::core::db::driver::{
    BindValue, DriverError, DriverResult, EngineConnection, EngineDriver, RawValue, RowSet,
};
use std::sync::{Arc, Mutex};

/// Journals and scripts shared between a [`MockEngine`] and the
/// connections it hands out.
#[derive(Debug, Default)]
struct MockState {
    /// Paths passed to `create_database`.
    created: Vec<String>,
    /// Statements run through `execute`, in order.
    executed: Vec<String>,
    /// Statements run through `query`, in order.
    queried: Vec<String>,
    /// `(sql, params)` pairs run through `execute_with_params`, in order.
    bound: Vec<(String, Vec<BindValue>)>,
    /// Transaction control calls: "begin", "commit", "rollback".
    transactions: Vec<&'static str>,
    /// Scripted query results: first substring match wins.
    scripted: Vec<(String, RowSet)>,
    /// Open calls fail with this message when set.
    fail_open: Option<String>,
    /// `execute` calls whose SQL contains this pattern fail.
    fail_execute_containing: Option<String>,
    /// `execute_with_params` fails after this many successful calls.
    fail_params_after: Option<usize>,
    /// Commit calls fail when set.
    fail_commit: bool,
}

/// Scripted in-memory stand-in for the native engine driver.
///
/// Cloning shares the underlying journals, so a test can keep one handle
/// for assertions while the `Database` owns the other.
#[derive(Debug, Clone, Default)]
pub struct MockEngine {
    state: Arc<Mutex<MockState>>,
}

impl MockEngine {
    pub fn new() -> Self {
        MockEngine::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    /// Scripts the result for any query whose SQL contains `pattern`.
    pub fn script_query(&self, pattern: &str, rows: RowSet) {
        self.state().scripted.push((pattern.to_string(), rows));
    }

    /// Makes `open` fail with the given driver message.
    pub fn fail_open(&self, message: &str) {
        self.state().fail_open = Some(message.to_string());
    }

    /// Makes `execute` fail for statements containing `pattern`.
    pub fn fail_execute_containing(&self, pattern: &str) {
        self.state().fail_execute_containing = Some(pattern.to_string());
    }

    /// Makes `execute_with_params` fail after `successes` successful calls.
    pub fn fail_params_after(&self, successes: usize) {
        self.state().fail_params_after = Some(successes);
    }

    /// Makes `commit` fail.
    pub fn fail_commit(&self) {
        self.state().fail_commit = true;
    }

    pub fn created_paths(&self) -> Vec<String> {
        self.state().created.clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.state().executed.clone()
    }

    pub fn queried_sql(&self) -> Vec<String> {
        self.state().queried.clone()
    }

    pub fn bound_rows(&self) -> Vec<(String, Vec<BindValue>)> {
        self.state().bound.clone()
    }

    pub fn transaction_log(&self) -> Vec<&'static str> {
        self.state().transactions.clone()
    }
}

impl EngineDriver for MockEngine {
    fn create_database(&self, path: &str) -> DriverResult<()> {
        self.state().created.push(path.to_string());
        Ok(())
    }

    fn open(&self, _path: &str) -> DriverResult<Box<dyn EngineConnection>> {
        if let Some(message) = self.state().fail_open.clone() {
            return Err(DriverError::new(message));
        }
        Ok(Box::new(MockConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockConnection {
    state: Arc<Mutex<MockState>>,
}

impl MockConnection {
    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }
}

impl EngineConnection for MockConnection {
    fn execute(&mut self, sql: &str) -> DriverResult<()> {
        let mut state = self.state();
        if let Some(pattern) = &state.fail_execute_containing {
            if sql.contains(pattern.as_str()) {
                return Err(DriverError::new(format!("scripted failure for {pattern}")));
            }
        }
        state.executed.push(sql.to_string());
        Ok(())
    }

    fn query(&mut self, sql: &str) -> DriverResult<RowSet> {
        let mut state = self.state();
        state.queried.push(sql.to_string());
        let result = state
            .scripted
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();
        Ok(result)
    }

    fn execute_with_params(&mut self, sql: &str, params: &[BindValue]) -> DriverResult<()> {
        let mut state = self.state();
        if let Some(limit) = state.fail_params_after {
            if state.bound.len() >= limit {
                return Err(DriverError::new("scripted parameter execution failure"));
            }
        }
        state.bound.push((sql.to_string(), params.to_vec()));
        Ok(())
    }

    fn begin_transaction(&mut self) -> DriverResult<()> {
        self.state().transactions.push("begin");
        Ok(())
    }

    fn commit(&mut self) -> DriverResult<()> {
        let mut state = self.state();
        state.transactions.push("commit");
        if state.fail_commit {
            return Err(DriverError::new("scripted commit failure"));
        }
        Ok(())
    }

    fn rollback(&mut self) -> DriverResult<()> {
        self.state().transactions.push("rollback");
        Ok(())
    }
}

/// Builds a one-column row set of text cells, the shape catalog
/// introspection queries return.
pub fn text_rows(column: &str, values: &[&str]) -> RowSet {
    RowSet {
        columns: vec![column.to_string()],
        rows: values
            .iter()
            .map(|v| vec![RawValue::Text(v.to_string())])
            .collect(),
    }
}

/// Builds a one-row, one-column row set holding a single count.
pub fn count_row(count: i64) -> RowSet {
    RowSet {
        columns: vec!["count".to_string()],
        rows: vec![vec![RawValue::Integer(count)]],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_scripts_first_matching_query() {
        let engine = MockEngine::new();
        engine.script_query("Report", count_row(7));

        let mut conn = engine.open("/tmp/mock.fdb").unwrap();
        let rows = conn.query("SELECT COUNT(*) FROM Report").unwrap();
        assert_eq!(rows.rows, vec![vec![RawValue::Integer(7)]]);

        // Unscripted queries return an empty row set.
        let empty = conn.query("SELECT 1 FROM Other").unwrap();
        assert!(empty.rows.is_empty());
    }

    #[test]
    fn test_mock_journals_are_shared_across_clones() {
        let engine = MockEngine::new();
        let observer = engine.clone();

        let mut conn = engine.open("/tmp/mock.fdb").unwrap();
        conn.execute("DROP TABLE t").unwrap();
        assert_eq!(observer.executed_sql(), ["DROP TABLE t"]);
    }

    #[test]
    fn test_mock_failure_injection() {
        let engine = MockEngine::new();
        engine.fail_params_after(0);
        let mut conn = engine.open("/tmp/mock.fdb").unwrap();
        assert!(conn
            .execute_with_params("INSERT INTO t(\"a\") VALUES (@1)", &[])
            .is_err());
    }
}
