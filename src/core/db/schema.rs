/// Schema Evolution Module
///
/// The engine has no DROP COLUMN, so column removal is a rename/recreate/
/// drop sequence. This module computes the retained column list and the
/// exact statements for that sequence; the connection façade executes them
/// inside one engine transaction.
use crate::core::db::statement;
use serde::{Deserialize, Serialize};

/// Suffix carried by the intermediate table during column removal.
pub const OLD_TABLE_SUFFIX: &str = "_old";

/// One column of a table: name plus optional engine type name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,
    /// Engine DDL type name; `None` defaults to `INTEGER` when rendered.
    pub type_name: Option<String>,
}

/// A table definition: name and ordered columns. Column order is
/// significant and is preserved across rename/recreate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<TableColumn>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<TableColumn>) -> Self {
        TableSchema {
            name: name.into(),
            columns,
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Renders the CREATE TABLE statement for this definition.
    pub fn create_sql(&self) -> String {
        let names: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        let types: Vec<Option<&str>> = self
            .columns
            .iter()
            .map(|c| c.type_name.as_deref())
            .collect();
        statement::create_table_sql(&self.name, &names, &types)
    }
}

/// The statements that remove columns from a table, in execution order:
/// rename the table aside, recreate it from the retained columns, drop the
/// renamed original.
#[derive(Debug, Clone, PartialEq)]
pub struct DropColumnsPlan {
    pub table: String,
    /// Columns that survive, in their original relative order.
    pub retained: Vec<String>,
    pub statements: Vec<String>,
}

/// Computes the removal plan for `table`.
///
/// Name comparison is case-insensitive because the catalog stores
/// identifiers uppercase. Returns `None` when no column would remain:
/// removing every column is a documented no-op, and so is removing from a
/// table with no known columns.
pub fn drop_columns_plan<S: AsRef<str>>(
    table: &str,
    current_columns: &[String],
    columns_to_remove: &[S],
) -> Option<DropColumnsPlan> {
    let remove: Vec<String> = columns_to_remove
        .iter()
        .map(|c| c.as_ref().to_uppercase())
        .collect();
    let retained: Vec<String> = current_columns
        .iter()
        .filter(|c| !remove.contains(&c.to_uppercase()))
        .cloned()
        .collect();
    if retained.is_empty() {
        return None;
    }

    let old_table = format!("{}{}", table, OLD_TABLE_SUFFIX);
    let statements = vec![
        statement::rename_table_sql(table, &old_table),
        statement::copy_table_sql(table, &old_table, &retained),
        statement::drop_table_sql(&old_table),
    ];
    Some(DropColumnsPlan {
        table: table.to_string(),
        retained,
        statements,
    })
}

/// Finds tables left behind by an interrupted column removal.
///
/// A name ending in `_old` is the intermediate table of the rename/
/// recreate/drop sequence; on an engine without transactional DDL one can
/// survive a mid-sequence crash. Callers should run this at startup and
/// repair (drop the stray, or rename it back if the target is missing).
pub fn find_stray_old_tables(table_names: &[String]) -> Vec<String> {
    table_names
        .iter()
        .filter(|name| {
            name.to_uppercase()
                .ends_with(&OLD_TABLE_SUFFIX.to_uppercase())
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_plan_retains_original_relative_order() {
        let plan = drop_columns_plan("T", &columns(&["a", "b", "c"]), &["b"]).unwrap();
        assert_eq!(plan.retained, ["a", "c"]);
        assert_eq!(
            plan.statements,
            [
                "ALTER TABLE \"T\" RENAME TO \"T_old\"",
                "CREATE TABLE \"T\" AS SELECT \"a\",\"c\" FROM \"T_old\"",
                "DROP TABLE \"T_old\"",
            ]
        );
    }

    #[test]
    fn test_plan_matches_names_case_insensitively() {
        // Catalog names come back uppercase; removal requests may not be.
        let plan = drop_columns_plan("T", &columns(&["A", "B", "C"]), &["b"]).unwrap();
        assert_eq!(plan.retained, ["A", "C"]);
    }

    #[test]
    fn test_removing_every_column_is_a_no_op() {
        assert!(drop_columns_plan("T", &columns(&["a", "b"]), &["a", "b"]).is_none());
        assert!(drop_columns_plan::<&str>("T", &[], &[]).is_none());
    }

    #[test]
    fn test_unknown_removals_leave_table_unchanged_but_still_rebuild() {
        let plan = drop_columns_plan("T", &columns(&["a", "b"]), &["z"]).unwrap();
        assert_eq!(plan.retained, ["a", "b"]);
    }

    #[test]
    fn test_table_schema_create_sql() {
        let schema = TableSchema::new(
            "Report",
            vec![
                TableColumn {
                    name: "id".to_string(),
                    type_name: None,
                },
                TableColumn {
                    name: "when".to_string(),
                    type_name: Some("TIMESTAMP".to_string()),
                },
            ],
        );
        assert_eq!(
            schema.create_sql(),
            "CREATE TABLE Report (\"id\" INTEGER,\"when\" TIMESTAMP)"
        );
        assert_eq!(schema.column_names(), ["id", "when"]);
    }

    #[test]
    fn test_find_stray_old_tables() {
        let names = columns(&["REPORT", "REPORT_OLD", "SIMULATIONS"]);
        assert_eq!(find_stray_old_tables(&names), ["REPORT_OLD"]);
        assert!(find_stray_old_tables(&columns(&["REPORT"])).is_empty());
    }
}
