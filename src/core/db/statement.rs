/// Statement Builder
///
/// Synthesizes the narrow DDL/DML surface of the adapter: parameterized
/// INSERT statements, CREATE TABLE, catalog introspection queries and the
/// type-name mapping used when creating tables from sample values.
///
/// Column names are double-quote-delimited verbatim; callers must supply
/// safe identifiers. Catalog lookups uppercase the identifiers they match
/// against because the engine stores them uppercase.
use crate::core::db::params::SqlValue;
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Lists all non-system, non-view table names in sorted order.
pub const TABLE_NAMES_SQL: &str = "SELECT rdb$relation_name \
     FROM rdb$relations \
     WHERE rdb$view_blr IS NULL \
     AND (rdb$system_flag IS NULL OR rdb$system_flag = 0) \
     ORDER BY rdb$relation_name";

/// Builds `INSERT INTO <table>("c1","c2",...) VALUES (@1,@2,...)`.
///
/// Placeholders are positional and 1-based; placeholder index equals the
/// column's position in `column_names`.
pub fn create_insert_sql<S: AsRef<str>>(table_name: &str, column_names: &[S]) -> String {
    let mut sql = String::from("INSERT INTO ");
    sql.push_str(table_name);
    sql.push('(');
    for (i, name) in column_names.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('"');
        sql.push_str(name.as_ref());
        sql.push('"');
    }
    sql.push_str(") VALUES (");
    for i in 0..column_names.len() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('@');
        sql.push_str(&(i + 1).to_string());
    }
    sql.push(')');
    sql
}

/// Builds `CREATE TABLE <table> ("c1" TYPE1,"c2" TYPE2,...)`.
///
/// A missing or unspecified type defaults to `INTEGER`.
pub fn create_table_sql<S, T>(
    table_name: &str,
    column_names: &[S],
    column_types: &[Option<T>],
) -> String
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let mut sql = format!("CREATE TABLE {} (", table_name);
    for (i, name) in column_names.iter().enumerate() {
        if i > 0 {
            sql.push(',');
        }
        sql.push('"');
        sql.push_str(name.as_ref());
        sql.push_str("\" ");
        let type_name = column_types
            .get(i)
            .and_then(|t| t.as_ref())
            .map(|t| t.as_ref())
            .unwrap_or("INTEGER");
        sql.push_str(type_name);
    }
    sql.push(')');
    sql
}

/// Lists the column names of `table_name` in physical field order.
pub fn column_names_sql(table_name: &str) -> String {
    format!(
        "SELECT rdb$field_name \
         FROM rdb$relation_fields \
         WHERE rdb$relation_name = '{}' \
         ORDER BY rdb$field_position",
        table_name.to_uppercase()
    )
}

/// Counts catalog entries for `field_name` on `table_name`; a non-zero
/// count means the field exists.
pub fn field_exists_sql(table_name: &str, field_name: &str) -> String {
    format!(
        "SELECT COUNT(f.rdb$relation_name) \
         FROM rdb$relation_fields f \
         JOIN rdb$relations r ON f.rdb$relation_name = r.rdb$relation_name \
         AND f.rdb$relation_name = '{}' \
         AND f.rdb$field_name = '{}' \
         AND r.rdb$view_blr IS NULL \
         AND (r.rdb$system_flag IS NULL OR r.rdb$system_flag = 0)",
        table_name.to_uppercase(),
        field_name.to_uppercase()
    )
}

/// `ALTER TABLE "<from>" RENAME TO "<to>"`.
pub fn rename_table_sql(from: &str, to: &str) -> String {
    format!("ALTER TABLE \"{}\" RENAME TO \"{}\"", from, to)
}

/// `CREATE TABLE "<target>" AS SELECT "c1","c2" FROM "<source>"`.
pub fn copy_table_sql<S: AsRef<str>>(target: &str, source: &str, column_names: &[S]) -> String {
    let mut selected = String::new();
    for (i, name) in column_names.iter().enumerate() {
        if i > 0 {
            selected.push(',');
        }
        selected.push('"');
        selected.push_str(name.as_ref());
        selected.push('"');
    }
    format!(
        "CREATE TABLE \"{}\" AS SELECT {} FROM \"{}\"",
        target, selected, source
    )
}

/// `DROP TABLE "<table>"`.
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE \"{}\"", table)
}

/// Maps a sample value to the DDL type name used when creating its column.
///
/// `None` means no sample at all and defaults to `INTEGER`; a SQL null
/// sample (and any non-numeric, non-temporal value) maps to `VARCHAR(50)`.
pub fn db_type_name(value: Option<&SqlValue>) -> &'static str {
    match value {
        None => "INTEGER",
        Some(SqlValue::DateTime(_)) => "TIMESTAMP",
        Some(SqlValue::Integer(_)) => "INTEGER",
        Some(SqlValue::Float(_)) => "FLOAT",
        Some(SqlValue::Double(_)) => "DOUBLE PRECISION",
        Some(_) => "VARCHAR(50)",
    }
}

/// Rewrites `[identifier]` quoting left over from other SQL dialects to
/// the engine's `"` quoting.
///
/// Applied to every raw SQL string before execution so statements written
/// for square-bracket dialects keep working.
pub fn adjust_quoted_fields(sql: &str) -> String {
    sql.replace('[', "\"").replace(']', "\"")
}

/// Renders a timestamp as the engine-dialect quoted literal
/// `'d.M.yyyy, H:M:S.000'` (unpadded day and month, four-digit year).
pub fn datetime_sql_literal(value: &NaiveDateTime) -> String {
    format!(
        "'{}.{}.{:04}, {}:{}:{}.000'",
        value.day(),
        value.month(),
        value.year(),
        value.hour(),
        value.minute(),
        value.second()
    )
}
