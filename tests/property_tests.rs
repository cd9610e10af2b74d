//! Property-based tests for column type inference and statement
//! generation.
//!
//! These tests verify the adapter's core contracts over generated input:
//! - type inference only widens, never narrows
//! - exact-format timestamps and byte sequences round-trip identically
//! - positional read-back never defaults out-of-range requests
//! - generated INSERT statements keep placeholders aligned with columns
//! - null parameters always bind as empty text

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use proptest::prelude::*;

    use fbadapter::core::db::params::{bind_values, SqlValue};
    use fbadapter::core::db::statement::create_insert_sql;
    use fbadapter::core::db::values::{
        ColumnAccumulator, ColumnType, CanonicalValue, COLUMN_DATETIME_FORMAT,
    };
    use fbadapter::BindValue;

    fn arb_column_name() -> impl Strategy<Value = String> {
        "[a-zA-Z][a-zA-Z0-9_]{0,29}".prop_map(|s: String| s)
    }

    fn arb_timestamp_text() -> impl Strategy<Value = String> {
        (
            1970i32..2100,
            1u32..=12,
            1u32..=28,
            0u32..24,
            0u32..60,
            0u32..60,
        )
            .prop_map(|(y, mo, d, h, mi, s)| {
                NaiveDate::from_ymd_opt(y, mo, d)
                    .unwrap()
                    .and_hms_opt(h, mi, s)
                    .unwrap()
                    .format(COLUMN_DATETIME_FORMAT)
                    .to_string()
            })
    }

    proptest! {
        #[test]
        fn prop_integer_then_real_widens_to_double(
            ints in proptest::collection::vec(-1_000_000i64..1_000_000, 1..20),
            real in -1e9f64..1e9,
        ) {
            let mut acc = ColumnAccumulator::new();
            for i in &ints {
                acc.push_integer(*i);
            }
            acc.push_double(real);

            prop_assert_eq!(acc.inferred_type(), Some(ColumnType::Double));
            // Every previously appended integer reads back as its double
            // equivalent.
            for (row, i) in ints.iter().enumerate() {
                prop_assert_eq!(
                    acc.value_at(row).unwrap(),
                    CanonicalValue::Double(*i as f64)
                );
            }
        }

        #[test]
        fn prop_exact_format_timestamps_round_trip(text in arb_timestamp_text()) {
            let mut acc = ColumnAccumulator::new();
            acc.push_text(text.clone());
            prop_assert_eq!(acc.inferred_type(), Some(ColumnType::DateTime));

            // Force the column to the text fallback with a second,
            // non-timestamp cell: the stored timestamp must format back to
            // the identical string.
            acc.push_text("not a timestamp".to_string());
            prop_assert_eq!(acc.value_at(0).unwrap(), CanonicalValue::Text(text));
        }

        #[test]
        fn prop_bytes_round_trip_identically(
            payload in proptest::collection::vec(any::<u8>(), 0..256),
        ) {
            let mut acc = ColumnAccumulator::new();
            acc.push_bytes(payload.clone());
            prop_assert_eq!(acc.inferred_type(), Some(ColumnType::Bytes));
            prop_assert_eq!(acc.value_at(0).unwrap(), CanonicalValue::Bytes(payload));
        }

        #[test]
        fn prop_out_of_range_rows_always_fail(
            ints in proptest::collection::vec(any::<i32>(), 0..10),
            beyond in 0usize..5,
        ) {
            let mut acc = ColumnAccumulator::new();
            for i in &ints {
                acc.push_integer(i64::from(*i));
            }
            prop_assert!(acc.value_at(ints.len() + beyond).is_err());
        }

        #[test]
        fn prop_insert_sql_aligns_placeholders_with_columns(
            table in arb_column_name(),
            columns in proptest::collection::vec(arb_column_name(), 1..8),
        ) {
            let sql = create_insert_sql(&table, &columns);

            let mut expected = format!("INSERT INTO {}(", table);
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    expected.push(',');
                }
                expected.push('"');
                expected.push_str(column);
                expected.push('"');
            }
            expected.push_str(") VALUES (");
            for i in 0..columns.len() {
                if i > 0 {
                    expected.push(',');
                }
                expected.push_str(&format!("@{}", i + 1));
            }
            expected.push(')');

            prop_assert_eq!(sql, expected);
        }

        #[test]
        fn prop_null_always_binds_as_empty_text(
            prefix in proptest::collection::vec(any::<i32>(), 0..5),
            suffix in proptest::collection::vec(any::<i32>(), 0..5),
        ) {
            let mut row: Vec<SqlValue> =
                prefix.iter().map(|i| SqlValue::Integer(*i)).collect();
            let null_position = row.len();
            row.push(SqlValue::Null);
            row.extend(suffix.iter().map(|i| SqlValue::Integer(*i)));

            let bound = bind_values(&row);
            prop_assert_eq!(bound.len(), row.len());
            prop_assert_eq!(
                &bound[null_position],
                &BindValue::Text(String::new())
            );
        }
    }
}
