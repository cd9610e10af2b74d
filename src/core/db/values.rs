/// Value Typing Engine
///
/// This module infers a canonical type for each result column from the raw
/// cells the engine returns, and converts stored cells back to strongly
/// typed values on read.
///
/// The engine reports no per-column type, so a column's type is discovered
/// cumulatively: integers start a column at `Integer`, a later real widens
/// it to `Double`, text that matches the exact timestamp layout starts it at
/// `DateTime`, and any other text forces the column to `Text` for good.
/// Once widened, a column never narrows.
use crate::core::db::driver::{RawValue, RowSet};
use crate::core::error::{FbError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Exact layout a text cell must match to be treated as a timestamp
/// (24-hour clock, no fractional seconds, no fuzzy parsing).
pub const COLUMN_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Canonical type inferred for a whole result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Double,
    DateTime,
    Bytes,
    Text,
}

/// The adapter's typed representation of a cell, independent of the
/// engine's storage type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanonicalValue {
    Null,
    Integer(i32),
    Double(f64),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Text(String),
}

impl CanonicalValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CanonicalValue::Null)
    }

    /// Narrows the value to an `i32`.
    ///
    /// Doubles are rounded, text is parsed; anything else is a data fault.
    pub fn as_i32(&self) -> Result<i32> {
        match self {
            CanonicalValue::Integer(v) => Ok(*v),
            CanonicalValue::Double(v) => Ok(v.round() as i32),
            CanonicalValue::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|e| FbError::Data(format!("cannot read '{}' as an integer: {}", s, e))),
            other => Err(FbError::Data(format!(
                "cannot read {:?} as an integer",
                other
            ))),
        }
    }
}

/// Raw cell retained while a column's type is still being inferred.
#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Null,
    Integer(i64),
    Double(f64),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
    Text(String),
}

/// Per-column working state during result materialization.
///
/// Cells are appended in row order; insertion order is the row order, so
/// positional read-back is well defined. An accumulator lives only for the
/// duration of one query result.
#[derive(Debug, Default)]
pub struct ColumnAccumulator {
    inferred: Option<ColumnType>,
    values: Vec<Stored>,
}

impl ColumnAccumulator {
    pub fn new() -> Self {
        ColumnAccumulator::default()
    }

    /// Appends one raw engine cell, updating the inferred type.
    pub fn append(&mut self, raw: RawValue) {
        match raw {
            RawValue::Integer(v) => self.push_integer(v),
            RawValue::Real(v) => self.push_double(v),
            RawValue::Text(v) => self.push_text(v),
            RawValue::Bytes(v) => self.push_bytes(v),
            RawValue::Null => self.push_null(),
        }
    }

    /// Integer cell: claims the column only while its type is unset.
    pub fn push_integer(&mut self, value: i64) {
        if self.inferred.is_none() {
            self.inferred = Some(ColumnType::Integer);
        }
        self.values.push(Stored::Integer(value));
    }

    /// Real cell: widens an unset or `Integer` column to `Double`. Earlier
    /// integer cells read back as their double equivalent.
    pub fn push_double(&mut self, value: f64) {
        if matches!(self.inferred, None | Some(ColumnType::Integer)) {
            self.inferred = Some(ColumnType::Double);
        }
        self.values.push(Stored::Double(value));
    }

    /// Binary cell: claims the column only while its type is unset.
    pub fn push_bytes(&mut self, value: Vec<u8>) {
        if self.inferred.is_none() {
            self.inferred = Some(ColumnType::Bytes);
        }
        self.values.push(Stored::Bytes(value));
    }

    /// Text cell: a cell matching [`COLUMN_DATETIME_FORMAT`] exactly is
    /// stored as a parsed timestamp and claims an unset column as
    /// `DateTime`; any other text forces the column to `Text` permanently.
    pub fn push_text(&mut self, value: String) {
        // chrono alone would accept unpadded digits; the cell must render
        // back to itself to count as format-exact.
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(&value, COLUMN_DATETIME_FORMAT) {
            if timestamp.format(COLUMN_DATETIME_FORMAT).to_string() == value {
                if self.inferred.is_none() {
                    self.inferred = Some(ColumnType::DateTime);
                }
                self.values.push(Stored::DateTime(timestamp));
                return;
            }
        }
        self.inferred = Some(ColumnType::Text);
        self.values.push(Stored::Text(value));
    }

    /// Null cell: recorded positionally, never affects the inferred type.
    pub fn push_null(&mut self) {
        self.values.push(Stored::Null);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The type inferred so far. `None` when only nulls (or nothing) have
    /// been appended; such a column reads back through the text fallback.
    pub fn inferred_type(&self) -> Option<ColumnType> {
        self.inferred
    }

    /// Converts the stored cell at `row` to the column's canonical type.
    ///
    /// # Errors
    ///
    /// Requesting a row at or beyond the recorded count is a data-integrity
    /// fault and always fails; it never yields a default. A stored cell
    /// that cannot convert to the final inferred type (for example bytes in
    /// a column that settled on `Integer`) also fails.
    pub fn value_at(&self, row: usize) -> Result<CanonicalValue> {
        let stored = self.values.get(row).ok_or_else(|| {
            FbError::Data(format!(
                "not enough values recorded for column: row {} requested but only {} present",
                row,
                self.values.len()
            ))
        })?;

        if matches!(stored, Stored::Null) {
            return Ok(CanonicalValue::Null);
        }

        match self.inferred {
            Some(ColumnType::Integer) => match stored {
                Stored::Integer(v) => i32::try_from(*v).map(CanonicalValue::Integer).map_err(|_| {
                    FbError::Data(format!("integer value {} does not fit in 32 bits", v))
                }),
                other => Err(conversion_error(other, ColumnType::Integer)),
            },
            Some(ColumnType::Double) => match stored {
                Stored::Integer(v) => Ok(CanonicalValue::Double(*v as f64)),
                Stored::Double(v) => Ok(CanonicalValue::Double(*v)),
                other => Err(conversion_error(other, ColumnType::Double)),
            },
            Some(ColumnType::DateTime) => match stored {
                Stored::DateTime(ts) => Ok(CanonicalValue::DateTime(*ts)),
                other => Err(conversion_error(other, ColumnType::DateTime)),
            },
            Some(ColumnType::Bytes) => match stored {
                Stored::Bytes(bytes) => Ok(CanonicalValue::Bytes(bytes.clone())),
                other => Err(conversion_error(other, ColumnType::Bytes)),
            },
            // Text fallback, also used when no type was ever inferred.
            Some(ColumnType::Text) | None => match stored {
                Stored::DateTime(ts) => Ok(CanonicalValue::Text(
                    ts.format(COLUMN_DATETIME_FORMAT).to_string(),
                )),
                Stored::Text(s) => Ok(CanonicalValue::Text(s.clone())),
                Stored::Integer(v) => Ok(CanonicalValue::Text(v.to_string())),
                Stored::Double(v) => Ok(CanonicalValue::Text(v.to_string())),
                Stored::Bytes(bytes) => Ok(CanonicalValue::Text(
                    String::from_utf8_lossy(bytes).into_owned(),
                )),
                Stored::Null => Ok(CanonicalValue::Null),
            },
        }
    }
}

fn conversion_error(stored: &Stored, target: ColumnType) -> FbError {
    FbError::Data(format!(
        "stored value {:?} does not convert to column type {:?}",
        stored, target
    ))
}

/// Materialized query result with canonical-typed, positional access.
#[derive(Debug, Default)]
pub struct DataTable {
    columns: Vec<String>,
    data: Vec<ColumnAccumulator>,
    row_count: usize,
}

impl DataTable {
    /// Runs every cell of a raw engine row set through type inference.
    pub fn from_row_set(rows: RowSet) -> Self {
        let mut data: Vec<ColumnAccumulator> = rows
            .columns
            .iter()
            .map(|_| ColumnAccumulator::new())
            .collect();
        let row_count = rows.rows.len();
        for row in rows.rows {
            for (accumulator, cell) in data.iter_mut().zip(row) {
                accumulator.append(cell);
            }
        }
        DataTable {
            columns: rows.columns,
            data,
            row_count,
        }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Position of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// The type inferred for a column; `None` for an unknown column or one
    /// that never saw a typed cell.
    pub fn column_type(&self, column: usize) -> Option<ColumnType> {
        self.data.get(column).and_then(|a| a.inferred_type())
    }

    /// Canonical value at `(row, column)`.
    pub fn value(&self, row: usize, column: usize) -> Result<CanonicalValue> {
        let accumulator = self.data.get(column).ok_or_else(|| {
            FbError::Data(format!(
                "column {} requested but result has {} columns",
                column,
                self.data.len()
            ))
        })?;
        accumulator.value_at(row)
    }
}
