// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Tabular read results.
//!
//! A [`ResultTable`] is rows indexed by time with one named column per
//! extracted channel. Columns are strictly one-dimensional and must match
//! the length of the time axis; anything else is a stacking error.

use serde::{Deserialize, Serialize};

use crate::core::error::{IbaError, Result};

/// Data of one output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Numeric samples (analog and digital channels)
    Numeric(Vec<f64>),
    /// Text samples, one string per row
    Text(Vec<String>),
}

impl ColumnData {
    /// Number of rows in this column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// Check whether the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `count` filler rows (NaN for numeric, "" for text).
    fn extend_filler(&mut self, count: usize) {
        match self {
            ColumnData::Numeric(values) => values.extend(std::iter::repeat(f64::NAN).take(count)),
            ColumnData::Text(values) => {
                values.extend(std::iter::repeat(String::new()).take(count))
            }
        }
    }

    /// Append another column's rows, failing on a kind mismatch.
    fn extend_from(&mut self, other: &ColumnData) -> std::result::Result<(), &'static str> {
        match (self, other) {
            (ColumnData::Numeric(dst), ColumnData::Numeric(src)) => {
                dst.extend_from_slice(src);
                Ok(())
            }
            (ColumnData::Text(dst), ColumnData::Text(src)) => {
                dst.extend_from_slice(src);
                Ok(())
            }
            _ => Err("numeric and text data cannot share a column"),
        }
    }

    /// An empty column of the same kind.
    fn empty_like(&self) -> ColumnData {
        match self {
            ColumnData::Numeric(_) => ColumnData::Numeric(Vec::new()),
            ColumnData::Text(_) => ColumnData::Text(Vec::new()),
        }
    }
}

/// One named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Output column name
    pub name: String,
    /// Row data
    pub data: ColumnData,
}

/// A read result: rows indexed by time, one column per channel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultTable {
    /// Row timestamps in nanoseconds since the Unix epoch
    pub time: Vec<i64>,
    /// Columns in spec order
    pub columns: Vec<Column>,
}

impl ResultTable {
    /// Create a table over the given time axis, without columns yet.
    pub fn new(time: Vec<i64>) -> Self {
        Self {
            time,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Check whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all columns, in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Add a column, enforcing that it matches the time axis length.
    pub fn push_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();
        if data.len() != self.time.len() {
            return Err(IbaError::stacking(
                &name,
                format!(
                    "column length {} does not match time axis length {}",
                    data.len(),
                    self.time.len()
                ),
            ));
        }
        self.columns.push(Column { name, data });
        Ok(())
    }

    /// Stack several tables row-wise into one.
    ///
    /// The result covers the union of all column names in first-seen
    /// order. Rows of a table that lacks a column are filled with NaN
    /// (numeric) or "" (text). Tables disagreeing on a column's kind
    /// cannot be stacked.
    pub fn stack(tables: &[ResultTable]) -> Result<ResultTable> {
        let mut result = ResultTable::default();

        for table in tables {
            let rows_before = result.time.len();
            result.time.extend_from_slice(&table.time);

            // Columns already known: append data or filler.
            for column in &mut result.columns {
                match table.column(&column.name) {
                    Some(incoming) => column
                        .data
                        .extend_from(&incoming.data)
                        .map_err(|reason| IbaError::stacking(&column.name, reason))?,
                    None => column.data.extend_filler(table.len()),
                }
            }

            // Columns first seen in this table: backfill earlier rows.
            for incoming in &table.columns {
                if result.column(&incoming.name).is_some() {
                    continue;
                }
                let mut data = incoming.data.empty_like();
                data.extend_filler(rows_before);
                data.extend_from(&incoming.data)
                    .map_err(|reason| IbaError::stacking(&incoming.name, reason))?;
                result.columns.push(Column {
                    name: incoming.name.clone(),
                    data,
                });
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric_table(time: Vec<i64>, name: &str, values: Vec<f64>) -> ResultTable {
        let mut table = ResultTable::new(time);
        table.push_column(name, ColumnData::Numeric(values)).unwrap();
        table
    }

    #[test]
    fn test_push_column_length_mismatch() {
        let mut table = ResultTable::new(vec![0, 1, 2]);
        let err = table
            .push_column("Speed", ColumnData::Numeric(vec![1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(err, IbaError::DataStacking { .. }));
    }

    #[test]
    fn test_column_lookup() {
        let table = numeric_table(vec![0, 1], "Speed", vec![1.0, 2.0]);
        assert!(table.column("Speed").is_some());
        assert!(table.column("Temp").is_none());
        assert_eq!(table.column_names(), vec!["Speed"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_stack_matching_columns() {
        let a = numeric_table(vec![0, 1], "Speed", vec![1.0, 2.0]);
        let b = numeric_table(vec![2, 3], "Speed", vec![3.0, 4.0]);

        let stacked = ResultTable::stack(&[a, b]).unwrap();
        assert_eq!(stacked.time, vec![0, 1, 2, 3]);
        assert_eq!(
            stacked.column("Speed").unwrap().data,
            ColumnData::Numeric(vec![1.0, 2.0, 3.0, 4.0])
        );
    }

    #[test]
    fn test_stack_fills_missing_numeric_with_nan() {
        let a = numeric_table(vec![0, 1], "Speed", vec![1.0, 2.0]);
        let mut b = ResultTable::new(vec![2, 3]);
        b.push_column("Temp", ColumnData::Numeric(vec![20.0, 21.0]))
            .unwrap();

        let stacked = ResultTable::stack(&[a, b]).unwrap();
        assert_eq!(stacked.len(), 4);

        let speed = match &stacked.column("Speed").unwrap().data {
            ColumnData::Numeric(values) => values,
            _ => panic!("expected numeric"),
        };
        assert_eq!(&speed[..2], &[1.0, 2.0]);
        assert!(speed[2].is_nan() && speed[3].is_nan());

        let temp = match &stacked.column("Temp").unwrap().data {
            ColumnData::Numeric(values) => values,
            _ => panic!("expected numeric"),
        };
        assert!(temp[0].is_nan() && temp[1].is_nan());
        assert_eq!(&temp[2..], &[20.0, 21.0]);
    }

    #[test]
    fn test_stack_fills_missing_text_with_empty() {
        let mut a = ResultTable::new(vec![0]);
        a.push_column("Grade", ColumnData::Text(vec!["A".to_string()]))
            .unwrap();
        let b = numeric_table(vec![1], "Speed", vec![1.0]);

        let stacked = ResultTable::stack(&[a, b]).unwrap();
        assert_eq!(
            stacked.column("Grade").unwrap().data,
            ColumnData::Text(vec!["A".to_string(), String::new()])
        );
    }

    #[test]
    fn test_stack_kind_conflict() {
        let a = numeric_table(vec![0], "X", vec![1.0]);
        let mut b = ResultTable::new(vec![1]);
        b.push_column("X", ColumnData::Text(vec!["a".to_string()]))
            .unwrap();

        let err = ResultTable::stack(&[a, b]).unwrap_err();
        assert!(matches!(err, IbaError::DataStacking { .. }));
    }

    #[test]
    fn test_stack_empty_input() {
        let stacked = ResultTable::stack(&[]).unwrap();
        assert!(stacked.is_empty());
        assert!(stacked.columns.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let table = numeric_table(vec![0, 1], "Speed", vec![1.0, 2.0]);
        let json = serde_json::to_string(&table).unwrap();
        let back: ResultTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, back);
    }
}
