//! Comparison Operators
//!
//! Implements: Compare (`=`, `!=`, `<`, `<=`, `>`, `>=`), IsNull, IsNotNull

use crate::engine::Evaluator;
use crate::predicate::CompareOp;
use cohort_types::{Column, ColumnData, Truth, Value};
use std::cmp::Ordering;

impl Evaluator {
    /// Compare each cell of a column with a literal
    ///
    /// | cell         | result          |
    /// |--------------|-----------------|
    /// | null         | unknown         |
    /// | NaN          | unknown         |
    /// | other value  | `cell op value` |
    ///
    /// Text compares byte-wise and case-sensitively. Int64 and Float64
    /// compare numerically with each other.
    pub fn eval_compare(&self, column: &Column, op: CompareOp, literal: &Value) -> Vec<Truth> {
        match (column.data(), literal) {
            (ColumnData::Utf8(cells), Value::Utf8(lit)) => cells
                .iter()
                .map(|cell| {
                    let ordering = cell.as_deref().map(|s| s.as_bytes().cmp(lit.as_bytes()));
                    truth_of(ordering, op)
                })
                .collect(),
            (ColumnData::Int64(cells), Value::Int64(lit)) => cells
                .iter()
                .map(|cell| truth_of(cell.map(|n| n.cmp(lit)), op))
                .collect(),
            _ => (0..column.len())
                .map(|row| truth_of(column.value(row).compare(literal), op))
                .collect(),
        }
    }

    /// IsNull never yields unknown
    pub fn eval_is_null(&self, column: &Column) -> Vec<Truth> {
        (0..column.len())
            .map(|row| Truth::from(column.is_null(row)))
            .collect()
    }

    /// IsNotNull never yields unknown
    pub fn eval_is_not_null(&self, column: &Column) -> Vec<Truth> {
        (0..column.len())
            .map(|row| Truth::from(!column.is_null(row)))
            .collect()
    }
}

fn truth_of(ordering: Option<Ordering>, op: CompareOp) -> Truth {
    ordering.map_or(Truth::Unknown, |o| Truth::from(op.matches(o)))
}
