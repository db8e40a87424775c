//! Temporal Operators
//!
//! Text columns hold dates as strings and are parsed on demand with a
//! compiled pattern. Cells that are null, empty or do not match the pattern
//! parse to `None` and make the comparison unknown.

use crate::context::ExecutionContext;
use crate::engine::Evaluator;
use crate::predicate::{CompareOp, TimeBound};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use cohort_types::{Column, ColumnData, TemporalPattern, Truth};

/// Read a column as timestamps
///
/// Utf8 cells are parsed with `pattern`; Date cells become midnight;
/// Timestamp cells are taken as is. Any other column type yields all `None`.
pub fn parse_timestamps(column: &Column, pattern: &TemporalPattern) -> Vec<Option<NaiveDateTime>> {
    match column.data() {
        ColumnData::Utf8(cells) => cells
            .iter()
            .map(|cell| cell.as_deref().and_then(|s| pattern.parse_timestamp(s)))
            .collect(),
        ColumnData::Timestamp(cells) => cells.clone(),
        ColumnData::Date(cells) => cells
            .iter()
            .map(|d| d.map(|d| d.and_time(NaiveTime::MIN)))
            .collect(),
        _ => vec![None; column.len()],
    }
}

/// Read a column as dates, dropping any time of day
pub fn parse_dates(column: &Column, pattern: &TemporalPattern) -> Vec<Option<NaiveDate>> {
    match column.data() {
        ColumnData::Utf8(cells) => cells
            .iter()
            .map(|cell| cell.as_deref().and_then(|s| pattern.parse_date(s)))
            .collect(),
        ColumnData::Date(cells) => cells.clone(),
        ColumnData::Timestamp(cells) => cells.iter().map(|ts| ts.map(|ts| ts.date())).collect(),
        _ => vec![None; column.len()],
    }
}

impl Evaluator {
    /// Compare `parse(column, pattern)` with a fixed timestamp or with `now`
    ///
    /// | parsed cell  | result           |
    /// |--------------|------------------|
    /// | none         | unknown          |
    /// | timestamp    | `ts op bound`    |
    pub fn eval_temporal(
        &self,
        column: &Column,
        pattern: &TemporalPattern,
        op: CompareOp,
        bound: TimeBound,
        ctx: &ExecutionContext,
    ) -> Vec<Truth> {
        let bound = match bound {
            TimeBound::At(ts) => ts,
            TimeBound::Now => ctx.now(),
        };
        parse_timestamps(column, pattern)
            .into_iter()
            .map(|ts| ts.map_or(Truth::Unknown, |ts| Truth::from(op.matches(ts.cmp(&bound)))))
            .collect()
    }
}
