//! Predicate Evaluation Engine
//!
//! This module provides the `Evaluator`, which binds a `Predicate` to a
//! table and evaluates it one column at a time into a `Truth` mask.

use crate::context::ExecutionContext;
use crate::predicate::{CompareOp, Predicate, TimeBound};
use cohort_diagnostics::{CohortError, Result};
use cohort_types::{Column, DataType, Table, TemporalPattern, Truth, Value};
use log::debug;

/// The predicate evaluator
///
/// Evaluation happens in two steps. Binding resolves every column reference
/// against the table and checks operand types, so schema problems surface
/// before any row is touched. The bound tree is then evaluated bottom-up,
/// each node producing one `Truth` per row.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

/// A predicate whose column references point into a concrete table
#[derive(Debug)]
enum Bound<'a> {
    Compare {
        column: &'a Column,
        op: CompareOp,
        literal: &'a Value,
    },
    IsNull(&'a Column),
    IsNotNull(&'a Column),
    Temporal {
        column: &'a Column,
        pattern: &'a TemporalPattern,
        op: CompareOp,
        bound: TimeBound,
    },
    AgeRange {
        column: &'a Column,
        pattern: &'a TemporalPattern,
        low: i64,
        high: i64,
    },
    And(Box<Bound<'a>>, Box<Bound<'a>>),
    Or(Box<Bound<'a>>, Box<Bound<'a>>),
    Not(Box<Bound<'a>>),
}

impl Evaluator {
    pub fn new() -> Self {
        Self
    }

    /// Check that a predicate can be evaluated against a table
    pub fn check(&self, table: &Table, predicate: &Predicate) -> Result<()> {
        self.bind(table, predicate).map(|_| ())
    }

    /// Evaluate a predicate over every row of a table
    pub fn evaluate(
        &self,
        table: &Table,
        predicate: &Predicate,
        ctx: &ExecutionContext,
    ) -> Result<Vec<Truth>> {
        let bound = self.bind(table, predicate)?;
        Ok(self.eval_bound(&bound, ctx))
    }

    /// Keep the rows for which the predicate is `True`
    ///
    /// The source table is left untouched; `False` and `Unknown` rows are
    /// both dropped.
    pub fn filter(
        &self,
        table: &Table,
        predicate: &Predicate,
        ctx: &ExecutionContext,
    ) -> Result<Table> {
        let mask = self.evaluate(table, predicate, ctx)?;
        let filtered = table.filter(&mask)?;
        debug!(
            "filter {}: kept {} of {} rows",
            predicate,
            filtered.num_rows(),
            table.num_rows()
        );
        Ok(filtered)
    }

    fn bind<'a>(&self, table: &'a Table, predicate: &'a Predicate) -> Result<Bound<'a>> {
        let bound = match predicate {
            Predicate::Compare {
                column,
                op,
                literal,
            } => {
                let column = table.require_column(column)?;
                let Some(literal_type) = literal.data_type() else {
                    return Err(CohortError::schema_mismatch(format!(
                        "cannot compare column '{}' with null, use IS NULL",
                        column.name()
                    )));
                };
                if !column.data_type().is_comparable_with(&literal_type) {
                    return Err(CohortError::type_mismatch(
                        column.data_type().name(),
                        literal_type.name(),
                    ));
                }
                Bound::Compare {
                    column,
                    op: *op,
                    literal,
                }
            }
            Predicate::IsNull { column } => Bound::IsNull(table.require_column(column)?),
            Predicate::IsNotNull { column } => Bound::IsNotNull(table.require_column(column)?),
            Predicate::Temporal {
                column,
                pattern,
                op,
                bound,
            } => Bound::Temporal {
                column: temporal_source(table, column)?,
                pattern,
                op: *op,
                bound: *bound,
            },
            Predicate::AgeRange {
                column,
                pattern,
                low,
                high,
            } => Bound::AgeRange {
                column: temporal_source(table, column)?,
                pattern,
                low: *low,
                high: *high,
            },
            Predicate::And(l, r) => Bound::And(
                Box::new(self.bind(table, l)?),
                Box::new(self.bind(table, r)?),
            ),
            Predicate::Or(l, r) => Bound::Or(
                Box::new(self.bind(table, l)?),
                Box::new(self.bind(table, r)?),
            ),
            Predicate::Not(inner) => Bound::Not(Box::new(self.bind(table, inner)?)),
        };
        Ok(bound)
    }

    fn eval_bound(&self, bound: &Bound<'_>, ctx: &ExecutionContext) -> Vec<Truth> {
        match bound {
            Bound::Compare {
                column,
                op,
                literal,
            } => self.eval_compare(column, *op, literal),
            Bound::IsNull(column) => self.eval_is_null(column),
            Bound::IsNotNull(column) => self.eval_is_not_null(column),
            Bound::Temporal {
                column,
                pattern,
                op,
                bound,
            } => self.eval_temporal(column, pattern, *op, *bound, ctx),
            Bound::AgeRange {
                column,
                pattern,
                low,
                high,
            } => self.eval_age_range(column, pattern, *low, *high, ctx),
            Bound::And(l, r) => self.eval_and(self.eval_bound(l, ctx), &self.eval_bound(r, ctx)),
            Bound::Or(l, r) => self.eval_or(self.eval_bound(l, ctx), &self.eval_bound(r, ctx)),
            Bound::Not(inner) => self.eval_not(self.eval_bound(inner, ctx)),
        }
    }
}

/// Resolve a column that temporal operators can read
fn temporal_source<'a>(table: &'a Table, name: &str) -> Result<&'a Column> {
    let column = table.require_column(name)?;
    match column.data_type() {
        DataType::Utf8 | DataType::Date | DataType::Timestamp => Ok(column),
        other => Err(CohortError::type_mismatch(
            "utf8, date or timestamp",
            other.name(),
        )),
    }
}
