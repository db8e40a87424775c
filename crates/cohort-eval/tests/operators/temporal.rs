//! Temporal Operator Tests
//!
//! Tests for: pattern-parsed timestamp comparison against literals and `now`

use super::{ctx_at, ts};
use cohort_eval::{CompareOp, Evaluator, Predicate, TimeBound};
use cohort_types::{Column, Table, Truth};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

const TS: &str = "yyyy-MM-dd HH:mm:ss";

fn stops() -> Table {
    Table::try_new(vec![Column::utf8(
        "STOP",
        [
            Some("2000-01-01 00:00:00"),
            Some("1999-07-15 00:00:00"),
            Some("1999-07-14 23:59:59"),
            None,
            Some(""),
            Some("2000-01-01"),
            Some("garbage"),
        ],
    )])
    .unwrap()
}

fn cutoff() -> TimeBound {
    TimeBound::literal("1999-07-15 00:00:00", TS).unwrap()
}

use Truth::{False as F, True as T, Unknown as U};

// ============================================================================
// Literal Bound Tests
// ============================================================================

#[rstest]
#[case(CompareOp::Gt, vec![T, F, F, U, U, U, U])]
#[case(CompareOp::GtEq, vec![T, T, F, U, U, U, U])]
#[case(CompareOp::Lt, vec![F, F, T, U, U, U, U])]
#[case(CompareOp::LtEq, vec![F, T, T, U, U, U, U])]
#[case(CompareOp::Eq, vec![F, T, F, U, U, U, U])]
#[case(CompareOp::NotEq, vec![T, F, T, U, U, U, U])]
fn test_compare_with_literal(#[case] op: CompareOp, #[case] expected: Vec<Truth>) {
    let predicate = Predicate::temporal("STOP", TS, op, cutoff()).unwrap();
    let mask = Evaluator::new()
        .evaluate(&stops(), &predicate, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(mask, expected);
}

// ============================================================================
// Now Bound Tests
// ============================================================================

#[test]
fn test_compare_with_now_uses_context() {
    let deaths = Table::try_new(vec![Column::utf8(
        "DEATHDATE",
        [Some("2010-05-01 12:00:00"), Some("2030-01-01 00:00:00"), None],
    )])
    .unwrap();
    let predicate = Predicate::temporal("DEATHDATE", TS, CompareOp::Lt, TimeBound::Now).unwrap();

    let early = Evaluator::new()
        .evaluate(&deaths, &predicate, &ctx_at(ts(2000, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(early, vec![F, F, U]);

    let late = Evaluator::new()
        .evaluate(&deaths, &predicate, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(late, vec![T, F, U]);
}

#[test]
fn test_typed_timestamp_column_skips_parsing() {
    let table = Table::try_new(vec![Column::timestamp(
        "STOP",
        [Some(ts(2000, 1, 1, 0, 0, 0)), None],
    )])
    .unwrap();
    let predicate = Predicate::temporal("STOP", TS, CompareOp::Gt, cutoff()).unwrap();
    let mask = Evaluator::new()
        .evaluate(&table, &predicate, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(mask, vec![T, U]);
}

#[test]
fn test_date_only_pattern_reads_midnight() {
    let predicate = Predicate::temporal("STOP", "yyyy-MM-dd", CompareOp::GtEq, cutoff()).unwrap();
    let mask = Evaluator::new()
        .evaluate(&stops(), &predicate, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    // only the date-only value matches the pattern
    assert_eq!(mask, vec![U, U, U, U, U, T, U]);
}
