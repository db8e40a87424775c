//! Comparison Operator Tests
//!
//! Tests for: Compare (=, !=, <, <=, >, >=), IsNull, IsNotNull

use cohort_eval::{CompareOp, Evaluator, ExecutionContext, Predicate};
use cohort_types::{Column, Table, Truth};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// Test Helpers
// ============================================================================

fn encounters() -> Table {
    Table::try_new(vec![
        Column::utf8(
            "REASONCODE",
            [Some("55680006"), Some("55680007"), None, Some("55680006 "), Some("")],
        ),
        Column::int64("COST", [Some(100), Some(250), Some(80), None, Some(100)]),
        Column::float64("SCORE", [Some(1.5), Some(f64::NAN), None, Some(-2.0), Some(0.0)]),
    ])
    .unwrap()
}

fn eval(predicate: &Predicate) -> Vec<Truth> {
    Evaluator::new()
        .evaluate(&encounters(), predicate, &ExecutionContext::default())
        .unwrap()
}

use Truth::{False as F, True as T, Unknown as U};

// ============================================================================
// Equality Tests
// ============================================================================

#[test]
fn test_string_equality_is_exact() {
    // trailing space and empty string do not match; null is unknown
    assert_eq!(eval(&Predicate::eq("REASONCODE", "55680006")), vec![T, F, U, F, F]);
}

#[test]
fn test_string_not_equal() {
    assert_eq!(
        eval(&Predicate::compare("REASONCODE", CompareOp::NotEq, "55680006")),
        vec![F, T, U, T, T]
    );
}

#[test]
fn test_string_ordering_is_bytewise() {
    let table = Table::try_new(vec![Column::utf8("S", [Some("B"), Some("a"), Some("Z")])]).unwrap();
    let mask = Evaluator::new()
        .evaluate(
            &table,
            &Predicate::compare("S", CompareOp::Lt, "a"),
            &ExecutionContext::default(),
        )
        .unwrap();
    assert_eq!(mask, vec![T, F, T]);
}

// ============================================================================
// Numeric Tests
// ============================================================================

#[rstest]
#[case(CompareOp::Eq, vec![T, F, F, U, T])]
#[case(CompareOp::NotEq, vec![F, T, T, U, F])]
#[case(CompareOp::Lt, vec![F, F, T, U, F])]
#[case(CompareOp::LtEq, vec![T, F, T, U, T])]
#[case(CompareOp::Gt, vec![F, T, F, U, F])]
#[case(CompareOp::GtEq, vec![T, T, F, U, T])]
fn test_integer_comparisons(#[case] op: CompareOp, #[case] expected: Vec<Truth>) {
    assert_eq!(eval(&Predicate::compare("COST", op, 100_i64)), expected);
}

#[test]
fn test_integer_column_against_float_literal() {
    assert_eq!(
        eval(&Predicate::compare("COST", CompareOp::Gt, 99.5)),
        vec![T, T, F, U, T]
    );
}

#[test]
fn test_nan_compares_unknown() {
    assert_eq!(
        eval(&Predicate::compare("SCORE", CompareOp::GtEq, 0_i64)),
        vec![T, U, U, F, T]
    );
}

// ============================================================================
// Null Tests
// ============================================================================

#[test]
fn test_is_null_never_unknown() {
    assert_eq!(eval(&Predicate::is_null("REASONCODE")), vec![F, F, T, F, F]);
    assert_eq!(eval(&Predicate::is_not_null("REASONCODE")), vec![T, T, F, T, T]);
    assert_eq!(eval(&Predicate::is_null("COST")), vec![F, F, F, T, F]);
}
