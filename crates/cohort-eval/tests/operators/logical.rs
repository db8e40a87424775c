//! Logical Operator Tests
//!
//! Tests for: And, Or, Not
//! All operators implement three-valued logic

use cohort_eval::{Evaluator, ExecutionContext, Predicate};
use cohort_types::{Column, Table, Truth};
use pretty_assertions::assert_eq;

// ============================================================================
// Test Helpers
// ============================================================================

/// Two columns whose equality tests enumerate all nine (A, B) combinations
fn truth_grid() -> Table {
    let a = [Some("y"), Some("y"), Some("y"), Some("n"), Some("n"), Some("n"), None, None, None];
    let b = [Some("y"), Some("n"), None, Some("y"), Some("n"), None, Some("y"), Some("n"), None];
    Table::try_new(vec![Column::utf8("A", a), Column::utf8("B", b)]).unwrap()
}

fn a() -> Predicate {
    Predicate::eq("A", "y")
}

fn b() -> Predicate {
    Predicate::eq("B", "y")
}

fn eval(predicate: &Predicate) -> Vec<Truth> {
    Evaluator::new()
        .evaluate(&truth_grid(), predicate, &ExecutionContext::default())
        .unwrap()
}

use Truth::{False as F, True as T, Unknown as U};

// ============================================================================
// And / Or / Not Tests - Three-Valued Logic
// ============================================================================

#[test]
fn test_and_truth_table() {
    assert_eq!(eval(&a().and(b())), vec![T, F, U, F, F, F, U, F, U]);
}

#[test]
fn test_or_truth_table() {
    assert_eq!(eval(&a().or(b())), vec![T, T, T, T, F, U, T, U, U]);
}

#[test]
fn test_not_keeps_unknown() {
    assert_eq!(eval(&!a()), vec![F, F, F, T, T, T, U, U, U]);
}

#[test]
fn test_de_morgan() {
    assert_eq!(eval(&!(a().and(b()))), eval(&(!a()).or(!b())));
    assert_eq!(eval(&!(a().or(b()))), eval(&(!a()).and(!b())));
}

#[test]
fn test_filter_drops_false_and_unknown() {
    let table = truth_grid();
    let filtered = Evaluator::new()
        .filter(&table, &a().or(b()), &ExecutionContext::default())
        .unwrap();
    assert_eq!(filtered.num_rows(), 5);
    assert_eq!(table.num_rows(), 9);
}
