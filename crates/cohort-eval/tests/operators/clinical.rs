//! Clinical Operator Tests
//!
//! Tests for: AgeRange

use super::{ctx_at, ts};
use cohort_eval::{CompareOp, Evaluator, Predicate, TimeBound};
use cohort_types::{Column, Table, Truth};
use pretty_assertions::assert_eq;

// ============================================================================
// Test Helpers
// ============================================================================

fn births(values: &[Option<&str>]) -> Table {
    Table::try_new(vec![Column::utf8("BIRTHDATE", values.iter().copied())]).unwrap()
}

fn age_18_35() -> Predicate {
    Predicate::age_range("BIRTHDATE", "yyyy-MM-dd", 18, 35).unwrap()
}

use Truth::{False as F, True as T, Unknown as U};

// ============================================================================
// AgeRange Tests
// ============================================================================

#[test]
fn test_age_range_inclusive_bounds() {
    // now = 2024-01-01: 6570 days (18 * 365) back is 2006-01-05,
    // 13140 days (36 * 365) back is 1988-01-10
    let table = births(&[
        Some("2006-01-05"),
        Some("2006-01-06"),
        Some("1988-01-11"),
        Some("1988-01-10"),
        Some("2000-06-15"),
    ]);
    let mask = Evaluator::new()
        .evaluate(&table, &age_18_35(), &ctx_at(ts(2024, 1, 1, 12, 0, 0)))
        .unwrap();
    assert_eq!(mask, vec![T, F, T, F, T]);
}

#[test]
fn test_age_range_unparseable_is_unknown() {
    let table = births(&[None, Some(""), Some("15/06/2000"), Some("2000-06-15 00:00:00")]);
    let mask = Evaluator::new()
        .evaluate(&table, &age_18_35(), &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(mask, vec![U, U, U, U]);
}

#[test]
fn test_future_birth_is_negative_age() {
    let table = births(&[Some("2030-01-01")]);
    let any_age = Predicate::age_range("BIRTHDATE", "yyyy-MM-dd", -100, -1).unwrap();
    let mask = Evaluator::new()
        .evaluate(&table, &any_age, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    assert_eq!(mask, vec![T]);
}

#[test]
fn test_patients_filter_scenario() {
    let patients = Table::try_new(vec![
        Column::utf8("Id", [Some("P1"), Some("P2"), Some("P3")]),
        Column::utf8("BIRTHDATE", [Some("1990-01-01"), Some("2000-06-15"), None]),
        Column::utf8(
            "DEATHDATE",
            [None, Some("2020-03-01 10:00:00"), Some("2020-03-01 10:00:00")],
        ),
    ])
    .unwrap();
    let predicate = Predicate::is_not_null("BIRTHDATE")
        .and(
            Predicate::temporal(
                "DEATHDATE",
                "yyyy-MM-dd HH:mm:ss",
                CompareOp::Lt,
                TimeBound::Now,
            )
            .unwrap(),
        )
        .and(age_18_35());

    let mask = Evaluator::new()
        .evaluate(&patients, &predicate, &ctx_at(ts(2024, 1, 1, 0, 0, 0)))
        .unwrap();
    // P1 has no death date (unknown), P3 has no birth date (false)
    assert_eq!(mask, vec![U, T, F]);
}
