//! Hash Join Tests
//!
//! Tests for: inner equi-join, fan-out, null keys, projection and ordering

use cohort_eval::{JoinSpec, QualifiedColumn, hash_join};
use cohort_types::{Column, Table, Value};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn qc(s: &str) -> QualifiedColumn {
    s.parse().unwrap()
}

fn patients(ids: &[Option<&str>]) -> Table {
    let births: Vec<Option<String>> = (0..ids.len()).map(|i| Some(format!("2000-01-{:02}", i + 1))).collect();
    Table::try_new(vec![
        Column::utf8("Id", ids.iter().copied()),
        Column::utf8("BIRTHDATE", births.iter().map(|b| b.as_deref())),
    ])
    .unwrap()
}

fn encounters(rows: &[(Option<&str>, &str)]) -> Table {
    Table::try_new(vec![
        Column::utf8("PATIENT", rows.iter().map(|(p, _)| *p)),
        Column::utf8("STOP", rows.iter().map(|(_, s)| Some(*s))),
    ])
    .unwrap()
}

fn spec() -> JoinSpec {
    JoinSpec::inner(qc("patients.Id"), qc("encounters.PATIENT")).project([
        qc("encounters.PATIENT"),
        qc("encounters.STOP"),
        qc("patients.BIRTHDATE"),
    ])
}

fn join(p: &Table, e: &Table) -> Table {
    hash_join(("patients", p), ("encounters", e), &spec()).unwrap()
}

// ============================================================================
// Join Tests
// ============================================================================

#[test]
fn test_single_match() {
    let p = patients(&[Some("P1"), Some("P2")]);
    let e = encounters(&[(Some("P2"), "2000-01-01 00:00:00")]);
    let out = join(&p, &e);

    assert_eq!(
        out.column_names().collect::<Vec<_>>(),
        vec!["PATIENT", "STOP", "BIRTHDATE"]
    );
    assert_eq!(
        out.rows().collect::<Vec<_>>(),
        vec![vec![
            Value::utf8("P2"),
            Value::utf8("2000-01-01 00:00:00"),
            Value::utf8("2000-01-02"),
        ]]
    );
}

#[test]
fn test_fan_out_preserves_right_order() {
    let p = patients(&[Some("P1"), Some("P2")]);
    let e = encounters(&[
        (Some("P1"), "a"),
        (Some("P2"), "b"),
        (Some("P1"), "c"),
        (Some("P1"), "d"),
    ]);
    let out = join(&p, &e);
    let stops: Vec<Value> = out.rows().map(|r| r[1].clone()).collect();
    assert_eq!(
        stops,
        vec![Value::utf8("a"), Value::utf8("c"), Value::utf8("d"), Value::utf8("b")]
    );
}

#[test]
fn test_null_keys_never_match() {
    let p = patients(&[None, Some("P1")]);
    let e = encounters(&[(None, "a"), (Some("P1"), "b")]);
    let out = join(&p, &e);
    assert_eq!(out.num_rows(), 1);
    assert_eq!(out.row(0)[0], Value::utf8("P1"));
}

#[test]
fn test_keys_are_case_sensitive() {
    let p = patients(&[Some("p1")]);
    let e = encounters(&[(Some("P1"), "a")]);
    assert!(join(&p, &e).is_empty());
}

#[test]
fn test_empty_inputs() {
    let p = patients(&[]);
    let e = encounters(&[(Some("P1"), "a")]);
    let out = join(&p, &e);
    assert!(out.is_empty());
    assert_eq!(out.num_columns(), 3);
}

#[test]
fn test_missing_key_column() {
    let p = Table::try_new(vec![Column::utf8("PatientId", [Some("P1")])]).unwrap();
    let e = encounters(&[(Some("P1"), "a")]);
    let err = hash_join(("patients", &p), ("encounters", &e), &spec()).unwrap_err();
    assert_eq!(err.to_string(), "COH0401: column 'Id' not found in 'patients'");
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Output size is the sum over left rows of the matching right rows, and
    /// every output row carries equal keys
    #[test]
    fn prop_fan_out_count(
        left in prop::collection::vec(prop::option::of(0u8..6), 0..20),
        right in prop::collection::vec(prop::option::of(0u8..6), 0..20),
    ) {
        let ids = |keys: &[Option<u8>]| -> Vec<Option<String>> {
            keys.iter().map(|k| k.map(|k| format!("P{k}"))).collect()
        };
        let left_ids = ids(&left);
        let right_ids = ids(&right);

        let p = Table::try_new(vec![Column::utf8("Id", left_ids.iter().map(|s| s.as_deref()))]).unwrap();
        let e = Table::try_new(vec![
            Column::utf8("PATIENT", right_ids.iter().map(|s| s.as_deref())),
            Column::int64("ROW", (0..right_ids.len() as i64).map(Some)),
        ])
        .unwrap();
        let spec = JoinSpec::inner(qc("patients.Id"), qc("encounters.PATIENT"))
            .project([qc("patients.Id"), qc("encounters.PATIENT"), qc("encounters.ROW")]);
        let out = hash_join(("patients", &p), ("encounters", &e), &spec).unwrap();

        let expected: usize = left
            .iter()
            .flatten()
            .map(|l| right.iter().flatten().filter(|r| *r == l).count())
            .sum();
        prop_assert_eq!(out.num_rows(), expected);

        for row in out.rows() {
            prop_assert!(!row[0].is_null());
            prop_assert_eq!(&row[0], &row[1]);
        }
    }
}
