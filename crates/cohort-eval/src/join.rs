//! Hash Join
//!
//! Inner equi-join of two named relations. The right relation is indexed on
//! its key column, the left relation probes the index row by row, and the
//! projected columns are gathered from the matching row positions.
//!
//! Output order is left-row order, then right-row order within one left row.
//! Every right match produces its own output row (full fan-out). Null keys
//! and NaN keys never match.

use chrono::{NaiveDate, NaiveDateTime};
use cohort_diagnostics::{CohortError, Result};
use cohort_types::{Column, ColumnData, Table};
use log::debug;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Kind of join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinKind {
    #[default]
    Inner,
}

/// A column reference qualified by relation name, e.g. `encounters.PATIENT`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedColumn {
    pub relation: String,
    pub column: String,
}

impl QualifiedColumn {
    pub fn new(relation: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            relation: relation.into(),
            column: column.into(),
        }
    }

    /// Parse `relation.column`; the column part may itself contain dots
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('.') {
            Some((relation, column)) if !relation.is_empty() && !column.is_empty() => {
                Ok(Self::new(relation, column))
            }
            _ => Err(CohortError::schema_mismatch(format!(
                "expected a qualified column 'relation.column', found '{s}'"
            ))),
        }
    }
}

impl fmt::Display for QualifiedColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.relation, self.column)
    }
}

impl FromStr for QualifiedColumn {
    type Err = CohortError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Join condition and output projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSpec {
    pub kind: JoinKind,
    /// Key on the left relation
    pub left_key: QualifiedColumn,
    /// Key on the right relation
    pub right_key: QualifiedColumn,
    /// Output columns, in order
    pub projection: Vec<QualifiedColumn>,
}

impl JoinSpec {
    /// Inner join on `left_key == right_key` with an empty projection
    pub fn inner(left_key: QualifiedColumn, right_key: QualifiedColumn) -> Self {
        Self {
            kind: JoinKind::Inner,
            left_key,
            right_key,
            projection: Vec::new(),
        }
    }

    /// Set the output projection
    pub fn project(mut self, columns: impl IntoIterator<Item = QualifiedColumn>) -> Self {
        self.projection = columns.into_iter().collect();
        self
    }
}

/// Hashable join key
///
/// `Float` holds the bit pattern of the value with `-0.0` folded into `0.0`.
/// When Int64 is joined with Float64 both sides use `Int`, and floats that
/// are not whole numbers in `i64` range never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum JoinKey<'a> {
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(&'a str),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl JoinKey<'_> {
    fn float(value: f64) -> Option<Self> {
        if value.is_nan() {
            return None;
        }
        let value = if value == 0.0 { 0.0 } else { value };
        Some(JoinKey::Float(value.to_bits()))
    }

    fn whole(value: f64) -> Option<Self> {
        // 2^63 is exact as f64; the fract test also drops NaN and infinities
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;
        (value.fract() == 0.0 && (-LIMIT..LIMIT).contains(&value)).then(|| JoinKey::Int(value as i64))
    }
}

type MatchList = SmallVec<[usize; 4]>;

/// Join two named tables
///
/// `left` and `right` are `(relation name, table)` pairs. Key columns must
/// have the same type, or both be numeric. Projection entries must name one
/// of the two relations and produce unique output names.
pub fn hash_join(left: (&str, &Table), right: (&str, &Table), spec: &JoinSpec) -> Result<Table> {
    let (left_name, left_table) = left;
    let (right_name, right_table) = right;

    if left_name == right_name {
        return Err(CohortError::duplicate_name("relation", left_name));
    }
    let (left_key, right_key) = orient_keys(spec, left_name, right_name)?;
    let left_col = left_table
        .column(&left_key.column)
        .ok_or_else(|| CohortError::missing_column(left_name, left_key.column.as_str()))?;
    let right_col = right_table
        .column(&right_key.column)
        .ok_or_else(|| CohortError::missing_column(right_name, right_key.column.as_str()))?;

    let key_types = (left_col.data_type(), right_col.data_type());
    if key_types.0 != key_types.1 && !(key_types.0.is_numeric() && key_types.1.is_numeric()) {
        return Err(CohortError::type_mismatch(
            format!("{right_key} as {}", key_types.1),
            format!("{left_key} as {}", key_types.0),
        ));
    }
    let mixed_numeric = key_types.0 != key_types.1;

    let output = plan_projection(spec, (left_name, left_table), (right_name, right_table))?;

    // Build
    let right_keys = extract_keys(right_col, mixed_numeric);
    let mut index: HashMap<JoinKey<'_>, MatchList> = HashMap::with_capacity(right_keys.len());
    for (row, key) in right_keys.into_iter().enumerate() {
        if let Some(key) = key {
            index.entry(key).or_default().push(row);
        }
    }

    // Probe
    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for (row, key) in extract_keys(left_col, mixed_numeric).into_iter().enumerate() {
        let Some(matches) = key.and_then(|k| index.get(&k)) else {
            continue;
        };
        for &right_row in matches {
            left_rows.push(row);
            right_rows.push(right_row);
        }
    }

    debug!(
        "join {} ({} rows) with {} ({} rows, {} distinct keys): {} rows",
        left_name,
        left_table.num_rows(),
        right_name,
        right_table.num_rows(),
        index.len(),
        left_rows.len()
    );

    let columns = output
        .into_iter()
        .map(|(side, column)| match side {
            Side::Left => column.take(&left_rows),
            Side::Right => column.take(&right_rows),
        })
        .collect();
    Table::try_new(columns)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Return the keys as (left, right), accepting a condition written either way round
fn orient_keys<'s>(
    spec: &'s JoinSpec,
    left_name: &str,
    right_name: &str,
) -> Result<(&'s QualifiedColumn, &'s QualifiedColumn)> {
    let (a, b) = (&spec.left_key, &spec.right_key);
    if a.relation == left_name && b.relation == right_name {
        Ok((a, b))
    } else if a.relation == right_name && b.relation == left_name {
        Ok((b, a))
    } else {
        Err(CohortError::schema_mismatch(format!(
            "join condition {a} = {b} does not relate '{left_name}' and '{right_name}'"
        )))
    }
}

fn plan_projection<'t>(
    spec: &JoinSpec,
    left: (&str, &'t Table),
    right: (&str, &'t Table),
) -> Result<Vec<(Side, &'t Column)>> {
    let mut seen = HashSet::with_capacity(spec.projection.len());
    spec.projection
        .iter()
        .map(|qualified| {
            let (side, name, table) = if qualified.relation == left.0 {
                (Side::Left, left.0, left.1)
            } else if qualified.relation == right.0 {
                (Side::Right, right.0, right.1)
            } else {
                return Err(CohortError::schema_mismatch(format!(
                    "projection {qualified} references unknown relation '{}'",
                    qualified.relation
                )));
            };
            let column = table
                .column(&qualified.column)
                .ok_or_else(|| CohortError::missing_column(name, qualified.column.as_str()))?;
            if !seen.insert(qualified.column.as_str()) {
                return Err(CohortError::duplicate_name("output column", qualified.column.as_str()));
            }
            Ok((side, column))
        })
        .collect()
}

fn extract_keys(column: &Column, mixed_numeric: bool) -> Vec<Option<JoinKey<'_>>> {
    match column.data() {
        ColumnData::Int64(cells) => cells.iter().map(|c| c.map(JoinKey::Int)).collect(),
        ColumnData::Float64(cells) if mixed_numeric => {
            cells.iter().map(|c| c.and_then(JoinKey::whole)).collect()
        }
        ColumnData::Float64(cells) => cells.iter().map(|c| c.and_then(JoinKey::float)).collect(),
        ColumnData::Boolean(cells) => cells.iter().map(|c| c.map(JoinKey::Bool)).collect(),
        ColumnData::Utf8(cells) => cells
            .iter()
            .map(|c| c.as_deref().map(JoinKey::Str))
            .collect(),
        ColumnData::Date(cells) => cells.iter().map(|c| c.map(JoinKey::Date)).collect(),
        ColumnData::Timestamp(cells) => cells.iter().map(|c| c.map(JoinKey::Timestamp)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_diagnostics::{COH0401, COH0402, COH0403, ErrorKind};
    use cohort_types::Value;
    use pretty_assertions::assert_eq;

    fn qc(s: &str) -> QualifiedColumn {
        QualifiedColumn::parse(s).unwrap()
    }

    fn spec() -> JoinSpec {
        JoinSpec::inner(qc("l.id"), qc("r.id")).project([qc("l.id"), qc("r.v")])
    }

    #[test]
    fn test_qualified_column_parse() {
        assert_eq!(qc("encounters.PATIENT"), QualifiedColumn::new("encounters", "PATIENT"));
        assert_eq!(qc("a.b.c").column, "b.c");
        assert!(QualifiedColumn::parse("PATIENT").is_err());
        assert!(QualifiedColumn::parse(".PATIENT").is_err());
        assert_eq!(qc("p.Id").to_string(), "p.Id");
    }

    #[test]
    fn test_numeric_keys_join_across_types() {
        let left = Table::try_new(vec![Column::int64("id", [Some(1), Some(2), None])]).unwrap();
        let right = Table::try_new(vec![
            Column::float64("id", [Some(2.0), Some(f64::NAN), Some(1.5)]),
            Column::utf8("v", [Some("two"), Some("nan"), Some("x")]),
        ])
        .unwrap();
        let out = hash_join(("l", &left), ("r", &right), &spec()).unwrap();
        assert_eq!(out.num_rows(), 1);
        assert_eq!(out.row(0), vec![Value::Int64(2), Value::utf8("two")]);
    }

    #[test]
    fn test_mixed_numeric_keys_compare_exactly() {
        // 2^53 + 1 rounds to 2^53 as f64
        let left = Table::try_new(vec![Column::int64(
            "id",
            [Some(9_007_199_254_740_992), Some(9_007_199_254_740_993), Some(0)],
        )])
        .unwrap();
        let right = Table::try_new(vec![
            Column::float64("id", [Some(9_007_199_254_740_992.0), Some(-0.0), Some(f64::INFINITY)]),
            Column::utf8("v", [Some("big"), Some("zero"), Some("inf")]),
        ])
        .unwrap();
        let out = hash_join(("l", &left), ("r", &right), &spec()).unwrap();
        assert_eq!(
            out.rows().collect::<Vec<_>>(),
            vec![
                vec![Value::Int64(9_007_199_254_740_992), Value::utf8("big")],
                vec![Value::Int64(0), Value::utf8("zero")],
            ]
        );
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        let left = Table::try_new(vec![Column::float64("id", [Some(-0.0)])]).unwrap();
        let right = Table::try_new(vec![
            Column::float64("id", [Some(0.0)]),
            Column::utf8("v", [Some("zero")]),
        ])
        .unwrap();
        let out = hash_join(("l", &left), ("r", &right), &spec()).unwrap();
        assert_eq!(out.num_rows(), 1);
    }

    #[test]
    fn test_key_type_mismatch() {
        let left = Table::try_new(vec![Column::utf8("id", [Some("1")])]).unwrap();
        let right = Table::try_new(vec![
            Column::int64("id", [Some(1)]),
            Column::utf8("v", [Some("x")]),
        ])
        .unwrap();
        let err = hash_join(("l", &left), ("r", &right), &spec()).unwrap_err();
        assert_eq!(err.code(), COH0402);
    }

    #[test]
    fn test_condition_may_be_written_either_way() {
        let left = Table::try_new(vec![Column::utf8("id", [Some("a")])]).unwrap();
        let right = Table::try_new(vec![
            Column::utf8("id", [Some("a")]),
            Column::utf8("v", [Some("x")]),
        ])
        .unwrap();
        let swapped = JoinSpec::inner(qc("r.id"), qc("l.id")).project([qc("r.v")]);
        let out = hash_join(("l", &left), ("r", &right), &swapped).unwrap();
        assert_eq!(out.num_rows(), 1);

        let unrelated = JoinSpec::inner(qc("x.id"), qc("r.id"));
        let err = hash_join(("l", &left), ("r", &right), &unrelated).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn test_projection_errors() {
        let left = Table::try_new(vec![Column::utf8("id", [Some("a")])]).unwrap();
        let right = Table::try_new(vec![
            Column::utf8("id", [Some("a")]),
            Column::utf8("v", [Some("x")]),
        ])
        .unwrap();

        let dup = JoinSpec::inner(qc("l.id"), qc("r.id")).project([qc("l.id"), qc("r.id")]);
        let err = hash_join(("l", &left), ("r", &right), &dup).unwrap_err();
        assert_eq!(err.code(), COH0403);

        let missing = JoinSpec::inner(qc("l.id"), qc("r.id")).project([qc("r.nope")]);
        let err = hash_join(("l", &left), ("r", &right), &missing).unwrap_err();
        assert_eq!(err.code(), COH0401);

        let unknown = JoinSpec::inner(qc("l.id"), qc("r.id")).project([qc("z.id")]);
        let err = hash_join(("l", &left), ("r", &right), &unknown).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }
}
