//! Predicate trees
//!
//! A `Predicate` is a boolean expression over the columns of a single table.
//! Patterns and temporal literals are compiled by the constructors, so a
//! predicate that exists is always well formed; whether its columns exist
//! is checked when it is bound to a table.

use chrono::NaiveDateTime;
use cohort_diagnostics::{COH0302, CohortError, Result};
use cohort_types::{TemporalPattern, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl CompareOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Check whether an ordering satisfies this operator
    pub const fn matches(&self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => matches!(ordering, Ordering::Equal),
            Self::NotEq => !matches!(ordering, Ordering::Equal),
            Self::Lt => matches!(ordering, Ordering::Less),
            Self::LtEq => !matches!(ordering, Ordering::Greater),
            Self::Gt => matches!(ordering, Ordering::Greater),
            Self::GtEq => !matches!(ordering, Ordering::Less),
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = CohortError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "=" | "==" => Ok(Self::Eq),
            "!=" | "<>" => Ok(Self::NotEq),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::LtEq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::GtEq),
            other => Err(CohortError::invalid_config(
                COH0302,
                other,
                format!("unknown comparison operator '{other}'"),
            )),
        }
    }
}

/// Right-hand side of a temporal comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    /// A fixed timestamp
    At(NaiveDateTime),
    /// The run's `now` snapshot
    Now,
}

impl TimeBound {
    /// Parse a literal timestamp with the given pattern
    pub fn literal(literal: &str, pattern: &str) -> Result<Self> {
        let pattern = TemporalPattern::compile(pattern)?;
        pattern.parse_literal(literal).map(Self::At)
    }
}

impl fmt::Display for TimeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::At(ts) => write!(f, "{}", Value::Timestamp(*ts)),
            Self::Now => f.write_str("now()"),
        }
    }
}

/// Boolean expression over the columns of one table
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> literal`
    Compare {
        column: String,
        op: CompareOp,
        literal: Value,
    },
    /// `column is null`
    IsNull { column: String },
    /// `column is not null`
    IsNotNull { column: String },
    /// `parse(column, pattern) <op> bound`
    Temporal {
        column: String,
        pattern: TemporalPattern,
        op: CompareOp,
        bound: TimeBound,
    },
    /// `low <= age_in_years(parse(column, pattern), today) <= high`
    AgeRange {
        column: String,
        pattern: TemporalPattern,
        low: i64,
        high: i64,
    },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: impl Into<String>, op: CompareOp, literal: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            literal: literal.into(),
        }
    }

    /// Equality against a literal
    pub fn eq(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, literal)
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Self::IsNotNull {
            column: column.into(),
        }
    }

    /// Temporal comparison; fails with `InvalidPattern` if the pattern does not compile
    pub fn temporal(
        column: impl Into<String>,
        pattern: &str,
        op: CompareOp,
        bound: TimeBound,
    ) -> Result<Self> {
        Ok(Self::Temporal {
            column: column.into(),
            pattern: TemporalPattern::compile(pattern)?,
            op,
            bound,
        })
    }

    /// Inclusive age range in whole years
    pub fn age_range(column: impl Into<String>, pattern: &str, low: i64, high: i64) -> Result<Self> {
        if low > high {
            return Err(CohortError::invalid_config(
                COH0302,
                format!("{low}..={high}"),
                format!("age range lower bound {low} exceeds upper bound {high}"),
            ));
        }
        Ok(Self::AgeRange {
            column: column.into(),
            pattern: TemporalPattern::compile(pattern)?,
            low,
            high,
        })
    }

    pub fn and(self, other: Predicate) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    /// Conjunction of all predicates, `None` when the iterator is empty
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Option<Self> {
        predicates.into_iter().reduce(Self::and)
    }

    /// Names of all columns referenced by this predicate, in first-use order
    pub fn columns(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Compare { column, .. }
            | Self::IsNull { column }
            | Self::IsNotNull { column }
            | Self::Temporal { column, .. }
            | Self::AgeRange { column, .. } => {
                if !out.contains(&column.as_str()) {
                    out.push(column);
                }
            }
            Self::And(l, r) | Self::Or(l, r) => {
                l.collect_columns(out);
                r.collect_columns(out);
            }
            Self::Not(inner) => inner.collect_columns(out),
        }
    }
}

impl std::ops::Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Self::Output {
        Predicate::Not(Box::new(self))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compare {
                column,
                op,
                literal: Value::Utf8(s),
            } => write!(f, "{column} {op} '{s}'"),
            Self::Compare { column, op, literal } => write!(f, "{column} {op} {literal}"),
            Self::IsNull { column } => write!(f, "{column} IS NULL"),
            Self::IsNotNull { column } => write!(f, "{column} IS NOT NULL"),
            Self::Temporal {
                column,
                pattern,
                op,
                bound,
            } => write!(f, "to_timestamp({column}, '{pattern}') {op} {bound}"),
            Self::AgeRange {
                column,
                pattern,
                low,
                high,
            } => write!(f, "age(to_date({column}, '{pattern}')) BETWEEN {low} AND {high}"),
            Self::And(l, r) => write!(f, "({l} AND {r})"),
            Self::Or(l, r) => write!(f, "({l} OR {r})"),
            Self::Not(inner) => write!(f, "NOT {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_diagnostics::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(CompareOp::Eq, Ordering::Equal, true)]
    #[case(CompareOp::Eq, Ordering::Less, false)]
    #[case(CompareOp::NotEq, Ordering::Greater, true)]
    #[case(CompareOp::Lt, Ordering::Less, true)]
    #[case(CompareOp::Lt, Ordering::Equal, false)]
    #[case(CompareOp::LtEq, Ordering::Equal, true)]
    #[case(CompareOp::Gt, Ordering::Greater, true)]
    #[case(CompareOp::Gt, Ordering::Equal, false)]
    #[case(CompareOp::GtEq, Ordering::Equal, true)]
    #[case(CompareOp::GtEq, Ordering::Less, false)]
    fn test_compare_op_matches(#[case] op: CompareOp, #[case] ord: Ordering, #[case] expected: bool) {
        assert_eq!(op.matches(ord), expected);
    }

    #[test]
    fn test_compare_op_from_str() {
        assert_eq!(">=".parse::<CompareOp>().unwrap(), CompareOp::GtEq);
        assert_eq!("==".parse::<CompareOp>().unwrap(), CompareOp::Eq);
        assert_eq!("~".parse::<CompareOp>().unwrap_err().kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_constructors_validate_patterns() {
        let err = Predicate::temporal("STOP", "yyyy-QQ", CompareOp::Gt, TimeBound::Now).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);

        let err = TimeBound::literal("July 1999", "yyyy-MM-dd HH:mm:ss").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);

        let err = Predicate::age_range("BIRTHDATE", "yyyy-MM-dd", 35, 18).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_columns_and_display() {
        let predicate = Predicate::is_not_null("BIRTHDATE")
            .and(Predicate::temporal("DEATHDATE", "yyyy-MM-dd HH:mm:ss", CompareOp::Lt, TimeBound::Now).unwrap())
            .and(Predicate::age_range("BIRTHDATE", "yyyy-MM-dd", 18, 35).unwrap());

        assert_eq!(predicate.columns(), vec!["BIRTHDATE", "DEATHDATE"]);
        assert_eq!(
            predicate.to_string(),
            "((BIRTHDATE IS NOT NULL AND to_timestamp(DEATHDATE, 'yyyy-MM-dd HH:mm:ss') < now()) \
             AND age(to_date(BIRTHDATE, 'yyyy-MM-dd')) BETWEEN 18 AND 35)"
        );
    }

    #[test]
    fn test_all_and_not() {
        assert!(Predicate::all(Vec::new()).is_none());
        let p = Predicate::all([Predicate::eq("A", "x"), Predicate::eq("B", 1_i64)]).unwrap();
        assert_eq!(p.to_string(), "(A = 'x' AND B = 1)");
        assert_eq!((!Predicate::is_null("A")).to_string(), "NOT A IS NULL");
    }
}
