//! Operator integration tests for predicate evaluation
//!
//! These tests verify operator behavior including:
//! - Correct results for text, numeric and temporal columns
//! - Null propagation into `Truth::Unknown`
//! - Three-valued logic for logical operators
//! - Edge cases around pattern parsing and age boundaries

mod clinical;
mod comparison;
mod logical;
mod temporal;

use chrono::{NaiveDate, NaiveDateTime};
use cohort_eval::ExecutionContext;

pub fn ts(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

pub fn ctx_at(now: NaiveDateTime) -> ExecutionContext {
    ExecutionContext::new(now)
}
