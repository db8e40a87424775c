//! Clinical Operators
//!
//! Implements: AgeRange

use crate::context::ExecutionContext;
use crate::engine::Evaluator;
use crate::operators::temporal::parse_dates;
use chrono::NaiveDate;
use cohort_types::{Column, TemporalPattern, Truth};

/// Length of a year for age computation, in days
pub const DAYS_PER_YEAR: i64 = 365;

/// Age in whole years: `floor(days_between(birth, today) / 365)`
///
/// The floor is Euclidean, so a birth date in the future gives a negative
/// age rather than zero. Leap days are not compensated for.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> i64 {
    today
        .signed_duration_since(birth)
        .num_days()
        .div_euclid(DAYS_PER_YEAR)
}

impl Evaluator {
    /// Check `low <= age_in_years(parse(column), today) <= high`
    ///
    /// `today` is the date of the run's `now`. Null or unparseable birth
    /// dates yield unknown.
    pub fn eval_age_range(
        &self,
        column: &Column,
        pattern: &TemporalPattern,
        low: i64,
        high: i64,
        ctx: &ExecutionContext,
    ) -> Vec<Truth> {
        let today = ctx.today();
        let range = low..=high;
        parse_dates(column, pattern)
            .into_iter()
            .map(|birth| {
                birth.map_or(Truth::Unknown, |birth| {
                    Truth::from(range.contains(&age_in_years(birth, today)))
                })
            })
            .collect()
    }
}
