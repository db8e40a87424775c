//! Execution context for a pipeline run

use chrono::{Local, NaiveDate, NaiveDateTime};

/// State shared by every predicate evaluated during one run
///
/// `now` is captured once. Every row of every table is evaluated against the
/// same instant, so a run is deterministic given its inputs and this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    now: NaiveDateTime,
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::from_system_clock()
    }
}

impl ExecutionContext {
    /// Create a context with a fixed current time
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Snapshot the local wall clock
    pub fn from_system_clock() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Replace the current time
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// The run's current timestamp
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// The run's current date
    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_today_is_date_of_now() {
        let now = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let ctx = ExecutionContext::new(now);
        assert_eq!(ctx.now(), now);
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_system_clock_is_stable() {
        let ctx = ExecutionContext::from_system_clock();
        assert_eq!(ctx.now(), ctx.now());
    }
}
