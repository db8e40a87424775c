//! Logical Operators
//!
//! Implements: And, Or, Not over per-row `Truth` masks.
//! All operators follow three-valued logic.

use crate::engine::Evaluator;
use cohort_types::Truth;

impl Evaluator {
    /// Evaluate And row by row
    ///
    /// Truth table:
    /// | A       | B       | A and B |
    /// |---------|---------|---------|
    /// | true    | true    | true    |
    /// | true    | false   | false   |
    /// | true    | unknown | unknown |
    /// | false   | true    | false   |
    /// | false   | false   | false   |
    /// | false   | unknown | false   |
    /// | unknown | true    | unknown |
    /// | unknown | false   | false   |
    /// | unknown | unknown | unknown |
    pub fn eval_and(&self, mut left: Vec<Truth>, right: &[Truth]) -> Vec<Truth> {
        for (l, r) in left.iter_mut().zip(right) {
            *l = l.and(*r);
        }
        left
    }

    /// Evaluate Or row by row
    ///
    /// Truth table:
    /// | A       | B       | A or B  |
    /// |---------|---------|---------|
    /// | true    | true    | true    |
    /// | true    | false   | true    |
    /// | true    | unknown | true    |
    /// | false   | true    | true    |
    /// | false   | false   | false   |
    /// | false   | unknown | unknown |
    /// | unknown | true    | true    |
    /// | unknown | false   | unknown |
    /// | unknown | unknown | unknown |
    pub fn eval_or(&self, mut left: Vec<Truth>, right: &[Truth]) -> Vec<Truth> {
        for (l, r) in left.iter_mut().zip(right) {
            *l = l.or(*r);
        }
        left
    }

    /// Evaluate Not row by row; unknown stays unknown
    pub fn eval_not(&self, mut operand: Vec<Truth>) -> Vec<Truth> {
        for t in &mut operand {
            *t = t.not();
        }
        operand
    }
}
