//! Cohort Evaluation Engine
//!
//! Column-at-a-time evaluation of filter predicates and the inner hash join
//! used by the cohort pipeline.
//!
//! - **Comparison Operators**: `=`, `!=`, `<`, `<=`, `>`, `>=` against a literal
//! - **Null Tests**: IsNull, IsNotNull
//! - **Temporal Operators**: parse a column with a pattern and compare it to a
//!   fixed timestamp or to the run's `now`
//! - **Clinical Operators**: age-in-years range checks
//! - **Logical Operators**: And, Or, Not with three-valued logic
//! - **Join**: inner equi-join with fan-out and qualified projection
//!
//! # Example
//!
//! ```ignore
//! use cohort_eval::{CompareOp, Evaluator, ExecutionContext, Predicate, TimeBound};
//!
//! let predicate = Predicate::eq("REASONCODE", "55680006").and(Predicate::temporal(
//!     "STOP",
//!     "yyyy-MM-dd HH:mm:ss",
//!     CompareOp::Gt,
//!     TimeBound::literal("1999-07-15 00:00:00", "yyyy-MM-dd HH:mm:ss")?,
//! )?);
//! let ctx = ExecutionContext::from_system_clock();
//! let filtered = Evaluator::new().filter(&encounters, &predicate, &ctx)?;
//! ```
//!
//! # Three-Valued Logic
//!
//! Every predicate yields a `Truth` per row. A null cell or a date that does
//! not match its pattern produces `Unknown` rather than an error, and a
//! filter keeps only rows whose result is `True`:
//!
//! - `And`: false dominates (unknown and false = false)
//! - `Or`: true dominates (unknown or true = true)
//! - `Not`: unknown stays unknown

pub mod context;
pub mod engine;
pub mod join;
pub mod operators;
pub mod predicate;

pub use context::ExecutionContext;
pub use engine::Evaluator;
pub use join::{JoinKind, JoinSpec, QualifiedColumn, hash_join};
pub use operators::age_in_years;
pub use predicate::{CompareOp, Predicate, TimeBound};
