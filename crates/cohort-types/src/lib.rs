//! Cohort pipeline type system
//!
//! This crate defines the data model shared by the loader, the evaluator
//! and the orchestrator:
//! - Column data types and scalar values
//! - Three-valued boolean logic (`Truth`)
//! - Compiled temporal patterns
//! - Typed columns and immutable columnar tables

pub mod column;
pub mod data_type;
pub mod logic;
pub mod table;
pub mod temporal;
pub mod value;

pub use column::{Column, ColumnData};
pub use data_type::DataType;
pub use logic::Truth;
pub use table::{Field, Schema, Table};
pub use temporal::{DATE_PATTERN, TIMESTAMP_PATTERN, TemporalPattern};
pub use value::Value;
