//! Cohort pipeline
//!
//! Loads clinical CSV datasets, filters encounters and patients with
//! three-valued predicates, and joins the two on the patient identifier.
//!
//! # Example
//!
//! ```ignore
//! use cohort::{Pipeline, PipelineConfig, SessionBuilder};
//!
//! let config = PipelineConfig::default();
//! let mut session = SessionBuilder::new().config(config.clone()).build()?;
//! let output = Pipeline::from_config(&config)?.run(&mut session).await?;
//! println!("{} rows", output.table.num_rows());
//! session.stop();
//! ```
//!
//! # Crates
//!
//! - `cohort-types`: values, columns, tables, temporal patterns
//! - `cohort-eval`: predicates and the hash join
//! - `cohort-loader`: data sources and CSV parsing
//! - `cohort-diagnostics`: error codes and the error type

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod registry;
pub mod session;

pub use config::{EncounterFilterConfig, PatientFilterConfig, PipelineConfig};
pub use pipeline::{FilterStage, Pipeline, PipelineOutput, StageCounts};
pub use registry::{RegistryBuilder, TableRegistry};
pub use session::{CancelHandle, Session, SessionBuilder};

// Re-export the building blocks
pub use cohort_diagnostics::{CohortError, ErrorCode, ErrorKind, Result};
pub use cohort_eval::{
    CompareOp, Evaluator, ExecutionContext, JoinSpec, Predicate, QualifiedColumn, TimeBound,
    hash_join,
};
pub use cohort_loader::{DataSource, DatasetLoader, FileSource, HttpSource, MemorySource, ReadOptions};
pub use cohort_types::{Column, DataType, Table, TemporalPattern, Truth, Value};
