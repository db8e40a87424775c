//! CLI functionality for the cohort tool
//!
//! This module contains all CLI-related functionality including:
//! - The `run` command (full pipeline)
//! - The `show` command (inspect one dataset)
//! - Output formatting

#[cfg(feature = "cli")]
pub mod output;
#[cfg(feature = "cli")]
pub mod run;
#[cfg(feature = "cli")]
pub mod show;
