//! Dataset loading for the cohort pipeline
//!
//! - `DataSource`: where dataset bytes come from (HTTP, the local filesystem, memory)
//! - `read_csv`: CSV bytes to a typed columnar `Table`
//! - `DatasetLoader`: fetch and parse one or many datasets concurrently

pub mod loader;
pub mod reader;
pub mod source;

pub use loader::DatasetLoader;
pub use reader::{DEFAULT_NULL_VALUES, ReadOptions, read_csv};
pub use source::{DEFAULT_TIMEOUT, DataSource, FileSource, HttpSource, MemorySource, source_for};
