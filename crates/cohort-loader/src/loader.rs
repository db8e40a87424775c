//! Dataset loader

use crate::reader::{ReadOptions, read_csv};
use crate::source::DataSource;
use cohort_diagnostics::{CohortError, Result};
use cohort_types::Table;
use futures::future::try_join_all;
use indexmap::IndexMap;
use log::info;
use std::collections::HashSet;
use std::sync::Arc;

/// Fetches datasets from a source and parses them into tables
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    source: Arc<dyn DataSource>,
    options: ReadOptions,
}

impl DatasetLoader {
    pub fn new(source: Arc<dyn DataSource>, options: ReadOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Load one dataset
    pub async fn load(&self, name: &str) -> Result<Table> {
        let location = self.source.location(name);
        info!("loading {name} from {location}");

        let bytes = self.source.fetch(name).await?;
        let table = read_csv(&bytes, &self.options).map_err(|e| e.in_dataset(name))?;

        info!(
            "loaded {name}: {} rows, {} columns",
            table.num_rows(),
            table.num_columns()
        );
        Ok(table)
    }

    /// Load several datasets concurrently
    ///
    /// The result preserves the order of `names`. The first failure aborts
    /// the whole load and no partial result is returned.
    pub async fn load_all<S: AsRef<str>>(&self, names: &[S]) -> Result<IndexMap<String, Table>> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_ref()) {
                return Err(CohortError::duplicate_name("dataset", name.as_ref()));
            }
        }

        let tables = try_join_all(names.iter().map(|name| self.load(name.as_ref()))).await?;
        Ok(names
            .iter()
            .map(|name| name.as_ref().to_string())
            .zip(tables)
            .collect())
    }
}
