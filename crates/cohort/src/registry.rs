//! Table registry
//!
//! Tables are registered once through a `RegistryBuilder` and then frozen
//! into a read-only `TableRegistry`. Tables are shared behind `Arc`, so
//! handing one out never copies column data.

use cohort_diagnostics::{CohortError, Result};
use cohort_types::Table;
use indexmap::IndexMap;
use log::debug;
use std::sync::Arc;

/// Write phase of the registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tables: IndexMap<String, Arc<Table>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table; a name can only be registered once
    pub fn register(&mut self, name: impl Into<String>, table: impl Into<Arc<Table>>) -> Result<()> {
        let name = name.into();
        if self.tables.contains_key(&name) {
            return Err(CohortError::duplicate_name("table", name));
        }
        let table = table.into();
        debug!("registered {name}: {} rows", table.num_rows());
        self.tables.insert(name, table);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Freeze the registry
    pub fn build(self) -> TableRegistry {
        TableRegistry {
            tables: self.tables,
        }
    }
}

/// Read-only name to table mapping
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    tables: IndexMap<String, Arc<Table>>,
}

impl TableRegistry {
    pub fn get(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(name)
    }

    /// Look up a table, failing with `SchemaMismatch` when it is absent
    pub fn require(&self, name: &str) -> Result<&Arc<Table>> {
        self.get(name).ok_or_else(|| CohortError::unknown_table(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Table>)> {
        self.tables.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
