//! Cohort pipeline
//!
//! Stages run in a fixed order: load, register, filter encounters, filter
//! patients, join. Cancellation is checked between stages and any error
//! aborts the run without output.

use crate::config::PipelineConfig;
use crate::registry::{RegistryBuilder, TableRegistry};
use crate::session::Session;
use chrono::NaiveDateTime;
use cohort_diagnostics::Result;
use cohort_eval::{Evaluator, JoinSpec, Predicate, hash_join};
use cohort_types::Table;
use indexmap::IndexMap;
use log::{debug, info};
use std::sync::Arc;

/// A filter applied to one registered dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    pub dataset: String,
    pub predicate: Predicate,
}

impl FilterStage {
    pub fn new(dataset: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            dataset: dataset.into(),
            predicate,
        }
    }
}

/// Row counts observed at each stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCounts {
    /// Rows per loaded dataset, in load order
    pub loaded: IndexMap<String, usize>,
    /// Rows kept by each filter stage
    pub filtered: IndexMap<String, usize>,
    pub joined: usize,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub table: Table,
    pub counts: StageCounts,
    /// The clock value every temporal predicate saw
    pub now: NaiveDateTime,
}

/// The cohort pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    datasets: Vec<String>,
    filters: Vec<FilterStage>,
    join: JoinSpec,
}

impl Pipeline {
    pub fn new(datasets: Vec<String>, filters: Vec<FilterStage>, join: JoinSpec) -> Self {
        Self {
            datasets,
            filters,
            join,
        }
    }

    /// Build the standard encounter/patient pipeline from a configuration
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.datasets.clone(),
            vec![
                FilterStage::new(config.encounters.dataset.as_str(), config.encounter_predicate()?),
                FilterStage::new(config.patients.dataset.as_str(), config.patient_predicate()?),
            ],
            config.join_spec()?,
        ))
    }

    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    pub fn filters(&self) -> &[FilterStage] {
        &self.filters
    }

    pub fn join_spec(&self) -> &JoinSpec {
        &self.join
    }

    /// Run every stage against the session
    pub async fn run(&self, session: &mut Session) -> Result<PipelineOutput> {
        session.check_cancelled("load")?;
        let tables = session.loader().load_all(&self.datasets).await?;

        // dropped unregistered if cancelled while loading
        session.check_cancelled("register")?;
        let mut counts = StageCounts::default();
        let mut builder = RegistryBuilder::new();
        for (name, table) in tables {
            counts.loaded.insert(name.clone(), table.num_rows());
            builder.register(name, table)?;
        }
        let registry = session.install_registry(builder.build()).clone();

        let evaluator = Evaluator::new();
        let mut filtered: IndexMap<&str, Arc<Table>> = IndexMap::new();
        for stage in &self.filters {
            session.check_cancelled(&format!("filter {}", stage.dataset))?;
            let input = registry.require(&stage.dataset)?;
            let output = evaluator
                .filter(input, &stage.predicate, session.context())
                .map_err(|e| e.in_dataset(&stage.dataset))?;
            info!(
                "filtered {}: {} of {} rows kept",
                stage.dataset,
                output.num_rows(),
                input.num_rows()
            );
            counts.filtered.insert(stage.dataset.clone(), output.num_rows());
            filtered.insert(stage.dataset.as_str(), Arc::new(output));
        }

        session.check_cancelled("join")?;
        let left_name = self.join.left_key.relation.as_str();
        let right_name = self.join.right_key.relation.as_str();
        let left = relation(left_name, &filtered, &registry)?;
        let right = relation(right_name, &filtered, &registry)?;
        let table = hash_join((left_name, left.as_ref()), (right_name, right.as_ref()), &self.join)?;
        counts.joined = table.num_rows();
        info!("joined {left_name} x {right_name}: {} rows", table.num_rows());
        debug!("stage counts: {counts:?}");

        Ok(PipelineOutput {
            table,
            counts,
            now: session.now(),
        })
    }
}

/// Filtered output of a relation when it has a filter stage, otherwise the
/// registered table
fn relation(
    name: &str,
    filtered: &IndexMap<&str, Arc<Table>>,
    registry: &TableRegistry,
) -> Result<Arc<Table>> {
    match filtered.get(name) {
        Some(table) => Ok(Arc::clone(table)),
        None => registry.require(name).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_config_builds_default_stages() {
        let pipeline = Pipeline::from_config(&PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.datasets().len(), 5);
        let datasets: Vec<_> = pipeline.filters().iter().map(|f| f.dataset.as_str()).collect();
        assert_eq!(datasets, vec!["encounters", "patients"]);
        assert_eq!(pipeline.join_spec().left_key.to_string(), "patients.Id");
        assert_eq!(pipeline.join_spec().right_key.to_string(), "encounters.PATIENT");
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = PipelineConfig::default();
        config.join_left = "Id".to_string();
        assert!(Pipeline::from_config(&config).is_err());
    }
}
