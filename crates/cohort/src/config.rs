//! Pipeline configuration
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration describing the standard cohort: encounters for reason
//! `55680006` that stopped after 1999-07-15, joined with deceased patients
//! aged 18 to 35.

use cohort_diagnostics::{COH0103, COH0302, CohortError, Result};
use cohort_eval::{CompareOp, JoinSpec, Predicate, QualifiedColumn, TimeBound};
use cohort_loader::ReadOptions;
use cohort_types::{DATE_PATTERN, DataType, TIMESTAMP_PATTERN, TemporalPattern};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Public sample datasets
pub const DEFAULT_BASE_LOCATION: &str =
    "https://raw.githubusercontent.com/chop-analytics/analyst-take-home-task/master/datasets/";

pub const DEFAULT_DATASETS: [&str; 5] = [
    "allergies",
    "encounters",
    "medications",
    "patients",
    "procedures",
];

pub const DEFAULT_APP_NAME: &str = "ModularCSVLoader";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name reported by the session
    pub app_name: String,
    /// Prefix of every dataset location; `<base><name>.csv`
    pub base_location: String,
    /// Datasets to load, in order
    pub datasets: Vec<String>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Pattern for timestamp columns and literals
    pub timestamp_pattern: String,
    /// Pattern for date-only columns
    pub date_pattern: String,
    pub encounters: EncounterFilterConfig,
    pub patients: PatientFilterConfig,
    /// Left join key, `relation.column`
    pub join_left: String,
    /// Right join key, `relation.column`
    pub join_right: String,
    /// Output columns, `relation.column`
    pub projection: Vec<String>,
    /// Null tokens; `None` keeps the reader defaults
    pub null_values: Option<Vec<String>>,
    /// Column types that override inference
    pub column_types: IndexMap<String, DataType>,
}

/// Encounter filter: `reason == code AND stop > cutoff`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterFilterConfig {
    pub dataset: String,
    pub reason_column: String,
    pub reason_code: String,
    pub stop_column: String,
    /// Cutoff in `timestamp_pattern` format, exclusive
    pub stop_after: String,
}

/// Patient filter: `birth is not null AND death < now AND age in [min, max]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientFilterConfig {
    pub dataset: String,
    pub birth_column: String,
    pub death_column: String,
    pub min_age: i64,
    pub max_age: i64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            base_location: DEFAULT_BASE_LOCATION.to_string(),
            datasets: DEFAULT_DATASETS.iter().map(|s| s.to_string()).collect(),
            timeout_secs: 30,
            timestamp_pattern: TIMESTAMP_PATTERN.to_string(),
            date_pattern: DATE_PATTERN.to_string(),
            encounters: EncounterFilterConfig::default(),
            patients: PatientFilterConfig::default(),
            join_left: "patients.Id".to_string(),
            join_right: "encounters.PATIENT".to_string(),
            projection: [
                "encounters.PATIENT",
                "encounters.REASONCODE",
                "encounters.STOP",
                "patients.BIRTHDATE",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            null_values: None,
            // numeric-looking identifiers and codes must compare as text
            column_types: [
                ("REASONCODE", DataType::Utf8),
                ("PATIENT", DataType::Utf8),
                ("Id", DataType::Utf8),
            ]
            .into_iter()
            .map(|(name, ty)| (name.to_string(), ty))
            .collect(),
        }
    }
}

impl Default for EncounterFilterConfig {
    fn default() -> Self {
        Self {
            dataset: "encounters".to_string(),
            reason_column: "REASONCODE".to_string(),
            reason_code: "55680006".to_string(),
            stop_column: "STOP".to_string(),
            stop_after: "1999-07-15 00:00:00".to_string(),
        }
    }
}

impl Default for PatientFilterConfig {
    fn default() -> Self {
        Self {
            dataset: "patients".to_string(),
            birth_column: "BIRTHDATE".to_string(),
            death_column: "DEATHDATE".to_string(),
            min_age: 18,
            max_age: 35,
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            CohortError::invalid_config(COH0302, "<json>", format!("invalid configuration: {e}"))
        })
    }

    /// Read a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let location = path.display().to_string();
        let json = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CohortError::source_unavailable_with(COH0103, &location, "configuration file not found")
            } else {
                CohortError::source_unavailable(&location, format!("failed to read configuration: {e}"))
            }
        })?;
        Self::from_json_str(&json).map_err(|e| match e {
            CohortError::InvalidPattern { code, message, .. } => CohortError::InvalidPattern {
                code,
                message: format!("{location}: {message}"),
                pattern: location.clone(),
            },
            other => other,
        })
    }

    /// Override the base location
    pub fn with_base_location(mut self, base_location: impl Into<String>) -> Self {
        self.base_location = base_location.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check everything that can be checked without data
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(CohortError::invalid_config(COH0302, "datasets", "no datasets configured"));
        }
        if self.timeout_secs == 0 {
            return Err(CohortError::invalid_config(
                COH0302,
                "timeout_secs",
                "timeout must be at least one second",
            ));
        }
        for dataset in [&self.encounters.dataset, &self.patients.dataset] {
            if !self.datasets.contains(dataset) {
                return Err(CohortError::invalid_config(
                    COH0302,
                    dataset.as_str(),
                    format!("filtered dataset '{dataset}' is not in the dataset list"),
                ));
            }
        }
        self.read_options()?;
        self.encounter_predicate()?;
        self.patient_predicate()?;
        self.join_spec()?;
        Ok(())
    }

    /// Reader options derived from patterns, null tokens and declared types
    pub fn read_options(&self) -> Result<ReadOptions> {
        let mut options = ReadOptions::default().with_patterns(
            TemporalPattern::compile(&self.timestamp_pattern)?,
            TemporalPattern::compile(&self.date_pattern)?,
        );
        if let Some(null_values) = &self.null_values {
            options = options.with_null_values(null_values.iter().cloned());
        }
        for (column, data_type) in &self.column_types {
            options = options.with_column_type(column.as_str(), *data_type);
        }
        Ok(options)
    }

    /// `reason == code AND parse(stop) > cutoff`
    pub fn encounter_predicate(&self) -> Result<Predicate> {
        let filter = &self.encounters;
        let cutoff = TimeBound::literal(&filter.stop_after, &self.timestamp_pattern)?;
        Ok(Predicate::eq(filter.reason_column.as_str(), filter.reason_code.as_str()).and(
            Predicate::temporal(
                filter.stop_column.as_str(),
                &self.timestamp_pattern,
                CompareOp::Gt,
                cutoff,
            )?,
        ))
    }

    /// `birth is not null AND parse(death) < now AND age(birth) in [min, max]`
    pub fn patient_predicate(&self) -> Result<Predicate> {
        let filter = &self.patients;
        Ok(Predicate::is_not_null(filter.birth_column.as_str())
            .and(Predicate::temporal(
                filter.death_column.as_str(),
                &self.timestamp_pattern,
                CompareOp::Lt,
                TimeBound::Now,
            )?)
            .and(Predicate::age_range(
                filter.birth_column.as_str(),
                &self.date_pattern,
                filter.min_age,
                filter.max_age,
            )?))
    }

    pub fn join_spec(&self) -> Result<JoinSpec> {
        let projection = self
            .projection
            .iter()
            .map(|s| QualifiedColumn::parse(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(JoinSpec::inner(
            QualifiedColumn::parse(&self.join_left)?,
            QualifiedColumn::parse(&self.join_right)?,
        )
        .project(projection))
    }
}
