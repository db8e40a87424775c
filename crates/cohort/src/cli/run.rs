//! Run command implementation

use super::output;
use crate::config::PipelineConfig;
use crate::pipeline::Pipeline;
use crate::session::SessionBuilder;
use anyhow::{Context, Result};
use cohort_diagnostics::CohortError;
use cohort_types::TemporalPattern;
use std::path::{Path, PathBuf};

/// Configuration for run command
pub struct RunConfig {
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub now: Option<String>,
    pub limit: Option<usize>,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Run the full cohort pipeline
pub async fn run(config: RunConfig) -> Result<()> {
    let pipeline_config = load_config(config.config.as_deref(), config.base_url.as_deref())?;
    let pipeline = Pipeline::from_config(&pipeline_config).map_err(describe)?;

    let mut builder = SessionBuilder::new().config(pipeline_config.clone());
    if let Some(now) = &config.now {
        let now = TemporalPattern::compile(&pipeline_config.timestamp_pattern)
            .and_then(|pattern| pattern.parse_literal(now))
            .map_err(describe)
            .context("Invalid --now value")?;
        builder = builder.now(now);
    }
    let mut session = builder.build().map_err(describe)?;

    let cancel = session.cancel_handle();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let result = pipeline.run(&mut session).await;
    ctrl_c.abort();
    let run_output = result.map_err(describe)?;

    if config.verbose {
        for (name, rows) in &run_output.counts.loaded {
            eprintln!("loaded {name}: {rows} rows");
        }
        for (name, rows) in &run_output.counts.filtered {
            eprintln!("filtered {name}: {rows} rows");
        }
        eprintln!("joined: {} rows (now = {})", run_output.counts.joined, run_output.now);
    }

    let table = match config.limit {
        Some(limit) => run_output.table.head(limit),
        None => run_output.table,
    };
    if table.is_empty() {
        eprintln!("{}", output::format_warning("the cohort is empty"));
    }

    let format = output::OutputFormat::parse(config.output_format.as_deref().unwrap_or("table"));
    let rendered = output::render_table(&table, format)?;
    output::write_output(&rendered, config.output_file.as_deref())?;

    session.stop();
    Ok(())
}

/// Read the configuration file, or use the defaults, and apply overrides
pub fn load_config(path: Option<&Path>, base_url: Option<&str>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_json_file(path)
            .map_err(describe)
            .with_context(|| format!("Failed to load configuration: {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(base_url) = base_url {
        config = config.with_base_location(base_url);
    }
    Ok(config)
}

/// Keep the location details of a pipeline error in the message
pub fn describe(error: CohortError) -> anyhow::Error {
    anyhow::anyhow!(error.detail())
}
