//! Show command implementation

use super::output;
use super::run::{describe, load_config};
use crate::session::SessionBuilder;
use anyhow::Result;
use std::path::PathBuf;

/// Configuration for show command
pub struct ShowConfig {
    pub dataset: String,
    pub config: Option<PathBuf>,
    pub base_url: Option<String>,
    pub limit: usize,
    pub verbose: bool,
    pub output_format: Option<String>,
    pub output_file: Option<PathBuf>,
}

/// Load one dataset and print its schema and first rows
pub async fn show(config: ShowConfig) -> Result<()> {
    let pipeline_config = load_config(config.config.as_deref(), config.base_url.as_deref())?;
    let session = SessionBuilder::new()
        .config(pipeline_config)
        .build()
        .map_err(describe)?;

    if config.verbose {
        eprintln!("Loading {}", session.loader().source().location(&config.dataset));
    }
    let table = session.loader().load(&config.dataset).await.map_err(describe)?;
    let head = table.head(config.limit);

    let format = output::OutputFormat::parse(config.output_format.as_deref().unwrap_or("table"));
    let rendered = match format {
        output::OutputFormat::Table => format!(
            "{} ({} rows)\n{}\n{}",
            config.dataset,
            table.num_rows(),
            output::format_schema(&table),
            output::render_table(&head, format)?
        ),
        _ => output::render_table(&head, format)?,
    };
    output::write_output(&rendered, config.output_file.as_deref())?;

    session.stop();
    Ok(())
}
