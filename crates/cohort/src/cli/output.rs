//! Output formatting utilities

use anyhow::{Context, Result};
use cohort_types::{Table, Value};
use colored::Colorize;
use serde_json::json;
use std::fs::File;
use std::io::{IsTerminal, Write};
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            "csv" => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {:#}", "Error:".red().bold(), error)
}

/// Format a warning for display
pub fn format_warning(warning: &str) -> String {
    format!("{} {}", "Warning:".yellow().bold(), warning)
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {}", "Success:".green().bold(), message)
}

/// Write output to a file or stdout
pub fn write_output(content: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to output file: {}", path.display()))?;
        eprintln!(
            "{}",
            format_success(&format!("Output written to {}", path.display()))
        );
    } else {
        println!("{}", content);
    }
    Ok(())
}

/// Render a table in the requested format
pub fn render_table(table: &Table, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_as_table(table)),
        OutputFormat::Json => format_as_json(table),
        OutputFormat::Csv => format_as_csv(table),
    }
}

fn format_as_table(table: &Table) -> String {
    if table.num_columns() == 0 {
        return "(empty table)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(table.column_names().map(str::to_string));
    for row in table.rows() {
        builder.push_record(row.iter().map(Value::to_string));
    }
    builder.build().with(Style::modern()).to_string()
}

/// `{"columns": [...], "rows": [[...], ...]}`
fn format_as_json(table: &Table) -> Result<String> {
    let rows: Vec<Vec<serde_json::Value>> = table
        .rows()
        .map(|row| row.iter().map(Value::to_json).collect())
        .collect();
    let value = json!({
        "columns": table.column_names().collect::<Vec<_>>(),
        "rows": rows,
    });
    serde_json::to_string_pretty(&value).context("Failed to serialize JSON")
}

/// Nulls are written as empty fields
fn format_as_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(table.column_names())
        .context("Failed to write CSV header")?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|v| if v.is_null() { String::new() } else { v.to_string() }))
            .context("Failed to write CSV row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Render column names, types and null counts
pub fn format_schema(table: &Table) -> String {
    let mut builder = Builder::default();
    builder.push_record(["column", "type", "nulls"]);
    for column in table.columns() {
        builder.push_record([
            column.name().to_string(),
            column.data_type().to_string(),
            column.null_count().to_string(),
        ]);
    }
    builder.build().with(Style::modern()).to_string()
}
