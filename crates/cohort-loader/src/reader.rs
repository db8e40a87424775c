//! CSV ingestion
//!
//! Parses comma separated bytes with a mandatory header row into a typed
//! columnar `Table`. Records must all have as many fields as the header.
//!
//! Column types come from `ReadOptions::column_types` when declared and are
//! inferred otherwise:
//!
//! | non-null values           | inferred type |
//! |---------------------------|---------------|
//! | all parse as integers     | int64         |
//! | all parse as floats       | float64       |
//! | anything else, or none    | utf8          |

use cohort_diagnostics::{COH0200, COH0202, COH0203, COH0204, CohortError, Result};
use cohort_types::{Column, ColumnData, DataType, Table, TemporalPattern};
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Cell contents read as null unless configured otherwise
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Options for `read_csv`
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Cell contents that read as null
    pub null_values: HashSet<String>,
    /// Declared column types, overriding inference
    pub column_types: IndexMap<String, DataType>,
    /// Pattern for declared `timestamp` columns
    pub timestamp_pattern: TemporalPattern,
    /// Pattern for declared `date` columns
    pub date_pattern: TemporalPattern,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
            column_types: IndexMap::new(),
            timestamp_pattern: TemporalPattern::timestamp(),
            date_pattern: TemporalPattern::date(),
        }
    }
}

impl ReadOptions {
    /// Declare the type of a column
    pub fn with_column_type(mut self, column: impl Into<String>, data_type: DataType) -> Self {
        self.column_types.insert(column.into(), data_type);
        self
    }

    /// Replace the null tokens; the empty string always stays null
    pub fn with_null_values<S: Into<String>>(mut self, values: impl IntoIterator<Item = S>) -> Self {
        self.null_values = values.into_iter().map(Into::into).collect();
        self.null_values.insert(String::new());
        self
    }

    pub fn with_patterns(mut self, timestamp: TemporalPattern, date: TemporalPattern) -> Self {
        self.timestamp_pattern = timestamp;
        self.date_pattern = date;
        self
    }

    fn is_null(&self, cell: &str) -> bool {
        self.null_values.contains(cell)
    }
}

/// Raw text of one column
struct RawColumn {
    name: String,
    cells: Vec<Option<String>>,
}

/// Parse CSV bytes into a table
pub fn read_csv(bytes: &[u8], options: &ReadOptions) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers().map_err(map_csv_error)?.clone();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(CohortError::malformed(COH0203, "missing header row"));
    }

    let mut seen = HashSet::with_capacity(headers.len());
    let mut columns: Vec<RawColumn> = Vec::with_capacity(headers.len());
    for name in &headers {
        if !seen.insert(name) {
            return Err(CohortError::MalformedInput {
                code: COH0200,
                message: format!("duplicate column '{name}' in header"),
                dataset: None,
                line: Some(1),
            });
        }
        columns.push(RawColumn {
            name: name.to_string(),
            cells: Vec::new(),
        });
    }

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(map_csv_error)?;
        lines.push(record.position().map_or(0, csv::Position::line));
        for (column, cell) in columns.iter_mut().zip(record.iter()) {
            let cell = (!options.is_null(cell)).then(|| cell.to_string());
            column.cells.push(cell);
        }
    }

    let columns = columns
        .into_iter()
        .map(|raw| match options.column_types.get(&raw.name) {
            Some(&declared) => convert(raw, declared, options, &lines),
            None => Ok(infer(raw)),
        })
        .collect::<Result<Vec<_>>>()?;

    let table = Table::try_new(columns)?;
    debug!(
        "parsed {} rows, schema {}",
        table.num_rows(),
        table.schema()
    );
    Ok(table)
}

fn map_csv_error(err: csv::Error) -> CohortError {
    match err.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => CohortError::inconsistent_columns(
            *expected_len as usize,
            *len as usize,
            pos.as_ref().map(csv::Position::line),
        ),
        csv::ErrorKind::Utf8 { pos, err } => CohortError::MalformedInput {
            code: COH0202,
            message: format!("invalid UTF-8 in field {}", err.field() + 1),
            dataset: None,
            line: pos.as_ref().map(csv::Position::line),
        },
        _ => CohortError::malformed(COH0200, err.to_string()),
    }
}

/// Pick the narrowest type that fits every non-null cell
fn infer(raw: RawColumn) -> Column {
    let values = || raw.cells.iter().flatten();
    let has_values = values().next().is_some();

    if has_values && values().all(|s| s.parse::<i64>().is_ok()) {
        let data = raw.cells.iter().map(|c| c.as_deref().and_then(|s| s.parse().ok())).collect();
        return Column::new(raw.name, ColumnData::Int64(data));
    }
    if has_values && values().all(|s| parse_float(s).is_some()) {
        let data = raw.cells.iter().map(|c| c.as_deref().and_then(parse_float)).collect();
        return Column::new(raw.name, ColumnData::Float64(data));
    }
    Column::new(raw.name, ColumnData::Utf8(raw.cells))
}

/// Floats must contain a digit, so `inf` and friends stay text
fn parse_float(s: &str) -> Option<f64> {
    if !s.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Convert a column to its declared type
///
/// Numeric and boolean cells that do not parse are an error. Dates and
/// timestamps that do not match their pattern become null.
fn convert(raw: RawColumn, declared: DataType, options: &ReadOptions, lines: &[u64]) -> Result<Column> {
    let RawColumn { name, cells } = raw;

    fn strict<T>(
        name: &str,
        cells: &[Option<String>],
        lines: &[u64],
        data_type: DataType,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Vec<Option<T>>> {
        cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(s) => parse(s).map(Some).ok_or_else(|| CohortError::MalformedInput {
                    code: COH0204,
                    message: format!("value '{s}' in column '{name}' is not a valid {data_type}"),
                    dataset: None,
                    line: lines.get(row).copied(),
                }),
            })
            .collect()
    }

    let data = match declared {
        DataType::Utf8 => ColumnData::Utf8(cells),
        DataType::Int64 => ColumnData::Int64(strict(&name, &cells, lines, declared, |s| s.parse().ok())?),
        DataType::Float64 => ColumnData::Float64(strict(&name, &cells, lines, declared, parse_float)?),
        DataType::Boolean => ColumnData::Boolean(strict(&name, &cells, lines, declared, parse_bool)?),
        DataType::Date => ColumnData::Date(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(|s| options.date_pattern.parse_date(s)))
                .collect(),
        ),
        DataType::Timestamp => ColumnData::Timestamp(
            cells
                .iter()
                .map(|c| c.as_deref().and_then(|s| options.timestamp_pattern.parse_timestamp(s)))
                .collect(),
        ),
    };
    Ok(Column::new(name, data))
}
