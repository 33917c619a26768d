//! Raw grid to keyed records, with heuristic status-column discovery.

use attendance_core::{AttendanceError, DashboardConfig, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Records of one sheet plus the header that was picked as status column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedSheet {
    pub headers: Vec<String>,
    pub status_column: String,
    pub records: Vec<Record>,
}

/// Locate the status column by keyword, then by the configured position.
///
/// The positional fallback only applies when the header row is strictly
/// longer than the fallback index.
pub fn find_status_column<S: AsRef<str>>(
    headers: &[S],
    config: &DashboardConfig,
) -> Option<usize> {
    let keywords: Vec<String> = config
        .status_keywords
        .iter()
        .map(|keyword| keyword.to_lowercase())
        .collect();

    let by_keyword = headers.iter().position(|header| {
        let header = header.as_ref().trim().to_lowercase();
        keywords.iter().any(|keyword| header.contains(keyword.as_str()))
    });
    if by_keyword.is_some() {
        return by_keyword;
    }

    let fallback = config
        .status_fallback_index
        .filter(|&index| headers.len() > index);
    if let Some(index) = fallback {
        let header: &str = headers[index].as_ref();
        tracing::warn!(
            index,
            header,
            "No status-like header found, using positional fallback column"
        );
    }
    fallback
}

/// Zip every data row with the header row and drop rows without a status.
pub fn normalize_grid<R, S>(
    grid: &[R],
    config: &DashboardConfig,
) -> Result<NormalizedSheet, AttendanceError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let Some((header_row, data_rows)) = grid.split_first() else {
        return Err(AttendanceError::EmptyInput);
    };

    let headers: Vec<String> = header_row
        .as_ref()
        .iter()
        .map(|header| header.as_ref().to_string())
        .collect();

    let status_index =
        find_status_column(&headers, config).ok_or(AttendanceError::MissingStatusColumn)?;

    if data_rows.is_empty() {
        return Err(AttendanceError::EmptyInput);
    }

    let status_column = headers[status_index].clone();
    tracing::debug!(
        status_column = %status_column,
        index = status_index,
        "Status column resolved"
    );

    let records: Vec<Record> = data_rows
        .iter()
        .map(|row| build_record(&headers, row.as_ref()))
        .filter(|record| has_status(record, &status_column))
        .collect();

    let dropped = data_rows.len() - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, "Dropped rows without a status value");
    }

    if records.is_empty() {
        return Err(AttendanceError::EmptyInput);
    }

    Ok(NormalizedSheet {
        headers,
        status_column,
        records,
    })
}

/// Parse semicolon CSV text and normalize it.
pub fn normalize_csv(
    text: &str,
    config: &DashboardConfig,
) -> Result<NormalizedSheet, AttendanceError> {
    let grid = crate::csv::parse_csv(text);
    normalize_grid(&grid, config)
}

/// Turn a decoded sheet (`[[cell, ...], ...]`) into a string grid.
///
/// Cells may be strings, numbers, booleans or null, as emitted by
/// spreadsheet decoders that keep typed values.
pub fn grid_from_value(value: &Value) -> Result<Vec<Vec<String>>, AttendanceError> {
    let rows = value.as_array().ok_or_else(|| {
        AttendanceError::MalformedFile("esperada uma lista de linhas".to_string())
    })?;

    rows.iter()
        .enumerate()
        .map(|(line, row)| match row {
            Value::Array(cells) => Ok(cells.iter().map(cell_text).collect()),
            Value::Null => Ok(Vec::new()),
            _ => Err(AttendanceError::MalformedFile(format!(
                "a linha {} não é uma lista de células",
                line + 1
            ))),
        })
        .collect()
}

fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => match number.as_f64() {
            Some(float) if number.is_f64() && float.fract() == 0.0 => {
                format!("{float:.0}")
            }
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}

fn build_record<S: AsRef<str>>(headers: &[String], row: &[S]) -> Record {
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let value = row
                .get(index)
                .map(|cell| cell.as_ref().trim().to_string())
                .unwrap_or_default();
            (header.clone(), value)
        })
        .collect()
}

fn has_status(record: &Record, status_column: &str) -> bool {
    match record.get(status_column) {
        Some(value) => !value.is_empty() && value != "\"\"",
        None => false,
    }
}
