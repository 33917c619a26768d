//! Spreadsheet rows to `DashboardSnapshot` aggregation for the attendance dashboard.

use attendance_core::{AttendanceError, DashboardConfig, DashboardSnapshot};
use chrono::Utc;
use serde_json::Value;

pub mod aggregate;
pub mod charts;
pub mod csv;
pub mod normalize;

pub use aggregate::{
    analyze_status, calculate_dashboard_stats, calculate_patient_stats, sort_patients,
};
pub use charts::{daily_attendance, daily_status_breakdown, status_overview};
pub use csv::parse_csv;
pub use normalize::{
    find_status_column, grid_from_value, normalize_csv, normalize_grid, NormalizedSheet,
};

/// Summarize a decoded grid (first row = headers).
pub fn summarize_grid<R, S>(
    grid: &[R],
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, AttendanceError>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let sheet = normalize_grid(grid, config)?;
    Ok(summarize_sheet(sheet))
}

/// Summarize semicolon-delimited CSV text.
pub fn summarize_csv_str(
    csv_text: &str,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, AttendanceError> {
    let sheet = normalize_csv(csv_text, config)?;
    Ok(summarize_sheet(sheet))
}

/// Summarize raw CSV bytes, which must be UTF-8.
pub fn summarize_csv_bytes(
    bytes: &[u8],
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, AttendanceError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| AttendanceError::MalformedFile(format!("texto não é UTF-8: {err}")))?;
    summarize_csv_str(text, config)
}

/// Summarize a decoded sheet given as a JSON string (`[[cell, ...], ...]`).
pub fn summarize_grid_json_str(
    grid_json: &str,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, AttendanceError> {
    let value: Value = serde_json::from_str(grid_json)
        .map_err(|err| AttendanceError::MalformedFile(err.to_string()))?;
    summarize_grid_value(&value, config)
}

/// Summarize a decoded sheet given as a `serde_json::Value`.
pub fn summarize_grid_value(
    grid: &Value,
    config: &DashboardConfig,
) -> Result<DashboardSnapshot, AttendanceError> {
    let grid = grid_from_value(grid)?;
    summarize_grid(&grid, config)
}

/// Run every aggregation over an already normalized sheet.
pub fn summarize_sheet(sheet: NormalizedSheet) -> DashboardSnapshot {
    let NormalizedSheet {
        status_column,
        records,
        ..
    } = sheet;

    let status_tally = analyze_status(&records, &status_column);
    let patients = calculate_patient_stats(&records);
    let stats = calculate_dashboard_stats(&records, &status_tally, &patients);
    let overview = status_overview(&status_tally);
    let daily_attendance = daily_attendance(&records);
    let daily_breakdown = daily_status_breakdown(&records);

    tracing::info!(
        records = records.len(),
        patients = patients.len(),
        days = daily_attendance.len(),
        "Dashboard summarized"
    );

    DashboardSnapshot {
        generated_at: Utc::now(),
        status_column,
        records,
        status_tally,
        patients,
        stats,
        overview,
        daily_attendance,
        daily_breakdown,
    }
}
