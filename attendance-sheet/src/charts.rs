//! Day-keyed series and status overview for the chart widgets.

use std::collections::BTreeMap;

use attendance_core::{
    parse_day_key, DailyAttendance, DailyStatusBreakdown, DayKey, Record, StatusOverview,
    StatusTally, ABSENT_LABEL, ATTENDED_LABEL, CANCELLED_LABEL, THERAPIST_CANCELLED_LABEL,
};

const STATUS_COLUMNS: [&str; 3] = ["Status", "status", "STATUS"];
const SCHEDULED_COLUMNS: [&str; 2] = ["Início previsto", "Fim previsto"];
const SCHEDULED_START_COLUMN: &str = "Início previsto";
const ACTUAL_START_COLUMN: &str = "Início real";

/// Attended sessions per scheduled day, oldest first.
///
/// Every day with a parseable scheduled date shows up, even with zero
/// sessions attended. Only the exact status `Atendido` is counted.
pub fn daily_attendance(records: &[Record]) -> Vec<DailyAttendance> {
    let mut days: BTreeMap<DayKey, usize> = BTreeMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(date) = record.first_non_empty(&SCHEDULED_COLUMNS) else {
            continue;
        };
        let Some(day) = parse_day_key(date) else {
            skipped += 1;
            continue;
        };

        let count = days.entry(day).or_insert(0);
        if record.first_non_empty(&STATUS_COLUMNS) == Some(ATTENDED_LABEL) {
            *count += 1;
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, "Skipped rows with unparseable scheduled dates");
    }

    days.into_iter()
        .map(|(day, attended)| DailyAttendance { day, attended })
        .collect()
}

/// Per-day counts for the four tracked statuses, oldest first.
///
/// Attended sessions are placed on their actual start date, every other
/// status on the scheduled start date.
pub fn daily_status_breakdown(records: &[Record]) -> Vec<DailyStatusBreakdown> {
    let mut days: BTreeMap<DayKey, DailyStatusBreakdown> = BTreeMap::new();

    for record in records {
        let Some(status) = record.first_non_empty(&STATUS_COLUMNS) else {
            continue;
        };
        let normalized = status.trim().to_lowercase();

        let date_column = match normalized.as_str() {
            "atendido" => ACTUAL_START_COLUMN,
            "falta" | "cancelado" | "terapeuta desmarcou" | "desmarcado" => SCHEDULED_START_COLUMN,
            _ => continue,
        };

        let Some(day) = record
            .first_non_empty(&[date_column])
            .and_then(parse_day_key)
        else {
            continue;
        };

        let entry = days
            .entry(day)
            .or_insert_with(|| DailyStatusBreakdown::new(day));
        match normalized.as_str() {
            "atendido" => entry.attended += 1,
            "falta" => entry.absent += 1,
            "cancelado" => entry.cancelled += 1,
            _ => entry.therapist_cancelled += 1,
        }
    }

    days.into_values().collect()
}

/// Headline counts for the status cards, read from exact tally labels.
pub fn status_overview(tally: &StatusTally) -> StatusOverview {
    StatusOverview {
        total: tally.total(),
        attended: tally.count(ATTENDED_LABEL),
        absent: tally.count(ABSENT_LABEL),
        cancelled: tally.count(CANCELLED_LABEL),
        therapist_cancelled: tally.count(THERAPIST_CANCELLED_LABEL),
    }
}
