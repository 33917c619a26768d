//! Mô hình dữ liệu lõi cho dashboard chuyên cần trị liệu.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod date;
pub mod status;

pub use date::{format_display_date, parse_calendar_date, parse_day_key, DayKey};
pub use status::{
    is_tracked_status, tally_label, StatusCategory, ABSENT_LABEL, ATTENDED_LABEL,
    CANCELLED_LABEL, THERAPIST_CANCELLED_LABEL, UNDEFINED_STATUS_LABEL,
};

/// Vị trí cột trạng thái dùng khi không header nào khớp từ khóa.
///
/// Mẫu bảng lịch hẹn xuất từ hệ thống đặt lịch đặt cột trạng thái ở vị trí 11.
pub const DEFAULT_STATUS_FALLBACK_INDEX: usize = 10;

/// Từ khóa mặc định để nhận diện cột trạng thái trong header.
pub const DEFAULT_STATUS_KEYWORDS: [&str; 7] = [
    "status",
    "situação",
    "situacao",
    "estado",
    "state",
    "condição",
    "condicao",
];

/// Cấu hình nhận diện cột khi chuẩn hóa bảng tính.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Từ khóa (so khớp chuỗi con, không phân biệt hoa thường) cho header cột trạng thái.
    pub status_keywords: Vec<String>,
    /// Cột dự phòng khi không header nào khớp; `None` để tắt hẳn.
    pub status_fallback_index: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            status_keywords: DEFAULT_STATUS_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            status_fallback_index: Some(DEFAULT_STATUS_FALLBACK_INDEX),
        }
    }
}

/// Một dòng bảng tính đã chuẩn hóa: header -> giá trị đã trim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, String>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Giá trị của cột, hoặc `default` nếu cột không tồn tại.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Giá trị khác rỗng đầu tiên theo thứ tự các cột cho trước.
    ///
    /// Cột có mặt nhưng rỗng được coi như không có.
    pub fn first_non_empty(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.get(key))
            .find(|value| !value.is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl FromIterator<(String, String)> for Record {
    /// Header lặp lại giữ giá trị cuối cùng.
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Số lần xuất hiện của từng trạng thái (văn bản gốc đã trim).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StatusTally {
    counts: BTreeMap<String, usize>,
}

impl StatusTally {
    pub fn increment(&mut self, label: impl Into<String>) {
        *self.counts.entry(label.into()).or_insert(0) += 1;
    }

    /// Số lần của nhãn; 0 nếu chưa từng gặp.
    pub fn count(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
    }
}

/// Thống kê tích lũy cho một bệnh nhân.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientStat {
    pub name: String,
    /// Chỉ đếm các lịch có trạng thái được theo dõi (xem [`is_tracked_status`]).
    pub total_appointments: usize,
    pub attendances: usize,
    pub absences: usize,
    pub cancellations: usize,
    pub atendido_count: usize,
    pub cancelado_count: usize,
    pub desmarcado_count: usize,
    /// Ngày hẹn khác rỗng gặp sau cùng theo thứ tự dòng, không phải ngày lớn nhất.
    pub last_appointment: String,
    pub statuses: Vec<String>,
    pub has_at_least_one_attended: bool,
}

impl PatientStat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            total_appointments: 0,
            attendances: 0,
            absences: 0,
            cancellations: 0,
            atendido_count: 0,
            cancelado_count: 0,
            desmarcado_count: 0,
            last_appointment: String::new(),
            statuses: Vec::new(),
            has_at_least_one_attended: false,
        }
    }

    /// Tỉ lệ có mặt (%) = atendido / (atendido + vắng); hủy lịch không tính vào mẫu số.
    pub fn attendance_rate(&self) -> f64 {
        percentage(self.atendido_count, self.atendido_count + self.absences)
    }

    pub fn has_perfect_attendance(&self) -> bool {
        self.total_appointments > 0 && self.absences == 0
    }

    /// Bệnh nhân đủ điều kiện hiển thị trong thống kê cuối.
    pub fn is_qualifying(&self) -> bool {
        self.has_at_least_one_attended
            && self
                .statuses
                .iter()
                .any(|status| is_tracked_status(status))
    }
}

/// Tiêu chí sắp xếp danh sách bệnh nhân cho lớp hiển thị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatientOrder {
    NameAsc,
    NameDesc,
    AttendanceRateAsc,
    AttendanceRateDesc,
    TotalAppointmentsDesc,
}

/// Các chỉ số tổng quan của dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_appointments: usize,
    pub total_absences: usize,
    pub overall_attendance_rate: f64,
    pub total_patients: usize,
    pub perfect_attendance: usize,
    pub attendance_rate: f64,
}

/// Số buổi "Atendido" trong một ngày.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyAttendance {
    pub day: DayKey,
    pub attended: usize,
}

/// Số lịch theo từng nhóm trạng thái trong một ngày (biểu đồ cột chồng).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyStatusBreakdown {
    pub day: DayKey,
    pub attended: usize,
    pub absent: usize,
    pub cancelled: usize,
    pub therapist_cancelled: usize,
}

impl DailyStatusBreakdown {
    pub fn new(day: DayKey) -> Self {
        Self {
            day,
            attended: 0,
            absent: 0,
            cancelled: 0,
            therapist_cancelled: 0,
        }
    }

    pub fn total(&self) -> usize {
        self.attended + self.absent + self.cancelled + self.therapist_cancelled
    }
}

/// Bốn con số chính của thẻ trạng thái và tỉ trọng của chúng.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusOverview {
    pub total: usize,
    pub attended: usize,
    pub absent: usize,
    pub cancelled: usize,
    pub therapist_cancelled: usize,
}

impl StatusOverview {
    pub fn attended_share(&self) -> f64 {
        percentage(self.attended, self.total)
    }

    pub fn absent_share(&self) -> f64 {
        percentage(self.absent, self.total)
    }

    pub fn cancelled_share(&self) -> f64 {
        percentage(self.cancelled, self.total)
    }

    pub fn therapist_cancelled_share(&self) -> f64 {
        percentage(self.therapist_cancelled, self.total)
    }
}

/// Kết quả tổng hợp cuối cùng giao cho lớp hiển thị.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub status_column: String,
    pub records: Vec<Record>,
    pub status_tally: StatusTally,
    pub patients: Vec<PatientStat>,
    pub stats: DashboardStats,
    pub overview: StatusOverview,
    pub daily_attendance: Vec<DailyAttendance>,
    pub daily_breakdown: Vec<DailyStatusBreakdown>,
}

/// Lỗi cấu trúc làm dừng toàn bộ lượt tổng hợp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceError {
    #[error("O arquivo está vazio ou não contém dados válidos.")]
    EmptyInput,
    #[error(
        "Não foi possível encontrar uma coluna de status. Certifique-se de que existe uma coluna com \"status\", \"situação\", \"estado\" ou similar."
    )]
    MissingStatusColumn,
    #[error("Erro ao processar o arquivo: {0}")]
    MalformedFile(String),
    #[error("Erro inesperado: {0}")]
    Other(String),
}

/// Tiện ích dựng snapshot rỗng (trạng thái dashboard sau khi reset).
pub fn empty_snapshot() -> DashboardSnapshot {
    DashboardSnapshot {
        generated_at: Utc::now(),
        status_column: String::new(),
        records: Vec::new(),
        status_tally: StatusTally::default(),
        patients: Vec::new(),
        stats: DashboardStats::default(),
        overview: StatusOverview::default(),
        daily_attendance: Vec::new(),
        daily_breakdown: Vec::new(),
    }
}

/// `part / whole * 100`, trả về 0 khi mẫu số bằng 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Định dạng phần trăm một chữ số thập phân, ví dụ `66.7%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value:.1}%")
}
