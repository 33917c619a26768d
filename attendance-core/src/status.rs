//! Phân loại trạng thái lịch hẹn từ văn bản tự do.

use serde::{Deserialize, Serialize};

pub const ATTENDED_LABEL: &str = "Atendido";
pub const ABSENT_LABEL: &str = "Falta";
pub const CANCELLED_LABEL: &str = "Cancelado";
pub const THERAPIST_CANCELLED_LABEL: &str = "Terapeuta desmarcou";

/// Nhãn thống kê cho trạng thái bỏ trống.
pub const UNDEFINED_STATUS_LABEL: &str = "Não definido";

const TRACKED_KEYWORDS: [&str; 4] = ["atendido", "cancelado", "terapeuta desmarcou", "desmarcado"];

/// Nhóm ngữ nghĩa của một trạng thái.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusCategory {
    Attended,
    Absent,
    Cancelled,
    TherapistCancelled,
    Unclassified,
}

impl StatusCategory {
    /// So khớp chuỗi con không phân biệt hoa thường; quy tắc đầu tiên khớp sẽ thắng.
    pub fn classify(status: &str) -> Self {
        let normalized = status.trim().to_lowercase();
        if normalized.contains("atendido") {
            Self::Attended
        } else if normalized.contains("falta") {
            Self::Absent
        } else if normalized.contains("cancelado") {
            Self::Cancelled
        } else if normalized.contains("terapeuta desmarcou") || normalized.contains("desmarcado")
        {
            Self::TherapistCancelled
        } else {
            Self::Unclassified
        }
    }
}

/// Trạng thái được tính vào tổng số lịch của bệnh nhân.
///
/// Kiểm tra độc lập với thứ tự ưu tiên của [`StatusCategory::classify`]:
/// "Falta cancelado" là vắng mặt nhưng vẫn được tính.
pub fn is_tracked_status(status: &str) -> bool {
    let normalized = status.trim().to_lowercase();
    TRACKED_KEYWORDS
        .iter()
        .any(|keyword| normalized.contains(keyword))
}

/// Khóa thống kê: văn bản gốc đã trim, hoặc "Não definido" nếu rỗng.
pub fn tally_label(status: &str) -> String {
    let trimmed = status.trim();
    if trimmed.is_empty() {
        UNDEFINED_STATUS_LABEL.to_string()
    } else {
        trimmed.to_string()
    }
}
