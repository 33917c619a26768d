//! Đọc ngày hẹn từ nhiều định dạng văn bản khác nhau.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const GENERIC_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const GENERIC_DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%B %d, %Y", "%b %d, %Y"];

/// Khóa ngày dương lịch, không gắn múi giờ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DayKey {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl DayKey {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.day(), date.month(), date.year())
    }
}

impl Ord for DayKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for DayKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// Khóa ngày của chuỗi, `None` nếu không đọc được (bỏ qua bản ghi, không phải lỗi).
pub fn parse_day_key(value: &str) -> Option<DayKey> {
    parse_calendar_date(value).map(DayKey::from)
}

/// Nhận `DD/MM/YYYY[ HH:MM]`, `YYYY-MM-DD[ HH:MM]` và một số dạng chung khác.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('/') {
        let date_part = first_token(value);
        let parts: Vec<&str> = date_part.split('/').collect();
        if parts.len() == 3 {
            return parse_day_month_year(parts[0], parts[1], parts[2]);
        }
        return parse_generic(value);
    }

    if value.contains('-') {
        return NaiveDate::parse_from_str(first_token(value), "%Y-%m-%d")
            .ok()
            .or_else(|| parse_generic(value));
    }

    parse_generic(value)
}

/// Ngày dạng `DD/MM/YYYY` để hiển thị; `N/A` khi rỗng, giữ nguyên chuỗi khi không đọc được.
pub fn format_display_date(value: &str) -> String {
    if value.trim().is_empty() {
        return "N/A".to_string();
    }

    match parse_calendar_date(value) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => value.to_string(),
    }
}

fn first_token(value: &str) -> &str {
    value.split(' ').next().unwrap_or(value)
}

fn parse_day_month_year(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    let day = day.trim().parse::<u32>().ok()?;
    let month = month.trim().parse::<u32>().ok()?;
    // Năm phải đủ 4 chữ số; "05/03/24" bị coi là không đọc được.
    let year = year.trim();
    if year.len() < 4 {
        return None;
    }
    let year = year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_generic(value: &str) -> Option<NaiveDate> {
    // Mốc thời gian có offset được quy về UTC trước khi lấy ngày.
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        })
}
