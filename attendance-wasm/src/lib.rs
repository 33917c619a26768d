//! Bridge WASM <-> JavaScript cho dashboard chuyên cần, trung lập framework.

use attendance_core::{empty_snapshot, AttendanceError, DashboardConfig, PatientOrder, PatientStat};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
struct JsDashboardConfig {
    #[serde(default)]
    status_keywords: Option<Vec<String>>,
    #[serde(default)]
    status_fallback_index: Option<usize>,
    #[serde(default)]
    disable_status_fallback: Option<bool>,
}

impl From<JsDashboardConfig> for DashboardConfig {
    fn from(cfg: JsDashboardConfig) -> Self {
        let mut base = DashboardConfig::default();
        if let Some(keywords) = cfg.status_keywords {
            base.status_keywords = keywords;
        }
        if let Some(index) = cfg.status_fallback_index {
            base.status_fallback_index = Some(index);
        }
        if cfg.disable_status_fallback == Some(true) {
            base.status_fallback_index = None;
        }
        base
    }
}

/// Tổng hợp dashboard từ bảng đã giải mã (`[[ô, ...], ...]`, dòng đầu là header).
#[wasm_bindgen]
pub fn summarize_sheet(rows: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let grid_value = from_value::<serde_json::Value>(rows)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được bảng tính: {err}")))?;
    let cfg = read_config(config)?;

    let snapshot = attendance_sheet::summarize_grid_value(&grid_value, &cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

/// Tổng hợp dashboard từ nội dung CSV phân tách bằng dấu chấm phẩy.
#[wasm_bindgen]
pub fn summarize_csv(csv_text: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = read_config(config)?;

    let snapshot = attendance_sheet::summarize_csv_str(csv_text, &cfg)
        .map_err(|err| JsValue::from_str(&format_dashboard_error(err)))?;

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

/// Snapshot rỗng để giao diện quay về trạng thái ban đầu.
#[wasm_bindgen]
pub fn empty_dashboard() -> Result<JsValue, JsValue> {
    to_value(&empty_snapshot())
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

/// Sắp xếp danh sách bệnh nhân theo tiêu chí bảng hiển thị chọn.
#[wasm_bindgen]
pub fn sort_patients(patients: JsValue, order: JsValue) -> Result<JsValue, JsValue> {
    let mut patients: Vec<PatientStat> = from_value(patients).map_err(|err| {
        JsValue::from_str(&format!("Không đọc được danh sách bệnh nhân: {err}"))
    })?;
    let order: PatientOrder = from_value(order)
        .map_err(|err| JsValue::from_str(&format!("Tiêu chí sắp xếp không hợp lệ: {err}")))?;

    attendance_sheet::sort_patients(&mut patients, order);

    to_value(&patients)
        .map_err(|err| JsValue::from_str(&format!("Không serialize danh sách: {err}")))
}

fn read_config(config: Option<JsValue>) -> Result<DashboardConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsDashboardConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(DashboardConfig::from(cfg))
        }
        _ => Ok(DashboardConfig::default()),
    }
}

fn format_dashboard_error(err: AttendanceError) -> String {
    format!("Dashboard error: {err}")
}
