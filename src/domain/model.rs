use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 伺服器上的兩類資料集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    JsonData,
    Output,
}

impl DatasetKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            DatasetKind::JsonData => "jsondata",
            DatasetKind::Output => "output",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetFileInfo {
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    /// Unix timestamp in seconds, as reported by the server
    #[serde(default)]
    pub modified: f64,
}

impl DatasetFileInfo {
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let secs = self.modified.trunc() as i64;
        let nanos = (self.modified.fract() * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DatasetFileInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetContent {
    pub filename: String,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl DatasetContent {
    /// 單值檔案的格式為 {"value": x}
    pub fn single_value(&self) -> Option<&serde_json::Value> {
        if self.data.len() == 1 {
            self.data.get("value")
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    pub data: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddEntryRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub value: serde_json::Value,
}

/// 刪除請求：未提供的選擇器一律序列化為 null
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteEntryRequest {
    pub year: Option<String>,
    pub country: Option<String>,
}

impl DeleteEntryRequest {
    pub fn new(year: Option<&str>, country: Option<&str>) -> Self {
        Self {
            year: normalize_selector(year),
            country: normalize_selector(country),
        }
    }
}

/// Empty selectors are treated the same as missing ones.
pub fn normalize_selector(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExcelImportReport {
    pub status: String,
    pub message: String,
    #[serde(default)]
    pub added_years: Vec<String>,
    #[serde(default)]
    pub added_countries: Vec<String>,
    #[serde(default)]
    pub updated_cells: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl CalculationResponse {
    pub fn state(&self) -> CalculationState {
        CalculationState::from(self.status.as_str())
    }
}

/// 計算任務狀態，只用於顯示，客戶端不維護狀態機
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalculationState {
    Started,
    Running,
    Completed,
    Failed,
    Unknown,
    Other(String),
}

impl CalculationState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, CalculationState::Started | CalculationState::Running)
    }
}

impl From<&str> for CalculationState {
    fn from(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "started" => CalculationState::Started,
            "running" => CalculationState::Running,
            "completed" | "success" | "done" => CalculationState::Completed,
            "failed" | "error" => CalculationState::Failed,
            "unknown" | "" => CalculationState::Unknown,
            _ => CalculationState::Other(status.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delete_request_encodes_missing_selectors_as_null() {
        let body = serde_json::to_value(DeleteEntryRequest::new(Some("2020"), None)).unwrap();
        assert_eq!(body, json!({"year": "2020", "country": null}));

        let body = serde_json::to_value(DeleteEntryRequest::new(Some(""), Some("CN"))).unwrap();
        assert_eq!(body, json!({"year": null, "country": "CN"}));
    }

    #[test]
    fn test_add_request_omits_missing_selectors() {
        let req = AddEntryRequest {
            year: None,
            country: Some("DE".to_string()),
            value: json!(1.5),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({"country": "DE", "value": 1.5})
        );
    }

    #[test]
    fn test_file_info_modified_timestamp() {
        let info: DatasetFileInfo =
            serde_json::from_value(json!({"filename": "gdp.json", "size": 42, "modified": 1700000000.5}))
                .unwrap();
        let at = info.modified_at().unwrap();
        assert_eq!(at.timestamp(), 1_700_000_000);
        assert_eq!(at.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_single_value_detection() {
        let content: DatasetContent =
            serde_json::from_value(json!({"filename": "r_open_t1.json", "data": {"value": 0.4036}}))
                .unwrap();
        assert_eq!(content.single_value(), Some(&json!(0.4036)));

        let grid: DatasetContent = serde_json::from_value(
            json!({"filename": "gdp.json", "data": {"2020": {"CN": 1.0}, "value": 2}}),
        )
        .unwrap();
        assert!(grid.single_value().is_none());
    }

    #[test]
    fn test_calculation_state_mapping() {
        assert_eq!(CalculationState::from("started"), CalculationState::Started);
        assert_eq!(CalculationState::from("unknown"), CalculationState::Unknown);
        assert_eq!(
            CalculationState::from("queued"),
            CalculationState::Other("queued".to_string())
        );
        assert!(CalculationState::Running.is_in_progress());
        assert!(!CalculationState::Completed.is_in_progress());
    }
}
