use crate::api::dataset::{self, DatasetResource, ResourceFamily};
use crate::domain::model::{DatasetKind, ExcelImportReport};
use crate::domain::request::{FilePart, RequestDescriptor};
use crate::utils::error::{ClientError, Result};
use std::path::Path;

/// Input datasets, editable and importable from Excel.
pub struct JsonData;

impl ResourceFamily for JsonData {
    const KIND: DatasetKind = DatasetKind::JsonData;
}

pub type JsonDataApi<'a> = DatasetResource<'a, JsonData>;

pub fn list_files() -> RequestDescriptor {
    dataset::list_files(DatasetKind::JsonData)
}

pub fn get_file(filename: &str) -> RequestDescriptor {
    dataset::get_file(DatasetKind::JsonData, filename)
}

pub fn update_file(
    filename: &str,
    data: serde_json::Map<String, serde_json::Value>,
) -> RequestDescriptor {
    dataset::update_file(DatasetKind::JsonData, filename, data)
}

pub fn add_entry(
    filename: &str,
    year: Option<&str>,
    country: Option<&str>,
    value: serde_json::Value,
) -> RequestDescriptor {
    dataset::add_entry(DatasetKind::JsonData, filename, year, country, value)
}

pub fn delete_entry(filename: &str, year: Option<&str>, country: Option<&str>) -> RequestDescriptor {
    dataset::delete_entry(DatasetKind::JsonData, filename, year, country)
}

pub fn export_excel(filename: &str) -> RequestDescriptor {
    dataset::export_excel(DatasetKind::JsonData, filename)
}

/// 上傳 Excel 檔，欄位名稱固定為 `file`
pub fn import_excel(filename: &str, upload_name: &str, bytes: Vec<u8>) -> RequestDescriptor {
    RequestDescriptor::post(["jsondata", filename, "import-excel"]).with_multipart(FilePart {
        field_name: "file".to_string(),
        file_name: upload_name.to_string(),
        bytes,
    })
}

impl<'a> DatasetResource<'a, JsonData> {
    pub async fn import_excel(
        &self,
        filename: &str,
        upload_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ExcelImportReport> {
        tracing::debug!(
            "📤 Importing {} ({} bytes) into {}",
            upload_name,
            bytes.len(),
            filename
        );
        self.client()
            .execute_json(import_excel(filename, upload_name, bytes))
            .await
    }

    pub async fn import_excel_file(&self, filename: &str, path: &Path) -> Result<ExcelImportReport> {
        let upload_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::InvalidArgument {
                message: format!("not a file path: {}", path.display()),
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        self.import_excel(filename, &upload_name, bytes).await
    }
}
