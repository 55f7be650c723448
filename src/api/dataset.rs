//! Request shapes shared by the `jsondata` and `output` resource families.

use crate::domain::model::{
    AddEntryRequest, DatasetContent, DatasetFileInfo, DatasetKind, DeleteEntryRequest,
    ExportedWorkbook, FileList, MessageResponse, UpdateFileRequest,
};
use crate::domain::ports::DatasetApi;
use crate::domain::request::RequestDescriptor;
use crate::http::{ApiClient, RawResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

pub trait ResourceFamily: Send + Sync + 'static {
    const KIND: DatasetKind;
}

pub fn list_files(kind: DatasetKind) -> RequestDescriptor {
    RequestDescriptor::get([kind.path_segment(), "files"])
}

pub fn get_file(kind: DatasetKind, filename: &str) -> RequestDescriptor {
    RequestDescriptor::get([kind.path_segment(), filename])
}

pub fn update_file(
    kind: DatasetKind,
    filename: &str,
    data: serde_json::Map<String, serde_json::Value>,
) -> RequestDescriptor {
    RequestDescriptor::put([kind.path_segment(), filename]).with_json(json!(UpdateFileRequest { data }))
}

pub fn add_entry(
    kind: DatasetKind,
    filename: &str,
    year: Option<&str>,
    country: Option<&str>,
    value: serde_json::Value,
) -> RequestDescriptor {
    let request = AddEntryRequest {
        year: year.map(str::to_string),
        country: country.map(str::to_string),
        value,
    };
    RequestDescriptor::post([kind.path_segment(), filename, "add"]).with_json(json!(request))
}

/// 未提供的 year / country 會送出明確的 null
pub fn delete_entry(
    kind: DatasetKind,
    filename: &str,
    year: Option<&str>,
    country: Option<&str>,
) -> RequestDescriptor {
    RequestDescriptor::delete([kind.path_segment(), filename, "delete"])
        .with_json(json!(DeleteEntryRequest::new(year, country)))
}

pub fn export_excel(kind: DatasetKind, filename: &str) -> RequestDescriptor {
    RequestDescriptor::get([kind.path_segment(), filename, "export-excel"]).expecting_binary()
}

/// Typed access to one resource family.
pub struct DatasetResource<'a, F> {
    client: &'a ApiClient,
    _family: PhantomData<F>,
}

impl<'a, F: ResourceFamily> DatasetResource<'a, F> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            _family: PhantomData,
        }
    }

    pub(crate) fn client(&self) -> &'a ApiClient {
        self.client
    }

    /// 空回應（例如 204）視為成功，訊息為空
    async fn execute_message(&self, descriptor: RequestDescriptor) -> Result<MessageResponse> {
        let response: Option<MessageResponse> = self.client.execute_json(descriptor).await?;
        Ok(response.unwrap_or_default())
    }
}

#[async_trait]
impl<'a, F: ResourceFamily> DatasetApi for DatasetResource<'a, F> {
    fn kind(&self) -> DatasetKind {
        F::KIND
    }

    async fn list_files(&self) -> Result<Vec<DatasetFileInfo>> {
        let list: FileList = self.client.execute_json(list_files(F::KIND)).await?;
        tracing::debug!("📂 {}: {} files", F::KIND, list.files.len());
        Ok(list.files)
    }

    async fn get_file(&self, filename: &str) -> Result<DatasetContent> {
        self.client.execute_json(get_file(F::KIND, filename)).await
    }

    async fn update_file(
        &self,
        filename: &str,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Result<MessageResponse> {
        self.execute_message(update_file(F::KIND, filename, data)).await
    }

    async fn add_entry(
        &self,
        filename: &str,
        year: Option<&str>,
        country: Option<&str>,
        value: serde_json::Value,
    ) -> Result<MessageResponse> {
        self.execute_message(add_entry(F::KIND, filename, year, country, value)).await
    }

    async fn delete_entry(
        &self,
        filename: &str,
        year: Option<&str>,
        country: Option<&str>,
    ) -> Result<MessageResponse> {
        self.execute_message(delete_entry(F::KIND, filename, year, country)).await
    }

    async fn export_excel(&self, filename: &str) -> Result<ExportedWorkbook> {
        let raw = self.client.execute_raw(export_excel(F::KIND, filename)).await?;
        Ok(workbook_from_response(filename, raw))
    }
}

pub fn workbook_from_response(source_filename: &str, raw: RawResponse) -> ExportedWorkbook {
    let filename = raw
        .header("content-disposition")
        .and_then(attachment_filename)
        .unwrap_or_else(|| default_workbook_name(source_filename));

    ExportedWorkbook {
        filename,
        content_type: raw.content_type().map(str::to_string),
        bytes: raw.bytes,
    }
}

/// `gdp.json` -> `gdp.xlsx`
pub fn default_workbook_name(source_filename: &str) -> String {
    let stem = source_filename
        .strip_suffix(".json")
        .unwrap_or(source_filename);
    format!("{}.xlsx", stem)
}

/// 解析 Content-Disposition 中的 `filename=`；伺服器不送 `filename*=`
pub fn attachment_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .filter_map(|param| param.strip_prefix("filename="))
        .map(|value| value.trim_matches('"'))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

impl ExportedWorkbook {
    /// Writes the workbook into `dir`, keeping only the final path component of its name.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        let name = Path::new(&self.filename)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "export.xlsx".into());

        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, &self.bytes)?;

        tracing::debug!("💾 Wrote {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}
