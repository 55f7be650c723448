use crate::domain::model::{
    DatasetContent, DatasetFileInfo, DatasetKind, ExportedWorkbook, MessageResponse,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 錯誤提示的輸出通道（取代全域 toast）
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);

    fn success(&self, _message: &str) {}
}

/// Operations shared by both dataset families.
#[async_trait]
pub trait DatasetApi: Send + Sync {
    fn kind(&self) -> DatasetKind;

    async fn list_files(&self) -> Result<Vec<DatasetFileInfo>>;

    async fn get_file(&self, filename: &str) -> Result<DatasetContent>;

    async fn update_file(
        &self,
        filename: &str,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Result<MessageResponse>;

    async fn add_entry(
        &self,
        filename: &str,
        year: Option<&str>,
        country: Option<&str>,
        value: serde_json::Value,
    ) -> Result<MessageResponse>;

    async fn delete_entry(
        &self,
        filename: &str,
        year: Option<&str>,
        country: Option<&str>,
    ) -> Result<MessageResponse>;

    async fn export_excel(&self, filename: &str) -> Result<ExportedWorkbook>;
}
