use crate::domain::ports::Notifier;
use crate::domain::request::{RequestBody, RequestDescriptor, ResponseKind};
use crate::utils::error::{ClientError, Result};
use crate::utils::validation::validate_url;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// 檔案上傳需要較長的逾時
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Undecoded response, handed back for file downloads.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
}

impl RawResponse {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
pub enum ApiResponse {
    Body(serde_json::Value),
    Raw(RawResponse),
}

impl ApiResponse {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        match self {
            ApiResponse::Body(value) => Ok(serde_json::from_value(value)?),
            ApiResponse::Raw(raw) => Ok(serde_json::from_slice(&raw.bytes)?),
        }
    }

    pub fn into_raw(self) -> Result<RawResponse> {
        match self {
            ApiResponse::Raw(raw) => Ok(raw),
            ApiResponse::Body(_) => Err(ClientError::UnexpectedResponse {
                message: "expected a binary payload but received JSON".to_string(),
            }),
        }
    }
}

pub struct ApiClient {
    client: Client,
    base_url: Url,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, notifier: Arc<dyn Notifier>) -> Result<Self> {
        validate_url("base_url", base_url)?;
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidConfigValueError {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder().timeout(timeout).build()?;

        tracing::debug!("🔧 API client ready: {} (timeout {:?})", base_url, timeout);

        Ok(Self {
            client,
            base_url,
            notifier,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn url_for(&self, descriptor: &RequestDescriptor) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(&descriptor.segments);
        Ok(url)
    }

    /// 依描述建立請求；multipart 不設定 Content-Type，交由 reqwest 產生 boundary
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Request> {
        let url = self.url_for(descriptor)?;
        let mut builder = self.client.request(descriptor.method.clone(), url);

        let is_multipart = matches!(descriptor.body, RequestBody::Multipart(_));
        for (name, value) in &descriptor.headers {
            if is_multipart && name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()) {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        builder = match &descriptor.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => {
                if !descriptor.has_header(CONTENT_TYPE.as_str()) {
                    builder = builder.header(CONTENT_TYPE, "application/json");
                }
                builder.body(serde_json::to_vec(value)?)
            }
            RequestBody::Multipart(part) => {
                let file = Part::bytes(part.bytes.clone()).file_name(part.file_name.clone());
                builder.multipart(Form::new().part(part.field_name.clone(), file))
            }
        };

        Ok(builder.build()?)
    }

    /// Sends the request. Failures are shown through the notifier once, then returned.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        let result = self.perform(descriptor).await;
        self.report(result)
    }

    pub async fn execute_json<T: DeserializeOwned>(&self, descriptor: RequestDescriptor) -> Result<T> {
        let result = match self.perform(descriptor).await {
            Ok(response) => response.into_json(),
            Err(e) => Err(e),
        };
        self.report(result)
    }

    pub async fn execute_raw(&self, descriptor: RequestDescriptor) -> Result<RawResponse> {
        let result = match self.perform(descriptor).await {
            Ok(response) => response.into_raw(),
            Err(e) => Err(e),
        };
        self.report(result)
    }

    async fn perform(&self, descriptor: RequestDescriptor) -> Result<ApiResponse> {
        let request = self.build_request(&descriptor)?;
        tracing::debug!("📡 {} {}", request.method(), request.url());

        let response = self.client.execute(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!("📡 Response {} ({} bytes)", status, bytes.len());

        if !status.is_success() {
            return Err(error_from_response(status, &bytes));
        }

        let raw = RawResponse {
            status,
            headers,
            bytes,
        };

        if descriptor.response_kind == ResponseKind::Binary
            || raw.content_type().map(is_binary_content_type).unwrap_or(false)
        {
            return Ok(ApiResponse::Raw(raw));
        }

        if raw.bytes.is_empty() {
            return Ok(ApiResponse::Body(serde_json::Value::Null));
        }

        Ok(ApiResponse::Body(serde_json::from_slice(&raw.bytes)?))
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            let message = e.display_message();
            tracing::debug!("❌ Request failed: {}", message);
            self.notifier.error(&message);
        }
        result
    }
}

/// 從錯誤回應取出訊息：優先 detail，其次狀態碼描述
pub fn error_from_response(status: StatusCode, bytes: &[u8]) -> ClientError {
    let detail = serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|body| body.get("detail").cloned())
        .filter(|detail| !detail.is_null());

    let message = match &detail {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::String(_)) | None => {
            format!("Request failed with status code {}", status.as_u16())
        }
        Some(other) => other.to_string(),
    };

    ClientError::ApiError {
        status: status.as_u16(),
        message,
        detail,
    }
}

fn is_binary_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    !content_type.contains("json") && !content_type.starts_with("text/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::FilePart;
    use crate::utils::notify::MemoryNotifier;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new(
            "http://localhost:8010/api",
            DEFAULT_TIMEOUT,
            Arc::new(MemoryNotifier::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_json_body_gets_json_content_type() {
        let descriptor = RequestDescriptor::put(["jsondata", "gdp.json"]).with_json(json!({"data": {}}));
        let request = client().build_request(&descriptor).unwrap();

        assert_eq!(request.url().as_str(), "http://localhost:8010/api/jsondata/gdp.json");
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_existing_content_type_is_kept() {
        let descriptor = RequestDescriptor::post(["calculate", "batch"])
            .with_header("Content-Type", "application/vnd.custom+json")
            .with_json(json!({}));
        let request = client().build_request(&descriptor).unwrap();

        let values: Vec<_> = request.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0], "application/vnd.custom+json");
    }

    #[test]
    fn test_multipart_never_gets_json_content_type() {
        let descriptor = RequestDescriptor::post(["jsondata", "gdp.json", "import-excel"])
            .with_header("Content-Type", "application/json")
            .with_multipart(FilePart {
                field_name: "file".to_string(),
                file_name: "gdp.xlsx".to_string(),
                bytes: vec![1, 2, 3],
            });
        let request = client().build_request(&descriptor).unwrap();

        let values: Vec<_> = request.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values.len(), 1);
        let value = values[0].to_str().unwrap();
        assert!(value.starts_with("multipart/form-data; boundary="), "{}", value);
    }

    #[test]
    fn test_filename_segments_are_escaped() {
        let descriptor = RequestDescriptor::get(["jsondata", "my data#1.json"]);
        let url = client().url_for(&descriptor).unwrap();
        assert_eq!(url.path(), "/api/jsondata/my%20data%231.json");
    }

    #[test]
    fn test_trailing_slash_on_base_url() {
        let client = ApiClient::new(
            "http://localhost:8010/api/",
            DEFAULT_TIMEOUT,
            Arc::new(MemoryNotifier::new()),
        )
        .unwrap();
        let url = client.url_for(&RequestDescriptor::get(["jsondata", "files"])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8010/api/jsondata/files");
    }

    #[test]
    fn test_error_message_extraction() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, br#"{"detail":"disk full"}"#);
        assert_eq!(err.display_message(), "disk full");

        let err = error_from_response(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>");
        assert_eq!(err.display_message(), "Request failed with status code 502");

        let err = error_from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"detail":[{"loc":["body","data"],"msg":"field required"}]}"#,
        );
        assert!(err.display_message().contains("field required"));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new("/api", DEFAULT_TIMEOUT, Arc::new(MemoryNotifier::new()));
        assert!(result.is_err());
    }
}
