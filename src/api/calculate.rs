use crate::domain::model::CalculationResponse;
use crate::domain::request::RequestDescriptor;
use crate::http::ApiClient;
use crate::utils::error::Result;
use std::time::Duration;

pub fn trigger_batch() -> RequestDescriptor {
    RequestDescriptor::post(["calculate", "batch"])
}

pub fn status() -> RequestDescriptor {
    RequestDescriptor::get(["calculate", "status"])
}

#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 30,
        }
    }
}

pub struct CalculateApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CalculateApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn trigger_batch(&self) -> Result<CalculationResponse> {
        let response: CalculationResponse = self.client.execute_json(trigger_batch()).await?;
        tracing::info!("🧮 Batch calculation: {} ({})", response.status, response.message);
        Ok(response)
    }

    pub async fn status(&self) -> Result<CalculationResponse> {
        self.client.execute_json(status()).await
    }

    /// 輪詢狀態直到離開 started/running，或達到次數上限
    pub async fn wait_for_status(&self, options: PollOptions) -> Result<CalculationResponse> {
        let attempts = options.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let current = self.status().await?;
            if !current.state().is_in_progress() || attempt >= attempts {
                return Ok(current);
            }
            tracing::debug!(
                "⏳ Calculation still {} (attempt {}/{})",
                current.status,
                attempt,
                attempts
            );
            attempt += 1;
            tokio::time::sleep(options.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::RequestBody;
    use reqwest::Method;

    #[test]
    fn test_request_shapes() {
        let batch = trigger_batch();
        assert_eq!(batch.method, Method::POST);
        assert_eq!(batch.path(), "/calculate/batch");
        assert_eq!(batch.body, RequestBody::Empty);

        let status = status();
        assert_eq!(status.method, Method::GET);
        assert_eq!(status.path(), "/calculate/status");
    }
}
