use crate::app::views;
use crate::config::ClientSettings;
use crate::domain::ports::{DatasetApi, Notifier};
use crate::http::ApiClient;
use crate::router::{self, View};
use crate::utils::error::{ClientError, Result};
use crate::utils::logger;
use crate::utils::noise::{install_panic_hook, NoiseFilter};
use crate::utils::notify::FilteredNotifier;
use std::sync::Arc;

/// Wires settings, notifier and noise filter into a ready client.
pub struct Application {
    client: ApiClient,
    noise: NoiseFilter,
    settings: ClientSettings,
}

impl Application {
    pub fn bootstrap(settings: ClientSettings, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let noise = NoiseFilter::new(&settings.suppress_patterns)?;
        let notifier: Arc<dyn Notifier> = Arc::new(FilteredNotifier::new(notifier, noise.clone()));
        let base_url = settings.resolved_base_url();
        let client = ApiClient::new(&base_url, settings.timeout, notifier)?;

        Ok(Self {
            client,
            noise,
            settings,
        })
    }

    /// 安裝全域處理器：日誌管線與 panic hook（每個行程呼叫一次）
    pub fn install_global_handlers(&self) {
        logger::init_cli_logger(
            self.settings.verbose,
            self.settings.json_logs,
            self.noise.clone(),
        );
        install_panic_hook(self.noise.clone());
        tracing::debug!(
            "🚀 Bootstrapped against {} ({} mode, host {})",
            self.client.base_url(),
            self.settings.base_url.mode,
            self.settings.base_url.hostname
        );
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn noise_filter(&self) -> &NoiseFilter {
        &self.noise
    }

    /// Reports an error that reached the top level. Returns `false` when it was suppressed.
    pub fn report_unhandled(&self, err: &ClientError) -> bool {
        if self.noise.is_noise_error(err) {
            tracing::trace!("Suppressed unhandled error: {}", err);
            return false;
        }
        true
    }

    /// 背景任務結束時呼叫；非雜訊錯誤以 error 等級記錄，回傳是否已記錄
    pub fn report_task_outcome(&self, outcome: std::result::Result<(), ClientError>) -> bool {
        match outcome {
            Ok(()) => false,
            Err(e) if self.noise.is_noise_error(&e) => {
                tracing::trace!("Suppressed background task error: {}", e);
                false
            }
            Err(e) => {
                tracing::error!("❌ Background task failed: {}", e);
                true
            }
        }
    }

    /// Prints a failed command's message unless it is noise, and returns the exit code.
    /// Suppression only hides output; the code still reflects the failure.
    pub fn handle_failure(&self, err: &ClientError) -> i32 {
        if self.report_unhandled(err) {
            tracing::debug!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                err,
                err.category(),
                err.severity()
            );

            // 請求錯誤已由 notifier 顯示過
            if !err.is_request_failure() {
                eprintln!("❌ {}", err.user_friendly_message());
            }
            eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
        }
        err.severity().exit_code()
    }

    /// 依路徑開啟畫面並回傳渲染結果
    pub async fn open(&self, path: &str) -> Result<String> {
        let route = router::resolve(path).ok_or_else(|| ClientError::InvalidArgument {
            message: format!("no screen at path '{}'", path),
        })?;

        tracing::debug!("🧭 {} -> {}", path, route.name);

        let files = match route.view {
            View::JsonDataManagement => self.client.jsondata().list_files().await?,
            View::OutputResults => self.client.output().list_files().await?,
        };

        Ok(views::render_file_list(route.title, &files))
    }
}
