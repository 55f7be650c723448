pub mod api;
pub mod app;
pub mod config;
pub mod domain;
pub mod http;
pub mod router;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::Application;
pub use config::ClientSettings;
pub use domain::ports::{DatasetApi, Notifier};
pub use http::{ApiClient, ApiResponse, BuildMode};
pub use utils::error::{ClientError, Result};
