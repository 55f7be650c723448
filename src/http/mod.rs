pub mod base_url;
pub mod client;

pub use base_url::{resolve_base_url, BaseUrlSettings, BuildMode};
pub use client::{ApiClient, ApiResponse, RawResponse, DEFAULT_TIMEOUT};
