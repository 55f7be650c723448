pub mod calculate;
pub mod dataset;
pub mod jsondata;
pub mod output;

pub use calculate::{CalculateApi, PollOptions};
pub use dataset::DatasetResource;
pub use jsondata::JsonDataApi;
pub use output::OutputApi;

use crate::http::ApiClient;

impl ApiClient {
    pub fn jsondata(&self) -> JsonDataApi<'_> {
        DatasetResource::new(self)
    }

    pub fn output(&self) -> OutputApi<'_> {
        DatasetResource::new(self)
    }

    pub fn calculate(&self) -> CalculateApi<'_> {
        CalculateApi::new(self)
    }
}
