pub mod http;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use http::HttpReadingSource;

/// Where raw reading records come from.
///
/// Implementations return the records exactly as received; normalization
/// happens in the orchestrator.
#[async_trait]
pub trait ReadingSource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<Value>>;
}
