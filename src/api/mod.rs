pub mod http_client;
#[cfg(test)]
pub(crate) mod fake;

use crate::{
    error::Result,
    models::{
        GenerationRecord, GenerationRequest, GenerationResult, HealthResponse, PurposeOption,
        RefineRequest, SizeOption, StyleOption,
    },
};
use async_trait::async_trait;

pub use http_client::HttpApiClient;

/// Everything the form needs from the generation backend.
#[async_trait]
pub trait GenerationApi: Send + Sync {
    async fn health(&self) -> Result<HealthResponse>;
    async fn list_styles(&self) -> Result<Vec<StyleOption>>;
    async fn list_sizes(&self) -> Result<Vec<SizeOption>>;
    async fn list_purposes(&self) -> Result<Vec<PurposeOption>>;

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;
    async fn refine(&self, request: &RefineRequest) -> Result<GenerationResult>;

    async fn get_generation(&self, generation_id: &str) -> Result<GenerationRecord>;
    async fn generation_history(&self, generation_id: &str) -> Result<Vec<GenerationRecord>>;

    /// Raw bytes behind a result's image URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}
