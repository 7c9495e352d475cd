use crate::{
    config::ClientConfig,
    error::{IllustError, Result},
    models::{
        parse_error_detail, GenerationRecord, GenerationRequest, GenerationResult,
        HealthResponse, HistoryResponse, PurposeListResponse, PurposeOption, RefineRequest,
        SizeListResponse, SizeOption, StyleListResponse, StyleOption,
    },
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::GenerationApi;

fn normalize(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    http: Client,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: Client::new(),
            base_url: normalize(base_url.as_ref()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| IllustError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: normalize(&config.base_url),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let invalid = || IllustError::Config(format!("invalid base URL: {}", self.base_url));
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn api_endpoint<'a>(&self, tail: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let prefix: [&'a str; 2] = ["api", "v1"];
        self.endpoint(prefix.into_iter().chain(tail))
    }

    fn network_error(url: &Url, source: reqwest::Error) -> IllustError {
        IllustError::Network {
            context: format!("Request to {} failed", url),
            source,
        }
    }

    /// Turns a non-success response into `IllustError::Http`, keeping a string `detail`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = parse_error_detail(&body);
        log::debug!("Backend answered {} with body: {}", status, body);
        Err(IllustError::Http {
            status: status.as_u16(),
            detail,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| IllustError::Response(e.to_string()))?;
        serde_json::from_str(&text).map_err(IllustError::from)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Self::network_error(&url, e))?;
        Self::decode(Self::check(response).await?).await
    }

    async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: serde::Serialize + Sync,
        T: DeserializeOwned,
    {
        log::debug!("POST {} {}", url, serde_json::to_string(body)?);
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| Self::network_error(&url, e))?;
        Self::decode(Self::check(response).await?).await
    }
}

#[async_trait]
impl GenerationApi for HttpApiClient {
    async fn health(&self) -> Result<HealthResponse> {
        self.get_json(self.endpoint(["health"])?).await
    }

    async fn list_styles(&self) -> Result<Vec<StyleOption>> {
        let response: StyleListResponse = self.get_json(self.api_endpoint(["styles"])?).await?;
        Ok(response.styles)
    }

    async fn list_sizes(&self) -> Result<Vec<SizeOption>> {
        let response: SizeListResponse = self.get_json(self.api_endpoint(["sizes"])?).await?;
        Ok(response.sizes)
    }

    async fn list_purposes(&self) -> Result<Vec<PurposeOption>> {
        let response: PurposeListResponse = self.get_json(self.api_endpoint(["purposes"])?).await?;
        Ok(response.purposes)
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        log::info!(
            "🎨 Requesting generation: theme={:?} styles={:?} size={}",
            request.theme,
            request.styles,
            request.size
        );
        self.post_json(self.api_endpoint(["generate"])?, request).await
    }

    async fn refine(&self, request: &RefineRequest) -> Result<GenerationResult> {
        log::info!("🔧 Requesting refinement of {}", request.generation_id);
        self.post_json(self.api_endpoint(["refine"])?, request).await
    }

    async fn get_generation(&self, generation_id: &str) -> Result<GenerationRecord> {
        self.get_json(self.api_endpoint(["generation", generation_id])?)
            .await
    }

    async fn generation_history(&self, generation_id: &str) -> Result<Vec<GenerationRecord>> {
        let response: HistoryResponse = self
            .get_json(self.api_endpoint(["generation", generation_id, "history"])?)
            .await?;
        Ok(response.history)
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        // Backends may hand out paths relative to themselves.
        let absolute = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            self.url(&format!("/{}", url.trim_start_matches('/')))
        };
        log::debug!("Downloading image from {}", absolute);

        let response = self
            .http
            .get(&absolute)
            .send()
            .await
            .map_err(|e| IllustError::Network {
                context: format!("Image download from {} failed", absolute),
                source: e,
            })?;
        let response = Self::check(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| IllustError::Response(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
