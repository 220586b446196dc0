//! Postlens API client implementation

use crate::error::{PostlensError, Result};
use crate::models::*;
use async_trait::async_trait;
use postlens_core::{DocumentAnalyzer, ServiceError};
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

const EXTRACT_PATH: &str = "/api/extract";
const ANALYZE_PATH: &str = "/api/analyze";

/// Client for the extraction and analysis services
#[derive(Clone, Debug)]
pub struct PostlensClient {
    http: Client,
    base_url: Url,
}

/// Builder for creating a PostlensClient
#[derive(Default)]
pub struct PostlensClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl PostlensClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL for the API
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout. Without one, requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the request timeout from an optional value
    pub fn timeout_opt(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<PostlensClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| "http://localhost:8000".to_string());

        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(PostlensError::Config(format!(
                "base URL cannot carry paths: {}",
                base_url
            )));
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("postlens-sdk/{}", env!("CARGO_PKG_VERSION")));

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(PostlensError::Http)?;

        Ok(PostlensClient { http, base_url })
    }
}

impl PostlensClient {
    /// Create a new client builder
    pub fn builder() -> PostlensClientBuilder {
        PostlensClientBuilder::new()
    }

    /// Create a client with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a URL for an endpoint
    fn url(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(PostlensError::Url)
    }

    /// Handle API response
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Received response");

        if status.is_success() {
            let body = response.bytes().await.map_err(PostlensError::Http)?;
            serde_json::from_slice(&body).map_err(PostlensError::Json)
        } else {
            let error_body = response.text().await.unwrap_or_default();
            let detail = ErrorBody::detail_from(&error_body);

            warn!(
                status = status.as_u16(),
                has_detail = detail.is_some(),
                "Service returned an error"
            );

            Err(PostlensError::Api {
                status: status.as_u16(),
                detail,
            })
        }
    }

    // ===== Extraction API =====

    /// Upload a document and get its text back
    #[instrument(skip(self, file), fields(file = %file.name(), size = file.size()))]
    pub async fn extract(&self, file: &SelectedFile) -> Result<Extraction> {
        let mime_type = if file.mime_type().is_empty() {
            "application/octet-stream"
        } else {
            file.mime_type()
        };

        let part = Part::bytes(file.data().to_vec())
            .file_name(file.name().to_string())
            .mime_str(mime_type)
            .map_err(PostlensError::Http)?;

        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(self.url(EXTRACT_PATH)?)
            .multipart(form)
            .send()
            .await
            .map_err(PostlensError::Http)?;

        self.handle_response(response).await
    }

    // ===== Analysis API =====

    /// Ask the analysis service to summarise extracted text
    #[instrument(skip(self, text), fields(chars = text.len()))]
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        let request = AnalyzeRequest {
            text: text.to_string(),
        };

        let response = self
            .http
            .post(self.url(ANALYZE_PATH)?)
            .json(&request)
            .send()
            .await
            .map_err(PostlensError::Http)?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl DocumentAnalyzer for PostlensClient {
    async fn extract(&self, file: &SelectedFile) -> std::result::Result<Extraction, ServiceError> {
        PostlensClient::extract(self, file).await.map_err(Into::into)
    }

    async fn analyze(&self, text: &str) -> std::result::Result<AnalysisResult, ServiceError> {
        PostlensClient::analyze(self, text).await.map_err(Into::into)
    }
}
