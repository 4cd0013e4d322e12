pub mod image_client;
pub mod models;
pub mod text_client;

use crate::{
    config::GeminiConfig,
    error::{GenError, Result},
    models::{GeneratedImage, ImageGenerationRequest, TextGenerationRequest},
    services::{ImageService, ModelCatalog, TextService},
};
use async_trait::async_trait;
use self::models::{ErrorEnvelope, ListModelsResponse};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;

pub use image_client::GeminiImageClient;
pub use text_client::GeminiTextClient;

const LIST_PAGE_SIZE: &str = "1000";

/// Shared HTTP plumbing: base URL, API key header, error decoding.
#[derive(Clone)]
pub struct GeminiTransport {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiTransport {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GenError::ConfigError("GEMINI_API_KEY is not set".into()))?
            .to_string();

        Ok(Self {
            http: reqwest::Client::new(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = serde_json::to_vec(body)
            .map_err(|e| GenError::SerializationError(e.to_string()))?;
        log::debug!("POST {} ({} bytes)", path, body.len());

        let response = self
            .http
            .post(self.url(path))
            .header("x-goog-api-key", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        Self::read_json(response).await
    }

    pub async fn get_json<R>(&self, path: &str, query: &[(&str, &str)]) -> Result<R>
    where
        R: DeserializeOwned,
    {
        log::debug!("GET {}", path);

        let response = self
            .http
            .get(self.url(path))
            .header("x-goog-api-key", &self.api_key)
            .query(query)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn read_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("Gemini returned {}: {}", status, body);
            return Err(GenError::RequestError(format!(
                "{} - {}",
                status,
                api_error_message(&body)
            )));
        }

        serde_json::from_str(&body).map_err(|e| GenError::ResponseError(e.to_string()))
    }
}

/// Pulls `error.message` out of a Gemini error body, falling back to the raw text.
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{}: {}", status, envelope.error.message),
            None => envelope.error.message,
        },
        Err(_) if body.trim().is_empty() => "no message".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    transport: GeminiTransport,
    text_client: GeminiTextClient,
    image_client: GeminiImageClient,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let transport = GeminiTransport::new(config)?;

        Ok(Self {
            text_client: GeminiTextClient::new(transport.clone()),
            image_client: GeminiImageClient::new(transport.clone()),
            transport,
        })
    }

    async fn fetch_model_page(&self, page_token: Option<&str>) -> Result<ListModelsResponse> {
        let mut query = vec![("pageSize", LIST_PAGE_SIZE)];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.transport.get_json("models", &query).await
    }
}

#[async_trait]
impl TextService for GeminiClient {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String> {
        self.text_client.generate(request).await
    }
}

#[async_trait]
impl ImageService for GeminiClient {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>> {
        self.image_client.generate(request).await
    }
}

#[async_trait]
impl ModelCatalog for GeminiClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_model_page(page_token.as_deref()).await?;
            names.extend(page.models.into_iter().map(|m| m.name));

            match next_page(page.next_page_token, &mut seen_tokens) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        log::debug!("Fetched {} model names", names.len());
        Ok(names)
    }
}

// A token the server already handed out would restart a page we have read.
fn next_page(token: Option<String>, seen: &mut HashSet<String>) -> Option<String> {
    let token = token.filter(|t| !t.is_empty())?;
    if !seen.insert(token.clone()) {
        log::warn!("Model listing returned a repeated page token, stopping");
        return None;
    }
    Some(token)
}
