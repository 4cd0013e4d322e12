use crate::{
    config::{Config, ProviderKind},
    error::Result,
    gemini::GeminiClient,
    models::{GeneratedImage, ImageGenerationRequest, TextGenerationRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait TextService: Send + Sync {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String>;
}

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn generate_images(&self, request: ImageGenerationRequest)
        -> Result<Vec<GeneratedImage>>;
}

#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>>;
}

/// Authenticated access to one remote provider, split by capability.
#[derive(Clone)]
pub struct GenClient {
    text: Arc<dyn TextService>,
    image: Arc<dyn ImageService>,
    catalog: Arc<dyn ModelCatalog>,
}

impl GenClient {
    pub fn from_parts(
        text: Arc<dyn TextService>,
        image: Arc<dyn ImageService>,
        catalog: Arc<dyn ModelCatalog>,
    ) -> Self {
        Self {
            text,
            image,
            catalog,
        }
    }

    /// Validates `config` and builds the backend it selects.
    pub async fn connect(config: &Config) -> Result<Self> {
        config.validate()?;

        match config.provider {
            ProviderKind::Gemini => {
                let client = Arc::new(GeminiClient::new(&config.gemini)?);
                Ok(Self::from_parts(client.clone(), client.clone(), client))
            }
            ProviderKind::Bedrock => Self::connect_bedrock(config).await,
        }
    }

    #[cfg(feature = "bedrock")]
    async fn connect_bedrock(config: &Config) -> Result<Self> {
        let client = Arc::new(crate::bedrock::BedrockClient::new(&config.bedrock).await?);
        Ok(Self::from_parts(client.clone(), client.clone(), client))
    }

    #[cfg(not(feature = "bedrock"))]
    async fn connect_bedrock(_config: &Config) -> Result<Self> {
        Err(crate::error::GenError::ConfigError(
            "Bedrock feature not enabled".into(),
        ))
    }

    pub fn text(&self) -> Arc<dyn TextService> {
        self.text.clone()
    }

    pub fn image(&self) -> Arc<dyn ImageService> {
        self.image.clone()
    }

    pub fn catalog(&self) -> Arc<dyn ModelCatalog> {
        self.catalog.clone()
    }
}
