pub mod image_client;
pub mod text_client;

use crate::{
    config::BedrockConfig,
    error::{GenError, Result},
    models::{GeneratedImage, ImageGenerationRequest, TextGenerationRequest},
    services::{ImageService, ModelCatalog, TextService},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{
    error::{ProvideErrorMetadata, SdkError},
    Client,
};

pub use image_client::ImageClient;
pub use text_client::TextClient;

#[derive(Clone)]
pub struct BedrockClient {
    text_client: TextClient,
    image_client: ImageClient,
}

impl BedrockClient {
    pub async fn new(bedrock_config: &BedrockConfig) -> Result<Self> {
        let region = aws_sdk_bedrockruntime::config::Region::new(
            bedrock_config.region_or_default().to_string(),
        );

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "promptcanvas",
                ))
                .region(region)
                .load()
                .await
        } else {
            aws_config::from_env().region(region).load().await
        };

        let client = Client::new(&aws_config);

        Ok(Self {
            text_client: TextClient::new(client.clone()),
            image_client: ImageClient::new(client),
        })
    }

    /// Models this backend knows how to build payloads for.
    pub fn supported_models() -> Vec<&'static str> {
        TextClient::SUPPORTED_MODELS
            .iter()
            .chain(ImageClient::SUPPORTED_MODELS)
            .copied()
            .collect()
    }
}

pub(crate) fn map_sdk_error<E, R>(context: &str, e: SdkError<E, R>) -> GenError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    log::error!("AWS SDK {} error details: {:?}", context, e);

    if let Some(service_error) = e.as_service_error() {
        GenError::RequestError(format!(
            "Bedrock service error: {} - {}",
            service_error.code().unwrap_or("unknown"),
            service_error.message().unwrap_or("no message")
        ))
    } else {
        GenError::RequestError(format!("AWS SDK error: {}", e))
    }
}

#[async_trait]
impl TextService for BedrockClient {
    async fn generate_text(&self, request: TextGenerationRequest) -> Result<String> {
        self.text_client.generate(request).await
    }
}

#[async_trait]
impl ImageService for BedrockClient {
    async fn generate_images(
        &self,
        request: ImageGenerationRequest,
    ) -> Result<Vec<GeneratedImage>> {
        self.image_client.generate(request).await
    }
}

#[async_trait]
impl ModelCatalog for BedrockClient {
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(Self::supported_models()
            .into_iter()
            .map(String::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_text_and_image_models() {
        let models = BedrockClient::supported_models();
        assert!(models.contains(&"amazon.titan-text-express-v1"));
        assert!(models.contains(&"amazon.titan-image-generator-v1"));
        assert_eq!(
            models.len(),
            TextClient::SUPPORTED_MODELS.len() + ImageClient::SUPPORTED_MODELS.len()
        );
    }
}
