use super::{
    models::{PredictInstance, PredictParameters, PredictRequest, PredictResponse},
    GeminiTransport,
};
use crate::{
    error::{GenError, Result},
    models::{GeneratedImage, ImageGenerationRequest},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

#[derive(Clone)]
pub struct GeminiImageClient {
    transport: GeminiTransport,
}

impl GeminiImageClient {
    pub fn new(transport: GeminiTransport) -> Self {
        Self { transport }
    }

    pub async fn generate(&self, request: ImageGenerationRequest) -> Result<Vec<GeneratedImage>> {
        let payload = PredictRequest {
            instances: vec![PredictInstance {
                prompt: request.prompt,
            }],
            parameters: PredictParameters {
                sample_count: request.num_images.max(1),
                aspect_ratio: aspect_ratio(request.width, request.height),
            },
        };

        log::info!("Generating image with model: {}", request.model_id);

        let response: PredictResponse = self
            .transport
            .post_json(&format!("models/{}:predict", request.model_id), &payload)
            .await?;

        decode_predictions(response)
    }
}

// Imagen takes an aspect ratio rather than pixel sizes.
fn aspect_ratio(width: Option<u32>, height: Option<u32>) -> Option<String> {
    let (w, h) = (u64::from(width?), u64::from(height?));
    let ratio = match (w, h) {
        _ if w == h => "1:1",
        _ if w * 3 == h * 4 => "4:3",
        _ if w * 4 == h * 3 => "3:4",
        _ if w * 9 == h * 16 => "16:9",
        _ if w * 16 == h * 9 => "9:16",
        _ => return None,
    };
    Some(ratio.to_string())
}

pub fn decode_predictions(response: PredictResponse) -> Result<Vec<GeneratedImage>> {
    let mut images = Vec::new();
    let mut filtered = Vec::new();

    for prediction in response.predictions {
        match prediction.bytes_base64_encoded {
            Some(encoded) => {
                let bytes = STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| GenError::ResponseError(format!("Invalid image data: {}", e)))?;
                images.push(GeneratedImage {
                    bytes,
                    mime_type: prediction.mime_type,
                });
            }
            None => {
                if let Some(reason) = prediction.rai_filtered_reason {
                    log::warn!("Image filtered by the service: {}", reason);
                    filtered.push(reason);
                }
            }
        }
    }

    if images.is_empty() {
        let message = match filtered.first() {
            Some(reason) => format!("No images generated ({})", reason),
            None => "No images generated".to_string(),
        };
        return Err(GenError::ResponseError(message));
    }

    Ok(images)
}
