use super::map_sdk_error;
use crate::{
    error::{GenError, Result},
    models::{GeneratedImage, ImageGenerationRequest},
};
use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
}

impl ImageClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub const SUPPORTED_MODELS: &'static [&'static str] = &[
        "amazon.titan-image-generator-v1",
        "amazon.titan-image-generator-v2:0",
        "stability.stable-diffusion-xl-v1",
    ];

    pub async fn generate(&self, request: ImageGenerationRequest) -> Result<Vec<GeneratedImage>> {
        let model_id = request.model_id.as_str();
        let request_payload = build_image_payload(&request)?;
        let request_json = serde_json::to_string(&request_payload)
            .map_err(|e| GenError::SerializationError(e.to_string()))?;

        log::info!("Generating image with model: {}", model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| map_sdk_error("image generation", e))?;

        let response_bytes = response.body.into_inner();
        let body: Value = serde_json::from_slice(&response_bytes)
            .map_err(|e| GenError::ResponseError(e.to_string()))?;

        parse_image_response(model_id, &body)
    }
}

pub fn build_image_payload(request: &ImageGenerationRequest) -> Result<Value> {
    let width = request.width.unwrap_or(1024);
    let height = request.height.unwrap_or(1024);

    let payload = match request.model_id.as_str() {
        id if id.starts_with("amazon.titan-image-generator") => json!({
            "taskType": "TEXT_IMAGE",
            "textToImageParams": {
                "text": request.prompt
            },
            "imageGenerationConfig": {
                "numberOfImages": request.num_images.max(1),
                "width": width,
                "height": height,
                "quality": "standard",
                "cfgScale": 8.0
            }
        }),
        id if id.starts_with("stability.stable-diffusion-xl") => json!({
            "text_prompts": [{ "text": request.prompt }],
            "cfg_scale": 7,
            "steps": 30,
            "samples": request.num_images.max(1),
            "width": width,
            "height": height
        }),
        other => {
            return Err(GenError::RequestError(format!(
                "Unsupported image model: {}",
                other
            )))
        }
    };

    Ok(payload)
}

pub fn parse_image_response(model_id: &str, body: &Value) -> Result<Vec<GeneratedImage>> {
    let encoded: Vec<&str> = if model_id.starts_with("stability.") {
        body["artifacts"]
            .as_array()
            .map(|a| a.iter().filter_map(|x| x["base64"].as_str()).collect())
            .unwrap_or_default()
    } else {
        body["images"]
            .as_array()
            .map(|a| a.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    };

    if encoded.is_empty() {
        let reason = body["error"].as_str().unwrap_or("no images in response");
        return Err(GenError::ResponseError(format!(
            "No images generated: {}",
            reason
        )));
    }

    encoded
        .into_iter()
        .map(|data| {
            STANDARD
                .decode(data)
                .map(GeneratedImage::png)
                .map_err(|e| GenError::ResponseError(format!("Invalid image data: {}", e)))
        })
        .collect()
}
