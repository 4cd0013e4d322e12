use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub num_images: u32,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageGenerationRequest {
    pub fn new(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            num_images: 1,
            width: None,
            height: None,
        }
    }
}

/// Decoded image payload as returned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl GeneratedImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: Some("image/png".to_string()),
        }
    }
}
