use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenerationRequest {
    pub prompt: String,
    pub model_id: String,
    pub max_tokens: Option<i32>,
    pub temperature: Option<f32>,
}

impl TextGenerationRequest {
    pub fn new(model_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model_id: model_id.into(),
            max_tokens: None,
            temperature: None,
        }
    }
}
