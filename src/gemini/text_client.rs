use super::{
    models::{Content, GenerateContentRequest, GenerateContentResponse, Part},
    GeminiTransport,
};
use crate::{
    error::{GenError, Result},
    models::TextGenerationRequest,
};

#[derive(Clone)]
pub struct GeminiTextClient {
    transport: GeminiTransport,
}

impl GeminiTextClient {
    pub fn new(transport: GeminiTransport) -> Self {
        Self { transport }
    }

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<String> {
        let payload = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: request.prompt,
                }],
            }],
        };

        log::info!("Invoking model: {}", request.model_id);

        let response: GenerateContentResponse = self
            .transport
            .post_json(
                &format!("models/{}:generateContent", request.model_id),
                &payload,
            )
            .await?;

        extract_text(response)
    }
}

/// Concatenates the text parts of the first candidate.
pub fn extract_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(GenError::ResponseError(format!("Prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| GenError::ResponseError("No candidates returned".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GenError::ResponseError(format!(
            "Empty response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}
