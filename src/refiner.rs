use crate::{
    error::{GenError, Result},
    models::TextGenerationRequest,
    services::TextService,
};
use std::sync::Arc;

pub const REFINEMENT_INSTRUCTION: &str = "You are an expert visual prompt engineer. \
Rewrite the following short description into a detailed, artistic image generation prompt. \
Focus on lighting, texture, style, and composition. Output ONLY the prompt text.";

/// Expands a raw prompt into a detailed image-generation prompt via a text model.
#[derive(Clone)]
pub struct PromptRefiner {
    service: Arc<dyn TextService>,
    model_id: String,
}

impl PromptRefiner {
    pub fn new(service: Arc<dyn TextService>, model_id: impl Into<String>) -> Self {
        Self {
            service,
            model_id: model_id.into(),
        }
    }

    pub fn build_request(&self, raw: &str) -> TextGenerationRequest {
        TextGenerationRequest::new(
            self.model_id.clone(),
            format!("{}\n\nInput: {}", REFINEMENT_INSTRUCTION, raw),
        )
    }

    pub async fn refine(&self, raw: &str) -> Result<String> {
        let request = self.build_request(raw);
        log::debug!("Refinement request: {} chars", request.prompt.len());

        let text = self
            .service
            .generate_text(request)
            .await
            .map_err(|e| GenError::RefinementError(e.to_string()))?;

        let refined = text.trim();
        if refined.is_empty() {
            return Err(GenError::RefinementError(
                "the model returned an empty prompt".into(),
            ));
        }

        Ok(refined.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<String>,
        seen: Mutex<Vec<TextGenerationRequest>>,
    }

    #[async_trait]
    impl TextService for Canned {
        async fn generate_text(&self, request: TextGenerationRequest) -> Result<String> {
            self.seen.lock().unwrap().push(request);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(GenError::RequestError(e.to_string())),
            }
        }
    }

    fn canned(reply: Result<String>) -> Arc<Canned> {
        Arc::new(Canned {
            reply,
            seen: Mutex::new(Vec::new()),
        })
    }

    #[tokio::test]
    async fn test_refine_trims_and_sends_instruction() {
        let service = canned(Ok("\n  A tabby cat, chiaroscuro lighting  \n".into()));
        let refiner = PromptRefiner::new(service.clone(), "gemini-2.0-flash");

        let refined = refiner.refine("a cat").await.unwrap();
        assert_eq!(refined, "A tabby cat, chiaroscuro lighting");

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].model_id, "gemini-2.0-flash");
        assert!(seen[0].prompt.starts_with(REFINEMENT_INSTRUCTION));
        assert!(seen[0].prompt.ends_with("\n\nInput: a cat"));
    }

    #[tokio::test]
    async fn test_service_failure_becomes_refinement_error() {
        let service = canned(Err(GenError::RequestError("503 Service Unavailable".into())));
        let refiner = PromptRefiner::new(service, "gemini-2.0-flash");

        let err = refiner.refine("a cat").await.unwrap_err();
        assert!(matches!(err, GenError::RefinementError(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_blank_reply_is_error() {
        let refiner = PromptRefiner::new(canned(Ok("   ".into())), "gemini-2.0-flash");
        assert!(refiner.refine("a cat").await.is_err());
    }
}
