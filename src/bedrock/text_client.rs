use super::map_sdk_error;
use crate::{
    error::{GenError, Result},
    models::TextGenerationRequest,
};
use aws_sdk_bedrockruntime::{primitives::Blob, Client};
use serde_json::{json, Value};

#[derive(Clone)]
pub struct TextClient {
    client: Client,
}

impl TextClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub const SUPPORTED_MODELS: &'static [&'static str] = &[
        "amazon.titan-text-express-v1",
        "amazon.titan-text-lite-v1",
        "anthropic.claude-3-haiku-20240307-v1:0",
        "anthropic.claude-3-5-sonnet-20240620-v1:0",
        "meta.llama3-8b-instruct-v1:0",
        "mistral.mistral-7b-instruct-v0:2",
        "cohere.command-text-v14",
        "ai21.j2-ultra-v1",
    ];

    pub async fn generate(&self, request: TextGenerationRequest) -> Result<String> {
        let model_id = request.model_id.as_str();
        let request_payload = build_request_payload(&request)?;
        let request_json = serde_json::to_string(&request_payload)
            .map_err(|e| GenError::SerializationError(e.to_string()))?;

        log::info!("Invoking model: {}", model_id);
        log::debug!("Text generation request payload: {}", request_json);

        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| map_sdk_error("text generation", e))?;

        let response_bytes = response.body.into_inner();
        let body: Value = serde_json::from_slice(&response_bytes)
            .map_err(|e| GenError::ResponseError(e.to_string()))?;

        parse_text_response(model_id, &body)
    }
}

fn is_claude(model_id: &str) -> bool {
    model_id.starts_with("anthropic.claude") || model_id.starts_with("arn:aws:bedrock")
}

pub fn build_request_payload(request: &TextGenerationRequest) -> Result<Value> {
    let max_tokens = request.max_tokens.unwrap_or(512);
    let temperature = request.temperature.unwrap_or(0.7);

    let payload = match request.model_id.as_str() {
        id if id.starts_with("amazon.titan") => json!({
            "inputText": request.prompt,
            "textGenerationConfig": {
                "maxTokenCount": max_tokens,
                "temperature": temperature,
                "topP": 0.9
            }
        }),
        id if is_claude(id) => json!({
            "messages": [
                {
                    "role": "user",
                    "content": request.prompt
                }
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
            "anthropic_version": "bedrock-2023-05-31"
        }),
        id if id.starts_with("meta.llama") => json!({
            "prompt": request.prompt,
            "max_gen_len": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
        id if id.starts_with("mistral.") => json!({
            "prompt": request.prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "top_p": 0.9
        }),
        id if id.starts_with("cohere.command") => json!({
            "prompt": request.prompt,
            "max_tokens": max_tokens,
            "temperature": temperature,
            "p": 0.9
        }),
        id if id.starts_with("ai21.") => json!({
            "prompt": request.prompt,
            "maxTokens": max_tokens,
            "temperature": temperature,
            "topP": 0.9
        }),
        other => {
            return Err(GenError::RequestError(format!(
                "Unsupported model ID: {}",
                other
            )))
        }
    };

    Ok(payload)
}

pub fn parse_text_response(model_id: &str, body: &Value) -> Result<String> {
    let text = match model_id {
        id if id.starts_with("amazon.titan") => body["results"][0]["outputText"].as_str(),
        id if is_claude(id) => body["content"][0]["text"].as_str(),
        id if id.starts_with("meta.llama") => body["generation"].as_str(),
        id if id.starts_with("mistral.") => body["outputs"][0]["text"].as_str(),
        id if id.starts_with("cohere.command") => body["generations"][0]["text"].as_str(),
        id if id.starts_with("ai21.") => body["completions"][0]["data"]["text"].as_str(),
        _ => None,
    };

    text.map(String::from).ok_or_else(|| {
        GenError::ResponseError(format!("No generated text in response from {}", model_id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titan_payload_and_response() {
        let request = TextGenerationRequest::new("amazon.titan-text-express-v1", "a cat");
        let payload = build_request_payload(&request).unwrap();
        assert_eq!(payload["inputText"], "a cat");
        assert_eq!(payload["textGenerationConfig"]["maxTokenCount"], 512);

        let body = json!({
            "inputTextTokenCount": 3,
            "results": [{"outputText": " A cat in the rain", "completionReason": "FINISH"}]
        });
        assert_eq!(
            parse_text_response("amazon.titan-text-express-v1", &body).unwrap(),
            " A cat in the rain"
        );
    }

    #[test]
    fn test_claude_payload_and_response() {
        let request =
            TextGenerationRequest::new("anthropic.claude-3-haiku-20240307-v1:0", "a cat");
        let payload = build_request_payload(&request).unwrap();
        assert_eq!(payload["messages"][0]["content"], "a cat");
        assert_eq!(payload["anthropic_version"], "bedrock-2023-05-31");

        let body = json!({"content": [{"type": "text", "text": "Oil painting of a cat"}]});
        assert_eq!(
            parse_text_response("anthropic.claude-3-haiku-20240307-v1:0", &body).unwrap(),
            "Oil painting of a cat"
        );
    }

    #[test]
    fn test_unsupported_model() {
        let request = TextGenerationRequest::new("openai.gpt-4", "a cat");
        assert!(build_request_payload(&request).is_err());
    }

    #[test]
    fn test_missing_text_is_error() {
        let body = json!({"results": []});
        assert!(parse_text_response("amazon.titan-text-express-v1", &body).is_err());
    }
}
