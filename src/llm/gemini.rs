use super::{api_error, ChatRequest, ChatResponse, LlmError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

fn build_request(request: &ChatRequest) -> GeminiRequest {
    let system_instruction = request
        .messages
        .iter()
        .find(|m| m.role == "system")
        .map(|m| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: m.content.clone(),
            }],
        });

    // Gemini names the assistant side "model".
    let contents = request
        .messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| GeminiContent {
            role: Some(if m.role == "assistant" { "model" } else { "user" }.to_string()),
            parts: vec![GeminiPart {
                text: m.content.clone(),
            }],
        })
        .collect();

    GeminiRequest {
        contents,
        system_instruction,
        generation_config: GenerationConfig {
            temperature: request.temperature,
            max_output_tokens: request.max_tokens,
        },
    }
}

fn parse_response(data: GeminiResponse) -> Result<String, LlmError> {
    let content = data
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = content.parts.into_iter().map(|p| p.text).collect();
    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

pub async fn chat(config: &GeminiConfig, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
    let client = Client::new();
    let body = build_request(request);

    debug!(model = %request.model, "sending Gemini generateContent");

    let resp = client
        .post(format!(
            "{}/models/{}:generateContent",
            config.base_url, request.model
        ))
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", &config.api_key)
        .json(&body)
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(api_error(resp).await);
    }

    let data: GeminiResponse = resp.json().await?;
    let content = parse_response(data)?;

    Ok(ChatResponse {
        content,
        model: request.model.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ChatMessage;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            messages: vec![ChatMessage::user("When is the deadline?")],
            model: "gemini-1.5-flash".into(),
            temperature: 0.0,
            max_tokens: 2048,
        };
        let body = serde_json::to_value(build_request(&request)).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "When is the deadline?");
        assert_eq!(body["generationConfig"]["temperature"], 0.0);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_parse_joins_parts() {
        let data: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"The deadline is "},{"text":"**March 1**."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parse_response(data).unwrap(), "The deadline is **March 1**.");
    }

    #[test]
    fn test_parse_blocked_candidate() {
        let data: GeminiResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(matches!(parse_response(data), Err(LlmError::EmptyResponse)));
    }
}
