//! Gemini `generateContent` client.

use serde::{Deserialize, Serialize};

use super::{CardGenerator, GenerationError};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

fn request_body(prompt: &str) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![Part { text: prompt }],
        }],
    }
}

/// Concatenated text parts of the first candidate
fn candidate_text(response: &GenerateContentResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| content.parts.iter().map(|p| p.text.as_str()).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}

/// HTTP client bound to one API key
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Result<Self, GenerationError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: format!("{}/models/{}:generateContent", API_BASE, MODEL),
        })
    }
}

impl CardGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;
        candidate_text(&parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let json = serde_json::to_value(request_body("hello")).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[\"a\", "}, {"text": "\"b\"]"}], "role": "model"}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(candidate_text(&parsed).unwrap(), r#"["a", "b"]"#);
    }

    #[test]
    fn test_candidate_text_empty() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(candidate_text(&parsed), Err(GenerationError::EmptyResponse));
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert_eq!(candidate_text(&parsed), Err(GenerationError::EmptyResponse));
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "API key not valid.");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn test_client_requires_key() {
        assert_eq!(GeminiClient::new("  ").unwrap_err(), GenerationError::MissingApiKey);
        let client = GeminiClient::new(" abc ").unwrap();
        assert_eq!(client.api_key, "abc");
        assert!(client.endpoint.ends_with("gemini-1.5-flash:generateContent"));
    }
}
