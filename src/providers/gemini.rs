use crate::core::error::AitripError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Google Gemini. The token travels as the `key` query parameter, the
/// system prompt as a dedicated `system_instruction` block.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: HttpClient,
    model: String,
}

impl GeminiProvider {
    pub fn new(base_url: String, api_key: &str, model: String) -> Self {
        let mut client = HttpClient::new(base_url, None, None);
        client.add_query_param("key", api_key.to_string());
        Self { client, model }
    }

    fn build_payload(&self, messages: &[Message]) -> GeminiRequest {
        let system_instruction = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| SystemInstruction {
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            });

        let contents = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: m.content.clone(),
                }],
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
        }
    }

    fn parse_response(body: &str) -> Result<String, AitripError> {
        let parsed: GeminiResponse = serde_json::from_str(body)
            .map_err(|e| AitripError::MalformedResponse(format!("Gemini response: {}", e)))?;

        parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| {
                AitripError::MalformedResponse("no candidates in Gemini response".to_string())
            })
    }
}

#[async_trait]
impl PlanProvider for GeminiProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let payload = self.build_payload(messages);
        let path = format!("v1beta/models/{}:generateContent", self.model);
        let response = self.client.post(&path, &payload).await?;
        let response_body = response.text().await?;
        Self::parse_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> GeminiProvider {
        GeminiProvider::new(
            "https://generativelanguage.googleapis.com".to_string(),
            "key-test",
            "gemini-1.5-pro".to_string(),
        )
    }

    #[test]
    fn payload_splits_system_from_user_turns() {
        let payload = provider().build_payload(&[
            Message::system("You plan trips."),
            Message::user("Book a ryokan"),
        ]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value["system_instruction"]["parts"][0]["text"],
            json!("You plan trips.")
        );
        assert_eq!(value["contents"][0]["role"], json!("user"));
        assert_eq!(value["contents"][0]["parts"][0]["text"], json!("Book a ryokan"));

        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn extracts_reply_from_candidate_parts() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "Sure thing."}], "role": "model"}}]}"#;
        assert_eq!(GeminiProvider::parse_response(body).unwrap(), "Sure thing.");
    }

    #[test]
    fn empty_candidates_is_malformed() {
        let err = GeminiProvider::parse_response(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));
    }
}
