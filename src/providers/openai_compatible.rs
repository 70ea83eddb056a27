use crate::core::error::AitripError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatCompletionMessage>,
}

#[derive(Serialize)]
struct ChatCompletionMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageContent,
}

#[derive(Deserialize)]
struct MessageContent {
    content: String,
}

/// Chat-completion vendors sharing the OpenAI wire shape (OpenAI itself,
/// Doubao on Volcano Engine ARK). Bearer auth, reply text at
/// `choices[0].message.content`.
#[derive(Clone, Debug)]
pub struct OpenAICompatibleProvider {
    client: HttpClient,
    model: String,
}

impl OpenAICompatibleProvider {
    pub fn new(base_url: String, api_key: &str, model: String) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self {
            client: HttpClient::new(base_url, auth_header, None),
            model,
        }
    }

    fn build_payload(&self, messages: &[Message]) -> ChatCompletionRequest {
        let req_messages = messages
            .iter()
            .map(|m| ChatCompletionMessage {
                role: match m.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                },
                content: m.content.clone(),
            })
            .collect();

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: req_messages,
        }
    }

    fn parse_response(body: &str) -> Result<String, AitripError> {
        let parsed: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|e| AitripError::MalformedResponse(format!("chat completion: {}", e)))?;

        let content = parsed
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                AitripError::MalformedResponse("no choices in chat completion".to_string())
            })?;

        Ok(content)
    }
}

#[async_trait]
impl PlanProvider for OpenAICompatibleProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let payload = self.build_payload(messages);
        let response = self.client.post("chat/completions", &payload).await?;
        let response_body = response.text().await?;
        Self::parse_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> OpenAICompatibleProvider {
        OpenAICompatibleProvider::new(
            "https://api.openai.com/v1".to_string(),
            "sk-test",
            "gpt-4o".to_string(),
        )
    }

    #[test]
    fn payload_serializes_losslessly() {
        let payload = provider().build_payload(&[
            Message::system("You plan trips."),
            Message::user("Add a day in Osaka"),
        ]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["model"], json!("gpt-4o"));
        assert_eq!(value["messages"][0]["role"], json!("system"));
        assert_eq!(value["messages"][1]["content"], json!("Add a day in Osaka"));

        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn extracts_reply_from_expected_path() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": " Plan updated. "}}]}"#;
        assert_eq!(
            OpenAICompatibleProvider::parse_response(body).unwrap(),
            "Plan updated."
        );
    }

    #[test]
    fn missing_reply_path_is_malformed() {
        let err = OpenAICompatibleProvider::parse_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));

        let err = OpenAICompatibleProvider::parse_response(r#"{"id": "x"}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));
    }
}
