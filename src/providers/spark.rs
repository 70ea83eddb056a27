use crate::core::error::AitripError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct SparkRequest {
    messages: Vec<SparkMessage>,
}

#[derive(Serialize)]
struct SparkMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct SparkResponse {
    payload: SparkPayload,
}

#[derive(Deserialize)]
struct SparkPayload {
    choices: SparkChoices,
}

#[derive(Deserialize)]
struct SparkChoices {
    text: Vec<SparkText>,
}

#[derive(Deserialize)]
struct SparkText {
    content: String,
}

/// iFlytek Spark. Bearer auth; the reply text is nested under
/// `payload.choices.text[0].content`.
#[derive(Clone, Debug)]
pub struct SparkProvider {
    client: HttpClient,
}

impl SparkProvider {
    pub fn new(base_url: String, api_key: &str) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self {
            client: HttpClient::new(base_url, auth_header, None),
        }
    }

    fn build_payload(&self, messages: &[Message]) -> SparkRequest {
        let req_messages = messages
            .iter()
            .map(|m| SparkMessage {
                role: match m.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                },
                content: m.content.clone(),
            })
            .collect();

        SparkRequest {
            messages: req_messages,
        }
    }

    fn parse_response(body: &str) -> Result<String, AitripError> {
        let parsed: SparkResponse = serde_json::from_str(body)
            .map_err(|e| AitripError::MalformedResponse(format!("Spark response: {}", e)))?;

        parsed
            .payload
            .choices
            .text
            .first()
            .map(|text| text.content.clone())
            .ok_or_else(|| {
                AitripError::MalformedResponse("no text in Spark response".to_string())
            })
    }
}

#[async_trait]
impl PlanProvider for SparkProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let payload = self.build_payload(messages);
        let response = self.client.post("v3.5/chat", &payload).await?;
        let response_body = response.text().await?;
        Self::parse_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> SparkProvider {
        SparkProvider::new("https://spark-api.xf-yun.com".to_string(), "key-test")
    }

    #[test]
    fn payload_keeps_chat_message_list() {
        let payload = provider().build_payload(&[
            Message::system("You plan trips."),
            Message::user("Add a tea ceremony"),
        ]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["messages"][0]["role"], json!("system"));
        assert_eq!(value["messages"][1]["content"], json!("Add a tea ceremony"));

        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn extracts_reply_from_nested_choices() {
        let body = r#"{"payload": {"choices": {"text": [{"content": "Added for day 2."}]}}}"#;
        assert_eq!(
            SparkProvider::parse_response(body).unwrap(),
            "Added for day 2."
        );
    }

    #[test]
    fn empty_text_is_malformed() {
        let err =
            SparkProvider::parse_response(r#"{"payload": {"choices": {"text": []}}}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));
    }
}
