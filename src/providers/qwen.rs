use crate::core::error::AitripError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct QwenRequest {
    model: String,
    input: QwenInput,
    parameters: QwenParameters,
}

#[derive(Serialize)]
struct QwenInput {
    messages: Vec<QwenMessage>,
}

#[derive(Serialize)]
struct QwenMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct QwenParameters {
    result_format: String,
}

#[derive(Deserialize)]
struct QwenResponse {
    output: QwenOutput,
}

#[derive(Deserialize)]
struct QwenOutput {
    choices: Vec<QwenChoice>,
}

#[derive(Deserialize)]
struct QwenChoice {
    message: QwenReply,
}

#[derive(Deserialize)]
struct QwenReply {
    content: String,
}

/// Alibaba DashScope text-generation API, serving both qwen-max and
/// qwen-turbo. Messages nest under `input`, the reply under
/// `output.choices[0].message.content` (with `result_format: message`).
#[derive(Clone, Debug)]
pub struct QwenProvider {
    client: HttpClient,
    model: String,
}

impl QwenProvider {
    pub fn new(base_url: String, api_key: &str, model: String) -> Self {
        let auth_header = Some(("Authorization".to_string(), format!("Bearer {}", api_key)));
        Self {
            client: HttpClient::new(base_url, auth_header, None),
            model,
        }
    }

    fn build_payload(&self, messages: &[Message]) -> QwenRequest {
        let req_messages = messages
            .iter()
            .map(|m| QwenMessage {
                role: match m.role {
                    Role::System => "system".to_string(),
                    Role::User => "user".to_string(),
                },
                content: m.content.clone(),
            })
            .collect();

        QwenRequest {
            model: self.model.clone(),
            input: QwenInput {
                messages: req_messages,
            },
            parameters: QwenParameters {
                result_format: "message".to_string(),
            },
        }
    }

    fn parse_response(body: &str) -> Result<String, AitripError> {
        let parsed: QwenResponse = serde_json::from_str(body)
            .map_err(|e| AitripError::MalformedResponse(format!("DashScope response: {}", e)))?;

        parsed
            .output
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| {
                AitripError::MalformedResponse("no choices in DashScope output".to_string())
            })
    }
}

#[async_trait]
impl PlanProvider for QwenProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let payload = self.build_payload(messages);
        let response = self
            .client
            .post("api/v1/services/aigc/text-generation/generation", &payload)
            .await?;
        let response_body = response.text().await?;
        Self::parse_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> QwenProvider {
        QwenProvider::new(
            "https://dashscope.aliyuncs.com".to_string(),
            "sk-test",
            "qwen-max".to_string(),
        )
    }

    #[test]
    fn payload_nests_messages_under_input() {
        let payload = provider().build_payload(&[
            Message::system("You plan trips."),
            Message::user("Swap day 2 and day 3"),
        ]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["model"], json!("qwen-max"));
        assert_eq!(value["input"]["messages"][1]["role"], json!("user"));
        assert_eq!(value["parameters"]["result_format"], json!("message"));

        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn extracts_reply_from_output_choices() {
        let body = r#"{"output": {"choices": [{"message": {"role": "assistant", "content": "Swapped."}}]}}"#;
        assert_eq!(QwenProvider::parse_response(body).unwrap(), "Swapped.");
    }

    #[test]
    fn missing_output_is_malformed() {
        let err = QwenProvider::parse_response(r#"{"request_id": "abc"}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));
    }
}
