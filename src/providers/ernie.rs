use crate::core::error::AitripError;
use crate::providers::base_client::HttpClient;
use crate::providers::{Message, PlanProvider, Role};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ErnieRequest {
    messages: Vec<ErnieMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
}

#[derive(Serialize)]
struct ErnieMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ErnieResponse {
    result: String,
}

/// Baidu ERNIE (Wenxin Workshop). The token travels as the `access_token`
/// query parameter, the system prompt as a top-level `system` field, and
/// the reply text sits directly under `result`.
#[derive(Clone, Debug)]
pub struct ErnieProvider {
    client: HttpClient,
    model: String,
}

impl ErnieProvider {
    pub fn new(base_url: String, access_token: &str, model: String) -> Self {
        let mut client = HttpClient::new(base_url, None, None);
        client.add_query_param("access_token", access_token.to_string());
        Self { client, model }
    }

    fn build_payload(&self, messages: &[Message]) -> ErnieRequest {
        let system = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone());

        let req_messages = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| ErnieMessage {
                role: "user".to_string(),
                content: m.content.clone(),
            })
            .collect();

        ErnieRequest {
            messages: req_messages,
            system,
        }
    }

    fn parse_response(body: &str) -> Result<String, AitripError> {
        let parsed: ErnieResponse = serde_json::from_str(body)
            .map_err(|e| AitripError::MalformedResponse(format!("ERNIE response: {}", e)))?;
        Ok(parsed.result)
    }
}

#[async_trait]
impl PlanProvider for ErnieProvider {
    async fn get_response(&self, messages: &[Message]) -> Result<String, AitripError> {
        let payload = self.build_payload(messages);
        let path = format!("rpc/2.0/ai_custom/v1/wenxinworkshop/chat/{}", self.model);
        let response = self.client.post(&path, &payload).await?;
        let response_body = response.text().await?;
        Self::parse_response(&response_body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> ErnieProvider {
        ErnieProvider::new(
            "https://aip.baidubce.com".to_string(),
            "token-test",
            "ernie-4.0-8k".to_string(),
        )
    }

    #[test]
    fn payload_lifts_system_prompt_out_of_messages() {
        let payload = provider().build_payload(&[
            Message::system("You plan trips."),
            Message::user("Find a cheaper hotel"),
        ]);

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["system"], json!("You plan trips."));
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
        assert_eq!(value["messages"][0]["role"], json!("user"));

        let round_trip: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(round_trip, value);
    }

    #[test]
    fn extracts_reply_from_result_field() {
        let body = r#"{"id": "as-1", "result": "Found one near the station."}"#;
        assert_eq!(
            ErnieProvider::parse_response(body).unwrap(),
            "Found one near the station."
        );
    }

    #[test]
    fn missing_result_is_malformed() {
        let err = ErnieProvider::parse_response(r#"{"id": "as-1"}"#).unwrap_err();
        assert!(matches!(err, AitripError::MalformedResponse(_)));
    }
}
