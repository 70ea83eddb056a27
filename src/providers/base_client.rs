use crate::core::error::AitripError;
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Thin wrapper over one vendor endpoint: fixed base URL, the vendor's auth
/// mechanism (header or query parameter), and a single JSON POST.
#[derive(Clone, Debug)]
pub struct HttpClient {
    base_url: String,
    auth_header: Option<(String, String)>,
    query_params: Vec<(String, String)>,
    extra_headers: HashMap<String, String>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Self {
        Self {
            base_url,
            auth_header,
            query_params: Vec::new(),
            extra_headers: extra_headers.unwrap_or_default(),
        }
    }

    /// Some vendors (Gemini, ERNIE) carry the token as a query parameter.
    pub fn add_query_param(&mut self, key: &str, value: String) {
        self.query_params.push((key.to_string(), value));
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, AitripError> {
        let client = Client::builder().build()?;
        let url = format!("{}/{}", self.base_url, path);

        let mut request = client.post(&url).header("Content-Type", "application/json");

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        for (key, value) in &self.extra_headers {
            request = request.header(key, value);
        }
        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        let response = request.json(payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = vendor_error_message(&body).unwrap_or_else(|| {
                format!(
                    "AI service call failed with status {}. Check your network or API token.",
                    status
                )
            });
            return Err(AitripError::Api(message));
        }

        Ok(response)
    }
}

/// Best-effort extraction of a human-readable message from a vendor error
/// body. OpenAI-style `error.message` first, then ERNIE's `error_msg`,
/// then a bare `message`.
pub fn vendor_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .and_then(Value::as_str)
        .or_else(|| value.get("error_msg").and_then(Value::as_str))
        .or_else(|| value.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_openai_style_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(
            vendor_error_message(body).as_deref(),
            Some("Incorrect API key provided")
        );
    }

    #[test]
    fn reads_ernie_style_error_message() {
        let body = r#"{"error_code": 110, "error_msg": "Access token invalid"}"#;
        assert_eq!(
            vendor_error_message(body).as_deref(),
            Some("Access token invalid")
        );
    }

    #[test]
    fn falls_through_on_unrecognized_bodies() {
        assert_eq!(vendor_error_message("<html>502</html>"), None);
        assert_eq!(vendor_error_message(r#"{"status": "down"}"#), None);
    }
}
