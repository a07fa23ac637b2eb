use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::Config;
use crate::error::{InsightError, Result};

/// Outbound HTTP adapter for the InsightOps REST API. One authenticated GET
/// per call; the response is classified into exactly one outcome.
/// Not Debug: it holds the API key.
#[derive(Clone)]
pub struct InsightClient {
    http: reqwest::Client,
    api_key: String,
}

impl InsightClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
        }
    }

    /// Classification order, first match wins:
    /// 1. the request never completed -> Transport
    /// 2. non-2xx status -> Http, body not inspected
    /// 3. 2xx without a JSON content-type -> UnexpectedFormat with the raw body
    /// 4. 2xx JSON -> the parsed body, relayed without schema validation
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "outbound GET");
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "upstream returned error status");
            return Err(InsightError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("application/json"))
            .unwrap_or(false);
        if !is_json {
            let body = response
                .text()
                .await
                .map_err(|e| InsightError::Transport(e.to_string()))?;
            return Err(InsightError::UnexpectedFormat { body });
        }

        response
            .json()
            .await
            .map_err(|e| InsightError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> InsightClient {
        InsightClient::new(&Config {
            api_key: "test-key".to_string(),
            base_url: String::new(),
        })
    }

    #[tokio::test]
    async fn success_requires_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/management/logsets"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"logsets": []})))
            .expect(1)
            .mount(&server)
            .await;

        let body = client()
            .get_json(&format!("{}/management/logsets", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, json!({"logsets": []}));
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("ignored body"))
            .mount(&server)
            .await;

        let err = client().get_json(&server.uri()).await.err().unwrap();
        match err {
            InsightError::Http { status, status_text } => {
                assert_eq!(status, 404);
                assert_eq!(status_text, "Not Found");
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn success_status_without_json_content_type_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>maintenance</html>", "text/html"))
            .mount(&server)
            .await;

        let err = client().get_json(&server.uri()).await.err().unwrap();
        match err {
            InsightError::UnexpectedFormat { body } => {
                assert_eq!(body, "<html>maintenance</html>");
            }
            e => panic!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn missing_content_type_is_format_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .mount(&server)
            .await;

        let err = client().get_json(&server.uri()).await.err().unwrap();
        assert!(matches!(err, InsightError::UnexpectedFormat { .. }));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_transport_error() {
        // Nothing listens on port 1.
        let err = client().get_json("http://127.0.0.1:1/x").await.err().unwrap();
        match err {
            InsightError::Transport(msg) => assert!(!msg.is_empty()),
            e => panic!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn charset_suffix_still_counts_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{\"n\": 1}", "application/json; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let body = client().get_json(&server.uri()).await.unwrap();
        assert_eq!(body, json!({"n": 1}));
    }
}
