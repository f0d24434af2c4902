//! Typed async client for the inspection API, used by PDA-side tooling.
//!
//! Two call shapes, one per kind of endpoint:
//! - `execute_command` returns the whole envelope, whatever its result code;
//! - `execute_request` returns the payload only when the call succeeded and
//!   `None` otherwise.

pub mod detect;
pub mod process;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::endpoints::health::HealthResponse;
use crate::api::types::ApiResponse;

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Inspection service is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Inspection service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response: {0}")]
    ResponseParsing(String),
}

/// HTTP client bound to one inspection service base URL.
#[derive(Debug, Clone)]
pub struct PdaClient {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl PdaClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.base_url, path.trim_start_matches('/')))
    }

    pub fn get(&self, path: &str, query: &[(&str, &str)]) -> RequestBuilder {
        self.request(Method::GET, path).query(query)
    }

    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.request(Method::POST, path).json(body)
    }

    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> RequestBuilder {
        self.request(Method::PUT, path).json(body)
    }

    /// `GET /api/health`, the one route that is not wrapped in an envelope.
    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self
            .get("api/health", &[])
            .send()
            .await
            .map_err(|e| ClientError::Connection(format!("{}: {e}", self.base_url)))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ClientError::ResponseParsing(e.to_string()))
    }

    /// Send a request and return the envelope as-is.
    ///
    /// Rejections (HTTP 400/500) still carry an envelope and are returned as
    /// `Ok`; only transport failures and non-envelope bodies are errors.
    pub async fn execute_command(
        &self,
        request: RequestBuilder,
    ) -> Result<ApiResponse<Value>, ClientError> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                ClientError::Http(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                ClientError::Http(e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        match serde_json::from_str::<ApiResponse<Value>>(&body) {
            Ok(envelope) => {
                if envelope.is_success() {
                    tracing::debug!(status = status.as_u16(), "Command succeeded");
                } else {
                    tracing::warn!(
                        status = status.as_u16(),
                        result_code = envelope.result_code,
                        msg = %envelope.msg,
                        "Command not successful"
                    );
                }
                Ok(envelope)
            }
            Err(_) if !status.is_success() => Err(ClientError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(ClientError::ResponseParsing(e.to_string())),
        }
    }

    /// Send a request and decode its payload when the call succeeded.
    pub async fn execute_request<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ClientError> {
        let envelope = self.execute_command(request).await?;
        if !envelope.is_success() {
            return Ok(None);
        }
        match envelope.result_data {
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| ClientError::ResponseParsing(e.to_string())),
            None => Ok(None),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::live_client;
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = PdaClient::new("http://10.0.0.5:5080/", 5).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:5080");
    }

    #[tokio::test]
    async fn health_round_trip() {
        let (server, client) = live_client().await;
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "ok");
        assert!(health.database);
        server.stop().await;
    }

    #[tokio::test]
    async fn command_returns_rejection_envelope() {
        let (server, client) = live_client().await;
        let envelope = client
            .execute_command(client.get("api/Detect1/GetMotorWormDetect", &[("motor_id", "")]))
            .await
            .unwrap();
        assert_eq!(envelope.result_code, crate::api::types::RESULT_FAILURE);
        assert_eq!(envelope.msg, "motor_id must not be empty");
        server.stop().await;
    }

    #[tokio::test]
    async fn malformed_body_returns_envelope() {
        let (server, client) = live_client().await;
        let body = serde_json::json!({"motor_id": "M-1", "distance_after": "abc"});
        let envelope = client
            .execute_command(client.put("api/Detect1/UpdateLatestDetect", &body))
            .await
            .unwrap();
        assert_eq!(envelope.result_code, crate::api::types::RESULT_FAILURE);
        server.stop().await;
    }

    #[tokio::test]
    async fn non_envelope_error_is_status_error() {
        let (server, client) = live_client().await;
        let err = client
            .execute_command(client.get("api/Nope", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 404, .. }));
        server.stop().await;
    }

    #[tokio::test]
    async fn unreachable_service_is_connection_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PdaClient::new(&format!("http://{addr}"), 2).unwrap();
        let err = client
            .execute_command(client.get("api/health", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
    }
}
