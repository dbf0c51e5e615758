use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::ExecConfig;
use crate::error::{ExecError, Result};

/// Client for the remote code-exec endpoint.
///
/// Performs one HTTP POST per call carrying the code snippet, authorized
/// with the configured bearer token, and returns the captured
/// stdout/stderr text verbatim. No retries, no response parsing.
pub struct ExecClient {
    config: ExecConfig,
    http: reqwest::Client,
}

/// JSON body posted to the endpoint. Optional keys are omitted when unset,
/// matching what the eval server expects.
#[derive(Serialize)]
struct ExecRequest<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    files: Option<&'a HashMap<String, String>>,
    #[serde(skip_serializing_if = "is_false")]
    strace: bool,
    #[serde(skip_serializing_if = "is_false")]
    interpreter_mode: bool,
}

fn is_false(b: &bool) -> bool {
    !b
}

impl ExecClient {
    /// Build a ready-to-use client from the given configuration.
    pub fn new(config: ExecConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("code-exec-client/0.1");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    /// Evaluate a snippet of code in the remote sandbox and return whatever
    /// it printed to standard output / standard error.
    ///
    /// The result is the raw response body. A non-2xx status surfaces as
    /// [`ExecError::Status`]; transport failures and timeouts surface as
    /// [`ExecError::Http`].
    pub async fn exec(&self, code: &str) -> Result<String> {
        if code.trim().is_empty() {
            return Err(ExecError::Config("Code snippet must not be empty".into()));
        }

        let body = ExecRequest {
            code,
            files: self.config.files.as_ref(),
            strace: self.config.strace,
            interpreter_mode: self.config.interpreter_mode,
        };

        debug!("Posting {} byte snippet to {}", code.len(), self.config.url);
        let response = self
            .http
            .post(self.config.url.clone())
            .bearer_auth(&self.config.bearer_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExecError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        debug!("Endpoint returned {} bytes", text.len());
        Ok(text)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ExecClient {
        let config = ExecConfig::new(server.uri(), "secret").unwrap();
        ExecClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_returns_body_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({"code": "print(6 * 7)"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("42"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.exec("print(6 * 7)").await.unwrap();
        assert_eq!(result, "42");
    }

    #[tokio::test]
    async fn test_body_preserved_without_trimming() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  42\n"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.exec("print(42)").await.unwrap(), "  42\n");
    }

    #[tokio::test]
    async fn test_optional_keys_omitted_by_default() {
        let server = MockServer::start().await;
        // Exact body match: only the code key goes over the wire.
        Mock::given(method("POST"))
            .and(body_json(json!({"code": "print(1)"})))
            .respond_with(ResponseTemplate::new(200).set_body_string("1"))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client.exec("print(1)").await.unwrap();
    }

    #[tokio::test]
    async fn test_optional_keys_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({
                "code": "print(open('data.txt').read())",
                "files": {"data.txt": "1 2 3"},
                "strace": true,
                "interpreter_mode": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("1 2 3"))
            .expect(1)
            .mount(&server)
            .await;

        let mut files = HashMap::new();
        files.insert("data.txt".to_string(), "1 2 3".to_string());
        let config = ExecConfig::new(server.uri(), "secret")
            .unwrap()
            .with_files(files)
            .with_strace(true)
            .with_interpreter_mode(true);
        let client = ExecClient::new(config).unwrap();
        let result = client.exec("print(open('data.txt').read())").await.unwrap();
        assert_eq!(result, "1 2 3");
    }

    #[tokio::test]
    async fn test_non_success_status_is_distinct_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("sandbox exploded"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.exec("print(1)").await.unwrap_err();
        match err {
            ExecError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "sandbox exploded");
            }
            other => panic!("expected Status error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_status_surfaces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;
        // Anything not matching the expected token gets a 401.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let config = ExecConfig::new(server.uri(), "wrong-token").unwrap();
        let client = ExecClient::new(config).unwrap();
        let err = client.exec("print(1)").await.unwrap_err();
        assert!(matches!(err, ExecError::Status { status: 401, .. }), "got: {err}");
    }

    #[tokio::test]
    async fn test_empty_code_rejected_before_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.exec("   ").await.unwrap_err();
        assert!(matches!(err, ExecError::Config(_)), "got: {err}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Port 9 (discard) is almost certainly closed.
        let config = ExecConfig::new("http://127.0.0.1:9/", "secret").unwrap();
        let client = ExecClient::new(config).unwrap();
        let err = client.exec("print(1)").await.unwrap_err();
        assert!(matches!(err, ExecError::Http(_)), "got: {err}");
    }
}
