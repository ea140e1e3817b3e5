//! Mock Flow API for integration tests
//!
//! Wraps a `wiremock` server that answers both adapter endpoints with
//! canned bodies and records what it received.

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETIONS: &str = "/v1/openai/chat/completions";
pub const INVOKE: &str = "/v1/bedrock/invoke";

/// Mock Flow backend
pub struct MockFlow {
    server: MockServer,
}

impl MockFlow {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to put in `[endpoint] base_url`
    ///
    /// Carries a path prefix like the real service does.
    pub fn base_url(&self) -> String {
        format!("{}/ai-orchestration-api", self.server.uri())
    }

    /// Answer `endpoint` with `status` and a JSON body
    pub async fn reply(&self, endpoint: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/ai-orchestration-api{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `endpoint` with `status` and a plain text body
    pub async fn fail(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/ai-orchestration-api{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Requests received on `endpoint`, oldest first
    pub async fn requests(&self, endpoint: &str) -> Vec<wiremock::Request> {
        let prefixed = format!("/ai-orchestration-api{endpoint}");
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == prefixed)
            .collect()
    }

    /// JSON body of the `n`th request on `endpoint`
    pub async fn sent_body(&self, endpoint: &str, n: usize) -> Value {
        self.requests(endpoint).await[n].body_json().expect("request body is JSON")
    }
}
