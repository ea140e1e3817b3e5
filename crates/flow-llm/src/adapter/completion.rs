//! Chat completions through Flow's OpenAI-compatible endpoint

use std::sync::Arc;

use flow_config::{CompletionProfileConfig, Config, EndpointConfig};
use serde_json::{Map, Value};

use super::{build_transport, require_messages, unix_now};
use crate::error::FlowError;
use crate::log::LogSink;
use crate::normalize::normalize_completion;
use crate::protocol::build_payload;
use crate::protocol::completion::{FlowChatRequest, PROTECTED_KEYS};
use crate::transport::{FlowHeaders, Transport};
use crate::types::{CompletionRequest, Credentials, NormalizedResponse};

/// Path of the completion endpoint below the base URL
pub const COMPLETIONS_PATH: &str = "v1/openai/chat/completions";

/// Completion adapter bound to one profile
///
/// The profile decides which model Flow actually runs; the caller's model
/// only labels the normalized response when Flow does not report one.
#[derive(Debug)]
pub struct FlowCompletion {
    transport: Transport,
    profile: CompletionProfileConfig,
}

impl FlowCompletion {
    /// Create an adapter for an explicit profile
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Config` if the endpoint timeout is invalid or
    /// the HTTP client cannot be built.
    pub fn new(
        endpoint: &EndpointConfig,
        profile: CompletionProfileConfig,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, FlowError> {
        Ok(Self {
            transport: build_transport(endpoint, sink)?,
            profile,
        })
    }

    /// Create an adapter for a named profile from loaded configuration
    ///
    /// # Errors
    ///
    /// Returns `FlowError::ProfileNotFound` for an unknown profile name.
    pub fn from_config(config: &Config, profile: &str, sink: Arc<dyn LogSink>) -> Result<Self, FlowError> {
        let profile_config = config
            .completion_profile(profile)
            .cloned()
            .ok_or_else(|| FlowError::ProfileNotFound {
                profile: profile.to_owned(),
            })?;

        Self::new(&config.endpoint, profile_config, sink)
    }

    /// Model literal sent upstream
    pub fn model(&self) -> &str {
        &self.profile.model
    }

    /// Build the JSON body for `request` without sending it
    pub fn build_payload(&self, request: &CompletionRequest) -> Result<Map<String, Value>, FlowError> {
        require_messages(&request.messages)?;

        let params = &request.params;
        let wire = FlowChatRequest {
            model: &self.profile.model,
            messages: &request.messages,
            stream: request.stream,
            max_tokens: params.max_tokens,
            temperature: params.temperature.or(self.profile.temperature),
            top_p: params.top_p.or(self.profile.top_p),
            stop: params.stop.as_ref(),
            functions: params.functions.as_deref(),
            function_call: params.function_call.as_ref().filter(|v| !v.is_null()),
            tools: params.tools.as_deref(),
            tool_choice: params.tool_choice.as_ref().filter(|v| !v.is_null()),
        };

        build_payload(&wire, &request.extras, PROTECTED_KEYS)
    }

    /// Send a completion and normalize the reply
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        credentials: &Credentials,
    ) -> Result<NormalizedResponse, FlowError> {
        let payload = self.build_payload(request)?;

        let headers = FlowHeaders {
            tenant: &self.profile.tenant,
            agent: &self.profile.agent,
            operation_id: None,
        };

        let body = self
            .transport
            .post_json("completion", COMPLETIONS_PATH, &headers, credentials, &payload)
            .await?;

        Ok(normalize_completion(&body, &request.model, unix_now()))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tracing::Level;
    use url::Url;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::log::MemorySink;
    use crate::types::{ChatMessage, GenerationParams, StopSequences};

    fn endpoint(base_url: &str) -> EndpointConfig {
        EndpointConfig {
            base_url: Url::parse(base_url).unwrap(),
            ..EndpointConfig::default()
        }
    }

    fn adapter(server: &MockServer, sink: &Arc<MemorySink>) -> FlowCompletion {
        FlowCompletion::new(&endpoint(&server.uri()), CompletionProfileConfig::default(), sink.clone()).unwrap()
    }

    fn hello_request() -> CompletionRequest {
        CompletionRequest::new("gpt-4", vec![ChatMessage::user("hi")])
    }

    fn credentials() -> Credentials {
        Credentials::new("sk-test")
    }

    async fn mount_reply(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/v1/openai/chat/completions"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn sparse_reply_is_normalized() {
        let server = MockServer::start().await;
        mount_reply(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "abc",
                "choices": [{"message": {"role": "assistant", "content": "hello"}}]
            })),
        )
        .await;

        let sink = Arc::new(MemorySink::new());
        let before = unix_now();
        let response = adapter(&server, &sink)
            .complete(&hello_request(), &credentials())
            .await
            .unwrap();

        assert_eq!(response.id, "abc");
        assert_eq!(response.object, "chat.completion");
        assert_eq!(response.model, "gpt-4");
        assert!(response.created >= before);
        assert_eq!(response.choices[0].message.content, "hello");
        assert_eq!(response.choices[0].finish_reason, "stop");
        assert!(response.choices[0].message.tool_calls.is_empty());
        assert_eq!(response.usage.total_tokens, 0);
    }

    #[tokio::test]
    async fn request_carries_profile_model_and_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/openai/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(header("content-type", "application/json"))
            .and(header("flowtenant", "abi"))
            .and(header("flowagent", "openhands"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .expect(1)
            .mount(&server)
            .await;

        let sink = Arc::new(MemorySink::new());
        adapter(&server, &sink)
            .complete(&hello_request(), &credentials())
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_eq!(
            body,
            json!({
                "model": "o3-mini",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn generation_params_pass_through_when_present() {
        let completion =
            FlowCompletion::new(&EndpointConfig::default(), CompletionProfileConfig::default(), Arc::new(MemorySink::new()))
                .unwrap();

        let request = hello_request().with_params(GenerationParams {
            max_tokens: Some(256),
            temperature: Some(0.1),
            stop: Some(StopSequences::One("END".to_owned())),
            functions: Some(vec![json!({"name": "lookup", "parameters": {}})]),
            function_call: Some(json!("auto")),
            ..GenerationParams::default()
        });

        let payload = completion.build_payload(&request).unwrap();
        assert_eq!(payload["max_tokens"], 256);
        assert_eq!(payload["temperature"], 0.1);
        assert_eq!(payload["stop"], "END");
        assert_eq!(payload["functions"][0]["name"], "lookup");
        assert_eq!(payload["function_call"], "auto");
        assert!(!payload.contains_key("top_p"));
        assert!(!payload.contains_key("tools"));
    }

    #[test]
    fn profile_sampling_defaults_yield_to_caller() {
        let profile = CompletionProfileConfig {
            model: "gpt-4o".to_owned(),
            temperature: Some(0.2),
            top_p: Some(0.9),
            ..CompletionProfileConfig::default()
        };
        let completion = FlowCompletion::new(&EndpointConfig::default(), profile, Arc::new(MemorySink::new())).unwrap();

        let defaulted = completion.build_payload(&hello_request()).unwrap();
        assert_eq!(defaulted["model"], "gpt-4o");
        assert_eq!(defaulted["temperature"], 0.2);
        assert_eq!(defaulted["top_p"], 0.9);

        let overridden = completion
            .build_payload(&hello_request().with_params(GenerationParams {
                temperature: Some(1.0),
                ..GenerationParams::default()
            }))
            .unwrap();
        assert_eq!(overridden["temperature"], 1.0);
        assert_eq!(overridden["top_p"], 0.9);
    }

    #[test]
    fn extras_merge_without_nulls_or_model_override() {
        let completion =
            FlowCompletion::new(&EndpointConfig::default(), CompletionProfileConfig::default(), Arc::new(MemorySink::new()))
                .unwrap();

        let request = hello_request()
            .with_extra("reasoning_effort", json!("high"))
            .with_extra("user", Value::Null)
            .with_extra("model", json!("gpt-4"));

        let payload = completion.build_payload(&request).unwrap();
        assert_eq!(payload["reasoning_effort"], "high");
        assert!(!payload.contains_key("user"));
        assert_eq!(payload["model"], "o3-mini");
    }

    #[tokio::test]
    async fn empty_messages_are_rejected_before_sending() {
        let server = MockServer::start().await;
        let sink = Arc::new(MemorySink::new());

        let err = adapter(&server, &sink)
            .complete(&CompletionRequest::new("gpt-4", vec![]), &credentials())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::InvalidRequest(_)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_logs_response_body_once() {
        let server = MockServer::start().await;
        mount_reply(&server, ResponseTemplate::new(200).set_body_json(json!({"id": "abc"}))).await;

        let sink = Arc::new(MemorySink::new());
        adapter(&server, &sink)
            .complete(&hello_request(), &credentials())
            .await
            .unwrap();

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::INFO);
        assert_eq!(records[0].message, r#"[Agent Controller] Response: {"id":"abc"}"#);
        assert_eq!(records[0].extras, Some(json!({"adapter": "completion"})));
    }

    #[tokio::test]
    async fn error_status_is_logged_and_propagated() {
        let server = MockServer::start().await;
        mount_reply(&server, ResponseTemplate::new(502).set_body_string("bad gateway")).await;

        let sink = Arc::new(MemorySink::new());
        let err = adapter(&server, &sink)
            .complete(&hello_request(), &credentials())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(!err.is_transport());
        assert!(matches!(&err, FlowError::Status { body, .. } if body == "bad gateway"));

        let errors = sink.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("[Agent Controller] HTTP error occurred: 502"));
        assert!(errors[0].message.contains("bad gateway"));
        assert!(sink.at(Level::INFO).is_empty());
    }

    #[tokio::test]
    async fn undecodable_body_is_a_transport_failure() {
        let server = MockServer::start().await;
        mount_reply(&server, ResponseTemplate::new(200).set_body_string("<html>oops</html>")).await;

        let sink = Arc::new(MemorySink::new());
        let err = adapter(&server, &sink)
            .complete(&hello_request(), &credentials())
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(sink.at(Level::ERROR).len(), 1);
        assert!(sink.at(Level::INFO).is_empty());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let sink = Arc::new(MemorySink::new());
        let completion =
            FlowCompletion::new(&endpoint("http://127.0.0.1:9"), CompletionProfileConfig::default(), sink.clone())
                .unwrap();

        let err = completion.complete(&hello_request(), &credentials()).await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.status(), None);
        let errors = sink.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("request error occurred"));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start().await;
        mount_reply(
            &server,
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .await;

        let mut endpoint = endpoint(&server.uri());
        endpoint.timeout = Some("100ms".to_owned());
        let sink = Arc::new(MemorySink::new());
        let completion = FlowCompletion::new(&endpoint, CompletionProfileConfig::default(), sink.clone()).unwrap();

        let err = completion.complete(&hello_request(), &credentials()).await.unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(sink.at(Level::ERROR).len(), 1);
    }

    #[tokio::test]
    async fn repeated_calls_send_identical_bytes() {
        let server = MockServer::start().await;
        mount_reply(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

        let sink = Arc::new(MemorySink::new());
        let completion = adapter(&server, &sink);
        let request = hello_request()
            .with_extra("seed", json!(7))
            .with_params(GenerationParams {
                max_tokens: Some(64),
                ..GenerationParams::default()
            });

        completion.complete(&request, &credentials()).await.unwrap();
        completion.complete(&request, &credentials()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].body, requests[1].body);
    }

    #[test]
    fn unknown_profile_is_reported() {
        let err = FlowCompletion::from_config(&Config::default(), "missing", Arc::new(MemorySink::new())).unwrap_err();
        assert!(matches!(err, FlowError::ProfileNotFound { profile } if profile == "missing"));
    }

    #[test]
    fn default_profile_from_config() {
        let completion = FlowCompletion::from_config(&Config::default(), "o3-mini", Arc::new(MemorySink::new())).unwrap();
        assert_eq!(completion.model(), "o3-mini");
    }
}
