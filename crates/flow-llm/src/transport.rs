use std::sync::Arc;
use std::time::Duration;

use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde_json::{Map, Value, json};
use tracing::Level;
use url::Url;

use crate::error::FlowError;
use crate::log::{LOG_TAG, LogSink};
use crate::types::Credentials;

const FLOW_TENANT: &str = "flowtenant";
const FLOW_AGENT: &str = "flowagent";
const FLOW_OPERATION_ID: &str = "flowoperationid";

/// Identification headers Flow expects on every call
#[derive(Debug, Clone)]
pub struct FlowHeaders<'a> {
    pub tenant: &'a str,
    pub agent: &'a str,
    pub operation_id: Option<&'a str>,
}

impl FlowHeaders<'_> {
    fn to_header_map(&self) -> Result<HeaderMap, FlowError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(FLOW_TENANT), header_value("FlowTenant", self.tenant)?);
        headers.insert(HeaderName::from_static(FLOW_AGENT), header_value("FlowAgent", self.agent)?);
        if let Some(operation_id) = self.operation_id {
            headers.insert(HeaderName::from_static(FLOW_OPERATION_ID), header_value("FlowOperationId", operation_id)?);
        }
        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FlowError> {
    HeaderValue::from_str(value).map_err(|e| FlowError::Config(format!("invalid {name} header value: {e}")))
}

/// One-shot JSON POSTs against the Flow API
///
/// Every outcome is reported to the log sink exactly once: the response
/// body at info level on success, the failure context at error level
/// otherwise.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
    sink: Arc<dyn LogSink>,
}

impl Transport {
    pub fn new(base_url: Url, timeout: Option<Duration>, sink: Arc<dyn LogSink>) -> Result<Self, FlowError> {
        let http = reqwest::Client::builder().build().map_err(FlowError::Transport)?;

        Ok(Self {
            http,
            base_url,
            timeout,
            sink,
        })
    }

    /// Absolute URL for an endpoint path below the base URL
    pub fn endpoint_url(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/{}", path.trim_start_matches('/'))
    }

    /// POST `payload` and decode the JSON reply
    pub async fn post_json(
        &self,
        adapter: &str,
        path: &str,
        headers: &FlowHeaders<'_>,
        credentials: &Credentials,
        payload: &Map<String, Value>,
    ) -> Result<Value, FlowError> {
        let url = self.endpoint_url(path);
        let headers = headers.to_header_map()?;

        tracing::debug!(adapter, url = %url, payload = %serde_json::Value::Object(payload.clone()), "sending flow request");

        let mut builder = self
            .http
            .post(&url)
            .headers(headers)
            .bearer_auth(credentials.api_key.expose_secret())
            .json(payload);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                self.log_failure(adapter, &format!("request error occurred: {e}"), json!({"url": url}));
                return Err(FlowError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            self.log_failure(
                adapter,
                &format!("HTTP error occurred: {status}; response content: {body}"),
                json!({"url": url, "status": status.as_u16()}),
            );
            return Err(FlowError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                self.log_failure(adapter, &format!("undecodable response: {e}"), json!({"url": url}));
                return Err(FlowError::Transport(e));
            }
        };

        self.sink.log(
            Level::INFO,
            &format!("{LOG_TAG} Response: {body}"),
            Some(&json!({"adapter": adapter})),
        );

        Ok(body)
    }

    fn log_failure(&self, adapter: &str, message: &str, mut extras: Value) {
        extras["adapter"] = Value::String(adapter.to_owned());
        self.sink.log(Level::ERROR, &format!("{LOG_TAG} {message}"), Some(&extras));
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
