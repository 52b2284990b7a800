use async_trait::async_trait;
use reqwest::{Method, Url};
use serde_json::Value;
use witsync_core::api::{
    CliError, EntityDocument, IntentDocument, TransportKind, WitApiError, WitConfig,
};

use super::remote::WitRemote;

fn transport_error(err: reqwest::Error, url: &str) -> WitApiError {
    let kind = if err.is_timeout() {
        TransportKind::Timeout
    } else if err.is_connect() {
        TransportKind::Connect
    } else if err.is_request() {
        TransportKind::Request
    } else if err.is_body() || err.is_decode() {
        TransportKind::Body
    } else {
        TransportKind::Unknown
    };
    WitApiError::Transport {
        kind,
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Read the whole body, classify non-2xx statuses, and decode JSON.
///
/// An empty 2xx body decodes to `Value::Null`; any other body that is not
/// JSON is a `MalformedResponse`.
async fn parse_json_response(resp: reqwest::Response) -> Result<Value, WitApiError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await.map_err(|err| transport_error(err, &url))?;

    if !status.is_success() {
        return Err(WitApiError::from_status(status.as_u16(), url, &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body)
        .map_err(|err| WitApiError::malformed(status.as_u16(), url, &err, &body))
}

/// Bearer-authenticated client for the Wit.ai HTTP API.
#[derive(Clone)]
pub struct WitClient {
    http: reqwest::Client,
    access_token: String,
    api_version: String,
    base_url: Url,
}

impl WitClient {
    pub fn new(
        base_url: &str,
        access_token: String,
        api_version: String,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| anyhow::anyhow!("invalid Wit.ai base_url '{}': {}", base_url, e))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("invalid Wit.ai base_url '{}': not a hierarchical URL", base_url);
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            http,
            access_token,
            api_version,
            base_url,
        })
    }

    /// Build from configuration. Fails before any request when no token is set.
    pub fn from_config(cfg: &WitConfig) -> Result<Self, CliError> {
        let token = cfg.require_access_token()?.to_string();
        Ok(Self::new(
            &cfg.base_url,
            token,
            cfg.api_version.clone(),
            cfg.timeout_ms,
        )?)
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        op: &'static str,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<Value, WitApiError> {
        tracing::debug!(
            target: "witsync.wit",
            stage = "wit.http.in",
            op = op,
            method = %method.as_str(),
            url = %url
        );

        let mut req = self
            .http
            .request(method, url.clone())
            .query(&[("v", self.api_version.as_str())])
            .bearer_auth(&self.access_token);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|err| transport_error(err, url.as_str()))?;
        let status = resp.status();
        let result = parse_json_response(resp).await;
        tracing::debug!(
            target: "witsync.wit",
            stage = "wit.http.out",
            op = op,
            status = %status,
            ok = result.is_ok()
        );
        result
    }

    fn to_body<T: serde::Serialize>(&self, url: &Url, value: &T) -> Result<Value, WitApiError> {
        serde_json::to_value(value).map_err(|err| WitApiError::Transport {
            kind: TransportKind::Request,
            url: url.to_string(),
            message: format!("failed to encode request body: {}", err),
        })
    }
}

#[async_trait]
impl WitRemote for WitClient {
    async fn get_entity(&self, name: &str) -> Result<Value, WitApiError> {
        let url = self.url(&["entities", name]);
        self.send("get_entity", Method::GET, url, None).await
    }

    async fn create_entity(&self, doc: &EntityDocument) -> Result<Value, WitApiError> {
        let url = self.url(&["entities"]);
        let body = self.to_body(&url, doc)?;
        self.send("create_entity", Method::POST, url, Some(&body))
            .await
    }

    async fn update_entity(&self, name: &str, doc: &EntityDocument) -> Result<Value, WitApiError> {
        let url = self.url(&["entities", name]);
        let body = self.to_body(&url, doc)?;
        self.send("update_entity", Method::PUT, url, Some(&body))
            .await
    }

    async fn delete_entity(&self, name: &str) -> Result<Value, WitApiError> {
        let url = self.url(&["entities", name]);
        self.send("delete_entity", Method::DELETE, url, None).await
    }

    async fn get_intent(&self, name: &str) -> Result<Value, WitApiError> {
        let url = self.url(&["intents", name]);
        self.send("get_intent", Method::GET, url, None).await
    }

    async fn create_intent(&self, doc: &IntentDocument) -> Result<Value, WitApiError> {
        let url = self.url(&["intents"]);
        let body = self.to_body(&url, doc)?;
        self.send("create_intent", Method::POST, url, Some(&body))
            .await
    }

    async fn delete_intent(&self, name: &str) -> Result<Value, WitApiError> {
        let url = self.url(&["intents", name]);
        self.send("delete_intent", Method::DELETE, url, None).await
    }

    async fn post_utterance(&self, utterance: &Value) -> Result<Value, WitApiError> {
        let body = Value::Array(vec![utterance.clone()]);
        self.send("post_utterance", Method::POST, self.url(&["utterances"]), Some(&body))
            .await
    }

    async fn train(&self) -> Result<Value, WitApiError> {
        let body = serde_json::json!({});
        self.send("train", Method::POST, self.url(&["train"]), Some(&body))
            .await
    }
}
