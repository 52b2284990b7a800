use std::fmt;

use serde_json::Value;
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Failure below the HTTP status line (no usable response).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Timeout,
    Connect,
    Request,
    Body,
    Unknown,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the Wit.ai HTTP API.
///
/// Non-2xx responses are classified by status and, when the body is a Wit
/// error object, by its `code` field. `body` always holds a preview of the
/// raw response.
#[derive(Error, Debug)]
pub enum WitApiError {
    #[error("not found: status={status} url={url}: {body}")]
    NotFound {
        status: u16,
        url: String,
        body: String,
    },
    #[error("conflict: status={status} url={url}: {body}")]
    Conflict {
        status: u16,
        url: String,
        body: String,
    },
    #[error("server error: status={status} url={url}: {body}")]
    ServerError {
        status: u16,
        url: String,
        body: String,
    },
    #[error("request rejected: status={status} url={url}: {body}")]
    Rejected {
        status: u16,
        url: String,
        body: String,
    },
    #[error("malformed response: status={status} url={url}: {reason} | body={body}")]
    MalformedResponse {
        status: u16,
        url: String,
        reason: String,
        body: String,
    },
    #[error("transport error kind={kind} url={url}: {message}")]
    Transport {
        kind: TransportKind,
        url: String,
        message: String,
    },
}

impl WitApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: u16, url: String, raw_body: &str) -> Self {
        let body = preview_body(raw_body);
        let code = serde_json::from_str::<Value>(raw_body)
            .ok()
            .and_then(|v| v.get("code").and_then(Value::as_str).map(str::to_string));

        if status == 404 || code.as_deref() == Some("not-found") {
            WitApiError::NotFound { status, url, body }
        } else if status == 409 {
            WitApiError::Conflict { status, url, body }
        } else if (500..600).contains(&status) {
            WitApiError::ServerError { status, url, body }
        } else {
            WitApiError::Rejected { status, url, body }
        }
    }

    pub fn malformed(status: u16, url: String, err: &serde_json::Error, raw_body: &str) -> Self {
        WitApiError::MalformedResponse {
            status,
            url,
            reason: format!("failed to decode response body: {}", err),
            body: preview_body(raw_body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status, .. }
            | Self::Conflict { status, .. }
            | Self::ServerError { status, .. }
            | Self::Rejected { status, .. }
            | Self::MalformedResponse { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::NotFound { url, .. }
            | Self::Conflict { url, .. }
            | Self::ServerError { url, .. }
            | Self::Rejected { url, .. }
            | Self::MalformedResponse { url, .. }
            | Self::Transport { url, .. } => url,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError { .. })
    }
}

/// Trimmed body, cut after `BODY_PREVIEW_LIMIT` characters.
pub fn preview_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return "<empty body>".to_string();
    }
    match body.char_indices().nth(BODY_PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
