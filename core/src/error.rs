//! Error types for the ZapSign client.
//!
//! # Design
//! Every failed round trip is normalized exactly once into an `ApiError`,
//! whatever shape the vendor used for its error body (`{"error": ..}`,
//! `{"message": ..}`, `{"detail": ..}` or bare text). Classification then
//! matches on that structured value and produces the message shown to the
//! person configuring the workflow.

use serde_json::Value;
use thiserror::Error;

use crate::http::HttpResponse;

/// Vendor message returned when a reset is requested for a signer that still
/// has validation attempts left.
const SIGNER_HAS_ATTEMPTS: &str = "Signatário tem tentativas";

/// A failed round trip, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// `None` when the request never produced an HTTP response.
    pub status: Option<u16>,
    pub vendor_code: Option<String>,
    pub vendor_message: Option<String>,
    pub transport_message: Option<String>,
    /// Parsed error body, or the body text when it was not JSON.
    pub raw: Value,
}

impl ApiError {
    /// Normalize a non-2xx response.
    pub fn from_response(response: &HttpResponse) -> Self {
        let raw = parse_body(&response.body);
        let (vendor_code, vendor_message) = extract_vendor_fields(&raw);
        Self {
            status: Some(response.status),
            vendor_code,
            vendor_message,
            transport_message: Some(format!(
                "Request failed with status code {}",
                response.status
            )),
            raw,
        }
    }

    /// Normalize a failure that happened below HTTP (DNS, TLS, reset...).
    pub fn from_transport(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status: None,
            vendor_code: None,
            vendor_message: None,
            transport_message: (!message.trim().is_empty()).then_some(message),
            raw: Value::Null,
        }
    }

    /// Compact rendering of the raw body for diagnostics.
    pub fn raw_text(&self) -> String {
        match &self.raw {
            Value::Null => "<empty>".to_string(),
            Value::String(s) if s.is_empty() => "<empty>".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Map status, vendor code and message to a kind and a readable message.
    pub fn classify(&self) -> (ApiErrorKind, String) {
        let vendor = self.vendor_message.as_deref();
        match self.status {
            Some(401) => (
                ApiErrorKind::Unauthorized,
                match vendor {
                    Some(msg) => format!("Unauthorized: {msg}"),
                    None => "Unauthorized: the API token was rejected. Check that the credential \
                             holds a valid token for the selected environment (sandbox or production) \
                             and that it has permission for this operation."
                        .to_string(),
                },
            ),
            Some(403) => (ApiErrorKind::Forbidden, self.forbidden_message()),
            Some(404) => (
                ApiErrorKind::NotFound,
                match vendor {
                    Some(msg) => format!("Not Found: {msg}"),
                    None => "Not Found: the requested resource does not exist. Verify the token \
                             you supplied and the selected environment."
                        .to_string(),
                },
            ),
            Some(400) => (ApiErrorKind::BadRequest, self.bad_request_message()),
            Some(_) => (ApiErrorKind::Other, self.fallback_message()),
            None => (ApiErrorKind::Transport, self.fallback_message()),
        }
    }

    fn forbidden_message(&self) -> String {
        match self.vendor_code.as_deref() {
            Some("document_already_signed") => {
                return "Forbidden: this document has already been signed and can no longer be \
                        changed or refused."
                    .to_string()
            }
            Some("document_already_refused") => {
                return "Forbidden: this document has already been refused.".to_string()
            }
            Some("refuse_not_allowed") => {
                return "Forbidden: refusing is not allowed for this document. It must be in \
                        progress and created with allow_refuse_signature enabled."
                    .to_string()
            }
            Some("insufficient_permissions") | Some("permission_denied") => {
                return "Forbidden: the API token does not have permission to perform this \
                        operation. Ask an account administrator to grant access."
                    .to_string()
            }
            _ => {}
        }
        match self.vendor_message.as_deref() {
            Some(msg) => format!("Forbidden: {msg}"),
            None => format!(
                "Forbidden: the request was rejected. Raw response: {}",
                self.raw_text()
            ),
        }
    }

    fn bad_request_message(&self) -> String {
        let Some(msg) = self.vendor_message.as_deref() else {
            return format!(
                "Bad Request: the request was rejected. Raw response: {}",
                self.raw_text()
            );
        };
        if msg.contains(SIGNER_HAS_ATTEMPTS) {
            return "Bad Request: the signer still has validation attempts left. Attempts can \
                    only be reset after the signer has exhausted all validation attempts."
                .to_string();
        }

        let lower = msg.to_lowercase();
        let mut hints = Vec::new();
        if lower.contains("template") || lower.contains("modelo") {
            hints.push("Check that the template token is valid and the template is active.");
        }
        if lower.contains("signer") || lower.contains("signatário") {
            hints.push("Check the signer fields (name, email, phone and authentication mode).");
        }
        if lower.contains("data") || lower.contains("variável") {
            hints.push("Check the template variables: each one needs both a name and a value.");
        }
        if hints.is_empty() {
            format!(
                "Bad Request: {msg}. Raw response: {}",
                self.raw_text()
            )
        } else {
            format!("Bad Request: {msg}. {}", hints.join(" "))
        }
    }

    fn fallback_message(&self) -> String {
        self.vendor_message
            .clone()
            .or_else(|| self.transport_message.clone())
            .unwrap_or_else(|| {
                "An unexpected error occurred while calling the ZapSign API.".to_string()
            })
    }
}

fn parse_body(body: &str) -> Value {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

fn extract_vendor_fields(raw: &Value) -> (Option<String>, Option<String>) {
    match raw {
        Value::Object(map) => {
            let code = map
                .get("code")
                .and_then(Value::as_str)
                .map(str::to_string);
            let message = ["error", "message", "detail"]
                .iter()
                .find_map(|key| map.get(*key).and_then(text_of));
            (code, message)
        }
        Value::String(text) => (None, Some(text.clone())),
        _ => (None, None),
    }
}

/// Vendor messages are usually strings; some endpoints nest a list of them.
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(text_of).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

/// Coarse class of a vendor or transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
    /// Any other HTTP status, 5xx included.
    Other,
    /// No HTTP response at all.
    Transport,
}

/// Errors returned by the client. `Display` is always the end-user message.
#[derive(Debug, Error)]
pub enum ZapSignError {
    /// A local precondition failed; no request was sent.
    #[error("{0}")]
    InvalidParameter(String),

    #[error("The operation '{operation}' is not supported for resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("{message}")]
    Api {
        kind: ApiErrorKind,
        message: String,
        details: ApiError,
    },

    #[error("Failed to download file from URL: {0}")]
    FileDownload(String),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ZapSignError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ZapSignError::InvalidParameter(message.into())
    }

    /// Classify a normalized failure.
    pub fn from_api(details: ApiError) -> Self {
        let (kind, message) = details.classify();
        ZapSignError::Api {
            kind,
            message,
            details,
        }
    }

    /// HTTP status behind this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ZapSignError::Api { details, .. } => details.status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ZapSignError {
    fn from(err: serde_json::Error) -> Self {
        ZapSignError::Serialization(err.to_string())
    }
}
