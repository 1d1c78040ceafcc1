//! Request building and response parsing for the ZapSign API.
//!
//! # Design
//! `ZapSignClient` holds only its configuration and carries no mutable state
//! between calls. Each item goes through `prepare` (produces a
//! `PreparedCall`), one round trip, and `parse` (consumes the
//! `HttpResponse`). `execute` strings the three together over a `Transport`;
//! callers that do their own I/O can use `prepare` and `parse` directly.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::descriptor::check_required;
use crate::error::{ApiError, ZapSignError};
use crate::handlers::{self, PreparedCall};
use crate::http::{HttpResponse, RequestBody};
use crate::operation::{InputItem, OperationRequest};
use crate::payload::ApiPayload;
use crate::remediation;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct ZapSignClient {
    config: ClientConfig,
}

impl ZapSignClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Resolve and validate one item and build its request. Every local
    /// failure surfaces here, before anything is sent.
    pub fn prepare(&self, item: &InputItem) -> Result<PreparedCall, ZapSignError> {
        let request = OperationRequest::resolve(item)?;
        check_required(request.kind, &request.parameters)?;
        let call = handlers::prepare(self.base_url(), &request)?;
        debug!(
            operation = %call.kind,
            method = call.request.method.as_str(),
            url = %call.request.full_url(),
            body = ?body_summary(&call),
            probe = call.probe.is_some(),
            "prepared request"
        );
        Ok(call)
    }

    /// Turn the vendor's answer into output records.
    pub fn parse(
        &self,
        call: &PreparedCall,
        response: HttpResponse,
    ) -> Result<Vec<Value>, ZapSignError> {
        if !response.is_success() {
            return Err(self.failure(call, &response));
        }
        let payload = ApiPayload::decode(&response.body);
        if payload.is_empty() {
            if let Some(fallback) = &call.fallback {
                return Ok(vec![fallback.clone()]);
            }
        }
        Ok(payload.into_records())
    }

    fn failure(&self, call: &PreparedCall, response: &HttpResponse) -> ZapSignError {
        let details = ApiError::from_response(response);
        warn!(
            operation = %call.kind,
            status = response.status,
            body = %details.raw_text(),
            "request rejected"
        );
        match remediation::lookup(call.kind, response.status) {
            Some(row) => {
                let (kind, _) = details.classify();
                ZapSignError::Api {
                    kind,
                    message: row.render(&call.request.full_url(), response.status, &call.details),
                    details,
                }
            }
            None => ZapSignError::from_api(details),
        }
    }

    /// Prepare, probe when needed, send and parse one item.
    pub fn execute<T>(&self, transport: &T, item: &InputItem) -> Result<Vec<Value>, ZapSignError>
    where
        T: Transport + ?Sized,
    {
        let call = self.prepare(item)?;
        if let Some(probe) = &call.probe {
            match transport.send(probe) {
                Ok(response) if response.is_success() => {}
                Ok(response) => {
                    return Err(ZapSignError::FileDownload(format!(
                        "Request failed with status code {}",
                        response.status
                    )))
                }
                Err(err) => return Err(ZapSignError::FileDownload(err.to_string())),
            }
        }
        let response = transport
            .send(&call.request)
            .map_err(|err| ZapSignError::from_api(ApiError::from_transport(err.0)))?;
        self.parse(&call, response)
    }
}

/// Body keys for logging; file contents and tokens stay out of the logs.
fn body_summary(call: &PreparedCall) -> Vec<String> {
    match &call.request.body {
        Some(RequestBody::Json(Value::Object(map))) => map.keys().cloned().collect(),
        Some(RequestBody::Multipart(parts)) => parts
            .iter()
            .map(|p| format!("{} ({} bytes)", p.name, p.data.len()))
            .collect(),
        _ => Vec::new(),
    }
}
