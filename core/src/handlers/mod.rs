//! Request builders, one per operation.
//!
//! # Design
//! A handler reads the resolved `OperationRequest`, validates it locally and
//! returns a `PreparedCall`: the request to send, an optional reachability
//! probe, the labels shown in remediation messages, and a record to emit
//! when the vendor answers with an empty body. Handlers never perform I/O,
//! so any local failure is raised before anything reaches the network.

mod background_check;
mod document;
mod partnership;
mod signer;
mod template;
mod timestamp;
mod webhook;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};

use crate::error::ZapSignError;
use crate::http::HttpRequest;
use crate::operation::{OperationKind, OperationRequest};
use crate::params::Parameters;

/// Characters left alone in a path segment, matching `encodeURIComponent`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Everything one handler decided for one input item.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCall {
    pub kind: OperationKind,
    pub request: HttpRequest,
    /// GET issued before `request`; its failure aborts the item.
    pub probe: Option<HttpRequest>,
    /// Labelled values appended to remediation messages.
    pub details: Vec<(&'static str, String)>,
    /// Record emitted instead of an empty success body.
    pub fallback: Option<Value>,
}

impl PreparedCall {
    pub fn new(kind: OperationKind, request: HttpRequest) -> Self {
        Self {
            kind,
            request,
            probe: None,
            details: Vec::new(),
            fallback: None,
        }
    }

    pub fn with_probe(mut self, probe: Option<HttpRequest>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_detail(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.details.push((label, value.into()));
        self
    }

    pub fn with_fallback(mut self, record: Value) -> Self {
        self.fallback = Some(record);
        self
    }
}

/// Build the call for `request` against `base_url`.
pub fn prepare(base_url: &str, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    use OperationKind::*;
    let api = Api::new(base_url);
    match request.kind {
        DocumentCreate => document::create(&api, request),
        DocumentCreateOneClick => document::create_one_click(&api, request),
        DocumentGet => document::get(&api, request),
        DocumentGetAll => document::get_all(&api, request),
        DocumentUpdate => document::update(&api, request),
        DocumentDelete => document::delete(&api, request),
        DocumentCancel | DocumentRefuse => document::refuse(&api, request),
        DocumentActivityHistory => document::activity_history(&api, request),
        DocumentPlaceSignatures => document::place_signatures(&api, request),
        DocumentValidateSignatures => document::validate_signatures(&api, request),
        DocumentAddExtraDocument => document::add_extra_document(&api, request),
        DocumentAddExtraDocumentFromTemplate => {
            document::add_extra_document_from_template(&api, request)
        }
        DocumentReorderEnvelope => document::reorder_envelope(&api, request),
        SignerAdd => signer::add(&api, request),
        SignerRemove => signer::remove(&api, request),
        SignerUpdate => signer::update(&api, request),
        SignerGet => signer::get(&api, request),
        SignerResetAttempts => signer::reset_attempts(&api, request),
        TemplateGetAll => template::get_all(&api, request),
        TemplateCreateDocument => template::create_document(&api, request),
        TemplateCreateDocx => template::create_docx(&api, request),
        TemplateGet => template::get(&api, request),
        TemplateUpdate => template::update(&api, request),
        TemplateDelete => template::delete(&api, request),
        TemplateUpdateForm => template::update_form(&api, request),
        BackgroundCheckCreatePerson => background_check::create_person(&api, request),
        BackgroundCheckCreateCompany => background_check::create_company(&api, request),
        BackgroundCheckGet => background_check::get(&api, request),
        BackgroundCheckDetails => background_check::details(&api, request),
        PartnershipCreateAccount => partnership::create_account(&api, request),
        PartnershipUpdatePaymentStatus => partnership::update_payment_status(&api, request),
        TimestampAdd => timestamp::add(&api, request),
        WebhookCreate => webhook::create(&api, request),
        WebhookDelete => webhook::delete(&api, request),
    }
}

/// Absolute URLs under the configured base.
pub(crate) struct Api<'a> {
    base_url: &'a str,
}

impl<'a> Api<'a> {
    fn new(base_url: &'a str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/'),
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Percent-encode one path segment.
pub(crate) fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// A token that ends up in a path: trimmed and non-empty.
pub(crate) fn path_token(
    params: &Parameters,
    name: &str,
    label: &str,
) -> Result<String, ZapSignError> {
    params.required(name, &format!("{label} is required."))
}

/// Copy a free-form "additional fields" object into `body`, overriding keys
/// already present.
pub(crate) fn merge_fields(body: &mut Map<String, Value>, fields: Option<&Map<String, Value>>) {
    if let Some(fields) = fields {
        for (key, value) in fields {
            body.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::http::{HttpMethod, RequestBody};
    use crate::operation::InputItem;

    pub const BASE: &str = "https://api.test";

    pub fn request(resource: &str, operation: &str, params: Value) -> OperationRequest {
        let item = InputItem::new(resource, operation, params);
        OperationRequest::resolve(&item).unwrap()
    }

    pub fn prepare_item(item: &InputItem) -> Result<PreparedCall, ZapSignError> {
        prepare(BASE, &OperationRequest::resolve(item).unwrap())
    }

    pub fn call(resource: &str, operation: &str, params: Value) -> PreparedCall {
        prepare(BASE, &request(resource, operation, params)).unwrap()
    }

    pub fn fail(resource: &str, operation: &str, params: Value) -> String {
        prepare(BASE, &request(resource, operation, params))
            .unwrap_err()
            .to_string()
    }

    pub fn body(call: &PreparedCall) -> &Value {
        call.request.json_body().unwrap()
    }

    pub fn assert_route(call: &PreparedCall, method: HttpMethod, path: &str) {
        assert_eq!(call.request.method, method);
        assert_eq!(call.request.url, format!("{BASE}{path}"));
    }

    pub fn is_multipart(call: &PreparedCall) -> bool {
        matches!(call.request.body, Some(RequestBody::Multipart(_)))
    }
}
