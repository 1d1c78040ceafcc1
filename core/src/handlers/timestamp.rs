use serde_json::json;

use super::{Api, PreparedCall};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::operation::OperationRequest;

pub(super) fn add(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let url = request
        .parameters
        .required("timestampDocumentUrl", "Document URL is required for adding a timestamp.")?;
    if url::Url::parse(&url).is_err() {
        return Err(ZapSignError::invalid(format!(
            "Document URL '{url}' is not a valid absolute URL."
        )));
    }
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/timestamp/"))
            .with_json(json!({ "url": url })),
    )
    .with_detail("Document URL", url))
}
