use serde_json::{json, Value};

use super::{Api, PreparedCall};
use crate::descriptor::{check_option, WEBHOOK_EVENTS};
use crate::error::ZapSignError;
use crate::http::{HttpMethod, HttpRequest};
use crate::operation::OperationRequest;

pub(super) fn create(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let params = &request.parameters;
    let url = params.required("webhookUrl", "Webhook URL is required.")?;
    // Empty subscribes to every event.
    let event = params
        .string("events")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    check_option("webhook event", &event, WEBHOOK_EVENTS)?;
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Post, api.url("/api/v1/user/company/webhook/"))
            .with_json(json!({ "url": url, "type": event })),
    ))
}

/// The id travels in the body of the DELETE, as given (numeric or string).
pub(super) fn delete(api: &Api, request: &OperationRequest) -> Result<PreparedCall, ZapSignError> {
    let id = match request.parameters.raw("webhookId") {
        Some(Value::Number(n)) => Value::Number(n.clone()),
        _ => Value::String(
            request
                .parameters
                .required("webhookId", "Webhook ID is required.")?,
        ),
    };
    Ok(PreparedCall::new(
        request.kind,
        HttpRequest::new(HttpMethod::Delete, api.url("/api/v1/user/company/webhook/delete/"))
            .with_json(json!({ "id": id })),
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::http::HttpMethod;
    use serde_json::json;

    #[test]
    fn create_validates_event() {
        let prepared = call(
            "webhook",
            "create",
            json!({"webhookUrl": "https://hooks.test/z", "events": "doc_signed"}),
        );
        assert_route(&prepared, HttpMethod::Post, "/api/v1/user/company/webhook/");
        assert_eq!(body(&prepared), &json!({"url": "https://hooks.test/z", "type": "doc_signed"}));

        let all = call("webhook", "create", json!({"webhookUrl": "https://hooks.test/z"}));
        assert_eq!(body(&all)["type"], "");

        let msg = fail(
            "webhook",
            "create",
            json!({"webhookUrl": "https://hooks.test/z", "events": "doc_lost"}),
        );
        assert!(msg.starts_with("Invalid webhook event 'doc_lost'"));
    }

    #[test]
    fn delete_sends_id_in_body() {
        let prepared = call("webhook", "delete", json!({"webhookId": 42}));
        assert_route(&prepared, HttpMethod::Delete, "/api/v1/user/company/webhook/delete/");
        assert_eq!(body(&prepared), &json!({"id": 42}));

        let prepared = call("webhook", "delete", json!({"webhookId": " wh-1 "}));
        assert_eq!(body(&prepared), &json!({"id": "wh-1"}));
    }
}
