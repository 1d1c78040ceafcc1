//! Verify request building and error messages against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each request case gives an input item and the exact request it must
//! produce; each error case gives a simulated vendor response and the
//! message the client must surface. Bodies are compared as parsed JSON so
//! key order does not matter.

use serde_json::Value;
use zapsign_core::{ClientConfig, Environment, HttpMethod, HttpResponse, InputItem, ZapSignClient};

fn client(vectors: &Value) -> ZapSignClient {
    let base_url = vectors["base_url"].as_str().unwrap();
    ZapSignClient::new(
        ClientConfig::new(Environment::Production)
            .with_base_url(base_url)
            .unwrap(),
    )
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn item(case: &Value) -> InputItem {
    serde_json::from_value(case["item"].clone()).unwrap()
}

#[test]
fn request_vectors() {
    let vectors: Value =
        serde_json::from_str(include_str!("../../test-vectors/requests.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];

        let call = c.prepare(&item(case)).unwrap();
        assert_eq!(
            call.request.method,
            parse_method(expected["method"].as_str().unwrap()),
            "{name}: method"
        );
        assert_eq!(
            call.request.full_url(),
            expected["url"].as_str().unwrap(),
            "{name}: url"
        );
        assert_eq!(
            call.request.json_body().cloned().unwrap_or(Value::Null),
            expected["body"],
            "{name}: body"
        );
        assert!(call.probe.is_none(), "{name}: unexpected probe");
    }
}

#[test]
fn error_vectors() {
    let vectors: Value =
        serde_json::from_str(include_str!("../../test-vectors/errors.json")).unwrap();
    let c = client(&vectors);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let call = c.prepare(&item(case)).unwrap();
        let response = HttpResponse {
            status: case["response"]["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["response"]["body"].as_str().unwrap().to_string(),
        };

        let message = c.parse(&call, response).unwrap_err().to_string();
        let expected = &case["expected"];
        if let Some(exact) = expected["equals"].as_str() {
            assert_eq!(message, exact, "{name}");
        }
        if let Some(prefix) = expected["starts_with"].as_str() {
            assert!(message.starts_with(prefix), "{name}: got {message}");
        }
        if let Some(suffix) = expected["ends_with"].as_str() {
            assert!(message.ends_with(suffix), "{name}: got {message}");
        }
    }
}
