//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. Handlers
//! build `HttpRequest` values and the client parses `HttpResponse` values
//! without ever touching the network; a `Transport` implementation performs
//! the actual round trip. A request never outlives one round trip.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::Value;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// One part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Request payload. JSON covers every endpoint except signature validation,
/// which takes a file upload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(Vec<FormPart>),
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.headers
            .push(("content-type".to_string(), "application/json".to_string()));
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// The JSON body, if this request carries one.
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            Some(RequestBody::Json(value)) => Some(value),
            _ => None,
        }
    }

    /// URL including the form-urlencoded query string.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();
        format!("{}?{query}", self.url)
    }

    /// Serialize the body to wire bytes, returning the content type to send
    /// alongside it. Multipart bodies get a fresh random boundary.
    pub fn encode_body(&self) -> Option<(String, Vec<u8>)> {
        match &self.body {
            None => None,
            Some(RequestBody::Json(value)) => Some((
                "application/json".to_string(),
                value.to_string().into_bytes(),
            )),
            Some(RequestBody::Multipart(parts)) => {
                let boundary = format!("zapsign-{}", uuid::Uuid::new_v4().simple());
                Some((
                    format!("multipart/form-data; boundary={boundary}"),
                    encode_multipart(parts, &boundary),
                ))
            }
        }
    }
}

/// Control characters (CR and LF included) and quotes cannot appear raw in
/// a part header.
const HEADER_VALUE: &AsciiSet = &CONTROLS.add(b'"');

fn header_value(raw: &str) -> String {
    utf8_percent_encode(raw, HEADER_VALUE).to_string()
}

/// Encode form parts as a `multipart/form-data` body delimited by `boundary`.
pub fn encode_multipart(parts: &[FormPart], boundary: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for part in parts {
        out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        let mut disposition = format!(
            "Content-Disposition: form-data; name=\"{}\"",
            header_value(&part.name)
        );
        if let Some(file_name) = &part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", header_value(file_name)));
        }
        out.extend_from_slice(disposition.as_bytes());
        out.extend_from_slice(b"\r\n");
        if let Some(content_type) = &part.content_type {
            out.extend_from_slice(
                format!("Content-Type: {}\r\n", header_value(content_type)).as_bytes(),
            );
        }
        out.extend_from_slice(b"\r\n");
        out.extend_from_slice(&part.data);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    out
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_url_without_query_is_unchanged() {
        let req = HttpRequest::new(HttpMethod::Get, "https://api.example.com/api/v1/docs/");
        assert_eq!(req.full_url(), "https://api.example.com/api/v1/docs/");
    }

    #[test]
    fn full_url_encodes_query_pairs_in_order() {
        let req = HttpRequest::new(HttpMethod::Get, "https://api.example.com/api/v1/docs/")
            .with_query("page", "2")
            .with_query("folder_path", "/contracts/2024 q1");
        assert_eq!(
            req.full_url(),
            "https://api.example.com/api/v1/docs/?page=2&folder_path=%2Fcontracts%2F2024+q1"
        );
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = HttpRequest::new(HttpMethod::Post, "http://x/").with_json(json!({"a": 1}));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let (content_type, bytes) = req.encode_body().unwrap();
        assert_eq!(content_type, "application/json");
        assert_eq!(bytes, br#"{"a":1}"#);
    }

    #[test]
    fn multipart_body_carries_file_metadata() {
        let parts = vec![FormPart {
            name: "file".to_string(),
            file_name: Some("contract.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            data: b"%PDF-1.4".to_vec(),
        }];
        let encoded = String::from_utf8(encode_multipart(&parts, "XYZ")).unwrap();
        assert_eq!(
            encoded,
            "--XYZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"contract.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n%PDF-1.4\r\n--XYZ--\r\n"
        );
    }

    #[test]
    fn multipart_headers_cannot_be_split() {
        let parts = vec![FormPart {
            name: "file\r\nX-Name: 1".to_string(),
            file_name: Some("a.pdf\r\nX-Injected: 1".to_string()),
            content_type: Some("application/pdf\nX-Type: 1".to_string()),
            data: b"%PDF".to_vec(),
        }];
        let encoded = String::from_utf8(encode_multipart(&parts, "XYZ")).unwrap();
        assert_eq!(
            encoded,
            "--XYZ\r\nContent-Disposition: form-data; name=\"file%0D%0AX-Name: 1\"; \
             filename=\"a.pdf%0D%0AX-Injected: 1\"\r\n\
             Content-Type: application/pdf%0AX-Type: 1\r\n\r\n%PDF\r\n--XYZ--\r\n"
        );
        assert_eq!(encoded.matches("\r\n").count(), 6);
    }

    #[test]
    fn multipart_file_name_quotes_are_encoded() {
        let parts = vec![FormPart {
            name: "file".to_string(),
            file_name: Some("say \"hi\".pdf".to_string()),
            content_type: None,
            data: Vec::new(),
        }];
        let encoded = String::from_utf8(encode_multipart(&parts, "XYZ")).unwrap();
        assert!(encoded.contains("filename=\"say %22hi%22.pdf\""));
    }

    #[test]
    fn multipart_content_type_names_the_boundary() {
        let req = HttpRequest::new(HttpMethod::Post, "http://x/").with_multipart(vec![]);
        let (content_type, bytes) = req.encode_body().unwrap();
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        assert_eq!(bytes, format!("--{boundary}--\r\n").into_bytes());
    }

    #[test]
    fn success_range() {
        let ok = HttpResponse { status: 204, headers: Vec::new(), body: String::new() };
        let bad = HttpResponse { status: 400, headers: Vec::new(), body: String::new() };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
