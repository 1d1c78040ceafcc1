//! The I/O seam: something that turns an `HttpRequest` into an
//! `HttpResponse`.
//!
//! Non-2xx statuses are data, not transport errors; only failures below HTTP
//! (DNS, TLS, connection reset) are reported as `TransportError`.

use thiserror::Error;

use crate::http::{HttpRequest, HttpResponse};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "blocking")]
pub use blocking::UreqTransport;

#[cfg(feature = "blocking")]
mod blocking {
    use tracing::debug;
    use url::Url;

    use super::{Transport, TransportError};
    use crate::config::{ClientConfig, Credentials};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by `ureq`. The API token is attached only to
    /// requests aimed at the configured base URL, so URL probes of public
    /// files never see it.
    pub struct UreqTransport {
        agent: ureq::Agent,
        credentials: Credentials,
        base_url: Option<Url>,
        user_agent: String,
    }

    impl std::fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("UreqTransport")
                .field("credentials", &self.credentials)
                .field("base_url", &self.base_url.as_ref().map(Url::as_str))
                .finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new(config: &ClientConfig, credentials: Credentials) -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self {
                agent,
                credentials,
                base_url: Url::parse(config.base_url()).ok(),
                user_agent: config.user_agent.clone(),
            }
        }

        fn headers_for(&self, request: &HttpRequest) -> Vec<(String, String)> {
            let mut headers: Vec<(String, String)> = request
                .headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
                .cloned()
                .collect();
            headers.push(("user-agent".to_string(), self.user_agent.clone()));
            if self.is_api_request(&request.url) {
                headers.push((
                    "authorization".to_string(),
                    format!("Bearer {}", self.credentials.api_token),
                ));
            }
            headers
        }

        /// Same scheme, host and port as the base URL, and a path at or below
        /// the base path on a segment boundary.
        fn is_api_request(&self, raw: &str) -> bool {
            let (Some(base), Ok(target)) = (&self.base_url, Url::parse(raw)) else {
                return false;
            };
            if target.scheme() != base.scheme()
                || target.host_str() != base.host_str()
                || target.port_or_known_default() != base.port_or_known_default()
                || !target.username().is_empty()
            {
                return false;
            }
            let base_path = base.path().trim_end_matches('/');
            let path = target.path();
            base_path.is_empty()
                || path == base_path
                || path
                    .strip_prefix(base_path)
                    .is_some_and(|rest| rest.starts_with('/'))
        }
    }

    fn with_headers<B>(
        mut builder: ureq::RequestBuilder<B>,
        headers: &[(String, String)],
    ) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            let url = request.full_url();
            let headers = self.headers_for(request);
            let body = request.encode_body();
            debug!(method = request.method.as_str(), url = %url, "sending request");

            let result = match (request.method, body) {
                (HttpMethod::Get, _) => with_headers(self.agent.get(&url), &headers).call(),
                (HttpMethod::Delete, None) => {
                    with_headers(self.agent.delete(&url), &headers).call()
                }
                (HttpMethod::Delete, Some((content_type, bytes))) => {
                    with_headers(self.agent.delete(&url), &headers)
                        .force_send_body()
                        .header("content-type", content_type.as_str())
                        .send(&bytes[..])
                }
                (HttpMethod::Post, Some((content_type, bytes))) => {
                    with_headers(self.agent.post(&url), &headers)
                        .header("content-type", content_type.as_str())
                        .send(&bytes[..])
                }
                (HttpMethod::Post, None) => {
                    with_headers(self.agent.post(&url), &headers).send_empty()
                }
                (HttpMethod::Put, Some((content_type, bytes))) => {
                    with_headers(self.agent.put(&url), &headers)
                        .header("content-type", content_type.as_str())
                        .send(&bytes[..])
                }
                (HttpMethod::Put, None) => {
                    with_headers(self.agent.put(&url), &headers).send_empty()
                }
            };

            let mut response = result.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            let bytes = response
                .body_mut()
                .read_to_vec()
                .map_err(|e| TransportError(e.to_string()))?;
            Ok(HttpResponse {
                status,
                headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            })
        }
    }

}
