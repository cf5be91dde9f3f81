//! Authenticated HTTP layer. Builds requests against one
//! [`ServerEndpoint`], executes them, and maps the status codes every
//! operation treats the same way (401, 404, connection failures) into
//! typed errors. Everything else is handed back for endpoint-specific
//! interpretation.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use crate::endpoint::ServerEndpoint;
use crate::error::TowerError;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

pub struct Transport {
    http: reqwest::Client,
    endpoint: ServerEndpoint,
}

impl Transport {
    pub fn new(endpoint: ServerEndpoint) -> Result<Self, TowerError> {
        let mut builder = reqwest::Client::builder().timeout(CLIENT_TIMEOUT);
        if endpoint.trust_all_certs() {
            // Explicit opt-in insecure mode; the reqwest method name keeps
            // the "danger" visible at the one place it is enabled.
            debug!("trust-all-certs enabled; accepting any server certificate");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build().map_err(|err| {
            TowerError::Configuration(format!("unable to build http client: {err}"))
        })?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &ServerEndpoint {
        &self.endpoint
    }

    /// Executes one request against `base_url + path`. 401 and 404 are
    /// mapped here; any other status passes through to the caller.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, TowerError> {
        let url = Url::parse(&format!("{}{}", self.endpoint.base_url(), path))
            .map_err(|err| TowerError::Configuration(format!("bad request url {path:?}: {err}")))?;

        let mut request = match method {
            Method::Get => self.http.get(url.clone()),
            Method::Post => {
                let mut post = self.http.post(url.clone());
                if let Some(body) = body {
                    post = post
                        .header(CONTENT_TYPE, "application/json")
                        .body(body.to_string());
                }
                post
            }
        };

        let has_auth = self.endpoint.username().is_some() || self.endpoint.password().is_some();
        if has_auth {
            // The header is attached when either half is configured; the
            // missing half encodes as an empty string.
            let username = self.endpoint.username().unwrap_or_default();
            let password = self.endpoint.password().unwrap_or_default();
            let token = BASE64.encode(format!("{username}:{password}"));
            request = request.header(AUTHORIZATION, format!("Basic {token}"));
        }

        if self.endpoint.debug() {
            debug!(%url, auth = has_auth, "issuing {method} request");
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(TowerError::Authentication),
            StatusCode::NOT_FOUND => Err(TowerError::NotFound(format!("no resource at {path}"))),
            _ => Ok(response),
        }
    }

    /// Connectivity test against the ping endpoint; anything but a 200 is
    /// an error.
    pub async fn ping(&self) -> Result<(), TowerError> {
        let response = self.request(Method::Get, "/api/v1/ping/", None).await?;
        if response.status() != StatusCode::OK {
            return Err(TowerError::UnexpectedStatus {
                status: response.status(),
                context: "ping".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_displays_as_http_verb() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }

    #[tokio::test]
    async fn connection_failure_maps_to_transport_error() {
        // Port 1 on localhost refuses connections.
        let endpoint = ServerEndpoint::new("http://127.0.0.1:1").unwrap();
        let transport = Transport::new(endpoint).unwrap();
        let err = transport.request(Method::Get, "/api/v1/ping/", None).await.unwrap_err();
        assert!(matches!(err, TowerError::Transport(_)));
    }
}
