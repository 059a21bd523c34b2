//! Delivery of contact form submissions.

use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use super::{ContactForm, SubmitResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint `{0}`")]
    InvalidEndpoint(String),
    #[error("blocked: unsupported scheme `{0}`")]
    UnsupportedScheme(String),
    #[error("failed to encode submission: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {status} without a readable body")]
    Status { status: u16 },
    #[error("unreadable response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Sends a form to the backend and returns its verdict.
///
/// Validation has already passed by the time this is called.
pub trait Transport {
    fn submit(&self, form: &ContactForm) -> Result<SubmitResponse, TransportError>;
}

/// JSON over HTTP(S) using a blocking client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    endpoint: reqwest::Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = reqwest::Url::parse(endpoint)
            .map_err(|_| TransportError::InvalidEndpoint(endpoint.to_string()))?;
        let scheme = endpoint.scheme().to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(TransportError::UnsupportedScheme(scheme));
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("unveil/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl Transport for HttpTransport {
    fn submit(&self, form: &ContactForm) -> Result<SubmitResponse, TransportError> {
        let body = serde_json::to_string(form).map_err(TransportError::Encode)?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        let text = response.text()?;
        debug!(status = status.as_u16(), bytes = text.len(), "form endpoint answered");

        // Rejections come back as 4xx with the same JSON shape.
        match serde_json::from_str::<SubmitResponse>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
            }),
            Err(err) => Err(TransportError::Decode(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_endpoints() {
        assert!(matches!(
            HttpTransport::new("ftp://example.com/contact", Duration::from_secs(1)),
            Err(TransportError::UnsupportedScheme(s)) if s == "ftp"
        ));
        assert!(matches!(
            HttpTransport::new("not a url", Duration::from_secs(1)),
            Err(TransportError::InvalidEndpoint(_))
        ));
    }

    #[test]
    fn keeps_endpoint() {
        let transport =
            HttpTransport::new("https://api.example.com/contact", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.endpoint(), "https://api.example.com/contact");
    }
}
