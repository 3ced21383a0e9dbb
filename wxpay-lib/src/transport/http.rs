//! HTTPS transport backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{GatewayTransport, XML_CONTENT_TYPE};
use crate::{Result, WxPayError};

/// reqwest-backed [`GatewayTransport`].
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Create a transport with the given per-request timeout.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| WxPayError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Map HTTP status codes to WxPayError.
    fn map_status_error(&self, status: u16, body: &str) -> WxPayError {
        WxPayError::Transport(format!("gateway returned HTTP {}: {}", status, body))
    }

    /// Map reqwest errors to WxPayError.
    fn map_reqwest_error(&self, url: &str, e: reqwest::Error) -> WxPayError {
        if e.is_timeout() {
            WxPayError::ConnectionTimeout {
                operation: format!("POST {}", url),
                timeout_ms: self.timeout_secs * 1000,
            }
        } else if e.is_connect() {
            WxPayError::ConnectionFailed {
                target: url.to_string(),
                reason: e.to_string(),
            }
        } else {
            WxPayError::Transport(format!("gateway request failed: {}", e))
        }
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, body), fields(body_len = body.len())))]
    async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        if !status.is_success() {
            return Err(self.map_status_error(status.as_u16(), &text));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_is_transport() {
        let transport = HttpTransport::new(5).unwrap();
        let err = transport.map_status_error(502, "bad gateway");
        assert!(err.is_transport());
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let transport = HttpTransport::new(2).unwrap();
        // Port 9 (discard) on loopback is closed in test environments.
        let result = transport
            .post_xml("http://127.0.0.1:9/pay", "<xml></xml>".to_string())
            .await;
        assert!(result.unwrap_err().is_transport());
    }
}
