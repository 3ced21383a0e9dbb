use async_trait::async_trait;

use crate::Result;

/// Content type of every request body.
pub const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// One request/response exchange with the gateway.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    /// POSTs an XML document to `url` and returns the reply body.
    ///
    /// Network, TLS, timeout and non-2xx failures must come back as errors,
    /// never as an empty body.
    async fn post_xml(&self, url: &str, body: String) -> Result<String>;
}

#[async_trait]
impl<T: GatewayTransport + ?Sized> GatewayTransport for std::sync::Arc<T> {
    async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        (**self).post_xml(url, body).await
    }
}
