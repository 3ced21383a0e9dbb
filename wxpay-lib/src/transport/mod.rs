//! Transport seam between the payment flows and the network.
//!
//! The flows only ever call [`GatewayTransport::post_xml`]; swap the
//! implementation to run against a stub or a different HTTP stack.

#[cfg(feature = "http-transport")]
mod http;
mod traits;

#[cfg(feature = "http-transport")]
pub use http::HttpTransport;
pub use traits::{GatewayTransport, XML_CONTENT_TYPE};
