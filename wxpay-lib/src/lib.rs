//! WeChat Pay gateway client.
//!
//! This crate builds signed JSAPI payment requests, verifies signed replies
//! and callbacks, and exchanges them with the gateway over flat XML.
//!
//! # Features
//!
//! - **Canonical signing**: the gateway's sorted `key=value` MD5 scheme ([`signing`])
//! - **Wire codec**: flat CDATA XML documents ([`xml`])
//! - **Payment flows**: unified order and order query ([`WechatPayClient`])
//! - **Transport abstraction**: trait-based HTTP seam ([`transport::GatewayTransport`])
//!
//! # Example
//!
//! ```ignore
//! use wxpay_lib::{ChargeRequest, Credentials, WechatPayClient};
//!
//! let credentials = Credentials::from_env()?;
//! let client = WechatPayClient::with_http(credentials)?;
//!
//! let charge = ChargeRequest::new("T20240101001", "Coffee", 1_800, "oUpF8uMuAJO_M2pxb1Q9zNjWeS6o");
//! let payload = client.initiate_payment(&charge).await?;
//!
//! // Hand `payload` to the browser as JSON for WeixinJSBridge.
//! println!("{}", serde_json::to_string(&payload)?);
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod fields;
pub mod models;
pub mod signing;
pub mod transport;
pub mod xml;

/// Test utilities for exercising flows without a network.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use client::WechatPayClient;
pub use config::{Credentials, SecretKey};
pub use errors::{WxPayError, WxPayErrorCode};
pub use fields::FieldSet;
pub use models::{CallbackNotification, ChargeRequest, GatewayResponse};
pub use signing::{SignType, VerifyResult};

/// Common result alias for gateway operations.
pub type Result<T> = std::result::Result<T, WxPayError>;
