//! CLI command implementations

pub mod notify;
pub mod pay;
pub mod query;
pub mod sign;
pub mod verify;

use anyhow::{Context, Result};
use wxpay_lib::transport::HttpTransport;
use wxpay_lib::{Credentials, WechatPayClient};

/// Build an HTTPS client from the `WXPAY_*` environment variables.
pub fn client_from_env() -> Result<WechatPayClient<HttpTransport>> {
    let credentials = Credentials::from_env().context("Failed to load WXPAY_* configuration")?;
    tracing::debug!(app_id = %credentials.app_id, pay_url = %credentials.pay_url, "loaded credentials");
    Ok(WechatPayClient::with_http(credentials)?)
}
