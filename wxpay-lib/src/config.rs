//! Merchant credentials and gateway endpoints.
//!
//! # Environment Variables
//!
//! [`Credentials::from_env`] reads:
//!
//! - `WXPAY_APP_ID` - official-account app id (required)
//! - `WXPAY_MCH_ID` - merchant id (required)
//! - `WXPAY_API_KEY` - merchant API secret (required)
//! - `WXPAY_NOTIFY_URL` - callback URL for payment results (required)
//! - `WXPAY_PAY_URL` - unified-order endpoint (optional)
//! - `WXPAY_QUERY_URL` - order-query endpoint (optional)
//! - `WXPAY_TIMEOUT` - request timeout in seconds (optional, default: 30)
//!
//! ```bash
//! export WXPAY_APP_ID=wx8888888888888888
//! export WXPAY_MCH_ID=1900000109
//! export WXPAY_API_KEY=192006250b4c09247ec02edce69f6a2d
//! export WXPAY_NOTIFY_URL=https://shop.example.com/wxpay/notify
//! ```

use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{Result, WxPayError};

/// Production unified-order endpoint.
pub const DEFAULT_PAY_URL: &str = "https://api.mch.weixin.qq.com/pay/unifiedorder";

/// Production order-query endpoint.
pub const DEFAULT_QUERY_URL: &str = "https://api.mch.weixin.qq.com/pay/orderquery";

/// Merchant API secret. Wiped on drop, never printed.
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw secret for a signing call.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Account identity, secret and endpoints. Set once, read-only afterwards.
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    /// Official-account app id (`appid`).
    pub app_id: String,

    /// Merchant id (`mch_id`).
    pub mch_id: String,

    /// Where the gateway posts payment results (`notify_url`).
    pub callback_url: String,

    /// Merchant API secret.
    pub key: SecretKey,

    /// Unified-order endpoint.
    #[serde(default = "default_pay_url")]
    pub pay_url: String,

    /// Order-query endpoint.
    #[serde(default = "default_query_url")]
    pub query_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_pay_url() -> String {
    DEFAULT_PAY_URL.to_string()
}

fn default_query_url() -> String {
    DEFAULT_QUERY_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Credentials {
    /// Create credentials pointing at the production endpoints.
    pub fn new(
        app_id: impl Into<String>,
        mch_id: impl Into<String>,
        key: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            mch_id: mch_id.into(),
            callback_url: callback_url.into(),
            key: SecretKey::new(key),
            pay_url: default_pay_url(),
            query_url: default_query_url(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set the unified-order endpoint.
    pub fn with_pay_url(mut self, url: impl Into<String>) -> Self {
        self.pay_url = url.into();
        self
    }

    /// Set the order-query endpoint.
    pub fn with_query_url(mut self, url: impl Into<String>) -> Self {
        self.query_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("app_id", self.app_id.is_empty()),
            ("mch_id", self.mch_id.is_empty()),
            ("key", self.key.is_empty()),
            ("pay_url", self.pay_url.is_empty()),
            ("query_url", self.query_url.is_empty()),
        ];
        for (field, missing) in required {
            if missing {
                return Err(WxPayError::invalid_data(field, "cannot be empty"));
            }
        }
        Ok(())
    }

    /// Load credentials from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| WxPayError::invalid_data(name, "environment variable not set"))
        };

        let mut credentials = Self::new(
            required("WXPAY_APP_ID")?,
            required("WXPAY_MCH_ID")?,
            required("WXPAY_API_KEY")?,
            required("WXPAY_NOTIFY_URL")?,
        );

        if let Some(url) = lookup("WXPAY_PAY_URL") {
            credentials = credentials.with_pay_url(url);
        }

        if let Some(url) = lookup("WXPAY_QUERY_URL") {
            credentials = credentials.with_query_url(url);
        }

        if let Some(timeout) = lookup("WXPAY_TIMEOUT") {
            let secs = timeout
                .parse::<u64>()
                .map_err(|e| WxPayError::invalid_data("WXPAY_TIMEOUT", e.to_string()))?;
            credentials = credentials.with_timeout(secs);
        }

        Ok(credentials)
    }
}
