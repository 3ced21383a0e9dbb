//! Request inputs and decoded gateway replies.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::fields::FieldSet;
use crate::{Result, WxPayError};

/// Status value the gateway uses for both `return_code` and `result_code`.
pub const SUCCESS: &str = "SUCCESS";

/// A charge to initiate, in minor currency units (fen).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRequest {
    /// Merchant-side order number (`out_trade_no`).
    pub trade_num: String,
    /// Order description shown to the payer (`body`).
    pub describe: String,
    /// Amount in fen (`total_fee`).
    pub money_fee: u64,
    /// Payer identifier (`openid`).
    pub open_id: String,
    /// Originating IP. The host's outbound address is used when absent.
    #[serde(default)]
    pub client_ip: Option<IpAddr>,
}

impl ChargeRequest {
    pub fn new(
        trade_num: impl Into<String>,
        describe: impl Into<String>,
        money_fee: u64,
        open_id: impl Into<String>,
    ) -> Self {
        Self {
            trade_num: trade_num.into(),
            describe: describe.into(),
            money_fee,
            open_id: open_id.into(),
            client_ip: None,
        }
    }

    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Reject charges the gateway would refuse outright.
    pub fn validate(&self) -> Result<()> {
        if self.trade_num.is_empty() {
            return Err(WxPayError::invalid_data("trade_num", "cannot be empty"));
        }
        if self.money_fee == 0 {
            return Err(WxPayError::invalid_data("money_fee", "must be positive"));
        }
        if self.open_id.is_empty() {
            return Err(WxPayError::invalid_data("open_id", "cannot be empty"));
        }
        Ok(())
    }
}

/// Decoded reply from the unified-order and order-query endpoints.
///
/// `return_code` is required; a reply without it is not a gateway reply.
/// Every other field is optional and decodes to `None` when absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    // Communication status
    pub return_code: String,
    pub return_msg: Option<String>,

    // Business status
    pub result_code: Option<String>,
    pub err_code: Option<String>,
    pub err_code_des: Option<String>,

    pub appid: Option<String>,
    pub mch_id: Option<String>,
    pub nonce_str: Option<String>,
    pub sign: Option<String>,

    /// Issued by unified order on success.
    pub prepay_id: Option<String>,
    pub trade_type: Option<String>,

    // Order query
    pub trade_state: Option<String>,
    pub trade_state_desc: Option<String>,
    pub transaction_id: Option<String>,
    pub out_trade_no: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub total_fee: Option<u64>,
    pub time_end: Option<String>,
    pub openid: Option<String>,
    pub bank_type: Option<String>,
}

/// Numeric field that the gateway may send as an empty element.
fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl GatewayResponse {
    /// `return_code == SUCCESS`.
    pub fn is_communication_success(&self) -> bool {
        self.return_code == SUCCESS
    }

    /// `result_code == SUCCESS`.
    pub fn is_business_success(&self) -> bool {
        self.result_code.as_deref() == Some(SUCCESS)
    }

    /// Order has been paid, per `trade_state`.
    pub fn is_paid(&self) -> bool {
        self.is_business_success() && self.trade_state.as_deref() == Some(SUCCESS)
    }
}

/// Asynchronous payment result posted to the callback URL.
///
/// Only constructed after its signature has been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackNotification {
    fields: FieldSet,
}

impl CallbackNotification {
    pub(crate) fn new(fields: FieldSet) -> Self {
        Self { fields }
    }

    /// All fields as received, including `sign`.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn out_trade_no(&self) -> Option<&str> {
        self.fields.get("out_trade_no")
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.fields.get("transaction_id")
    }

    pub fn total_fee(&self) -> Option<u64> {
        self.fields.get("total_fee").and_then(|v| v.parse().ok())
    }

    pub fn is_success(&self) -> bool {
        self.fields.get("return_code") == Some(SUCCESS)
            && self.fields.get("result_code") == Some(SUCCESS)
    }
}
