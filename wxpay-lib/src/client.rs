//! Payment-initiation and order-query flows.
//!
//! [`WechatPayClient`] is constructed explicitly from [`Credentials`] and a
//! [`GatewayTransport`] and passed to whoever needs it. It holds no mutable
//! state, so one instance can serve concurrent requests.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::config::Credentials;
use crate::fields::{FieldSet, SIGN_FIELD};
use crate::models::{CallbackNotification, ChargeRequest, GatewayResponse};
use crate::signing::{self, SignType, VerifyResult};
use crate::transport::GatewayTransport;
use crate::xml;
use crate::{Result, WxPayError};

/// `trade_type` for in-browser (official account) payments.
pub const TRADE_TYPE_JSAPI: &str = "JSAPI";

/// Field carrying the signature of the client invocation payload.
pub const PAY_SIGN_FIELD: &str = "paySign";

const NONCE_LEN: usize = 32;

/// Gateway client for one merchant account.
pub struct WechatPayClient<T> {
    credentials: Credentials,
    transport: T,
}

#[cfg(feature = "http-transport")]
impl WechatPayClient<crate::transport::HttpTransport> {
    /// Create a client talking HTTPS with the configured timeout.
    pub fn with_http(credentials: Credentials) -> Result<Self> {
        let transport = crate::transport::HttpTransport::new(credentials.timeout_secs)?;
        Self::new(credentials, transport)
    }
}

impl<T: GatewayTransport> WechatPayClient<T> {
    /// Create a client. Fails if a required credential is empty.
    pub fn new(credentials: Credentials, transport: T) -> Result<Self> {
        credentials.validate()?;
        Ok(Self {
            credentials,
            transport,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Place a unified order and build the client-side invocation payload.
    ///
    /// The returned set holds `appId`, `timeStamp`, `nonceStr`, `package`,
    /// `signType` and `paySign`, ready to be handed to the browser. Gateway
    /// failures are errors here, unlike [`query_order`](Self::query_order).
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, charge), fields(trade_num = %charge.trade_num)))]
    pub async fn initiate_payment(&self, charge: &ChargeRequest) -> Result<FieldSet> {
        charge.validate()?;

        let client_ip = charge.client_ip.unwrap_or_else(outbound_ip);
        let request = FieldSet::new()
            .with("appid", self.credentials.app_id.as_str())
            .with("mch_id", self.credentials.mch_id.as_str())
            .with("nonce_str", nonce_str())
            .with("body", charge.describe.as_str())
            .with("out_trade_no", charge.trade_num.as_str())
            .with("total_fee", charge.money_fee.to_string())
            .with("spbill_create_ip", client_ip.to_string())
            .with("notify_url", self.credentials.callback_url.as_str())
            .with("trade_type", TRADE_TYPE_JSAPI)
            .with("openid", charge.open_id.as_str());

        let reply: GatewayResponse = self.exchange(&self.credentials.pay_url, request).await?;

        if !reply.is_communication_success() {
            return Err(WxPayError::GatewayCommunication {
                message: reply.return_msg.unwrap_or_default(),
            });
        }

        if !reply.is_business_success() {
            return Err(WxPayError::GatewayBusiness {
                code: reply.err_code.unwrap_or_default(),
                description: reply.err_code_des.unwrap_or_default(),
            });
        }

        let prepay_id = reply
            .prepay_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| WxPayError::Decode("reply is missing prepay_id".to_string()))?;

        let mut invocation = FieldSet::new()
            .with("appId", self.credentials.app_id.as_str())
            .with("timeStamp", chrono::Utc::now().timestamp().to_string())
            .with("nonceStr", nonce_str())
            .with("package", format!("prepay_id={}", prepay_id))
            .with("signType", SignType::Md5.as_str());
        let pay_sign = signing::sign(&invocation, self.credentials.key.expose());
        invocation.insert(PAY_SIGN_FIELD, pay_sign);

        Ok(invocation)
    }

    /// Query an order by merchant trade number.
    ///
    /// The decoded reply is returned as-is, failure statuses included. Only
    /// transport and decode failures are errors.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn query_order(&self, trade_num: &str) -> Result<GatewayResponse> {
        if trade_num.is_empty() {
            return Err(WxPayError::invalid_data("trade_num", "cannot be empty"));
        }

        let request = FieldSet::new()
            .with("appid", self.credentials.app_id.as_str())
            .with("mch_id", self.credentials.mch_id.as_str())
            .with("out_trade_no", trade_num)
            .with("nonce_str", nonce_str());

        self.exchange(&self.credentials.query_url, request).await
    }

    /// Decode and authenticate a payment-result callback body.
    ///
    /// The gateway signs notifications the same way requests are signed, so
    /// the presented `sign` is checked against [`signing::sign`].
    pub fn parse_notification(&self, body: &str) -> Result<CallbackNotification> {
        let fields = xml::decode_fields(body)?;
        signing::verify_fields(&fields, self.credentials.key.expose()).into_result()?;
        Ok(CallbackNotification::new(fields))
    }

    /// Verify a signature over raw data with this account's secret.
    pub fn verify_signature(&self, data: &str, presented: &str) -> VerifyResult {
        signing::verify(data, presented, self.credentials.key.expose())
    }

    /// Sign, encode, send and decode one request.
    async fn exchange(&self, url: &str, mut fields: FieldSet) -> Result<GatewayResponse> {
        let sign = signing::sign(&fields, self.credentials.key.expose());
        fields.insert(SIGN_FIELD, sign);
        let body = xml::encode_fields(&fields);

        #[cfg(feature = "tracing")]
        tracing::debug!(%url, request = %body, "posting to gateway");

        let reply = self.transport.post_xml(url, body).await?;
        let response: GatewayResponse = xml::decode_response(&reply)?;
        if response.return_code.is_empty() {
            return Err(WxPayError::Decode("reply has an empty return_code".to_string()));
        }
        Ok(response)
    }
}

/// 32 random alphanumeric characters.
pub fn nonce_str() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

/// Address of the interface used for outbound traffic, or loopback.
///
/// Connecting a UDP socket sends nothing; it only selects a route.
fn outbound_ip() -> IpAddr {
    UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))
        .and_then(|socket| {
            socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80))?;
            socket.local_addr()
        })
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}
