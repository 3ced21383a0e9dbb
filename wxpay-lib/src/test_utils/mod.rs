//! Test utilities for exercising the payment flows without a network.
//!
//! Available under `cfg(test)` or the `test-utils` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::fields::FieldSet;
use crate::transport::GatewayTransport;
use crate::{Result, WxPayError};

/// A request captured by [`StubTransport`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub url: String,
    pub body: String,
}

/// Replays canned replies in order and records what was sent.
#[derive(Default)]
pub struct StubTransport {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply body.
    pub fn reply(self, body: impl Into<String>) -> Self {
        self.push(Ok(body.into()));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, reason: impl Into<String>) -> Self {
        self.push(Err(WxPayError::Transport(reason.into())));
        self
    }

    fn push(&self, reply: Result<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Requests sent so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl GatewayTransport for StubTransport {
    async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(RecordedRequest {
                url: url.to_string(),
                body,
            });
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Err(WxPayError::Transport("no stubbed reply left".to_string())))
    }
}

/// Canned gateway replies.
pub struct Replies;

impl Replies {
    /// Unified order accepted with the given prepay token.
    pub fn prepay_success(prepay_id: &str) -> String {
        crate::xml::encode_fields(
            &FieldSet::new()
                .with("return_code", "SUCCESS")
                .with("return_msg", "OK")
                .with("result_code", "SUCCESS")
                .with("trade_type", "JSAPI")
                .with("prepay_id", prepay_id),
        )
    }

    /// Communication succeeded, business status failed.
    pub fn business_failure(err_code: &str, description: &str) -> String {
        crate::xml::encode_fields(
            &FieldSet::new()
                .with("return_code", "SUCCESS")
                .with("return_msg", "OK")
                .with("result_code", "FAIL")
                .with("err_code", err_code)
                .with("err_code_des", description),
        )
    }

    /// Communication-level failure.
    pub fn communication_failure(message: &str) -> String {
        crate::xml::encode_fields(
            &FieldSet::new()
                .with("return_code", "FAIL")
                .with("return_msg", message),
        )
    }

    /// Order query reply with the given trade state.
    pub fn query(out_trade_no: &str, trade_state: &str) -> String {
        crate::xml::encode_fields(
            &FieldSet::new()
                .with("return_code", "SUCCESS")
                .with("result_code", "SUCCESS")
                .with("out_trade_no", out_trade_no)
                .with("trade_state", trade_state)
                .with("total_fee", "100"),
        )
    }

    /// A callback notification signed with `secret`.
    pub fn signed_notification(secret: &str, out_trade_no: &str, total_fee: u64) -> String {
        let mut fields = FieldSet::new()
            .with("appid", "wx2421b1c4370ec43b")
            .with("mch_id", "10000100")
            .with("nonce_str", "5d2b6c2a8db53831f7eda20af46e531c")
            .with("openid", "oUpF8uMEb4qRXf22hE3X68TekukE")
            .with("return_code", "SUCCESS")
            .with("result_code", "SUCCESS")
            .with("out_trade_no", out_trade_no)
            .with("transaction_id", "1004400740201409030005092168")
            .with("total_fee", total_fee.to_string());
        let sign = crate::signing::sign(&fields, secret);
        fields.insert("sign", sign);
        crate::xml::encode_fields(&fields)
    }
}
