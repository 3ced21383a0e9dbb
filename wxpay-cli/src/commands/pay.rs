//! Pay command - place a unified order

use anyhow::Result;
use std::net::IpAddr;
use wxpay_lib::ChargeRequest;

use crate::ui;

#[tracing::instrument(skip(describe, open_id))]
pub async fn run(
    trade_num: String,
    describe: String,
    amount: u64,
    open_id: String,
    client_ip: Option<IpAddr>,
) -> Result<()> {
    let client = super::client_from_env()?;

    let mut charge = ChargeRequest::new(trade_num, describe, amount, open_id);
    if let Some(ip) = client_ip {
        charge = charge.with_client_ip(ip);
    }

    match client.initiate_payment(&charge).await {
        Ok(payload) => {
            ui::success(&format!("Order {} placed", charge.trade_num));
            ui::json(&payload)?;
            Ok(())
        }
        Err(e) => {
            ui::error(&format!("Payment failed: {}", e));
            Err(e.into())
        }
    }
}
