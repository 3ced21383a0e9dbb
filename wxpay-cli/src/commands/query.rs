//! Query command - look up an order

use anyhow::Result;

use crate::ui;

#[tracing::instrument]
pub async fn run(trade_num: &str) -> Result<()> {
    let client = super::client_from_env()?;
    let reply = client.query_order(trade_num).await?;

    ui::header(&format!("Order {}", trade_num));
    ui::key_value("return_code", &reply.return_code);
    ui::key_value("result_code", reply.result_code.as_deref().unwrap_or("-"));
    if let Some(state) = &reply.trade_state {
        ui::key_value("trade_state", state);
    }
    if !reply.is_business_success() {
        ui::key_value("err_code", reply.err_code.as_deref().unwrap_or("-"));
        ui::key_value("err_code_des", reply.err_code_des.as_deref().unwrap_or("-"));
    }
    ui::json(&reply)?;

    Ok(())
}
