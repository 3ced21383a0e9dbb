//! Notify command - authenticate a payment-result callback

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use wxpay_lib::xml;

use crate::ui;

pub fn run(input: Option<&Path>) -> Result<()> {
    let body = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let client = super::client_from_env()?;
    match client.parse_notification(&body) {
        Ok(notification) => {
            ui::success(&format!(
                "Notification for order {} verified",
                notification.out_trade_no().unwrap_or("-")
            ));
            ui::json(notification.fields())?;
            println!("{}", xml::notification_ack(true, "OK"));
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "rejected callback notification");
            ui::error(&format!("Notification rejected: {}", e));
            println!("{}", xml::notification_ack(false, &e.to_string()));
            Err(e.into())
        }
    }
}
