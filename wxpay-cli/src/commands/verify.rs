//! Verify command - check a signature over raw data

use anyhow::Result;
use wxpay_lib::signing;

use crate::ui;

pub fn run(data: &str, sign: &str, key: &str) -> Result<()> {
    match signing::verify(data, sign, key).into_result() {
        Ok(()) => {
            ui::success("Signature valid");
            Ok(())
        }
        Err(e) => {
            ui::error("Signature does not match");
            Err(e.into())
        }
    }
}
