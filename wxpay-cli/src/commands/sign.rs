//! Sign command - compute a request signature offline

use anyhow::{bail, Result};
use wxpay_lib::{signing, FieldSet};

use crate::ui;

pub fn run(pairs: &[String], key: &str) -> Result<()> {
    let fields = parse_pairs(pairs)?;

    ui::header("Signature");
    ui::key_value("sign_body", &signing::canonical_body(&fields));
    ui::key_value("sign", &signing::sign(&fields, key));

    Ok(())
}

/// Parse `name=value` arguments. The value may be empty or contain `=`.
fn parse_pairs(pairs: &[String]) -> Result<FieldSet> {
    let mut fields = FieldSet::new();
    for pair in pairs {
        let Some((name, value)) = pair.split_once('=') else {
            bail!("expected name=value, got '{}'", pair);
        };
        if name.is_empty() {
            bail!("empty field name in '{}'", pair);
        }
        fields.insert(name, value);
    }
    Ok(fields)
}
