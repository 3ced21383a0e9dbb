//! Canonical request signing and inbound signature verification.
//!
//! The gateway recomputes the signature over the same canonical string, so
//! every step of [`signing_string`] is part of the wire contract:
//!
//! 1. drop `sign` and `key`,
//! 2. drop fields with empty values,
//! 3. render `name=value`,
//! 4. sort byte-wise ascending,
//! 5. join with `&`,
//! 6. append `&key=<secret>`.
//!
//! The result is digested with MD5 and rendered as uppercase hex.
//!
//! # Example
//!
//! ```
//! use wxpay_lib::fields::FieldSet;
//! use wxpay_lib::signing;
//!
//! let fields = FieldSet::new().with("b", "2").with("a", "1");
//! assert_eq!(signing::signing_string(&fields, "SECRET"), "a=1&b=2&key=SECRET");
//! assert_eq!(signing::sign(&fields, "SECRET").len(), 32);
//! ```

use serde::{Deserialize, Serialize};

use crate::fields::{FieldSet, KEY_FIELD};
use crate::{Result, WxPayError};

/// Digest used for signatures.
///
/// Emitted as the `signType` marker of the client invocation payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignType {
    #[default]
    #[serde(rename = "MD5")]
    Md5,
}

impl SignType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
        }
    }
}

impl std::fmt::Display for SignType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`verify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerifyResult {
    Ok,
    Mismatch,
}

impl VerifyResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Turn a mismatch into [`WxPayError::SignatureMismatch`].
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Ok => Ok(()),
            Self::Mismatch => Err(WxPayError::SignatureMismatch),
        }
    }
}

/// The sorted `&`-joined body, without the secret suffix.
///
/// This is the part that is safe to log.
pub fn canonical_body(fields: &FieldSet) -> String {
    let mut pairs: Vec<String> = fields
        .signable()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    pairs.sort_unstable();
    pairs.join("&")
}

/// Build the full string fed to the digest.
pub fn signing_string(fields: &FieldSet, secret: &str) -> String {
    format!("{}&{}={}", canonical_body(fields), KEY_FIELD, secret)
}

/// Sign a field set with the merchant secret.
///
/// Any `sign` entry already present is ignored, so re-signing a signed set
/// yields the same value.
pub fn sign(fields: &FieldSet, secret: &str) -> String {
    #[cfg(feature = "tracing")]
    tracing::debug!(sign_body = %canonical_body(fields), "signing field set");

    md5_hex(&signing_string(fields, secret)).to_uppercase()
}

/// Verify a signature presented over raw `data`.
///
/// The digest input is `data + "&Key=" + secret`. Note the capital `K`: this
/// differs from [`sign`] and is kept as the counterparty expects it. The
/// comparison is case-insensitive.
pub fn verify(data: &str, presented: &str, secret: &str) -> VerifyResult {
    let computed = md5_hex(&format!("{}&Key={}", data, secret));
    if computed.eq_ignore_ascii_case(presented) {
        VerifyResult::Ok
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("signature mismatch on inbound data");
        VerifyResult::Mismatch
    }
}

/// Check the `sign` field of an inbound field set against [`sign`].
pub fn verify_fields(fields: &FieldSet, secret: &str) -> VerifyResult {
    let Some(presented) = fields.get(crate::fields::SIGN_FIELD) else {
        return VerifyResult::Mismatch;
    };
    if sign(fields, secret).eq_ignore_ascii_case(presented) {
        VerifyResult::Ok
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("signature mismatch on inbound field set");
        VerifyResult::Mismatch
    }
}

fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}
