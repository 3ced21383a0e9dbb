//! Error types for gateway operations.
//!
//! Every failure mode of the client surfaces as a distinct variant so that
//! callers can decide on retry, user messaging or abort. Nothing in this
//! crate retries on its own.

/// Numeric error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum WxPayErrorCode {
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Signature did not verify
    SignatureMismatch = 3000,
    /// Invalid request/configuration data
    InvalidData = 5000,
    /// Reply body could not be decoded
    Decode = 5002,
    /// Gateway reported a communication-level failure
    GatewayCommunication = 6000,
    /// Gateway reported a business-level failure
    GatewayBusiness = 6001,
}

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum WxPayError {
    /// The HTTPS exchange failed (including non-2xx replies).
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection to the gateway could not be established.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target endpoint
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The reply body is not well-formed for the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// `return_code` was not `SUCCESS`.
    #[error("gateway communication failed: {message}")]
    GatewayCommunication {
        /// `return_msg` as sent by the gateway
        message: String,
    },

    /// `result_code` was not `SUCCESS`.
    #[error("gateway rejected the request ({code}): {description}")]
    GatewayBusiness {
        /// `err_code` as sent by the gateway
        code: String,
        /// `err_code_des` as sent by the gateway
        description: String,
    },

    /// A presented signature does not match the recomputed one.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// Invalid input or configuration.
    #[error("invalid {field}: {reason}")]
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

impl WxPayError {
    /// Get the numeric error code.
    pub fn code(&self) -> WxPayErrorCode {
        match self {
            Self::Transport(_) => WxPayErrorCode::Transport,
            Self::ConnectionFailed { .. } => WxPayErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => WxPayErrorCode::ConnectionTimeout,
            Self::Decode(_) => WxPayErrorCode::Decode,
            Self::GatewayCommunication { .. } => WxPayErrorCode::GatewayCommunication,
            Self::GatewayBusiness { .. } => WxPayErrorCode::GatewayBusiness,
            Self::SignatureMismatch => WxPayErrorCode::SignatureMismatch,
            Self::InvalidData { .. } => WxPayErrorCode::InvalidData,
        }
    }

    /// Returns true for failures of the HTTPS call itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. }
        )
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<quick_xml::DeError> for WxPayError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<quick_xml::Error> for WxPayError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = WxPayError::ConnectionTimeout {
            operation: "pay".to_string(),
            timeout_ms: 30_000,
        };
        assert_eq!(err.code(), WxPayErrorCode::ConnectionTimeout);
        assert!(err.is_transport());

        assert!(!WxPayError::SignatureMismatch.is_transport());
        assert!(!WxPayError::Decode("eof".into()).is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = WxPayError::GatewayBusiness {
            code: "ORDERPAID".to_string(),
            description: "order already paid".to_string(),
        };
        assert!(err.to_string().contains("ORDERPAID"));
        assert!(err.to_string().contains("order already paid"));

        let err = WxPayError::GatewayCommunication {
            message: "invalid mch_id".to_string(),
        };
        assert!(err.to_string().contains("invalid mch_id"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = WxPayError::invalid_data("total_fee", "must be positive");
        assert_eq!(err.code(), WxPayErrorCode::InvalidData);
        assert_eq!(err.to_string(), "invalid total_fee: must be positive");
    }
}
