//! Error taxonomy: remote-business errors vs. transport errors.

use serde_json::Value;
use thiserror::Error;

use crate::request::RpcId;

/// Result of every fallible public operation in this crate.
pub type DasResult<T> = Result<T, DasError>;

/// Any failure of a dispatch.
#[derive(Debug, Error)]
pub enum DasError {
    /// The service ran the method and reported a domain-level failure.
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The call never produced a classifiable answer.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DasError {
    /// Returns `true` for remote-business errors.
    pub fn is_rpc(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }

    /// Returns `true` for transport-class errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The remote error code, if this is a remote-business error.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc(e) => Some(e.code),
            Self::Transport(_) => None,
        }
    }

    /// Returns `true` only when the service reported its rate-limit code.
    pub fn is_rate_limited(&self) -> bool {
        self.rpc_code() == Some(RpcErrorCode::RateLimitExceeded.code())
    }

    /// HTTP status of a failed exchange, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(TransportError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }
}

/// Failures below the JSON-RPC layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Connection refused, DNS failure, timeout, etc.
    #[error("network error: {0}")]
    Network(String),

    /// The body was not JSON, or the result did not fit the requested type.
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// A remote JSON-RPC error, classified from the response envelope.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub id: RpcId,
    pub data: Option<Value>,
}

impl RpcError {
    /// Known code for this error, if it is one of the documented ones.
    pub fn known_code(&self) -> Option<RpcErrorCode> {
        RpcErrorCode::from_code(self.code)
    }

    /// Human-readable meaning of the code. Presentation only.
    pub fn description(&self) -> Option<&'static str> {
        self.known_code().map(RpcErrorCode::description)
    }
}

/// Documented DAS error codes. Not exhaustive: any other code still
/// classifies, it just has no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    InvalidIdentifier,
    RateLimitExceeded,
    InvalidParameter,
    MethodNotFound,
    InternalError,
}

impl RpcErrorCode {
    pub const ALL: [RpcErrorCode; 5] = [
        Self::InvalidIdentifier,
        Self::RateLimitExceeded,
        Self::InvalidParameter,
        Self::MethodNotFound,
        Self::InternalError,
    ];

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -32000 => Some(Self::InvalidIdentifier),
            -32001 => Some(Self::RateLimitExceeded),
            -32602 => Some(Self::InvalidParameter),
            -32601 => Some(Self::MethodNotFound),
            -32603 => Some(Self::InternalError),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::InvalidIdentifier => -32000,
            Self::RateLimitExceeded => -32001,
            Self::InvalidParameter => -32602,
            Self::MethodNotFound => -32601,
            Self::InternalError => -32603,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::InvalidIdentifier => "invalid identifier or public key",
            Self::RateLimitExceeded => "rate limit exceeded",
            Self::InvalidParameter => "invalid parameter",
            Self::MethodNotFound => "method not found",
            Self::InternalError => "internal server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rpc(code: i64) -> DasError {
        DasError::Rpc(RpcError {
            code,
            message: "boom".into(),
            id: RpcId::Number(1.into()),
            data: None,
        })
    }

    #[test]
    fn code_table_roundtrips() {
        for c in RpcErrorCode::ALL {
            assert_eq!(RpcErrorCode::from_code(c.code()), Some(c));
        }
        assert_eq!(RpcErrorCode::from_code(-9999), None);
    }

    #[test]
    fn rate_limit_only_for_remote_code() {
        assert!(rpc(-32001).is_rate_limited());
        assert!(!rpc(-32000).is_rate_limited());
        let transport = DasError::Transport(TransportError::Status {
            status: 429,
            body: "slow down".into(),
        });
        assert!(!transport.is_rate_limited());
        assert_eq!(transport.status(), Some(429));
    }

    #[test]
    fn display_keeps_message() {
        let err = rpc(-9999);
        assert_eq!(err.to_string(), "RPC error -9999: boom");
        assert!(err.is_rpc());
        assert!(!err.is_transport());
    }
}
