//! JSON-RPC 2.0 wire types.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Id stamped on every outbound envelope.
///
/// Each dispatch is one request over its own HTTP exchange, so responses
/// never need to be matched back to requests by id. If requests are ever
/// multiplexed over one connection this must become locally unique.
pub const REQUEST_ID: u64 = 1;

/// JSON-RPC request ID — string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(Number),
    String(String),
    Null,
}

impl RpcId {
    /// Read an id from a decoded response body. Strings and numbers are
    /// kept verbatim; anything else maps to `Null`.
    pub fn from_value(v: Option<&Value>) -> Self {
        match v {
            Some(Value::String(s)) => Self::String(s.clone()),
            Some(Value::Number(n)) => Self::Number(n.clone()),
            _ => Self::Null,
        }
    }
}

impl std::fmt::Display for RpcId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Null => write!(f, "null"),
        }
    }
}

/// The outbound JSON-RPC 2.0 envelope.
///
/// Built fresh for every dispatch; field order on the wire is
/// `jsonrpc`, `id`, `method`, `params`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request with the constant [`REQUEST_ID`].
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id: RpcId::Number(REQUEST_ID.into()),
            method: method.into(),
            params,
        }
    }
}

/// Status code and raw body of one HTTP exchange, as reported by a transport.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
