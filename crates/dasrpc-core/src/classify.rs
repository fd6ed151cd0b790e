//! Recognises the JSON-RPC error envelope and turns it into an [`RpcError`].

use serde_json::Value;

use crate::error::RpcError;
use crate::request::RpcId;

/// Returns `true` iff `body` is
/// `{"jsonrpc":"2.0","error":{"code":<int>,"message":<string>}, ...}`.
///
/// `<int>` must fit an `i64`; larger codes fail the check.
///
/// This shape is the only thing that makes a response a remote-business
/// error. Everything else that decodes is treated as success.
pub fn is_rpc_error_shape(body: &Value) -> bool {
    let Some(obj) = body.as_object() else {
        return false;
    };
    if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return false;
    }
    let Some(error) = obj.get("error").and_then(Value::as_object) else {
        return false;
    };
    let code_is_int = error.get("code").map(Value::is_i64).unwrap_or(false);
    code_is_int && error.get("message").map(Value::is_string).unwrap_or(false)
}

/// Extract the error from a body that satisfies [`is_rpc_error_shape`].
///
/// Returns `None` for any other body. Codes are taken verbatim; no range
/// checks are applied.
pub fn classify(body: &Value) -> Option<RpcError> {
    if !is_rpc_error_shape(body) {
        return None;
    }
    let error = &body["error"];
    let code = error["code"].as_i64()?;
    Some(RpcError {
        code,
        message: error["message"].as_str()?.to_string(),
        id: RpcId::from_value(body.get("id")),
        data: error.get("data").cloned(),
    })
}
