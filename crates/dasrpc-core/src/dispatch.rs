//! Request dispatcher: envelope → transport → classification → result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::classify::classify;
use crate::error::{DasResult, TransportError};
use crate::request::JsonRpcRequest;
use crate::transport::RpcTransport;

/// Issues exactly one transport call per [`dispatch`](Dispatcher::dispatch).
///
/// Holds no mutable state, so one dispatcher may serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn RpcTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn RpcTransport>) -> Self {
        Self { transport }
    }

    /// The transport's identifier, safe to log.
    pub fn url(&self) -> &str {
        self.transport.url()
    }

    /// Call `method` and decode the `result` member into `T`.
    ///
    /// A body with no `result` member is decoded whole. No schema
    /// validation happens beyond what `T`'s `Deserialize` impl does.
    pub async fn dispatch<T: DeserializeOwned>(&self, method: &str, params: Value) -> DasResult<T> {
        let result = self.dispatch_value(method, params).await?;
        serde_json::from_value(result).map_err(|e| {
            tracing::warn!(method, error = %e, "result did not match the requested type");
            TransportError::from(e).into()
        })
    }

    /// Call `method` and return the raw `result` member, or the whole body
    /// when it is not an envelope carrying one.
    pub async fn dispatch_value(&self, method: &str, params: Value) -> DasResult<Value> {
        let req = JsonRpcRequest::new(method, params);
        let resp = self.transport.post(&req).await.map_err(|e| {
            tracing::warn!(method, url = %self.url(), error = %e, "transport failure");
            e
        })?;

        tracing::debug!(method, status = resp.status, "dispatch completed");

        if !resp.is_success() {
            tracing::warn!(method, status = resp.status, "non-success HTTP status");
            return Err(TransportError::Status {
                status: resp.status,
                body: resp.body,
            }
            .into());
        }

        let mut body: Value = serde_json::from_str(&resp.body).map_err(|e| {
            tracing::warn!(method, error = %e, "response body is not JSON");
            TransportError::from(e)
        })?;

        if let Some(err) = classify(&body) {
            tracing::warn!(method, code = err.code, message = %err.message, "remote error");
            return Err(err.into());
        }

        match body.as_object_mut().and_then(|obj| obj.remove("result")) {
            Some(result) => Ok(result),
            None => Ok(body),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::{DasError, RpcErrorCode};
    use crate::request::RawResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays scripted responses in order and records every request.
    pub struct MockTransport {
        responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        pub requests: Mutex<Vec<JsonRpcRequest>>,
    }

    impl MockTransport {
        pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn ok(results: Vec<Value>) -> Arc<Self> {
            Self::new(
                results
                    .into_iter()
                    .map(|r| Ok(RawResponse::new(200, json!({ "jsonrpc": "2.0", "result": r, "id": 1 }).to_string())))
                    .collect(),
            )
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RpcTransport for MockTransport {
        async fn post(&self, req: &JsonRpcRequest) -> Result<RawResponse, TransportError> {
            self.requests.lock().unwrap().push(req.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
        }

        fn url(&self) -> &str {
            "mock://das"
        }
    }

    #[tokio::test]
    async fn success_returns_result_member() {
        let mock = MockTransport::ok(vec![json!({ "id": "asset-1" })]);
        let d = Dispatcher::new(mock.clone());
        let v: Value = d.dispatch("getAsset", json!({ "id": "asset-1" })).await.unwrap();
        assert_eq!(v, json!({ "id": "asset-1" }));
        assert_eq!(mock.calls(), 1);

        let sent = mock.requests.lock().unwrap();
        let req = &sent[0];
        assert_eq!(req.jsonrpc, "2.0");
        assert_eq!(req.method, "getAsset");
        assert_eq!(req.params, json!({ "id": "asset-1" }));
    }

    #[tokio::test]
    async fn body_without_result_is_returned_whole() {
        let mock = MockTransport::new(vec![
            Ok(RawResponse::new(200, r#"{"jsonrpc":"2.0","id":1}"#)),
            Ok(RawResponse::new(200, "42")),
            Ok(RawResponse::new(200, r#"[{"id":"a1"},null]"#)),
        ]);
        let d = Dispatcher::new(mock);
        let v = d.dispatch_value("getAsset", json!({})).await.unwrap();
        assert_eq!(v, json!({ "jsonrpc": "2.0", "id": 1 }));
        let n: u64 = d.dispatch("getAsset", json!({})).await.unwrap();
        assert_eq!(n, 42);
        let v = d.dispatch_value("getAssetBatch", json!({})).await.unwrap();
        assert_eq!(v, json!([{ "id": "a1" }, null]));
    }

    #[tokio::test]
    async fn null_result_stays_null() {
        let mock = MockTransport::ok(vec![Value::Null]);
        let d = Dispatcher::new(mock);
        let v: Option<Value> = d.dispatch("getAsset", json!({})).await.unwrap();
        assert!(v.is_none());
        assert_eq!(d.url(), "mock://das");
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let mock = MockTransport::new(vec![Ok(RawResponse::new(503, "unavailable"))]);
        let d = Dispatcher::new(mock.clone());
        let err = d.dispatch_value("getAsset", json!({})).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), Some(503));
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn network_failure_is_transport_error() {
        let mock = MockTransport::new(vec![Err(TransportError::Network("refused".into()))]);
        let d = Dispatcher::new(mock);
        let err = d.dispatch_value("getAsset", json!({})).await.unwrap_err();
        assert!(matches!(err, DasError::Transport(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let mock = MockTransport::new(vec![Ok(RawResponse::new(200, "<html>oops</html>"))]);
        let d = Dispatcher::new(mock);
        let err = d.dispatch_value("getAsset", json!({})).await.unwrap_err();
        assert!(matches!(err, DasError::Transport(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn type_mismatch_is_decode_error() {
        let mock = MockTransport::ok(vec![json!("not a number")]);
        let d = Dispatcher::new(mock);
        let err = d.dispatch::<u64>("getAsset", json!({})).await.unwrap_err();
        assert!(matches!(err, DasError::Transport(TransportError::Decode(_))));
    }

    #[tokio::test]
    async fn error_envelope_is_classified() {
        let body = json!({
            "jsonrpc": "2.0",
            "error": { "code": -32001, "message": "rate limit exceeded" },
            "id": "1"
        });
        let mock = MockTransport::new(vec![Ok(RawResponse::new(200, body.to_string()))]);
        let d = Dispatcher::new(mock);
        let err = d.dispatch_value("getAsset", json!({})).await.unwrap_err();
        assert!(err.is_rate_limited());
        match err {
            DasError::Rpc(e) => assert_eq!(e.known_code(), Some(RpcErrorCode::RateLimitExceeded)),
            other => panic!("expected Rpc, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_envelope_with_non_2xx_status_is_transport_error() {
        let body = json!({
            "jsonrpc": "2.0",
            "error": { "code": -32603, "message": "internal" },
            "id": 1
        });
        let mock = MockTransport::new(vec![Ok(RawResponse::new(500, body.to_string()))]);
        let d = Dispatcher::new(mock);
        let err = d.dispatch_value("getAsset", json!({})).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
