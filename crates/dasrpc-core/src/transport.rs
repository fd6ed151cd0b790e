//! The `RpcTransport` trait — what the dispatcher needs from the network.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, RawResponse};

/// Performs one HTTP POST of a JSON-RPC envelope.
///
/// Implementations report the status code and raw body of whatever the
/// server answered; interpreting that answer is the dispatcher's job. A
/// transport returns `Err` only when no HTTP response was received at all.
/// Timeouts are the transport's concern.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// POST `req` as `application/json`.
    async fn post(&self, req: &JsonRpcRequest) -> Result<RawResponse, TransportError>;

    /// Return the transport's identifier (URL or name).
    fn url(&self) -> &str;
}
