//! dasrpc-core — request pipeline for Digital Asset Standard (DAS) JSON-RPC clients.
//!
//! # Overview
//!
//! Every call flows through the same pipeline:
//!
//! ```text
//! caller → [cached_fetch | Paginator | direct] → Dispatcher → RpcTransport
//!                                                    ↓
//!                                       classify → DasResult<T>
//! ```
//!
//! The crate defines:
//!
//! - [`DasResult`] / [`DasError`] — remote-business vs. transport failures
//! - [`classify`] — recognises the JSON-RPC error envelope
//! - [`RpcTransport`] — the async trait a transport implements (HTTP lives in `dasrpc-http`)
//! - [`Dispatcher`] — one envelope, one POST, one classified result
//! - [`CachePort`] / [`MemoryCache`] — pluggable cache with lazy TTL expiry
//! - [`cached_fetch`] — read-through/write-through wrapper for single-entity lookups
//! - [`Paginator`] / [`CursorPaginator`] — lazy page sequences for list endpoints
//! - [`DasClient`] — typed methods for each DAS endpoint

pub mod cache;
pub mod cached;
pub mod classify;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pagination;
pub mod request;
pub mod transport;
pub mod types;

pub use cache::{CacheError, CachePort, MemoryCache};
pub use cached::{cache_key, cached_fetch};
pub use classify::{classify, is_rpc_error_shape};
pub use client::DasClient;
pub use config::ClientConfig;
pub use dispatch::Dispatcher;
pub use error::{DasError, DasResult, RpcError, RpcErrorCode, TransportError};
pub use pagination::{CursorPaginator, Page, PageRequest, Paginator, Termination};
pub use request::{JsonRpcRequest, RawResponse, RpcId, REQUEST_ID};
pub use transport::RpcTransport;
pub use types::{Asset, AssetList, AssetProof, Edition, EditionList, SignatureList, TokenAccount, TokenAccountList};
