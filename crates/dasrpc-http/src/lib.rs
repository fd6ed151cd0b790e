//! dasrpc-http — HTTP transport for DAS JSON-RPC clients.
//!
//! # Quick start
//! ```rust,no_run
//! use dasrpc_core::ClientConfig;
//! use dasrpc_http::http_client;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = http_client(
//!     ClientConfig::new("https://mainnet.helius-rpc.com").with_api_key("YOUR_API_KEY"),
//! )?;
//! let asset = client.get_asset("F9Lw3ki3hJ7PF9HQXsBzoY8GyE6sPoEZZdXJBsTTD2rk").await?;
//! println!("{}", asset.id);
//! # Ok(())
//! # }
//! ```

pub mod client;

pub use client::{endpoint_url, http_client, redact, HttpTransport};
