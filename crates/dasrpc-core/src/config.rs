//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a [`DasClient`](crate::client::DasClient) and its transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// JSON-RPC endpoint, e.g. "https://mainnet.helius-rpc.com"
    pub endpoint: String,
    /// API key, embedded in the endpoint URL as `?api-key=`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// TTL for cached single-entity lookups (`None` = never expire)
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: Option<u64>,
    /// Per-request timeout enforced by the transport
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Page size used when a list call does not specify one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_limit: Option<u32>,
}

fn default_cache_ttl_secs() -> Option<u64> { Some(300) }
fn default_request_timeout_ms() -> u64 { 30_000 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_ms: default_request_timeout_ms(),
            default_limit: None,
        }
    }
}

impl ClientConfig {
    /// Config for `endpoint` with every other setting at its default.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg: ClientConfig =
            serde_json::from_str(r#"{ "endpoint": "https://das.example.com" }"#).unwrap();
        assert_eq!(cfg.cache_ttl(), Some(Duration::from_secs(300)));
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        assert!(cfg.api_key.is_none());
    }

    #[test]
    fn explicit_null_ttl_disables_expiry() {
        let cfg: ClientConfig = serde_json::from_str(
            r#"{ "endpoint": "https://das.example.com", "cache_ttl_secs": null }"#,
        )
        .unwrap();
        assert_eq!(cfg.cache_ttl(), None);
    }
}
