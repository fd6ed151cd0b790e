//! HTTP JSON-RPC transport backed by `reqwest`.
//!
//! One POST per call; no retries, no rate limiting. The only policy this
//! layer applies is the request timeout.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use dasrpc_core::config::ClientConfig;
use dasrpc_core::error::TransportError;
use dasrpc_core::request::{JsonRpcRequest, RawResponse};
use dasrpc_core::transport::RpcTransport;
use dasrpc_core::DasClient;

/// Query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "api-key";

/// Build the request URL, embedding `api_key` as `?api-key=<key>`.
///
/// Existing query parameters on `base` are kept.
pub fn endpoint_url(base: &str, api_key: Option<&str>) -> Result<String, TransportError> {
    let mut url = url::Url::parse(base)
        .map_err(|e| TransportError::Network(format!("invalid endpoint URL {base:?}: {e}")))?;
    if let Some(key) = api_key {
        url.query_pairs_mut().append_pair(API_KEY_PARAM, key);
    }
    Ok(url.into())
}

/// `url` with the API key value replaced, safe to log.
pub fn redact(url: &str) -> String {
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_string();
    };
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return parsed.into();
    }
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.into()
}

/// HTTP transport for one DAS endpoint.
pub struct HttpTransport {
    url: String,
    display_url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport posting to `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(url, http))
    }

    /// Use a preconfigured `reqwest::Client` (proxies, TLS roots, headers).
    pub fn with_client(url: impl Into<String>, http: reqwest::Client) -> Self {
        let url = url.into();
        Self {
            display_url: redact(&url),
            url,
            http,
        }
    }

    /// Create a transport from a [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, TransportError> {
        let url = endpoint_url(&config.endpoint, config.api_key.as_deref())?;
        Self::new(url, config.request_timeout())
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, req: &JsonRpcRequest) -> Result<RawResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timeout" } else { "request failed" };
                TransportError::Network(format!("{kind}: {}", e.without_url()))
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(format!("reading body: {}", e.without_url())))?;

        tracing::trace!(method = %req.method, status, bytes = body.len(), url = %self.display_url, "http exchange");
        Ok(RawResponse { status, body })
    }

    fn url(&self) -> &str {
        &self.display_url
    }
}

/// Build a [`DasClient`] over HTTP from `config`.
pub fn http_client(config: ClientConfig) -> Result<DasClient, TransportError> {
    let transport = HttpTransport::from_config(&config)?;
    Ok(DasClient::new(Arc::new(transport), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn endpoint_url_appends_key() {
        let url = endpoint_url("https://mainnet.helius-rpc.com", Some("k1")).unwrap();
        assert_eq!(url, "https://mainnet.helius-rpc.com/?api-key=k1");
    }

    #[test]
    fn endpoint_url_keeps_existing_query() {
        let url = endpoint_url("https://das.example.com/rpc?cluster=devnet", Some("k1")).unwrap();
        assert_eq!(url, "https://das.example.com/rpc?cluster=devnet&api-key=k1");
    }

    #[test]
    fn endpoint_url_without_key() {
        let url = endpoint_url("https://das.example.com/rpc", None).unwrap();
        assert_eq!(url, "https://das.example.com/rpc");
    }

    #[test]
    fn endpoint_url_rejects_garbage() {
        assert!(endpoint_url("not a url", Some("k")).is_err());
    }

    #[test]
    fn redact_hides_key_only() {
        let url = redact("https://das.example.com/rpc?cluster=devnet&api-key=secret");
        assert_eq!(url, "https://das.example.com/rpc?cluster=devnet&api-key=***");
        assert_eq!(redact("https://das.example.com/"), "https://das.example.com/");
    }

    fn local(url: String) -> HttpTransport {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpTransport::with_client(url, http)
    }

    /// Accept one connection, capture the raw request, answer with `status`/`body`.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let len = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let l = l.to_ascii_lowercase();
                            l.strip_prefix("content-length:").map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + len || n == 0 {
                        break;
                    }
                }
                if n == 0 {
                    break;
                }
            }
            let resp = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(resp.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}/"), handle)
    }

    #[tokio::test]
    async fn posts_json_envelope() {
        let (url, server) = serve_once("200 OK", r#"{"jsonrpc":"2.0","result":{"id":"a1"},"id":1}"#).await;
        let t = local(endpoint_url(&url, Some("k1")).unwrap());

        let resp = t
            .post(&JsonRpcRequest::new("getAsset", json!({ "id": "a1" })))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert!(resp.body.contains("\"a1\""));

        let raw = server.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(lower.starts_with("post /?api-key=k1 "));
        assert!(lower.contains("content-type: application/json"));
        assert!(raw.contains(r#"{"jsonrpc":"2.0","id":1,"method":"getAsset","params":{"id":"a1"}}"#));
        assert_eq!(t.url(), format!("{url}?api-key=***"));
    }

    #[tokio::test]
    async fn non_success_status_is_reported_not_raised() {
        let (url, server) = serve_once("429 Too Many Requests", "slow down").await;
        let t = local(url);
        let resp = t.post(&JsonRpcRequest::new("getAsset", json!({}))).await.unwrap();
        assert_eq!(resp.status, 429);
        assert_eq!(resp.body, "slow down");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let t = local(format!("http://{addr}/"));
        let err = t.post(&JsonRpcRequest::new("getAsset", json!({}))).await.unwrap_err();
        assert!(matches!(err, TransportError::Network(_)));
    }
}
