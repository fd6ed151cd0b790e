//! dasrpc CLI — query a DAS JSON-RPC endpoint from the terminal.
//!
//! Usage:
//! ```bash
//! # Fetch one asset
//! dasrpc --url https://mainnet.helius-rpc.com --api-key KEY asset <ASSET_ID>
//!
//! # List an owner's assets, 100 per page, at most 3 pages
//! dasrpc owner <ADDRESS> --limit 100 --max-pages 3
//!
//! # Send a raw call
//! dasrpc call getAssetsByGroup --params '{"groupKey":"collection","groupValue":"..."}'
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use serde_json::Value;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dasrpc_core::{ClientConfig, DasClient, DasError, MemoryCache, PageRequest};
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "dasrpc",
    about = "Query a Digital Asset Standard (DAS) JSON-RPC endpoint",
    long_about = "
Query a Digital Asset Standard (DAS) JSON-RPC endpoint.

ENVIRONMENT VARIABLES:
  DASRPC_URL       Endpoint URL (instead of --url)
  DASRPC_API_KEY   API key, sent as ?api-key= (instead of --api-key)
  RUST_LOG         Log filter (default: warn)
",
    version
)]
struct Cli {
    /// JSON-RPC endpoint URL
    #[arg(long, env = "DASRPC_URL", global = true)]
    url: Option<String>,

    /// API key embedded in the endpoint URL
    #[arg(long, env = "DASRPC_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 30_000, global = true)]
    timeout_ms: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one asset by id (getAsset)
    Asset {
        id: String,
    },

    /// Fetch the Merkle proof of a compressed asset (getAssetProof)
    Proof {
        id: String,
    },

    /// List assets held by an owner (getAssetsByOwner)
    Owner {
        address: String,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// First page to fetch (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Send a raw JSON-RPC call
    Call {
        method: String,
        /// Params object as JSON
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<DasError>() {
            Some(DasError::Rpc(rpc)) => match rpc.description() {
                Some(meaning) => eprintln!("Error: {rpc} ({meaning})"),
                None => eprintln!("Error: {rpc}"),
            },
            _ => eprintln!("Error: {e:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let Some(url) = cli.url else {
        bail!("--url (or DASRPC_URL) is required");
    };
    let config = ClientConfig {
        endpoint: url,
        api_key: cli.api_key,
        request_timeout_ms: cli.timeout_ms,
        ..ClientConfig::default()
    };
    let client: DasClient =
        dasrpc_http::http_client(config)?.with_cache(Arc::new(MemoryCache::new()));
    tracing::debug!(url = client.dispatcher().url(), "client ready");

    match cli.command {
        Commands::Asset { id } => print(&client.get_asset(&id).await?)?,
        Commands::Proof { id } => print(&client.get_asset_proof(&id).await?)?,
        Commands::Owner {
            address,
            limit,
            page,
            max_pages,
        } => {
            let request = PageRequest { page: page.max(1), limit };
            let pages = client.get_assets_by_owner(&address, request).into_stream();
            futures::pin_mut!(pages);
            let mut fetched = 0usize;
            while !page_limit_reached(fetched, max_pages) {
                let Some(result) = pages.next().await else {
                    break;
                };
                let page = result?;
                tracing::info!(page = fetched + 1, items = page.items.len(), total = ?page.total, "page received");
                for asset in &page.items {
                    print(asset)?;
                }
                fetched += 1;
            }
        }
        Commands::Call { method, params } => {
            let params: Value =
                serde_json::from_str(&params).context("--params must be valid JSON")?;
            print(&client.call(&method, params).await?)?;
        }
    }
    Ok(())
}

fn print<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `true` once `fetched` pages satisfy `--max-pages`; checked before each pull.
fn page_limit_reached(fetched: usize, max_pages: Option<usize>) -> bool {
    max_pages.is_some_and(|m| fetched >= m)
}
