//! Typed DAS client: one method per endpoint.
//!
//! Single-entity lookups go through the cache (when one is configured);
//! list endpoints hand back a [`Paginator`] and are never cached.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::cache::CachePort;
use crate::cached::{cache_key, cached_fetch};
use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::DasResult;
use crate::pagination::{CursorPaginator, PageRequest, Paginator, Termination};
use crate::transport::RpcTransport;
use crate::types::{Asset, AssetList, AssetProof, EditionList, SignatureList, TokenAccountList};

/// DAS JSON-RPC method names.
pub mod methods {
    pub const GET_ASSET: &str = "getAsset";
    pub const GET_ASSET_BATCH: &str = "getAssetBatch";
    pub const GET_ASSET_PROOF: &str = "getAssetProof";
    pub const GET_ASSET_PROOF_BATCH: &str = "getAssetProofBatch";
    pub const GET_ASSETS_BY_OWNER: &str = "getAssetsByOwner";
    pub const GET_ASSETS_BY_GROUP: &str = "getAssetsByGroup";
    pub const GET_ASSETS_BY_CREATOR: &str = "getAssetsByCreator";
    pub const GET_ASSETS_BY_AUTHORITY: &str = "getAssetsByAuthority";
    pub const SEARCH_ASSETS: &str = "searchAssets";
    pub const GET_SIGNATURES_FOR_ASSET: &str = "getSignaturesForAsset";
    pub const GET_TOKEN_ACCOUNTS: &str = "getTokenAccounts";
    pub const GET_NFT_EDITIONS: &str = "getNftEditions";
}

/// Client for a DAS JSON-RPC endpoint.
///
/// Cheap to clone; clones share the transport and cache.
#[derive(Clone)]
pub struct DasClient {
    dispatcher: Dispatcher,
    cache: Option<Arc<dyn CachePort>>,
    config: ClientConfig,
}

impl DasClient {
    pub fn new(transport: Arc<dyn RpcTransport>, config: ClientConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport),
            cache: None,
            config,
        }
    }

    /// Enable caching of single-entity lookups in `cache`.
    pub fn with_cache(mut self, cache: Arc<dyn CachePort>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Raw call for methods without a typed wrapper.
    pub async fn call(&self, method: &str, params: Value) -> DasResult<Value> {
        self.dispatcher.dispatch_value(method, params).await
    }

    // ─── Single-entity lookups (cached) ────────────────────────────────────────

    pub async fn get_asset(&self, id: &str) -> DasResult<Asset> {
        self.cached(methods::GET_ASSET, id).await
    }

    pub async fn get_asset_proof(&self, id: &str) -> DasResult<AssetProof> {
        self.cached(methods::GET_ASSET_PROOF, id).await
    }

    /// Drop any cached `getAsset` and `getAssetProof` entries for `id`.
    pub async fn invalidate_asset(&self, id: &str) {
        let Some(cache) = &self.cache else {
            return;
        };
        for prefix in [methods::GET_ASSET, methods::GET_ASSET_PROOF] {
            if let Err(e) = cache.delete(&cache_key(prefix, id)).await {
                tracing::warn!(id, prefix, error = %e, "cache delete failed");
            }
        }
    }

    async fn cached<T>(&self, method: &str, id: &str) -> DasResult<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
    {
        cached_fetch(
            self.cache.as_deref(),
            method,
            id,
            self.config.cache_ttl(),
            || self.dispatcher.dispatch(method, json!({ "id": id })),
        )
        .await
    }

    // ─── Batch lookups (uncached) ──────────────────────────────────────────────

    /// Missing assets come back as `None`, in request order.
    pub async fn get_assets(&self, ids: &[&str]) -> DasResult<Vec<Option<Asset>>> {
        self.dispatcher
            .dispatch(methods::GET_ASSET_BATCH, json!({ "ids": ids }))
            .await
    }

    pub async fn get_asset_proofs(&self, ids: &[&str]) -> DasResult<HashMap<String, AssetProof>> {
        self.dispatcher
            .dispatch(methods::GET_ASSET_PROOF_BATCH, json!({ "ids": ids }))
            .await
    }

    // ─── Paged lists ───────────────────────────────────────────────────────────

    pub fn get_assets_by_owner(&self, owner: &str, request: PageRequest) -> Paginator<AssetList> {
        self.paged(
            methods::GET_ASSETS_BY_OWNER,
            params([("ownerAddress", json!(owner))]),
            request,
            Termination::Total,
        )
    }

    /// Assets in a group, e.g. `("collection", <collection mint>)`.
    pub fn get_assets_by_group(
        &self,
        group_key: &str,
        group_value: &str,
        request: PageRequest,
    ) -> Paginator<AssetList> {
        self.paged(
            methods::GET_ASSETS_BY_GROUP,
            params([("groupKey", json!(group_key)), ("groupValue", json!(group_value))]),
            request,
            Termination::Total,
        )
    }

    pub fn get_assets_by_creator(
        &self,
        creator: &str,
        only_verified: bool,
        request: PageRequest,
    ) -> Paginator<AssetList> {
        self.paged(
            methods::GET_ASSETS_BY_CREATOR,
            params([("creatorAddress", json!(creator)), ("onlyVerified", json!(only_verified))]),
            request,
            Termination::Total,
        )
    }

    pub fn get_assets_by_authority(&self, authority: &str, request: PageRequest) -> Paginator<AssetList> {
        self.paged(
            methods::GET_ASSETS_BY_AUTHORITY,
            params([("authorityAddress", json!(authority))]),
            request,
            Termination::Total,
        )
    }

    /// `criteria` is passed through as-is (`ownerAddress`, `compressed`, ...).
    pub fn search_assets(&self, criteria: Map<String, Value>, request: PageRequest) -> Paginator<AssetList> {
        self.paged(methods::SEARCH_ASSETS, criteria, request, Termination::Total)
    }

    /// `searchAssets` paged by cursor instead of page number.
    pub fn search_assets_by_cursor(&self, criteria: Map<String, Value>, limit: Option<u32>) -> CursorPaginator<AssetList> {
        CursorPaginator::new(
            self.dispatcher.clone(),
            methods::SEARCH_ASSETS,
            criteria,
            limit.or(self.config.default_limit),
        )
    }

    pub fn get_signatures_for_asset(&self, id: &str, request: PageRequest) -> Paginator<SignatureList> {
        self.paged(
            methods::GET_SIGNATURES_FOR_ASSET,
            params([("id", json!(id))]),
            request,
            Termination::Total,
        )
    }

    /// Token accounts filtered by owner and/or mint.
    pub fn get_token_accounts(
        &self,
        owner: Option<&str>,
        mint: Option<&str>,
        request: PageRequest,
    ) -> Paginator<TokenAccountList> {
        let mut p = Map::new();
        if let Some(owner) = owner {
            p.insert("owner".into(), json!(owner));
        }
        if let Some(mint) = mint {
            p.insert("mint".into(), json!(mint));
        }
        self.paged(methods::GET_TOKEN_ACCOUNTS, p, request, Termination::Total)
    }

    pub fn get_nft_editions(&self, mint: &str, request: PageRequest) -> Paginator<EditionList> {
        self.paged(
            methods::GET_NFT_EDITIONS,
            params([("mint", json!(mint))]),
            request,
            Termination::ShortPage,
        )
    }

    fn paged<P>(
        &self,
        method: &str,
        params: Map<String, Value>,
        mut request: PageRequest,
        policy: Termination,
    ) -> Paginator<P>
    where
        P: crate::pagination::Page + serde::de::DeserializeOwned,
    {
        request.limit = request.limit.or(self.config.default_limit);
        Paginator::new(self.dispatcher.clone(), method, params, request, policy)
    }
}

fn params<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
