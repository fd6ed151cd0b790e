//! DAS payload types.
//!
//! Only the fields the client itself looks at are typed. Everything else
//! the service returns is kept verbatim in `extra` and round-trips through
//! the cache unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pagination::Page;

/// A digital asset (NFT, compressed NFT, or fungible token).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merkle proof for a compressed asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProof {
    pub root: String,
    pub proof: Vec<String>,
    pub node_index: u64,
    pub leaf: String,
    pub tree_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of a list endpoint: `{ total, limit, page, cursor, items }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct AssetList<T = Asset> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<T>,
}

impl<T> Page for AssetList<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn into_items(self) -> Vec<T> {
        self.items
    }

    fn total(&self) -> Option<u64> {
        self.total
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// `getSignaturesForAsset` items are `[signature, instruction]` pairs.
pub type SignatureList = AssetList<(String, String)>;

/// An SPL token account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccount {
    pub address: String,
    pub mint: String,
    pub owner: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `getTokenAccounts` page; items live under `token_accounts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default)]
    pub token_accounts: Vec<TokenAccount>,
}

impl Page for TokenAccountList {
    type Item = TokenAccount;

    fn items(&self) -> &[TokenAccount] {
        &self.token_accounts
    }

    fn into_items(self) -> Vec<TokenAccount> {
        self.token_accounts
    }

    fn total(&self) -> Option<u64> {
        self.total
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }

    fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// A printed edition of a master edition NFT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edition {
    pub mint: String,
    pub edition_address: String,
    pub edition: u64,
}

/// `getNftEditions` page. Paged by short-page termination: the service's
/// `total` here counts printed supply, not list length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionList {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_edition_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_supply: Option<u64>,
    #[serde(default)]
    pub editions: Vec<Edition>,
}

impl Page for EditionList {
    type Item = Edition;

    fn items(&self) -> &[Edition] {
        &self.editions
    }

    fn into_items(self) -> Vec<Edition> {
        self.editions
    }

    fn limit(&self) -> Option<u32> {
        self.limit
    }
}
