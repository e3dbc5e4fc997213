use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Asset;

/// Asset ticker to decimal balance string, as returned by the exchange.
pub type BalanceMap = BTreeMap<Asset, String>;

/// External wallet status code meaning the wallet is linked.
pub const EXTERNAL_WALLET_LINKED: i32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositInfo {
    pub address: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub balance: f64,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateInfo {
    pub rates: HashMap<String, f64>,
    pub last_updated: DateTime<Utc>,
}

/// Order pushed to the checkout dialog. Fields stay empty when the
/// dialog arguments could not be parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogArguments {
    #[serde(default)]
    pub order_info: Option<OrderInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceDetails {
    pub total: f64,
    #[serde(default)]
    pub rates: HashMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalWalletDetails {
    pub status: i32,
}

/// Pushes the browser sends to the checkout dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum HostPush {
    WalletBalanceUpdated {
        #[serde(default)]
        details: Option<BalanceDetails>,
    },
    ExternalWalletUpdated {
        #[serde(default)]
        details: Option<ExternalWalletDetails>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncPrefs {
    pub sync_all_data_types: bool,
    #[serde(default)]
    pub apps_synced: bool,
    #[serde(default)]
    pub autofill_synced: bool,
    #[serde(default)]
    pub bookmarks_synced: bool,
    #[serde(default)]
    pub extensions_synced: bool,
    #[serde(default)]
    pub passwords_synced: bool,
    #[serde(default)]
    pub preferences_synced: bool,
    #[serde(default)]
    pub themes_synced: bool,
    #[serde(default)]
    pub typed_urls_synced: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageStatus {
    Spinner,
    Configure,
    Timeout,
    Done,
    PassphraseFailed,
}
