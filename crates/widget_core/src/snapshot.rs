//! Incrementally populated account record.
//!
//! Every lookup result folds into exactly one field, keyed by asset where the
//! field is per-asset. Folds are last-write-wins per field, so any arrival
//! order of independent results converges to the same record. A missing key
//! means "not loaded yet", never an error.

use std::collections::BTreeMap;

use shared::{
    domain::Asset,
    protocol::{BalanceMap, DepositInfo},
};

use crate::currency::usd_value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SnapshotField {
    Balances,
    BtcUsdPrice,
    BtcUsdVolume,
    AssetUsdPrice(Asset),
    AssetBtcPrice(Asset),
    AssetBtcVolume(Asset),
    DepositInfo(Asset),
    DepositQr(Asset),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotUpdate {
    Balances(BalanceMap),
    BtcUsdPrice(String),
    BtcUsdVolume(String),
    AssetUsdPrice { asset: Asset, price: String },
    AssetBtcPrice { asset: Asset, price: String },
    AssetBtcVolume { asset: Asset, volume: String },
    DepositInfo { asset: Asset, info: DepositInfo },
    DepositQr { asset: Asset, payload: String },
}

impl SnapshotUpdate {
    pub fn field(&self) -> SnapshotField {
        match self {
            SnapshotUpdate::Balances(_) => SnapshotField::Balances,
            SnapshotUpdate::BtcUsdPrice(_) => SnapshotField::BtcUsdPrice,
            SnapshotUpdate::BtcUsdVolume(_) => SnapshotField::BtcUsdVolume,
            SnapshotUpdate::AssetUsdPrice { asset, .. } => {
                SnapshotField::AssetUsdPrice(asset.clone())
            }
            SnapshotUpdate::AssetBtcPrice { asset, .. } => {
                SnapshotField::AssetBtcPrice(asset.clone())
            }
            SnapshotUpdate::AssetBtcVolume { asset, .. } => {
                SnapshotField::AssetBtcVolume(asset.clone())
            }
            SnapshotUpdate::DepositInfo { asset, .. } => SnapshotField::DepositInfo(asset.clone()),
            SnapshotUpdate::DepositQr { asset, .. } => SnapshotField::DepositQr(asset.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountSnapshot {
    pub balances: BalanceMap,
    pub asset_usd_prices: BTreeMap<Asset, String>,
    pub asset_btc_prices: BTreeMap<Asset, String>,
    pub asset_btc_volumes: BTreeMap<Asset, String>,
    pub btc_usd_price: Option<String>,
    pub btc_usd_volume: Option<String>,
    pub deposit_info: BTreeMap<Asset, DepositInfo>,
    pub deposit_qr: BTreeMap<Asset, String>,
}

impl AccountSnapshot {
    pub fn apply(&mut self, update: SnapshotUpdate) -> SnapshotField {
        let field = update.field();
        match update {
            SnapshotUpdate::Balances(balances) => self.balances = balances,
            SnapshotUpdate::BtcUsdPrice(price) => self.btc_usd_price = Some(price),
            SnapshotUpdate::BtcUsdVolume(volume) => self.btc_usd_volume = Some(volume),
            SnapshotUpdate::AssetUsdPrice { asset, price } => {
                self.asset_usd_prices.insert(asset, price);
            }
            SnapshotUpdate::AssetBtcPrice { asset, price } => {
                self.asset_btc_prices.insert(asset, price);
            }
            SnapshotUpdate::AssetBtcVolume { asset, volume } => {
                self.asset_btc_volumes.insert(asset, volume);
            }
            SnapshotUpdate::DepositInfo { asset, info } => {
                self.deposit_info.insert(asset, info);
            }
            SnapshotUpdate::DepositQr { asset, payload } => {
                self.deposit_qr.insert(asset, payload);
            }
        }
        field
    }

    pub fn balance(&self, asset: &Asset) -> Option<&str> {
        self.balances.get(asset).map(String::as_str)
    }

    pub fn btc_balance(&self) -> Option<&str> {
        self.balance(&Asset::btc())
    }

    /// USD price used for valuing `asset`; BTC is priced from the BTC/USD pair.
    pub fn usd_price(&self, asset: &Asset) -> Option<&str> {
        if asset.is_btc() {
            self.btc_usd_price.as_deref()
        } else {
            self.asset_usd_prices.get(asset).map(String::as_str)
        }
    }

    pub fn btc_balance_value(&self) -> String {
        usd_value(self.btc_balance(), self.btc_usd_price.as_deref())
    }

    pub fn deposit_address(&self, asset: &Asset) -> Option<&str> {
        self.deposit_info
            .get(asset)
            .map(|info| info.address.as_str())
            .filter(|address| !address.is_empty())
    }
}
