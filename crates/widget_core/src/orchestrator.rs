//! Fan-out of account lookups into the shared [`AccountSnapshot`].
//!
//! A fetch starts on the false→true authentication edge only. The balance
//! mapping is requested first; if that fails nothing else happens. Otherwise
//! one task per lookup is spawned (BTC/USD price and volume, then per asset
//! BTC volume, BTC price and USD price for non-BTC assets, and deposit info
//! for every asset) and each folds its single field on arrival. In-flight
//! lookups are never cancelled and no timeouts apply.

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use shared::{
    domain::{Asset, Quote, TickerPair},
    protocol::DepositInfo,
};
use tokio::{
    sync::{broadcast, Mutex, RwLock},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    snapshot::{AccountSnapshot, SnapshotUpdate},
    ExchangeService, QrEncoder, WidgetEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    BtcUsdPrice,
    BtcUsdVolume,
    AssetBtcVolume(Asset),
    AssetBtcPrice(Asset),
    AssetUsdPrice(Asset),
    Deposit(Asset),
}

pub struct BalanceOrchestrator {
    service: Arc<dyn ExchangeService>,
    qr: Arc<dyn QrEncoder>,
    snapshot: RwLock<AccountSnapshot>,
    authenticated: Mutex<bool>,
    pending: Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<WidgetEvent>,
}

impl BalanceOrchestrator {
    pub fn new(
        service: Arc<dyn ExchangeService>,
        qr: Arc<dyn QrEncoder>,
        events: broadcast::Sender<WidgetEvent>,
    ) -> Arc<Self> {
        Arc::new(Self {
            service,
            qr,
            snapshot: RwLock::new(AccountSnapshot::default()),
            authenticated: Mutex::new(false),
            pending: Mutex::new(Vec::new()),
            events,
        })
    }

    /// Records the latest authentication signal and fetches balances when it
    /// flips from false to true. Returns whether a fetch was started.
    pub async fn set_authenticated(self: &Arc<Self>, authenticated: bool) -> bool {
        let rising = {
            let mut guard = self.authenticated.lock().await;
            let rising = !*guard && authenticated;
            *guard = authenticated;
            rising
        };
        if rising {
            info!("balances: authentication edge observed, fetching account");
            self.fetch_balances().await;
        }
        rising
    }

    pub async fn is_authenticated(&self) -> bool {
        *self.authenticated.lock().await
    }

    pub async fn fetch_balances(self: &Arc<Self>) {
        let orchestrator = Arc::clone(self);
        let handle = tokio::spawn(async move { orchestrator.run_fetch().await });
        self.track(handle).await;
    }

    pub async fn snapshot(&self) -> AccountSnapshot {
        self.snapshot.read().await.clone()
    }

    pub async fn with_snapshot<R>(&self, f: impl FnOnce(&AccountSnapshot) -> R) -> R {
        let guard = self.snapshot.read().await;
        f(&guard)
    }

    /// Folds one result into the snapshot, last write wins per field.
    pub async fn fold(&self, update: SnapshotUpdate) {
        let field = self.snapshot.write().await.apply(update);
        let _ = self.events.send(WidgetEvent::SnapshotUpdated(field));
    }

    /// Drops everything fetched for the current session.
    pub async fn reset(&self) {
        *self.authenticated.lock().await = false;
        *self.snapshot.write().await = AccountSnapshot::default();
    }

    /// Waits until no lookup is outstanding, including ones spawned while
    /// waiting.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(&mut *self.pending.lock().await);
            if handles.is_empty() {
                return;
            }
            for result in join_all(handles).await {
                if let Err(err) = result {
                    warn!("balances: lookup task aborted: {err}");
                }
            }
        }
    }

    async fn track(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending.lock().await;
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    async fn run_fetch(self: Arc<Self>) {
        let balances = match self.service.account_balances().await {
            Ok(balances) => balances,
            Err(err) => {
                warn!("balances: account lookup failed, snapshot left untouched: {err:#}");
                return;
            }
        };

        self.spawn_lookup(Lookup::BtcUsdPrice).await;
        self.spawn_lookup(Lookup::BtcUsdVolume).await;
        for asset in balances.keys() {
            if !asset.is_btc() {
                self.spawn_lookup(Lookup::AssetBtcVolume(asset.clone())).await;
                self.spawn_lookup(Lookup::AssetBtcPrice(asset.clone())).await;
                self.spawn_lookup(Lookup::AssetUsdPrice(asset.clone())).await;
            }
            self.spawn_lookup(Lookup::Deposit(asset.clone())).await;
        }

        let assets = balances.len();
        self.fold(SnapshotUpdate::Balances(balances)).await;
        let _ = self.events.send(WidgetEvent::BalancesCommitted { assets });
        info!(assets, "balances: committed account balances");
    }

    async fn spawn_lookup(self: &Arc<Self>, lookup: Lookup) {
        let orchestrator = Arc::clone(self);
        let handle = tokio::spawn(async move { orchestrator.run_lookup(lookup).await });
        self.track(handle).await;
    }

    async fn run_lookup(&self, lookup: Lookup) {
        let update = match &lookup {
            Lookup::BtcUsdPrice => self
                .service
                .ticker_price(&TickerPair::btc_usdt())
                .await
                .map(SnapshotUpdate::BtcUsdPrice),
            Lookup::BtcUsdVolume => self
                .service
                .ticker_volume(&TickerPair::btc_usdt())
                .await
                .map(SnapshotUpdate::BtcUsdVolume),
            Lookup::AssetBtcVolume(asset) => self
                .service
                .ticker_volume(&TickerPair::new(asset.clone(), Quote::Btc))
                .await
                .map(|volume| SnapshotUpdate::AssetBtcVolume {
                    asset: asset.clone(),
                    volume,
                }),
            Lookup::AssetBtcPrice(asset) => self
                .service
                .ticker_price(&TickerPair::new(asset.clone(), Quote::Btc))
                .await
                .map(|price| SnapshotUpdate::AssetBtcPrice {
                    asset: asset.clone(),
                    price,
                }),
            Lookup::AssetUsdPrice(asset) => self
                .service
                .ticker_price(&TickerPair::new(asset.clone(), Quote::Usdt))
                .await
                .map(|price| SnapshotUpdate::AssetUsdPrice {
                    asset: asset.clone(),
                    price,
                }),
            Lookup::Deposit(asset) => {
                if let Err(err) = self.resolve_deposit(asset).await {
                    debug!(asset = %asset, "balances: deposit lookup failed: {err:#}");
                }
                return;
            }
        };

        match update {
            Ok(update) => self.fold(update).await,
            Err(err) => debug!(lookup = ?lookup, "balances: lookup failed: {err:#}"),
        }
    }

    async fn resolve_deposit(&self, asset: &Asset) -> Result<()> {
        let info = self.service.deposit_info(asset).await?;
        let target = qr_target(&info).to_string();
        self.fold(SnapshotUpdate::DepositInfo {
            asset: asset.clone(),
            info,
        })
        .await;

        match self.qr.encode(&target, asset) {
            Ok(payload) => {
                self.fold(SnapshotUpdate::DepositQr {
                    asset: asset.clone(),
                    payload,
                })
                .await
            }
            Err(err) => warn!(asset = %asset, "balances: {err}"),
        }
        Ok(())
    }
}

fn qr_target(info: &DepositInfo) -> &str {
    if info.url.is_empty() {
        &info.address
    } else {
        &info.url
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
