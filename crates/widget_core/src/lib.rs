use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Asset, Fiat, TickerPair, Tld},
    protocol::{BalanceMap, DepositInfo},
};

pub mod buy;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod oauth;
pub mod orchestrator;
pub mod qr;
pub mod render;
pub mod snapshot;
pub mod view;
mod widget;

pub use conversion::ConversionDraft;
pub use error::WidgetError;
pub use orchestrator::BalanceOrchestrator;
pub use qr::SvgQrEncoder;
pub use render::Screen;
pub use snapshot::{AccountSnapshot, SnapshotField, SnapshotUpdate};
pub use view::{Overlay, WidgetView};
pub use widget::{ExchangeWidget, WidgetAction, WidgetInputs};

const DEFAULT_SETTLEMENT_DELAY: Duration = Duration::from_millis(1500);

/// Browser-side exchange capability the widget orchestrates calls to.
#[async_trait]
pub trait ExchangeService: Send + Sync {
    async fn account_balances(&self) -> Result<BalanceMap>;
    async fn ticker_price(&self, pair: &TickerPair) -> Result<String>;
    async fn ticker_volume(&self, pair: &TickerPair) -> Result<String>;
    async fn deposit_info(&self, asset: &Asset) -> Result<DepositInfo>;
    async fn user_tld(&self) -> Result<Tld>;
    async fn client_url(&self) -> Result<String>;
    async fn access_token(&self, code: &str) -> Result<bool>;
}

pub struct MissingExchangeService;

#[async_trait]
impl ExchangeService for MissingExchangeService {
    async fn account_balances(&self) -> Result<BalanceMap> {
        Err(anyhow!("exchange service is unavailable"))
    }

    async fn ticker_price(&self, pair: &TickerPair) -> Result<String> {
        Err(anyhow!("exchange service is unavailable for {pair}"))
    }

    async fn ticker_volume(&self, pair: &TickerPair) -> Result<String> {
        Err(anyhow!("exchange service is unavailable for {pair}"))
    }

    async fn deposit_info(&self, asset: &Asset) -> Result<DepositInfo> {
        Err(anyhow!("exchange service is unavailable for {asset}"))
    }

    async fn user_tld(&self) -> Result<Tld> {
        Err(anyhow!("exchange service is unavailable"))
    }

    async fn client_url(&self) -> Result<String> {
        Err(anyhow!("exchange service is unavailable"))
    }

    async fn access_token(&self, _code: &str) -> Result<bool> {
        Err(anyhow!("exchange service is unavailable"))
    }
}

/// Turns a resolved deposit target into an image payload.
pub trait QrEncoder: Send + Sync {
    fn encode(&self, url: &str, asset: &Asset) -> std::result::Result<String, WidgetError>;
}

/// Settles a confirmed conversion.
#[async_trait]
pub trait SettlementService: Send + Sync {
    async fn settle(&self, draft: &ConversionDraft) -> Result<()>;
}

/// Stand-in settlement that succeeds after a fixed delay.
pub struct DelayedSettlement {
    delay: Duration,
}

impl DelayedSettlement {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for DelayedSettlement {
    fn default() -> Self {
        Self::new(DEFAULT_SETTLEMENT_DELAY)
    }
}

#[async_trait]
impl SettlementService for DelayedSettlement {
    async fn settle(&self, _draft: &ConversionDraft) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
}

pub struct MissingClipboard;

#[async_trait]
impl Clipboard for MissingClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(anyhow!("clipboard is unavailable"))
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub settlement_delay: Duration,
    pub user_tld: Tld,
    pub initial_fiat: Fiat,
    pub initial_asset: Asset,
    pub show_content: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            settlement_delay: DEFAULT_SETTLEMENT_DELAY,
            user_tld: Tld::Com,
            initial_fiat: Fiat::usd(),
            initial_asset: Asset::btc(),
            show_content: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    SnapshotUpdated(SnapshotField),
    BalancesCommitted { assets: usize },
    ConnectRequested { client_url: Option<String> },
    Authenticated,
    Disconnected,
    TldChanged(Tld),
    BuyRequested {
        asset: Asset,
        amount: String,
        fiat: Fiat,
        tld: Tld,
    },
    ConversionRejected { amount: String },
    ConversionSettled { amount: String, to: Option<Asset> },
    ConversionFailed(String),
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
