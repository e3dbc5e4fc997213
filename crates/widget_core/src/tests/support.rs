use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Asset, TickerPair, Tld},
    protocol::{BalanceMap, DepositInfo},
};

use crate::{Clipboard, ConversionDraft, ExchangeService, QrEncoder, SettlementService, WidgetError};

#[derive(Default)]
pub struct FakeExchange {
    pub balances: Option<BalanceMap>,
    pub prices: HashMap<String, String>,
    pub volumes: HashMap<String, String>,
    pub deposits: HashMap<String, DepositInfo>,
    pub delays: HashMap<String, Duration>,
    pub tld: Option<Tld>,
    pub client_url: Option<String>,
    pub accepted_code: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeExchange {
    pub fn with_balances(entries: &[(&str, &str)]) -> Self {
        Self {
            balances: Some(
                entries
                    .iter()
                    .map(|(asset, balance)| (Asset::from(*asset), balance.to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn price(mut self, pair: &str, value: &str) -> Self {
        self.prices.insert(pair.to_string(), value.to_string());
        self
    }

    pub fn volume(mut self, pair: &str, value: &str) -> Self {
        self.volumes.insert(pair.to_string(), value.to_string());
        self
    }

    pub fn deposit(mut self, asset: &str, address: &str, url: &str) -> Self {
        self.deposits.insert(
            asset.to_string(),
            DepositInfo {
                address: address.to_string(),
                url: url.to_string(),
            },
        );
        self
    }

    pub fn delay(mut self, call: &str, millis: u64) -> Self {
        self.delays
            .insert(call.to_string(), Duration::from_millis(millis));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        let mut calls = self.calls.lock().expect("calls").clone();
        calls.sort();
        calls
    }

    async fn record(&self, call: String) {
        self.calls.lock().expect("calls").push(call.clone());
        if let Some(delay) = self.delays.get(&call) {
            tokio::time::sleep(*delay).await;
        }
    }
}

#[async_trait]
impl ExchangeService for FakeExchange {
    async fn account_balances(&self) -> Result<BalanceMap> {
        self.record("balances".to_string()).await;
        self.balances
            .clone()
            .ok_or_else(|| anyhow!("balances unavailable"))
    }

    async fn ticker_price(&self, pair: &TickerPair) -> Result<String> {
        self.record(format!("price:{pair}")).await;
        self.prices
            .get(&pair.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("no price for {pair}"))
    }

    async fn ticker_volume(&self, pair: &TickerPair) -> Result<String> {
        self.record(format!("volume:{pair}")).await;
        self.volumes
            .get(&pair.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("no volume for {pair}"))
    }

    async fn deposit_info(&self, asset: &Asset) -> Result<DepositInfo> {
        self.record(format!("deposit:{asset}")).await;
        self.deposits
            .get(asset.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("no deposit info for {asset}"))
    }

    async fn user_tld(&self) -> Result<Tld> {
        self.record("tld".to_string()).await;
        self.tld.ok_or_else(|| anyhow!("tld unavailable"))
    }

    async fn client_url(&self) -> Result<String> {
        self.record("client_url".to_string()).await;
        self.client_url
            .clone()
            .ok_or_else(|| anyhow!("client url unavailable"))
    }

    async fn access_token(&self, code: &str) -> Result<bool> {
        self.record(format!("access_token:{code}")).await;
        Ok(self.accepted_code.as_deref() == Some(code))
    }
}

pub struct LabelQr;

impl QrEncoder for LabelQr {
    fn encode(&self, url: &str, asset: &Asset) -> Result<String, WidgetError> {
        Ok(format!("qr:{asset}:{url}"))
    }
}

pub struct ScriptedSettlement {
    pub delay: Duration,
    pub fail_with: Option<String>,
    pub settled: Arc<Mutex<Vec<ConversionDraft>>>,
}

impl ScriptedSettlement {
    pub fn ok(millis: u64) -> Self {
        Self {
            delay: Duration::from_millis(millis),
            fail_with: None,
            settled: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(err: impl Into<String>) -> Self {
        Self {
            fail_with: Some(err.into()),
            ..Self::ok(0)
        }
    }
}

#[async_trait]
impl SettlementService for ScriptedSettlement {
    async fn settle(&self, draft: &ConversionDraft) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        if let Some(err) = &self.fail_with {
            return Err(anyhow!(err.clone()));
        }
        self.settled.lock().expect("settled").push(draft.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub fail: bool,
    pub written: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Clipboard for RecordingClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("clipboard denied"));
        }
        self.written.lock().expect("written").push(text.to_string());
        Ok(())
    }
}
