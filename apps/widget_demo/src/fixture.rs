//! In-memory exchange backing the demo widget.

use std::{collections::HashMap, fs, path::Path};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use shared::{
    domain::{Asset, TickerPair, Tld},
    protocol::{BalanceMap, DepositInfo},
};
use tracing::info;
use widget_core::{Clipboard, ExchangeService};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExchangeFixture {
    pub balances: BalanceMap,
    /// Keyed by ticker pair, e.g. `ETHBTC`.
    pub prices: HashMap<String, String>,
    pub volumes: HashMap<String, String>,
    pub deposits: HashMap<Asset, DepositInfo>,
    pub tld: Tld,
    pub client_url: String,
    /// OAuth code the fixture accepts; any non-empty code when unset.
    pub accepted_code: Option<String>,
}

impl ExchangeFixture {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse fixture '{}'", path.display()))
    }

    pub fn sample() -> Self {
        let balances = [("BTC", "0.5"), ("ETH", "2.25"), ("BNB", "12"), ("XRP", "300")]
            .into_iter()
            .map(|(asset, amount)| (Asset::from(asset), amount.to_string()))
            .collect();

        let prices = [
            ("BTCUSDT", "61234.12"),
            ("ETHBTC", "0.052"),
            ("ETHUSDT", "3180.40"),
            ("BNBBTC", "0.0094"),
            ("BNBUSDT", "575.10"),
            ("XRPBTC", "0.0000085"),
            ("XRPUSDT", "0.52"),
        ];
        let volumes = [
            ("BTCUSDT", "31250.5"),
            ("ETHBTC", "90211.2"),
            ("BNBBTC", "40112.0"),
            ("XRPBTC", "15000000"),
        ];

        let deposits = [
            ("BTC", "1BoatSLRHtKNngkdXEeobR76b53LETtpyT", "bitcoin:1BoatSLRHtKNngkdXEeobR76b53LETtpyT"),
            ("ETH", "0x32Be343B94f860124dC4fEe278FDCBD38C102D88", ""),
            ("BNB", "bnb136ns6lfw4zs5hg4n85vdthaad7hq5m4gtkgf23", ""),
        ]
        .into_iter()
        .map(|(asset, address, url)| {
            (
                Asset::from(asset),
                DepositInfo {
                    address: address.to_string(),
                    url: url.to_string(),
                },
            )
        })
        .collect();

        Self {
            balances,
            prices: to_map(&prices),
            volumes: to_map(&volumes),
            deposits,
            tld: Tld::Com,
            client_url: "https://accounts.binance.com/en/oauth/authorize".into(),
            accepted_code: None,
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[async_trait]
impl ExchangeService for ExchangeFixture {
    async fn account_balances(&self) -> Result<BalanceMap> {
        Ok(self.balances.clone())
    }

    async fn ticker_price(&self, pair: &TickerPair) -> Result<String> {
        self.prices
            .get(&pair.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("no price for {pair}"))
    }

    async fn ticker_volume(&self, pair: &TickerPair) -> Result<String> {
        self.volumes
            .get(&pair.to_string())
            .cloned()
            .ok_or_else(|| anyhow!("no volume for {pair}"))
    }

    async fn deposit_info(&self, asset: &Asset) -> Result<DepositInfo> {
        self.deposits
            .get(asset)
            .cloned()
            .ok_or_else(|| anyhow!("no deposit address for {asset}"))
    }

    async fn user_tld(&self) -> Result<Tld> {
        Ok(self.tld)
    }

    async fn client_url(&self) -> Result<String> {
        Ok(self.client_url.clone())
    }

    async fn access_token(&self, code: &str) -> Result<bool> {
        Ok(match &self.accepted_code {
            Some(accepted) => accepted == code,
            None => !code.is_empty(),
        })
    }
}

/// Clipboard that reports copies on the log.
pub struct LogClipboard;

#[async_trait]
impl Clipboard for LogClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        info!("clipboard: copied {text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::Quote;

    use super::*;

    #[tokio::test]
    async fn sample_prices_resolve_by_pair() {
        let fixture = ExchangeFixture::sample();
        let pair = TickerPair::new(Asset::from("ETH"), Quote::Btc);
        assert_eq!(fixture.ticker_price(&pair).await.expect("price"), "0.052");
        assert!(fixture
            .ticker_volume(&TickerPair::new(Asset::from("BNB"), Quote::Usdt))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn loads_partial_fixture_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fixture.json");
        fs::write(
            &path,
            r#"{"balances":{"BTC":"1.5"},"deposits":{"BTC":{"address":"bc1q"}},"tld":"us","acceptedCode":null}"#,
        )
        .expect("write fixture");

        let fixture = ExchangeFixture::load(&path).expect("fixture");
        assert_eq!(fixture.tld, Tld::Us);
        assert_eq!(
            fixture.deposit_info(&Asset::btc()).await.expect("deposit").url,
            ""
        );
        assert_eq!(fixture.account_balances().await.expect("balances").len(), 1);
    }

    #[tokio::test]
    async fn access_token_checks_configured_code() {
        let mut fixture = ExchangeFixture::sample();
        assert!(fixture.access_token("anything").await.expect("token"));
        assert!(!fixture.access_token("").await.expect("token"));

        fixture.accepted_code = Some("abc".into());
        assert!(!fixture.access_token("xyz").await.expect("token"));
    }

    #[test]
    fn missing_fixture_reports_path() {
        let err = ExchangeFixture::load(Path::new("/nonexistent/fixture.json"))
            .expect_err("missing file");
        assert!(err.to_string().contains("/nonexistent/fixture.json"));
    }
}
