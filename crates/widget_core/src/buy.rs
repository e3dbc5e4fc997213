use shared::domain::{Asset, Fiat, Tld};

use crate::{
    currency::{currencies_for, fiat_list, is_acceptable_amount},
    WidgetConfig,
};

/// Inputs of the buy view. The TLD lives here because it also decides which
/// currency list every other view shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyForm {
    pub tld: Tld,
    pub fiat: Fiat,
    pub asset: Asset,
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyRequest {
    pub asset: Asset,
    pub amount: String,
    pub fiat: Fiat,
    pub tld: Tld,
}

impl BuyForm {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            tld: config.user_tld,
            fiat: config.initial_fiat.clone(),
            asset: config.initial_asset.clone(),
            amount: String::new(),
        }
    }

    pub fn is_us(&self) -> bool {
        self.tld == Tld::Us
    }

    pub fn set_amount(&mut self, value: &str) -> bool {
        if !is_acceptable_amount(value) {
            return false;
        }
        self.amount = value.to_string();
        true
    }

    /// Flips between `com` and `us`; the US exchange only trades in USD.
    pub fn toggle_tld(&mut self) -> Tld {
        self.tld = self.tld.toggled();
        if self.tld == Tld::Us {
            self.fiat = Fiat::usd();
        }
        self.tld
    }

    pub fn fiat_choices(&self) -> Vec<Fiat> {
        fiat_list()
            .into_iter()
            .filter(|fiat| *fiat != self.fiat)
            .collect()
    }

    pub fn asset_choices(&self) -> Vec<Asset> {
        currencies_for(self.tld)
            .into_iter()
            .filter(|asset| *asset != self.asset)
            .collect()
    }

    pub fn request(&self) -> BuyRequest {
        BuyRequest {
            asset: self.asset.clone(),
            amount: self.amount.clone(),
            fiat: self.fiat.clone(),
            tld: self.tld,
        }
    }
}
