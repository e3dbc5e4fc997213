use shared::domain::{Asset, Tld};

use crate::currency::{currencies_for, is_acceptable_amount, parse_int_prefix};

pub const CONVERSION_FEE: &str = "0.0005 BNB";
/// The confirmation screen does not compute a received amount yet.
pub const RECEIVED_AMOUNT_PLACEHOLDER: &str = "0";
const DEFAULT_DESTINATION: &str = "BNB";
const EXCLUDED_DESTINATIONS: &[&str] = &["ETH", "BNB"];

/// A conversion being composed in the convert view. The source is always BTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionDraft {
    pub amount: String,
    pub from: Asset,
    pub to: Option<Asset>,
}

impl Default for ConversionDraft {
    fn default() -> Self {
        Self {
            amount: String::new(),
            from: Asset::btc(),
            to: None,
        }
    }
}

impl ConversionDraft {
    /// Replaces the amount buffer; non-numeric input leaves it unchanged.
    pub fn set_amount(&mut self, value: &str) -> bool {
        if !is_acceptable_amount(value) {
            return false;
        }
        self.amount = value.to_string();
        true
    }

    pub fn set_destination(&mut self, asset: Asset) {
        self.to = Some(asset);
    }

    pub fn destination_label(&self) -> Asset {
        self.to
            .clone()
            .unwrap_or_else(|| Asset::from(DEFAULT_DESTINATION))
    }

    /// Integer-truncating comparison against the available balance. Unknown
    /// or unparsable values on either side never count as exceeding.
    pub fn exceeds(&self, available: Option<&str>) -> bool {
        match (
            parse_int_prefix(&self.amount),
            available.and_then(parse_int_prefix),
        ) {
            (Some(amount), Some(available)) => amount > available,
            _ => false,
        }
    }
}

pub fn destination_choices(tld: Tld) -> Vec<Asset> {
    currencies_for(tld)
        .into_iter()
        .filter(|asset| !EXCLUDED_DESTINATIONS.contains(&asset.as_str()))
        .collect()
}
