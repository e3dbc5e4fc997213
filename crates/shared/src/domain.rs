use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! ticker_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

ticker_newtype!(Asset);
ticker_newtype!(Fiat);

impl Asset {
    pub fn btc() -> Self {
        Self::from("BTC")
    }

    pub fn is_btc(&self) -> bool {
        self.0 == "BTC"
    }
}

impl Fiat {
    pub fn usd() -> Self {
        Self::from("USD")
    }
}

/// Quote side of a ticker pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quote {
    Usdt,
    Btc,
}

impl Quote {
    pub fn as_str(self) -> &'static str {
        match self {
            Quote::Usdt => "USDT",
            Quote::Btc => "BTC",
        }
    }
}

/// A `{ASSET}{QUOTE}` pair such as `BTCUSDT` or `ETHBTC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerPair {
    pub base: Asset,
    pub quote: Quote,
}

impl TickerPair {
    pub fn new(base: Asset, quote: Quote) -> Self {
        Self { base, quote }
    }

    pub fn btc_usdt() -> Self {
        Self::new(Asset::btc(), Quote::Usdt)
    }
}

impl fmt::Display for TickerPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tld {
    #[default]
    Com,
    Us,
}

impl Tld {
    pub fn toggled(self) -> Self {
        match self {
            Tld::Com => Tld::Us,
            Tld::Us => Tld::Com,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tld::Com => "com",
            Tld::Us => "us",
        }
    }
}

impl std::str::FromStr for Tld {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "com" => Ok(Tld::Com),
            "us" => Ok(Tld::Us),
            other => Err(format!("unknown tld '{other}'")),
        }
    }
}

/// Base navigation views of the exchange widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    #[default]
    Deposit,
    Convert,
    Summary,
    Buy,
}
