//! Currency catalogue and the small amount/price formatters used by views.

use shared::domain::{Asset, Fiat, Tld};

const COM_CURRENCIES: &[&str] = &[
    "BTC", "ETH", "BNB", "XRP", "BCH", "BUSD", "BAT", "LTC", "EOS", "XLM", "ADA", "TRX", "LINK",
    "ETC", "USDT",
];
const US_CURRENCIES: &[&str] = &[
    "BTC", "ETH", "BNB", "XRP", "BCH", "BAT", "LTC", "ADA", "LINK", "ETC", "USDT", "ZRX", "XLM",
];
const FIAT_LIST: &[&str] = &[
    "USD", "EUR", "GBP", "AUD", "CAD", "CHF", "JPY", "KRW", "RUB", "TRY", "UAH", "NGN",
];
const CURRENCY_NAMES: &[(&str, &str)] = &[
    ("BAT", "Basic Attention Token"),
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("XRP", "Ripple"),
    ("BNB", "Binance Coin"),
    ("BCH", "Bitcoin Cash"),
    ("BUSD", "US Dollar"),
];

pub fn currencies_for(tld: Tld) -> Vec<Asset> {
    let list = match tld {
        Tld::Us => US_CURRENCIES,
        Tld::Com => COM_CURRENCIES,
    };
    list.iter().map(|ticker| Asset::from(*ticker)).collect()
}

pub fn fiat_list() -> Vec<Fiat> {
    FIAT_LIST.iter().map(|ticker| Fiat::from(*ticker)).collect()
}

pub fn display_name(asset: &Asset) -> Option<&'static str> {
    CURRENCY_NAMES
        .iter()
        .find(|(ticker, _)| *ticker == asset.as_str())
        .map(|(_, name)| *name)
}

/// Keeps assets whose ticker or display name contains `search`, ignoring case.
pub fn filter_currencies(currencies: &[Asset], search: &str) -> Vec<Asset> {
    let needle = search.to_lowercase();
    currencies
        .iter()
        .filter(|asset| {
            let ticker = asset.as_str().to_lowercase();
            let name = display_name(asset)
                .map(str::to_lowercase)
                .unwrap_or_else(|| ticker.clone());
            ticker.contains(&needle) || name.contains(&needle)
        })
        .cloned()
        .collect()
}

/// Integer prefix parse with `parseInt(value, 10)` semantics: leading
/// whitespace and sign are accepted, parsing stops at the first non-digit,
/// and no digits at all yields `None`.
pub fn parse_int_prefix(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut parsed: i64 = 0;
    let mut seen_digit = false;
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        parsed = parsed
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }

    if !seen_digit {
        return None;
    }
    Some(if negative { -parsed } else { parsed })
}

/// Accepts an input buffer when it is empty or starts with an integer.
pub fn is_acceptable_amount(value: &str) -> bool {
    value.is_empty() || parse_int_prefix(value).is_some()
}

pub fn format_crypto_balance(balance: Option<&str>) -> String {
    match balance.map(str::trim).filter(|b| !b.is_empty()) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) => format!("{value:.6}"),
            Err(_) => "0.00".to_string(),
        },
        None => "0.00".to_string(),
    }
}

/// `balance × price` with two decimals, `0.00` when either side is unknown.
pub fn usd_value(balance: Option<&str>, price: Option<&str>) -> String {
    let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<f64>().ok());
    match (parse(balance), parse(price)) {
        (Some(balance), Some(price)) => format!("{:.2}", balance * price),
        _ => "0.00".to_string(),
    }
}
