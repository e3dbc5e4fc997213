//! Helpers around the exchange OAuth redirect.

const OAUTH_CALLBACK_PREFIX: &str = "https://brave.com/binance/oauth/callback?code=";

/// Pulls the `code` parameter out of a page query string (`?code=..&..`).
pub fn auth_code_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
}

/// Whether a committed navigation landed on the OAuth redirect, in which case
/// the host closes that tab.
pub fn is_oauth_callback(url: &str, is_main_frame: bool) -> bool {
    is_main_frame && url.starts_with(OAUTH_CALLBACK_PREFIX)
}
