use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::{Asset, Fiat, Tld};
use tracing::warn;
use widget_core::WidgetConfig;

pub const SETTINGS_FILE: &str = "widget.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// `None` lets the exchange report the user's TLD on mount.
    pub user_tld: Option<Tld>,
    pub settlement_delay_ms: u64,
    pub initial_fiat: String,
    pub initial_asset: String,
    pub log_filter: String,
    pub fixture_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            user_tld: None,
            settlement_delay_ms: 1500,
            initial_fiat: "USD".into(),
            initial_asset: "BTC".into(),
            log_filter: "info".into(),
            fixture_path: None,
        }
    }
}

impl Settings {
    pub fn widget_config(&self) -> WidgetConfig {
        WidgetConfig {
            settlement_delay: Duration::from_millis(self.settlement_delay_ms),
            user_tld: self.user_tld.unwrap_or_default(),
            initial_fiat: Fiat::new(self.initial_fiat.clone()),
            initial_asset: Asset::new(self.initial_asset.clone()),
            ..WidgetConfig::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    user_tld: Option<String>,
    settlement_delay_ms: Option<u64>,
    initial_fiat: Option<String>,
    initial_asset: Option<String>,
    log_filter: Option<String>,
    fixture_path: Option<PathBuf>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Reads `path` when present, then applies environment overrides looked up
/// through `env`. Values that fail to parse keep what was there before.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file(&mut settings, file_cfg),
            Err(err) => warn!("config: ignoring unreadable {}: {err}", path.display()),
        }
    }

    if let Some(v) = env("WIDGET_TLD") {
        set_tld(&mut settings, &v);
    }
    if let Some(v) = env("APP__USER_TLD") {
        set_tld(&mut settings, &v);
    }

    if let Some(v) = env("APP__SETTLEMENT_DELAY_MS") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.settlement_delay_ms = parsed;
        }
    }

    if let Some(v) = env("APP__INITIAL_FIAT") {
        set_ticker(&mut settings.initial_fiat, &v);
    }
    if let Some(v) = env("APP__INITIAL_ASSET") {
        set_ticker(&mut settings.initial_asset, &v);
    }

    if let Some(v) = env("APP__LOG_FILTER") {
        if !v.trim().is_empty() {
            settings.log_filter = v;
        }
    }

    if let Some(v) = env("APP__FIXTURE_PATH") {
        if !v.trim().is_empty() {
            settings.fixture_path = Some(PathBuf::from(v));
        }
    }

    settings
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.user_tld {
        set_tld(settings, &v);
    }
    if let Some(v) = file_cfg.settlement_delay_ms {
        settings.settlement_delay_ms = v;
    }
    if let Some(v) = file_cfg.initial_fiat {
        set_ticker(&mut settings.initial_fiat, &v);
    }
    if let Some(v) = file_cfg.initial_asset {
        set_ticker(&mut settings.initial_asset, &v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
    if file_cfg.fixture_path.is_some() {
        settings.fixture_path = file_cfg.fixture_path;
    }
}

fn set_tld(settings: &mut Settings, raw: &str) {
    match raw.parse::<Tld>() {
        Ok(tld) => settings.user_tld = Some(tld),
        Err(err) => warn!("config: {err}"),
    }
}

fn set_ticker(slot: &mut String, raw: &str) {
    let ticker = raw.trim();
    if !ticker.is_empty() && ticker.chars().all(|c| c.is_ascii_alphanumeric()) {
        *slot = ticker.to_ascii_uppercase();
    }
}
