mod config;
mod fixture;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::{Asset, Fiat, ViewKind};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use widget_core::{
    oauth::is_oauth_callback, DelayedSettlement, ExchangeWidget, SvgQrEncoder, WidgetAction,
    WidgetEvent, WidgetInputs,
};

use crate::{
    config::{load_settings, load_settings_from},
    fixture::{ExchangeFixture, LogClipboard},
};

#[derive(Parser, Debug)]
struct Cli {
    /// Settings file; `widget.toml` in the working directory by default.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON exchange fixture; a built-in sample account when absent.
    #[arg(long)]
    fixture: Option<PathBuf>,
    #[arg(long)]
    signed_out: bool,
    /// Completes an OAuth redirect with this code on mount.
    #[arg(long)]
    oauth_code: Option<String>,
    /// Full redirect URL the exchange sent the browser to after sign-in.
    #[arg(long, conflicts_with = "oauth_code")]
    redirect_url: Option<String>,
    /// Print widget events as they are published.
    #[arg(long)]
    events: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Summary {
        #[arg(long)]
        hide: bool,
    },
    Deposit {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        asset: Option<String>,
        #[arg(long)]
        copy: bool,
        #[arg(long)]
        qr: bool,
    },
    Convert {
        #[arg(long)]
        amount: String,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        confirm: bool,
    },
    Buy {
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        asset: Option<String>,
        #[arg(long)]
        fiat: Option<String>,
        #[arg(long)]
        toggle_tld: bool,
    },
    Connect,
    Disconnect,
}

impl Command {
    fn actions(self) -> Vec<WidgetAction> {
        match self {
            Command::Summary { hide } => {
                let mut actions = vec![WidgetAction::SelectView(ViewKind::Summary)];
                if hide {
                    actions.push(WidgetAction::ToggleHideBalance);
                }
                actions
            }
            Command::Deposit {
                search,
                asset,
                copy,
                qr,
            } => {
                let mut actions = vec![WidgetAction::SelectView(ViewKind::Deposit)];
                if let Some(search) = search {
                    actions.push(WidgetAction::SetDepositSearch(search));
                }
                if let Some(asset) = asset.map(|raw| Asset::new(raw.to_ascii_uppercase())) {
                    actions.push(WidgetAction::SelectDepositAsset(Some(asset.clone())));
                    if copy {
                        actions.push(WidgetAction::CopyAddress(asset.clone()));
                    }
                    if qr {
                        actions.push(WidgetAction::ShowQr(asset));
                    }
                }
                actions
            }
            Command::Convert {
                amount,
                to,
                confirm,
            } => {
                let mut actions = vec![
                    WidgetAction::SelectView(ViewKind::Convert),
                    WidgetAction::SetConvertAmount(amount),
                ];
                if let Some(to) = to {
                    actions.push(WidgetAction::ChooseConvertDestination(Asset::new(
                        to.to_ascii_uppercase(),
                    )));
                }
                actions.push(WidgetAction::PreviewConversion);
                if confirm {
                    actions.push(WidgetAction::ConfirmConversion);
                }
                actions
            }
            Command::Buy {
                amount,
                asset,
                fiat,
                toggle_tld,
            } => {
                let mut actions = vec![WidgetAction::SelectView(ViewKind::Buy)];
                if toggle_tld {
                    actions.push(WidgetAction::ToggleTld);
                }
                if let Some(fiat) = fiat {
                    actions.push(WidgetAction::ChooseFiat(Fiat::new(fiat.to_ascii_uppercase())));
                }
                if let Some(asset) = asset {
                    actions.push(WidgetAction::ChooseBuyAsset(Asset::new(
                        asset.to_ascii_uppercase(),
                    )));
                }
                if let Some(amount) = amount {
                    actions.push(WidgetAction::SetBuyAmount(amount));
                    actions.push(WidgetAction::Buy);
                }
                actions
            }
            Command::Connect => vec![WidgetAction::Connect],
            Command::Disconnect => vec![
                WidgetAction::OpenDisconnect,
                WidgetAction::FinishDisconnect,
            ],
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = match &cli.config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let fixture_path = cli.fixture.clone().or_else(|| settings.fixture_path.clone());
    let exchange = match fixture_path {
        Some(path) => ExchangeFixture::load(&path)?,
        None => ExchangeFixture::sample(),
    };

    let config = settings.widget_config();
    let widget = ExchangeWidget::new_with_dependencies(
        Arc::new(exchange),
        Arc::new(SvgQrEncoder),
        Arc::new(DelayedSettlement::new(config.settlement_delay)),
        Arc::new(LogClipboard),
        config,
    );

    let printer = cli
        .events
        .then(|| tokio::spawn(print_events(BroadcastStream::new(widget.subscribe_events()))));

    let page_query = match (cli.oauth_code, cli.redirect_url) {
        (Some(code), _) => Some(format!("code={code}")),
        (None, Some(url)) => {
            let query = redirect_query(&url);
            if query.is_none() {
                warn!("widget_demo: {url} is not the OAuth redirect, ignoring");
            }
            query
        }
        (None, None) => None,
    };
    widget
        .mount(WidgetInputs {
            authenticated: !cli.signed_out && page_query.is_none(),
            auth_in_progress: page_query.is_some(),
            page_query: page_query.unwrap_or_default(),
            user_tld_auto_set: settings.user_tld.is_some(),
        })
        .await;
    widget.settle().await;
    info!("widget_demo: mounted");

    for action in cli.command.actions() {
        widget.dispatch(action).await;
    }
    widget.settle().await;

    let screen = widget.render().await;
    drop(widget);
    if let Some(printer) = printer {
        printer.await?;
    }

    println!("{}", serde_json::to_string_pretty(&screen)?);
    Ok(())
}

/// Query string of an OAuth redirect navigation, `None` for any other URL.
fn redirect_query(url: &str) -> Option<String> {
    if !is_oauth_callback(url, true) {
        return None;
    }
    url.split_once('?').map(|(_, query)| query.to_string())
}

async fn print_events(mut events: BroadcastStream<WidgetEvent>) {
    while let Some(event) = events.next().await {
        match event {
            Ok(event) => println!("event: {event:?}"),
            Err(err) => warn!("widget_demo: event stream lagged: {err}"),
        }
    }
}
