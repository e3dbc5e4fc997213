use std::sync::Arc;

use futures::future::join_all;
use shared::domain::{Asset, Fiat, ViewKind};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    error::WidgetError,
    oauth::auth_code_from_query,
    orchestrator::BalanceOrchestrator,
    qr::SvgQrEncoder,
    render::{render, Screen},
    snapshot::AccountSnapshot,
    view::{ConfirmOutcome, WidgetView},
    Clipboard, DelayedSettlement, ExchangeService, MissingClipboard, QrEncoder,
    SettlementService, WidgetConfig, WidgetEvent,
};

/// Host-owned values read once when the widget mounts.
#[derive(Debug, Clone, Default)]
pub struct WidgetInputs {
    pub authenticated: bool,
    pub auth_in_progress: bool,
    /// Query string of the page, searched for an OAuth `code`.
    pub page_query: String,
    pub user_tld_auto_set: bool,
}

/// User interactions the widget reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetAction {
    SelectView(ViewKind),
    ShowContent(bool),
    Connect,
    OpenDisconnect,
    CancelDisconnect,
    FinishDisconnect,
    ShowQr(Asset),
    CancelQr,
    SetDepositSearch(String),
    SelectDepositAsset(Option<Asset>),
    CopyAddress(Asset),
    SetConvertAmount(String),
    ChooseConvertDestination(Asset),
    PreviewConversion,
    DismissConversionPreview,
    ConfirmConversion,
    RetryConversion,
    FinishConversion,
    ToggleTld,
    ToggleFiatDropdown,
    ToggleCurrencies,
    ChooseFiat(Fiat),
    ChooseBuyAsset(Asset),
    SetBuyAmount(String),
    Buy,
    ToggleHideBalance,
}

pub struct ExchangeWidget {
    service: Arc<dyn ExchangeService>,
    settlement: Arc<dyn SettlementService>,
    clipboard: Arc<dyn Clipboard>,
    orchestrator: Arc<BalanceOrchestrator>,
    view: Arc<Mutex<WidgetView>>,
    client_url: Mutex<Option<String>>,
    settlements: Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<WidgetEvent>,
}

impl ExchangeWidget {
    pub fn new(service: Arc<dyn ExchangeService>, config: WidgetConfig) -> Arc<Self> {
        let settlement = Arc::new(DelayedSettlement::new(config.settlement_delay));
        Self::new_with_dependencies(
            service,
            Arc::new(SvgQrEncoder),
            settlement,
            Arc::new(MissingClipboard),
            config,
        )
    }

    pub fn new_with_dependencies(
        service: Arc<dyn ExchangeService>,
        qr: Arc<dyn QrEncoder>,
        settlement: Arc<dyn SettlementService>,
        clipboard: Arc<dyn Clipboard>,
        config: WidgetConfig,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(1024);
        let orchestrator = BalanceOrchestrator::new(Arc::clone(&service), qr, events.clone());
        Arc::new(Self {
            service,
            settlement,
            clipboard,
            orchestrator,
            view: Arc::new(Mutex::new(WidgetView::new(&config))),
            client_url: Mutex::new(None),
            settlements: Mutex::new(Vec::new()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<WidgetEvent> {
        self.events.subscribe()
    }

    pub async fn mount(&self, inputs: WidgetInputs) {
        self.view.lock().await.auth_in_progress = inputs.auth_in_progress;
        self.set_authenticated(inputs.authenticated).await;

        if inputs.auth_in_progress {
            self.complete_oauth(&inputs.page_query).await;
        }

        if !inputs.user_tld_auto_set {
            match self.service.user_tld().await {
                Ok(tld) => {
                    self.view.lock().await.set_tld(tld);
                    let _ = self.events.send(WidgetEvent::TldChanged(tld));
                }
                Err(err) => debug!("widget: user tld lookup failed: {err:#}"),
            }
        }

        match self.service.client_url().await {
            Ok(url) => *self.client_url.lock().await = Some(url),
            Err(err) => debug!("widget: client url lookup failed: {err:#}"),
        }
    }

    /// Feeds the host's authentication state. Balances are fetched only when
    /// it flips from false to true.
    pub async fn set_authenticated(&self, authenticated: bool) {
        self.view.lock().await.authenticated = authenticated;
        if self.orchestrator.set_authenticated(authenticated).await {
            let _ = self.events.send(WidgetEvent::Authenticated);
        }
    }

    async fn complete_oauth(&self, page_query: &str) {
        let Some(code) = auth_code_from_query(page_query) else {
            return;
        };
        match self.service.access_token(&code).await {
            Ok(true) => {
                info!("widget: oauth code accepted");
                self.view.lock().await.auth_in_progress = false;
                self.set_authenticated(true).await;
            }
            Ok(false) => warn!("widget: oauth code rejected"),
            Err(err) => warn!("widget: access token request failed: {err:#}"),
        }
    }

    pub async fn dispatch(&self, action: WidgetAction) {
        debug!(action = ?action, "widget: dispatch");
        match action {
            WidgetAction::ConfirmConversion => self.confirm_conversion().await,
            WidgetAction::FinishDisconnect => self.finish_disconnect().await,
            WidgetAction::CopyAddress(asset) => self.copy_address(&asset).await,
            WidgetAction::Connect => {
                self.view.lock().await.auth_in_progress = true;
                let client_url = self.client_url.lock().await.clone();
                let _ = self
                    .events
                    .send(WidgetEvent::ConnectRequested { client_url });
            }
            WidgetAction::ToggleTld => {
                let tld = self.view.lock().await.toggle_tld();
                let _ = self.events.send(WidgetEvent::TldChanged(tld));
            }
            WidgetAction::Buy => {
                let request = self.view.lock().await.buy.request();
                let _ = self.events.send(WidgetEvent::BuyRequested {
                    asset: request.asset,
                    amount: request.amount,
                    fiat: request.fiat,
                    tld: request.tld,
                });
            }
            other => apply_local(&mut *self.view.lock().await, other),
        }
    }

    async fn confirm_conversion(&self) {
        let available = self
            .orchestrator
            .with_snapshot(|snapshot| snapshot.btc_balance().map(str::to_string))
            .await;
        let outcome = self
            .view
            .lock()
            .await
            .confirm_conversion(available.as_deref());

        match outcome {
            ConfirmOutcome::Ignored => {}
            ConfirmOutcome::Rejected => {
                let amount = self.view.lock().await.draft().amount.clone();
                info!(amount = %amount, "widget: conversion exceeds available balance");
                let _ = self.events.send(WidgetEvent::ConversionRejected { amount });
            }
            ConfirmOutcome::Settle(draft) => {
                let settlement = Arc::clone(&self.settlement);
                let view = Arc::clone(&self.view);
                let events = self.events.clone();
                let handle = tokio::spawn(async move {
                    match settlement.settle(&draft).await {
                        Ok(()) => {
                            view.lock().await.conversion_settled(draft.clone());
                            let _ = events.send(WidgetEvent::ConversionSettled {
                                amount: draft.amount,
                                to: draft.to,
                            });
                        }
                        Err(err) => {
                            let err = WidgetError::Settlement(err);
                            warn!("widget: {err}");
                            view.lock().await.conversion_failed();
                            let _ = events.send(WidgetEvent::ConversionFailed(err.to_string()));
                        }
                    }
                });
                let mut settlements = self.settlements.lock().await;
                settlements.retain(|handle| !handle.is_finished());
                settlements.push(handle);
            }
        }
    }

    async fn finish_disconnect(&self) {
        self.orchestrator.reset().await;
        self.view.lock().await.disconnect_finished();
        info!("widget: disconnected from exchange");
        let _ = self.events.send(WidgetEvent::Disconnected);
    }

    async fn copy_address(&self, asset: &Asset) {
        let address = self
            .orchestrator
            .with_snapshot(|snapshot| snapshot.deposit_address(asset).map(str::to_string))
            .await;
        let Some(address) = address else {
            debug!(asset = %asset, "widget: no deposit address to copy");
            return;
        };
        if let Err(err) = self.clipboard.write_text(&address).await {
            warn!("widget: {}", WidgetError::Clipboard(err));
        }
    }

    pub async fn render(&self) -> Screen {
        let snapshot = self.orchestrator.snapshot().await;
        let view = self.view.lock().await;
        render(&view, &snapshot)
    }

    pub async fn view(&self) -> WidgetView {
        self.view.lock().await.clone()
    }

    pub async fn snapshot(&self) -> AccountSnapshot {
        self.orchestrator.snapshot().await
    }

    pub async fn client_url(&self) -> Option<String> {
        self.client_url.lock().await.clone()
    }

    /// Waits for outstanding lookups and settlements.
    pub async fn settle(&self) {
        self.orchestrator.settle().await;
        loop {
            let handles = std::mem::take(&mut *self.settlements.lock().await);
            if handles.is_empty() {
                return;
            }
            for result in join_all(handles).await {
                if let Err(err) = result {
                    warn!("widget: settlement task aborted: {err}");
                }
            }
        }
    }
}

fn apply_local(view: &mut WidgetView, action: WidgetAction) {
    match action {
        WidgetAction::SelectView(kind) => view.select_view(kind),
        WidgetAction::ShowContent(show) => view.show_content = show,
        WidgetAction::OpenDisconnect => view.open_disconnect(),
        WidgetAction::CancelDisconnect => view.cancel_disconnect(),
        WidgetAction::ShowQr(asset) => view.show_qr(asset),
        WidgetAction::CancelQr => view.cancel_qr(),
        WidgetAction::SetDepositSearch(search) => view.set_deposit_search(&search),
        WidgetAction::SelectDepositAsset(asset) => view.select_deposit_asset(asset),
        WidgetAction::SetConvertAmount(amount) => {
            if !view.set_convert_amount(&amount) {
                debug!(input = %amount, "widget: ignored non-numeric conversion amount");
            }
        }
        WidgetAction::ChooseConvertDestination(asset) => view.choose_convert_destination(asset),
        WidgetAction::PreviewConversion => {
            view.show_convert_preview();
        }
        WidgetAction::DismissConversionPreview => view.dismiss_convert_preview(),
        WidgetAction::RetryConversion => view.retry_conversion(),
        WidgetAction::FinishConversion => view.finish_conversion(),
        WidgetAction::ToggleFiatDropdown => view.toggle_fiat_dropdown(),
        WidgetAction::ToggleCurrencies => view.toggle_currencies(),
        WidgetAction::ChooseFiat(fiat) => view.choose_fiat(fiat),
        WidgetAction::ChooseBuyAsset(asset) => view.choose_buy_asset(asset),
        WidgetAction::SetBuyAmount(amount) => {
            if !view.set_buy_amount(&amount) {
                debug!(input = %amount, "widget: ignored non-numeric buy amount");
            }
        }
        WidgetAction::ToggleHideBalance => {
            view.toggle_hide_balance();
        }
        WidgetAction::ConfirmConversion
        | WidgetAction::FinishDisconnect
        | WidgetAction::CopyAddress(_)
        | WidgetAction::Connect
        | WidgetAction::ToggleTld
        | WidgetAction::Buy => {}
    }
}

#[cfg(test)]
#[path = "tests/widget_tests.rs"]
mod tests;
