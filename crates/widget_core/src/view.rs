//! View state machine of the exchange widget.
//!
//! Overlays are tracked as independent gates because several can be raised
//! at once (a rejected confirmation still has its preview raised, for
//! instance). What is shown is always the single highest-priority gate,
//! resolved by [`OverlayGates::active`].

use shared::domain::{Asset, Fiat, Tld, ViewKind};

use crate::{buy::BuyForm, conversion::ConversionDraft, WidgetConfig};

/// The overlay replacing the base view, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Qr(Asset),
    InsufficientFunds,
    ConvertSuccess,
    ConvertPreview,
    Disconnecting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayGates {
    pub qr_asset: Option<Asset>,
    pub insufficient_funds: bool,
    /// The conversion that settled, shown by the success overlay.
    pub convert_success: Option<ConversionDraft>,
    pub convert_preview: bool,
    pub disconnect_in_progress: bool,
}

impl OverlayGates {
    pub fn active(&self) -> Option<Overlay> {
        if let Some(asset) = &self.qr_asset {
            return Some(Overlay::Qr(asset.clone()));
        }
        if self.insufficient_funds {
            return Some(Overlay::InsufficientFunds);
        }
        if self.convert_success.is_some() {
            return Some(Overlay::ConvertSuccess);
        }
        if self.convert_preview {
            return Some(Overlay::ConvertPreview);
        }
        if self.disconnect_in_progress {
            return Some(Overlay::Disconnecting);
        }
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// No preview was open, nothing to confirm.
    Ignored,
    Rejected,
    Settle(ConversionDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub authenticated: bool,
    pub auth_in_progress: bool,
    pub show_content: bool,
    pub hide_balance: bool,
    pub buy: BuyForm,
    selected_view: ViewKind,
    gates: OverlayGates,
    draft: ConversionDraft,
    settling: bool,
    deposit_search: String,
    deposit_asset: Option<Asset>,
    fiat_showing: bool,
    currencies_showing: bool,
}

impl WidgetView {
    pub fn new(config: &WidgetConfig) -> Self {
        Self {
            authenticated: false,
            auth_in_progress: false,
            show_content: config.show_content,
            hide_balance: false,
            buy: BuyForm::new(config),
            selected_view: ViewKind::Deposit,
            gates: OverlayGates::default(),
            draft: ConversionDraft::default(),
            settling: false,
            deposit_search: String::new(),
            deposit_asset: None,
            fiat_showing: false,
            currencies_showing: false,
        }
    }

    /// The base view to render; unauthenticated users only get the buy view.
    pub fn route(&self) -> ViewKind {
        if self.authenticated {
            self.selected_view
        } else {
            ViewKind::Buy
        }
    }

    pub fn active_overlay(&self) -> Option<Overlay> {
        self.gates.active()
    }

    pub fn selected_view(&self) -> ViewKind {
        self.selected_view
    }

    pub fn gates(&self) -> &OverlayGates {
        &self.gates
    }

    pub fn draft(&self) -> &ConversionDraft {
        &self.draft
    }

    pub fn deposit_search(&self) -> &str {
        &self.deposit_search
    }

    pub fn deposit_asset(&self) -> Option<&Asset> {
        self.deposit_asset.as_ref()
    }

    pub fn fiat_showing(&self) -> bool {
        self.fiat_showing
    }

    pub fn currencies_showing(&self) -> bool {
        self.currencies_showing
    }

    pub fn tld(&self) -> Tld {
        self.buy.tld
    }

    /// Navigation leaves the overlay gates alone.
    pub fn select_view(&mut self, view: ViewKind) {
        self.selected_view = view;
    }

    pub fn open_disconnect(&mut self) {
        self.gates.disconnect_in_progress = true;
    }

    pub fn cancel_disconnect(&mut self) {
        self.gates.disconnect_in_progress = false;
    }

    pub fn disconnect_finished(&mut self) {
        self.authenticated = false;
        self.auth_in_progress = false;
        self.cancel_disconnect();
    }

    pub fn show_qr(&mut self, asset: Asset) {
        self.gates.qr_asset = Some(asset);
    }

    pub fn cancel_qr(&mut self) {
        self.gates.qr_asset = None;
    }

    pub fn set_deposit_search(&mut self, search: &str) {
        self.deposit_search = search.to_string();
    }

    pub fn select_deposit_asset(&mut self, asset: Option<Asset>) {
        self.deposit_asset = asset;
    }

    pub fn set_convert_amount(&mut self, value: &str) -> bool {
        self.draft.set_amount(value)
    }

    pub fn choose_convert_destination(&mut self, asset: Asset) {
        self.draft.set_destination(asset);
        self.currencies_showing = false;
    }

    /// Opens the confirmation overlay; only the convert view can do this.
    pub fn show_convert_preview(&mut self) -> bool {
        if self.route() != ViewKind::Convert {
            return false;
        }
        self.gates.convert_preview = true;
        true
    }

    pub fn dismiss_convert_preview(&mut self) {
        self.gates.convert_preview = false;
        self.draft = ConversionDraft::default();
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// Accepted only while the preview is the visible overlay and no earlier
    /// confirmation is still settling.
    pub fn confirm_conversion(&mut self, available_btc: Option<&str>) -> ConfirmOutcome {
        if self.settling || self.active_overlay() != Some(Overlay::ConvertPreview) {
            return ConfirmOutcome::Ignored;
        }
        if self.draft.exceeds(available_btc) {
            self.gates.insufficient_funds = true;
            return ConfirmOutcome::Rejected;
        }
        self.settling = true;
        ConfirmOutcome::Settle(self.draft.clone())
    }

    pub fn conversion_settled(&mut self, draft: ConversionDraft) {
        self.settling = false;
        self.gates.convert_success = Some(draft);
    }

    pub fn conversion_failed(&mut self) {
        self.settling = false;
        self.gates.convert_preview = false;
        self.draft = ConversionDraft::default();
    }

    /// Exit of the insufficient-funds overlay.
    pub fn retry_conversion(&mut self) {
        if self.active_overlay() != Some(Overlay::InsufficientFunds) {
            return;
        }
        self.gates.insufficient_funds = false;
        self.gates.convert_preview = false;
        self.draft = ConversionDraft::default();
        self.selected_view = ViewKind::Deposit;
    }

    /// Exit of the success overlay.
    pub fn finish_conversion(&mut self) {
        if self.active_overlay() != Some(Overlay::ConvertSuccess) {
            return;
        }
        self.gates.convert_success = None;
        self.gates.convert_preview = false;
        self.draft = ConversionDraft::default();
        self.selected_view = ViewKind::Deposit;
    }

    pub fn toggle_tld(&mut self) -> Tld {
        let tld = self.buy.toggle_tld();
        self.fiat_showing = false;
        self.currencies_showing = false;
        tld
    }

    pub fn set_tld(&mut self, tld: Tld) {
        self.buy.tld = tld;
    }

    /// Ignored on the US exchange and while the asset dropdown is open.
    pub fn toggle_fiat_dropdown(&mut self) {
        if self.buy.is_us() || self.currencies_showing {
            return;
        }
        self.fiat_showing = !self.fiat_showing;
    }

    pub fn toggle_currencies(&mut self) {
        self.currencies_showing = !self.currencies_showing;
    }

    pub fn choose_fiat(&mut self, fiat: Fiat) {
        self.fiat_showing = false;
        self.buy.fiat = fiat;
    }

    pub fn choose_buy_asset(&mut self, asset: Asset) {
        self.currencies_showing = false;
        self.buy.asset = asset;
    }

    pub fn set_buy_amount(&mut self, value: &str) -> bool {
        self.buy.set_amount(value)
    }

    pub fn toggle_hide_balance(&mut self) -> bool {
        self.hide_balance = !self.hide_balance;
        self.hide_balance
    }
}
