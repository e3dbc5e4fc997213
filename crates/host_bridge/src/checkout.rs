//! Host side of the rewards checkout dialog.
//!
//! Wallet balance and external wallet status arrive as independent pushes.
//! The listener hears about the wallet only after both have arrived at least
//! once, and again on every later push of either.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use serde_json::Value;
use shared::protocol::{
    BalanceDetails, DialogArguments, ExchangeRateInfo, ExternalWalletDetails, HostPush, OrderInfo,
    WalletInfo, EXTERNAL_WALLET_LINKED,
};
use tracing::{debug, info, warn};

use crate::WebUiChannel;

const DIALOG_ARGUMENTS: &str = "dialogArguments";

pub trait CheckoutHostListener: Send + Sync {
    fn on_wallet_updated(&self, wallet: WalletInfo);
    fn on_exchange_rates_updated(&self, rates: ExchangeRateInfo);
    fn on_order_updated(&self, order: OrderInfo);
}

#[derive(Default)]
struct CheckoutState {
    listener: Option<Arc<dyn CheckoutHostListener>>,
    balance: Option<BalanceDetails>,
    external_wallet: Option<ExternalWalletDetails>,
}

impl CheckoutState {
    fn wallet_info(&self) -> Option<WalletInfo> {
        let balance = self.balance.as_ref()?;
        let external_wallet = self.external_wallet.as_ref()?;
        Some(WalletInfo {
            balance: balance.total,
            verified: external_wallet.status == EXTERNAL_WALLET_LINKED,
        })
    }
}

pub struct CheckoutHost {
    channel: Arc<dyn WebUiChannel>,
    state: Mutex<CheckoutState>,
}

impl CheckoutHost {
    pub fn new(channel: Arc<dyn WebUiChannel>) -> Self {
        Self {
            channel,
            state: Mutex::new(CheckoutState::default()),
        }
    }

    pub fn on_dialog_close(&self) {
        self.channel.send("dialogClose", Vec::new());
    }

    pub fn on_pay_with_credit_card(&self, args: Value) {
        info!(args = %args, "checkout: pay with credit card requested");
    }

    pub fn on_pay_with_wallet(&self, args: Value) {
        info!(args = %args, "checkout: pay with wallet requested");
    }

    /// Attaches (or with `None` detaches) the dialog listener. Re-attaching
    /// the current listener is a no-op.
    pub fn set_listener(&self, listener: Option<Arc<dyn CheckoutHostListener>>) {
        {
            let mut state = self.lock_state();
            if same_listener(state.listener.as_ref(), listener.as_ref()) {
                return;
            }
            state.listener = listener.clone();
        }

        let Some(listener) = listener else {
            return;
        };
        self.channel.send("getWalletBalance", Vec::new());
        self.channel.send("getExternalWallet", Vec::new());
        let raw = self.channel.variable_value(DIALOG_ARGUMENTS);
        listener.on_order_updated(order_info_from_dialog_args(raw.as_deref()));
    }

    pub fn handle_push(&self, push: HostPush) {
        match push {
            HostPush::WalletBalanceUpdated { details } => self.wallet_balance_updated(details),
            HostPush::ExternalWalletUpdated { details } => self.external_wallet_updated(details),
        }
    }

    /// Decodes a raw push; undecodable payloads are dropped.
    pub fn handle_raw_push(&self, raw: &str) {
        match serde_json::from_str::<HostPush>(raw) {
            Ok(push) => self.handle_push(push),
            Err(err) => warn!("checkout: dropping malformed host push: {err}"),
        }
    }

    pub fn wallet_balance_updated(&self, details: Option<BalanceDetails>) {
        let Some(details) = details else {
            debug!("checkout: wallet balance push without details");
            return;
        };

        let rates = details.rates.clone();
        let (listener, wallet) = {
            let mut state = self.lock_state();
            state.balance = Some(details);
            (state.listener.clone(), state.wallet_info())
        };

        let Some(listener) = listener else {
            return;
        };
        if let Some(wallet) = wallet {
            listener.on_wallet_updated(wallet);
        }
        listener.on_exchange_rates_updated(ExchangeRateInfo {
            rates,
            last_updated: Utc::now(),
        });
    }

    pub fn external_wallet_updated(&self, details: Option<ExternalWalletDetails>) {
        let Some(details) = details else {
            debug!("checkout: external wallet push without details");
            return;
        };

        let (listener, wallet) = {
            let mut state = self.lock_state();
            state.external_wallet = Some(details);
            (state.listener.clone(), state.wallet_info())
        };

        if let (Some(listener), Some(wallet)) = (listener, wallet) {
            listener.on_wallet_updated(wallet);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckoutState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn same_listener(
    current: Option<&Arc<dyn CheckoutHostListener>>,
    next: Option<&Arc<dyn CheckoutHostListener>>,
) -> bool {
    match (current, next) {
        (None, None) => true,
        (Some(current), Some(next)) => std::ptr::eq(
            Arc::as_ptr(current) as *const (),
            Arc::as_ptr(next) as *const (),
        ),
        _ => false,
    }
}

/// Reads the order out of the dialog argument blob. Missing or malformed
/// arguments give an order with empty fields.
pub fn order_info_from_dialog_args(raw: Option<&str>) -> OrderInfo {
    let Some(raw) = raw else {
        return OrderInfo::default();
    };
    match serde_json::from_str::<DialogArguments>(raw) {
        Ok(args) => args.order_info.unwrap_or_default(),
        Err(err) => {
            debug!("checkout: unparsable dialog arguments: {err}");
            OrderInfo::default()
        }
    }
}

#[cfg(test)]
#[path = "tests/checkout_tests.rs"]
mod tests;
