use std::collections::HashMap;

use super::*;
use crate::test_support::RecordingChannel;

#[derive(Default)]
struct RecordingListener {
    wallets: Mutex<Vec<WalletInfo>>,
    rates: Mutex<Vec<ExchangeRateInfo>>,
    orders: Mutex<Vec<OrderInfo>>,
}

impl CheckoutHostListener for RecordingListener {
    fn on_wallet_updated(&self, wallet: WalletInfo) {
        self.wallets.lock().expect("wallets").push(wallet);
    }

    fn on_exchange_rates_updated(&self, rates: ExchangeRateInfo) {
        self.rates.lock().expect("rates").push(rates);
    }

    fn on_order_updated(&self, order: OrderInfo) {
        self.orders.lock().expect("orders").push(order);
    }
}

fn host_with_args(args: Option<&str>) -> (CheckoutHost, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel {
        dialog_arguments: args.map(str::to_string),
        ..RecordingChannel::default()
    });
    (CheckoutHost::new(Arc::clone(&channel) as Arc<dyn WebUiChannel>), channel)
}

fn balance(total: f64) -> BalanceDetails {
    BalanceDetails {
        total,
        rates: HashMap::from([("USD".to_string(), 0.25)]),
    }
}

#[test]
fn attaching_listener_requests_wallet_and_pushes_order_once() {
    let (host, channel) = host_with_args(Some(
        r#"{"orderInfo":{"description":"Sticker pack","total":15.5}}"#,
    ));
    let listener = Arc::new(RecordingListener::default());
    let as_dyn: Arc<dyn CheckoutHostListener> = listener.clone();

    host.set_listener(Some(Arc::clone(&as_dyn)));
    host.set_listener(Some(as_dyn));

    assert_eq!(
        channel.messages(),
        vec!["getWalletBalance".to_string(), "getExternalWallet".to_string()]
    );
    assert_eq!(
        *listener.orders.lock().expect("orders"),
        vec![OrderInfo {
            description: Some("Sticker pack".into()),
            total: Some(15.5),
        }]
    );
}

#[test]
fn wallet_info_waits_for_both_pushes() {
    let (host, _channel) = host_with_args(None);
    let listener = Arc::new(RecordingListener::default());
    host.set_listener(Some(listener.clone()));

    host.wallet_balance_updated(Some(balance(30.0)));
    assert!(listener.wallets.lock().expect("wallets").is_empty());
    assert_eq!(listener.rates.lock().expect("rates").len(), 1);

    host.external_wallet_updated(Some(ExternalWalletDetails {
        status: EXTERNAL_WALLET_LINKED,
    }));
    assert_eq!(
        *listener.wallets.lock().expect("wallets"),
        vec![WalletInfo {
            balance: 30.0,
            verified: true,
        }]
    );

    host.external_wallet_updated(Some(ExternalWalletDetails { status: 2 }));
    assert_eq!(
        listener.wallets.lock().expect("wallets").last(),
        Some(&WalletInfo {
            balance: 30.0,
            verified: false,
        })
    );
}

#[test]
fn empty_pushes_are_ignored() {
    let (host, _channel) = host_with_args(None);
    let listener = Arc::new(RecordingListener::default());
    host.set_listener(Some(listener.clone()));

    host.handle_raw_push(r#"{"type":"walletBalanceUpdated","payload":{}}"#);
    host.handle_raw_push(r#"{"type":"externalWalletUpdated","payload":{"details":null}}"#);
    host.handle_raw_push("not json");

    assert!(listener.wallets.lock().expect("wallets").is_empty());
    assert!(listener.rates.lock().expect("rates").is_empty());
}

#[test]
fn pushes_before_listener_are_replayed_on_next_push() {
    let (host, _channel) = host_with_args(None);
    host.handle_push(HostPush::WalletBalanceUpdated {
        details: Some(balance(5.0)),
    });

    let listener = Arc::new(RecordingListener::default());
    host.set_listener(Some(listener.clone()));
    host.handle_push(HostPush::ExternalWalletUpdated {
        details: Some(ExternalWalletDetails { status: 1 }),
    });

    assert_eq!(
        *listener.wallets.lock().expect("wallets"),
        vec![WalletInfo {
            balance: 5.0,
            verified: true,
        }]
    );
}

#[test]
fn detached_listener_hears_nothing() {
    let (host, _channel) = host_with_args(None);
    let listener = Arc::new(RecordingListener::default());
    host.set_listener(Some(listener.clone()));
    host.set_listener(None);

    host.wallet_balance_updated(Some(balance(1.0)));
    host.external_wallet_updated(Some(ExternalWalletDetails { status: 1 }));

    assert!(listener.wallets.lock().expect("wallets").is_empty());
}

#[test]
fn malformed_dialog_arguments_give_empty_order() {
    assert_eq!(order_info_from_dialog_args(Some("{oops")), OrderInfo::default());
    assert_eq!(order_info_from_dialog_args(Some("{}")), OrderInfo::default());
    assert_eq!(order_info_from_dialog_args(None), OrderInfo::default());
    assert_eq!(
        order_info_from_dialog_args(Some(r#"{"orderInfo":{"total":3}}"#)),
        OrderInfo {
            description: None,
            total: Some(3.0),
        }
    );
}

#[test]
fn closing_dialog_notifies_browser() {
    let (host, channel) = host_with_args(None);
    host.on_dialog_close();
    host.on_pay_with_wallet(Value::Null);
    assert_eq!(channel.messages(), vec!["dialogClose".to_string()]);
}
