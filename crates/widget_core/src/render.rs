//! Pure projection of view state plus the account snapshot into the screen
//! a host renders. Nothing here mutates state.

use serde::Serialize;
use shared::domain::{Asset, Fiat, Tld, ViewKind};

use crate::{
    conversion::{destination_choices, CONVERSION_FEE, RECEIVED_AMOUNT_PLACEHOLDER},
    currency::{currencies_for, display_name, filter_currencies, format_crypto_balance, usd_value},
    snapshot::AccountSnapshot,
    view::{Overlay, WidgetView},
};

const ADDRESS_UNAVAILABLE: &str = "Address Not Available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderAction {
    None,
    Connect,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    TitleTab {
        header: HeaderAction,
    },
    Qr {
        asset: Asset,
        image: Option<String>,
    },
    InsufficientFunds,
    ConvertSuccess {
        message: String,
    },
    ConvertPreview(ConvertPreview),
    Disconnecting,
    Base {
        header: HeaderAction,
        navigation: Option<ViewKind>,
        view: BaseView,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertPreview {
    pub amount: String,
    pub rate: String,
    pub fee: String,
    pub receive: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum BaseView {
    Buy(BuyScreen),
    DepositList { rows: Vec<DepositRow> },
    DepositDetail(DepositDetail),
    Convert(ConvertScreen),
    Summary(SummaryScreen),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyScreen {
    pub tld: Tld,
    pub amount: String,
    pub fiat: Fiat,
    pub fiat_locked: bool,
    pub fiat_choices: Option<Vec<Fiat>>,
    pub asset: Asset,
    pub asset_choices: Option<Vec<Asset>>,
    pub can_cancel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositRow {
    pub asset: Asset,
    pub name: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositDetail {
    pub asset: Asset,
    pub name: Option<&'static str>,
    pub address: String,
    pub qr_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertScreen {
    pub available: String,
    pub amount: String,
    pub destination: Asset,
    pub destination_choices: Option<Vec<Asset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub asset: Asset,
    pub balance: String,
    pub usd_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryScreen {
    pub hidden: bool,
    pub btc_balance: String,
    pub btc_usd_value: String,
    pub rows: Vec<SummaryRow>,
}

pub fn render(view: &WidgetView, snapshot: &AccountSnapshot) -> Screen {
    if !view.show_content {
        return Screen::TitleTab {
            header: header_action(view),
        };
    }

    if let Some(overlay) = view.active_overlay() {
        return render_overlay(overlay, view, snapshot);
    }

    let route = view.route();
    let navigation = match route {
        ViewKind::Deposit | ViewKind::Summary => Some(route),
        ViewKind::Convert | ViewKind::Buy => None,
    };
    let body = match route {
        ViewKind::Buy => BaseView::Buy(buy_screen(view)),
        ViewKind::Deposit => deposit_view(view, snapshot),
        ViewKind::Convert => BaseView::Convert(convert_screen(view, snapshot)),
        ViewKind::Summary => BaseView::Summary(summary_screen(view, snapshot)),
    };

    Screen::Base {
        header: header_action(view),
        navigation,
        view: body,
    }
}

fn render_overlay(overlay: Overlay, view: &WidgetView, snapshot: &AccountSnapshot) -> Screen {
    let draft = view.draft();
    match overlay {
        Overlay::Qr(asset) => Screen::Qr {
            image: snapshot.deposit_qr.get(&asset).cloned(),
            asset,
        },
        Overlay::InsufficientFunds => Screen::InsufficientFunds,
        Overlay::ConvertSuccess => {
            let settled = view.gates().convert_success.as_ref().unwrap_or(draft);
            Screen::ConvertSuccess {
                message: format!(
                    "You converted {} {} to {}!",
                    settled.amount,
                    settled.from,
                    settled.destination_label()
                ),
            }
        }
        Overlay::ConvertPreview => {
            let to = draft.destination_label();
            Screen::ConvertPreview(ConvertPreview {
                amount: format!("{} {}", draft.amount, draft.from),
                rate: format!("1 {} = X {to}", draft.from),
                fee: CONVERSION_FEE.to_string(),
                receive: format!("{RECEIVED_AMOUNT_PLACEHOLDER} {to}"),
            })
        }
        Overlay::Disconnecting => Screen::Disconnecting,
    }
}

fn header_action(view: &WidgetView) -> HeaderAction {
    let route = view.route();
    if view.authenticated
        && route != ViewKind::Buy
        && route != ViewKind::Convert
        && view.show_content
    {
        HeaderAction::Disconnect
    } else if !view.authenticated
        && !view.auth_in_progress
        && view.show_content
        && view.tld() != Tld::Us
    {
        HeaderAction::Connect
    } else {
        HeaderAction::None
    }
}

fn buy_screen(view: &WidgetView) -> BuyScreen {
    let form = &view.buy;
    BuyScreen {
        tld: form.tld,
        amount: form.amount.clone(),
        fiat: form.fiat.clone(),
        fiat_locked: form.is_us(),
        fiat_choices: view.fiat_showing().then(|| form.fiat_choices()),
        asset: form.asset.clone(),
        asset_choices: view.currencies_showing().then(|| form.asset_choices()),
        can_cancel: view.authenticated,
    }
}

fn deposit_view(view: &WidgetView, snapshot: &AccountSnapshot) -> BaseView {
    if let Some(asset) = view.deposit_asset() {
        return BaseView::DepositDetail(DepositDetail {
            asset: asset.clone(),
            name: display_name(asset),
            address: snapshot
                .deposit_address(asset)
                .unwrap_or(ADDRESS_UNAVAILABLE)
                .to_string(),
            qr_available: snapshot.deposit_qr.contains_key(asset),
        });
    }

    let rows = filter_currencies(&currencies_for(view.tld()), view.deposit_search())
        .into_iter()
        .map(|asset| DepositRow {
            name: display_name(&asset),
            asset,
        })
        .collect();
    BaseView::DepositList { rows }
}

fn convert_screen(view: &WidgetView, snapshot: &AccountSnapshot) -> ConvertScreen {
    let draft = view.draft();
    ConvertScreen {
        available: format!("{} BTC", snapshot.btc_balance().unwrap_or_default()),
        amount: draft.amount.clone(),
        destination: draft.destination_label(),
        destination_choices: view
            .currencies_showing()
            .then(|| destination_choices(view.tld())),
    }
}

fn summary_screen(view: &WidgetView, snapshot: &AccountSnapshot) -> SummaryScreen {
    let rows = currencies_for(view.tld())
        .into_iter()
        .map(|asset| {
            let usd_value = usd_value(snapshot.balance(&asset), snapshot.usd_price(&asset));
            SummaryRow {
                balance: format_crypto_balance(snapshot.balance(&asset)),
                asset,
                usd_value,
            }
        })
        .collect();

    SummaryScreen {
        hidden: view.hide_balance,
        btc_balance: format_crypto_balance(snapshot.btc_balance()),
        btc_usd_value: snapshot.btc_balance_value(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use shared::protocol::DepositInfo;

    use super::*;
    use crate::{snapshot::SnapshotUpdate, WidgetConfig};

    fn authed_view() -> WidgetView {
        let mut view = WidgetView::new(&WidgetConfig::default());
        view.authenticated = true;
        view
    }

    fn funded_snapshot() -> AccountSnapshot {
        let mut snapshot = AccountSnapshot::default();
        snapshot.apply(SnapshotUpdate::Balances(
            [
                (Asset::btc(), "1.5".to_string()),
                (Asset::from("ETH"), "2".to_string()),
            ]
            .into_iter()
            .collect(),
        ));
        snapshot.apply(SnapshotUpdate::BtcUsdPrice("10000".into()));
        snapshot.apply(SnapshotUpdate::AssetUsdPrice {
            asset: Asset::from("ETH"),
            price: "150".into(),
        });
        snapshot
    }

    #[test]
    fn hidden_content_collapses_to_title_tab() {
        let mut view = WidgetView::new(&WidgetConfig::default());
        view.show_content = false;
        view.open_disconnect();
        assert_eq!(
            render(&view, &AccountSnapshot::default()),
            Screen::TitleTab {
                header: HeaderAction::None
            }
        );
    }

    #[test]
    fn insufficient_funds_beats_disconnect() {
        let mut view = authed_view();
        view.select_view(ViewKind::Convert);
        view.set_convert_amount("15");
        view.show_convert_preview();
        view.open_disconnect();
        view.confirm_conversion(Some("10"));

        assert_eq!(
            render(&view, &AccountSnapshot::default()),
            Screen::InsufficientFunds
        );
    }

    #[test]
    fn deposit_search_filters_by_name() {
        let mut view = authed_view();
        view.set_deposit_search("et");
        let Screen::Base {
            view: BaseView::DepositList { rows },
            header,
            navigation,
        } = render(&view, &AccountSnapshot::default())
        else {
            panic!("expected deposit list");
        };

        assert_eq!(header, HeaderAction::Disconnect);
        assert_eq!(navigation, Some(ViewKind::Deposit));
        let assets: Vec<_> = rows.iter().map(|row| row.asset.as_str()).collect();
        assert!(assets.contains(&"ETH"));
        assert!(assets.contains(&"ETC"));
        assert!(!assets.contains(&"BTC"));
        assert!(!assets.contains(&"BNB"));
    }

    #[test]
    fn deposit_detail_falls_back_when_address_missing() {
        let mut view = authed_view();
        view.select_deposit_asset(Some(Asset::from("XRP")));
        let mut snapshot = AccountSnapshot::default();

        let Screen::Base {
            view: BaseView::DepositDetail(detail),
            ..
        } = render(&view, &snapshot)
        else {
            panic!("expected deposit detail");
        };
        assert_eq!(detail.address, ADDRESS_UNAVAILABLE);
        assert_eq!(detail.name, Some("Ripple"));
        assert!(!detail.qr_available);

        snapshot.apply(SnapshotUpdate::DepositInfo {
            asset: Asset::from("XRP"),
            info: DepositInfo {
                address: "rEb8".into(),
                url: String::new(),
            },
        });
        let Screen::Base {
            view: BaseView::DepositDetail(detail),
            ..
        } = render(&view, &snapshot)
        else {
            panic!("expected deposit detail");
        };
        assert_eq!(detail.address, "rEb8");
    }

    #[test]
    fn summary_values_balances_in_usd() {
        let mut view = authed_view();
        view.select_view(ViewKind::Summary);
        let Screen::Base {
            view: BaseView::Summary(summary),
            ..
        } = render(&view, &funded_snapshot())
        else {
            panic!("expected summary");
        };

        assert_eq!(summary.btc_balance, "1.500000");
        assert_eq!(summary.btc_usd_value, "15000.00");
        let eth = summary
            .rows
            .iter()
            .find(|row| row.asset.as_str() == "ETH")
            .expect("eth row");
        assert_eq!(eth.balance, "2.000000");
        assert_eq!(eth.usd_value, "300.00");
        let xrp = summary
            .rows
            .iter()
            .find(|row| row.asset.as_str() == "XRP")
            .expect("xrp row");
        assert_eq!(xrp.balance, "0.00");
        assert_eq!(xrp.usd_value, "0.00");
    }

    #[test]
    fn preview_shows_placeholder_received_amount() {
        let mut view = authed_view();
        view.select_view(ViewKind::Convert);
        view.set_convert_amount("6");
        view.choose_convert_destination(Asset::from("XRP"));
        view.show_convert_preview();

        assert_eq!(
            render(&view, &funded_snapshot()),
            Screen::ConvertPreview(ConvertPreview {
                amount: "6 BTC".into(),
                rate: "1 BTC = X XRP".into(),
                fee: CONVERSION_FEE.into(),
                receive: "0 XRP".into(),
            })
        );
    }

    #[test]
    fn unauthenticated_us_user_gets_no_connect_prompt() {
        let mut view = WidgetView::new(&WidgetConfig::default());
        let Screen::Base { header, view: body, .. } = render(&view, &AccountSnapshot::default())
        else {
            panic!("expected base screen");
        };
        assert_eq!(header, HeaderAction::Connect);
        assert!(matches!(body, BaseView::Buy(BuyScreen { can_cancel: false, .. })));

        view.toggle_tld();
        let Screen::Base { header, .. } = render(&view, &AccountSnapshot::default()) else {
            panic!("expected base screen");
        };
        assert_eq!(header, HeaderAction::None);
    }

    #[test]
    fn convert_view_lists_available_btc() {
        let mut view = authed_view();
        view.select_view(ViewKind::Convert);
        view.toggle_currencies();
        let Screen::Base {
            view: BaseView::Convert(convert),
            header,
            ..
        } = render(&view, &funded_snapshot())
        else {
            panic!("expected convert view");
        };
        assert_eq!(header, HeaderAction::None);
        assert_eq!(convert.available, "1.5 BTC");
        assert_eq!(convert.destination, Asset::from("BNB"));
        let choices = convert.destination_choices.expect("dropdown open");
        assert!(!choices.contains(&Asset::from("ETH")));
    }

    #[test]
    fn preview_serializes_with_screen_tag() {
        let mut view = authed_view();
        view.select_view(ViewKind::Convert);
        view.set_convert_amount("2");
        view.choose_convert_destination(Asset::from("XRP"));
        view.show_convert_preview();

        let json = serde_json::to_value(render(&view, &funded_snapshot())).expect("encode");
        assert_eq!(
            json,
            serde_json::json!({
                "screen": "convert_preview",
                "amount": "2 BTC",
                "rate": "1 BTC = X XRP",
                "fee": "0.0005 BNB",
                "receive": "0 XRP",
            })
        );
    }
}
