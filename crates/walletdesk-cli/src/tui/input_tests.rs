#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rust_decimal::Decimal;
use walletdesk_core::config::UiSettings;
use walletdesk_core::models::OrderStatus;
use walletdesk_core::testing::{FakeBackend, TEST_PASSWORD, TEST_USERNAME, sample_order};
use walletdesk_core::{ApiClient, ClientConfig, SessionStore};

use super::handle_key;
use crate::app::App;
use crate::pages::{Notice, QrPreview, Request, RowAction, Route, SettingsField};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Press a key and run whatever it asked of the backend to completion.
async fn press(app: &mut App, api: &ApiClient, code: KeyCode) {
    let requests = handle_key(app, api, key(code));
    app.drive(api, requests).await;
}

async fn type_text(app: &mut App, api: &ApiClient, text: &str) {
    for c in text.chars() {
        press(app, api, KeyCode::Char(c)).await;
    }
}

fn setup(backend: &FakeBackend) -> (App, ApiClient) {
    let session = Arc::new(SessionStore::in_memory());
    session.load();
    let app = App::new(&UiSettings::default());
    let config = ClientConfig {
        base_url: backend.api_url(),
        ..ClientConfig::default()
    };
    let api = ApiClient::new(&config, session)
        .unwrap()
        .with_observer(app.observer());
    (app, api)
}

async fn logged_in(backend: &FakeBackend) -> (App, ApiClient) {
    let (mut app, api) = setup(backend);
    type_text(&mut app, &api, TEST_USERNAME).await;
    press(&mut app, &api, KeyCode::Enter).await;
    type_text(&mut app, &api, TEST_PASSWORD).await;
    press(&mut app, &api, KeyCode::Enter).await;
    assert_eq!(app.route, Route::Dashboard);
    (app, api)
}

#[tokio::test]
async fn guard_sends_anonymous_user_to_login() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = setup(&backend);
    assert!(app.navigate(&api, Route::Orders).is_empty());
    assert_eq!(app.route, Route::Login);
    assert!(backend.requests_to("/api/admin/p2p").is_empty());
}

#[tokio::test]
async fn login_flow_lands_on_dashboard() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![
        sample_order("a", OrderStatus::Pending),
        sample_order("b", OrderStatus::Confirmed),
    ]);
    let (app, _api) = logged_in(&backend).await;
    assert_eq!(app.user.as_ref().unwrap().username, TEST_USERNAME);
    assert_eq!(app.dashboard.stats.total, 2);
    assert_eq!(app.dashboard.stats.pending, 1);
    let req = backend.requests_to("/api/admin/p2p/orders").pop().unwrap();
    assert_eq!(req.path, "/api/admin/p2p/orders?page=1&limit=10");
}

#[tokio::test]
async fn wrong_password_stays_on_login() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = setup(&backend);
    type_text(&mut app, &api, TEST_USERNAME).await;
    press(&mut app, &api, KeyCode::Tab).await;
    type_text(&mut app, &api, "nope").await;
    press(&mut app, &api, KeyCode::Enter).await;
    assert_eq!(app.route, Route::Login);
    assert_eq!(app.login.error.as_deref(), Some("Invalid credentials"));
}

#[tokio::test]
async fn confirm_selected_order_from_keyboard() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![
        sample_order("pending-1", OrderStatus::Pending),
        sample_order("paid-1", OrderStatus::Paid),
    ]);
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('2')).await;
    assert_eq!(app.route, Route::Orders);

    // Confirm is not offered for a pending order: nothing is sent.
    press(&mut app, &api, KeyCode::Char('c')).await;
    assert!(backend.requests_to("/api/admin/p2p/orders/pending-1").is_empty());

    press(&mut app, &api, KeyCode::Down).await;
    press(&mut app, &api, KeyCode::Char('c')).await;
    assert_eq!(
        app.notice(),
        Some(&Notice::Success("Order confirmed".into()))
    );
    assert_eq!(app.orders.orders[1].status, OrderStatus::Confirmed);

    press(&mut app, &api, KeyCode::Enter).await;
    assert!(app.notice().is_none());
}

#[tokio::test]
async fn cancel_requires_yes() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![sample_order("p-1", OrderStatus::Pending)]);
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::F(2)).await;

    press(&mut app, &api, KeyCode::Char('x')).await;
    assert_eq!(app.cancel_prompt.as_deref(), Some("p-1"));
    press(&mut app, &api, KeyCode::Char('n')).await;
    assert!(app.cancel_prompt.is_none());
    assert_eq!(backend.order("p-1").unwrap().status, OrderStatus::Pending);

    press(&mut app, &api, KeyCode::Char('x')).await;
    press(&mut app, &api, KeyCode::Char('y')).await;
    assert_eq!(backend.order("p-1").unwrap().status, OrderStatus::Cancelled);
    assert_eq!(app.orders.orders[0].status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn tx_modal_ignores_blank_hash() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![sample_order("paid-1", OrderStatus::Paid)]);
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('2')).await;

    press(&mut app, &api, KeyCode::Char('t')).await;
    type_text(&mut app, &api, "   ").await;
    press(&mut app, &api, KeyCode::Enter).await;
    assert!(app.orders.tx_modal.is_some());
    assert!(backend.requests_to("/api/admin/p2p/orders/paid-1").is_empty());

    for _ in 0..3 {
        press(&mut app, &api, KeyCode::Backspace).await;
    }
    type_text(&mut app, &api, "0xabc").await;
    press(&mut app, &api, KeyCode::Enter).await;
    assert!(app.orders.tx_modal.is_none());
    assert_eq!(
        backend.order("paid-1").unwrap().tx_hash.as_deref(),
        Some("0xabc")
    );
}

#[tokio::test]
async fn expired_session_returns_to_login() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = logged_in(&backend).await;
    backend.expire_tokens();

    press(&mut app, &api, KeyCode::Char('2')).await;
    assert_eq!(app.route, Route::Login);
    assert_eq!(
        app.login.error.as_deref(),
        Some("Session expired, please log in again")
    );
    assert!(api.session().token().is_none());
}

#[tokio::test]
async fn settings_edit_and_save() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('3')).await;
    assert_eq!(app.settings.config.bank_name, "Vietcombank");

    // Move to the rate field and replace it.
    while app.settings.focus != SettingsField::UsdtRate {
        press(&mut app, &api, KeyCode::Tab).await;
    }
    while !app.settings.rate_input.is_empty() {
        press(&mut app, &api, KeyCode::Backspace).await;
    }
    type_text(&mut app, &api, "25500").await;
    let requests = handle_key(
        &mut app,
        &api,
        KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
    );
    app.drive(&api, requests).await;

    assert_eq!(app.notice(), Some(&Notice::Success("Settings saved".into())));
    assert_eq!(backend.config().usdt_rate, Decimal::new(25_500, 0));
    assert_eq!(backend.config().bank_name, "Vietcombank");
}

#[tokio::test]
async fn qr_url_is_checked_when_leaving_the_field() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('3')).await;

    while app.settings.focus != SettingsField::QrImageUrl {
        press(&mut app, &api, KeyCode::Tab).await;
    }
    type_text(&mut app, &api, &format!("{}/qr.png", backend.base_url())).await;
    press(&mut app, &api, KeyCode::Tab).await;
    assert!(matches!(app.settings.qr, QrPreview::Available(_)));
}

#[tokio::test]
async fn logout_key_clears_session() {
    let backend = FakeBackend::start().await.unwrap();
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('L')).await;
    assert_eq!(app.route, Route::Login);
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn keys_stay_responsive_while_an_action_is_in_flight() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![
        sample_order("paid-1", OrderStatus::Paid),
        sample_order("pending-2", OrderStatus::Pending),
    ]);
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('2')).await;

    // Nothing is sent until the returned request runs.
    let confirm = handle_key(&mut app, &api, key(KeyCode::Char('c')));
    assert_eq!(
        confirm,
        vec![Request::Order {
            order_id: "paid-1".into(),
            action: RowAction::Confirm,
            tx_hash: None,
        }]
    );
    assert!(app.orders.is_busy("paid-1"));
    assert!(handle_key(&mut app, &api, key(KeyCode::Char('c'))).is_empty());

    // Another row can still be acted on.
    handle_key(&mut app, &api, key(KeyCode::Down));
    handle_key(&mut app, &api, key(KeyCode::Char('x')));
    let cancel = handle_key(&mut app, &api, key(KeyCode::Char('y')));
    assert_eq!(cancel.len(), 1);
    assert!(app.orders.is_busy("pending-2"));

    app.drive(&api, confirm.into_iter().chain(cancel)).await;
    assert!(app.orders.in_progress.is_empty());
    assert_eq!(backend.order("paid-1").unwrap().status, OrderStatus::Confirmed);
    assert_eq!(backend.order("pending-2").unwrap().status, OrderStatus::Cancelled);
    assert_eq!(app.orders.orders[0].status, OrderStatus::Confirmed);
}

#[tokio::test]
async fn leaving_orders_drops_the_hash_prompt() {
    let backend = FakeBackend::start().await.unwrap();
    backend.set_orders(vec![sample_order("paid-1", OrderStatus::Paid)]);
    let (mut app, api) = logged_in(&backend).await;
    press(&mut app, &api, KeyCode::Char('2')).await;
    press(&mut app, &api, KeyCode::Char('t')).await;
    assert!(app.orders.tx_modal.is_some());

    press(&mut app, &api, KeyCode::F(1)).await;
    press(&mut app, &api, KeyCode::F(2)).await;
    assert_eq!(app.route, Route::Orders);
    assert!(app.orders.tx_modal.is_none());
}
