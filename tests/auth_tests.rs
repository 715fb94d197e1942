// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use billsync::auth;
use billsync::error::Error;
use common::{api_client, mem_store, user, FakeTransport};
use serde_json::json;

#[test]
fn login_persists_token_and_profile() {
    let store = mem_store();
    let transport = FakeTransport::new();
    transport.push_ok(
        200,
        &json!({
            "success": true,
            "token": "t0k",
            "user": {"id": 7, "username": "amy", "email": "amy@example.com",
                     "defaultCurrency": "EUR"},
        })
        .to_string(),
    );
    let api = api_client(&transport);

    let profile = auth::login(&store, &api, "amy@example.com ", "pw").unwrap();

    assert_eq!(profile.id.as_deref(), Some("7"));
    assert_eq!(profile.default_currency.as_deref(), Some("EUR"));
    assert_eq!(store.token().unwrap().as_deref(), Some("t0k"));
    assert_eq!(store.user().unwrap(), Some(profile));

    // The email is trimmed before it goes on the wire.
    let sent: serde_json::Value =
        serde_json::from_str(transport.calls()[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(sent["email"], "amy@example.com");
}

#[test]
fn login_rejection_surfaces_server_message() {
    let store = mem_store();
    let transport = FakeTransport::new();
    transport.push_ok(200, &json!({"success": false, "message": "Invalid password"}).to_string());
    let api = api_client(&transport);

    let err = auth::login(&store, &api, "amy@example.com", "pw").unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg == "Invalid password"));
    assert!(store.token().unwrap().is_none());
}

#[test]
fn login_without_token_or_user_is_malformed() {
    let store = mem_store();
    let transport = FakeTransport::new();
    transport.push_ok(200, &json!({"success": true}).to_string());
    let api = api_client(&transport);

    let err = auth::login(&store, &api, "amy@example.com", "pw").unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg == "malformed server response"));
    assert!(store.user().unwrap().is_none());
}

#[test]
fn update_profile_requires_a_stored_user() {
    let store = mem_store();
    let transport = FakeTransport::new();
    let api = api_client(&transport);

    let err = auth::update_profile(&store, &api, "amy", "amy@example.com").unwrap_err();
    assert!(matches!(err, Error::AuthRequired));
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn update_profile_merges_accepted_change_into_store() {
    let store = mem_store();
    store.save_user(&user(7, "EUR")).unwrap();
    let transport = FakeTransport::new();
    transport.push_ok(200, "{}");
    let api = api_client(&transport);

    let updated = auth::update_profile(&store, &api, "amy2", "amy2@example.com").unwrap();

    assert_eq!(updated.username.as_deref(), Some("amy2"));
    assert_eq!(updated.email.as_deref(), Some("amy2@example.com"));
    // Untouched fields survive the merge.
    assert_eq!(updated.default_currency.as_deref(), Some("EUR"));
    assert_eq!(store.user().unwrap(), Some(updated));
}

#[test]
fn update_profile_rejection_leaves_store_untouched() {
    let store = mem_store();
    store.save_user(&user(7, "EUR")).unwrap();
    let transport = FakeTransport::new();
    transport.push_ok(200, &json!({"ok": false, "error": "email taken"}).to_string());
    let api = api_client(&transport);

    let err = auth::update_profile(&store, &api, "amy2", "taken@example.com").unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg == "email taken"));
    assert_eq!(store.user().unwrap(), Some(user(7, "EUR")));
}

#[test]
fn update_password_requires_a_user_id() {
    let store = mem_store();
    let transport = FakeTransport::new();
    let api = api_client(&transport);

    let err = auth::update_password(&store, &api, "old", "new").unwrap_err();
    assert!(matches!(err, Error::AuthRequired));
}

#[test]
fn update_password_rejection_surfaces_either_flag() {
    let store = mem_store();
    store.save_user(&user(7, "EUR")).unwrap();
    let transport = FakeTransport::new();
    transport.push_ok(200, &json!({"success": false, "error": "wrong password"}).to_string());
    transport.push_ok(200, &json!({"ok": false}).to_string());
    let api = api_client(&transport);

    let err = auth::update_password(&store, &api, "old", "new").unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg == "wrong password"));

    let err = auth::update_password(&store, &api, "old", "new").unwrap_err();
    assert!(matches!(err, Error::Server(msg) if msg == "password update failed"));
}

#[test]
fn logout_clears_the_whole_session() {
    let store = mem_store();
    store.set_token("t0k").unwrap();
    store.save_user(&user(7, "EUR")).unwrap();
    store.save_bills(&[common::bill(1, "Lunch", "-5")]).unwrap();
    common::seed_fresh_fx(&store, json!({"USD": 1.0}));

    auth::logout(&store);

    assert!(store.token().unwrap().is_none());
    assert!(store.user().unwrap().is_none());
    assert!(store.bills().unwrap().is_empty());
    assert!(store.fx_snapshot().unwrap().is_none());
    assert!(store.fx_updated_date().unwrap().is_none());
    assert!(store.display_rates().unwrap().is_none());
}
