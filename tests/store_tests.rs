// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use billsync::models::Bill;
use billsync::store::Store;
use common::{bill, mem_store, user, MemorySecrets};
use rusqlite::Connection;
use serde_json::json;

#[test]
fn missing_bill_cache_reads_as_empty_collection() {
    let store = mem_store();
    assert!(store.bills().unwrap().is_empty());
}

#[test]
fn bill_collection_round_trips_including_unknown_fields() {
    let store = mem_store();
    let mut odd: Bill = serde_json::from_value(json!({
        "billsID": 3,
        "subject": "Lunch",
        "amount": "-5.25",
        "server_only_flag": true,
    }))
    .unwrap();
    odd.remark = Some("kept".to_string());

    let bills = vec![bill(1, "Salary", "900"), odd];
    store.save_bills(&bills).unwrap();

    let back = store.bills().unwrap();
    assert_eq!(back, bills);
    assert_eq!(back[1].extra["server_only_flag"], json!(true));
}

#[test]
fn user_profile_round_trips() {
    let store = mem_store();
    assert!(store.user().unwrap().is_none());

    let amy = user(7, "EUR");
    store.save_user(&amy).unwrap();
    assert_eq!(store.user().unwrap(), Some(amy));

    store.clear_user().unwrap();
    assert!(store.user().unwrap().is_none());
}

#[test]
fn token_lives_in_the_secret_store() {
    let store = mem_store();
    assert!(store.token().unwrap().is_none());

    store.set_token("t0k").unwrap();
    assert_eq!(store.token().unwrap().as_deref(), Some("t0k"));

    store.clear_token().unwrap();
    assert!(store.token().unwrap().is_none());
}

#[test]
fn fx_snapshot_and_stamp_round_trip() {
    let store = mem_store();
    assert!(store.fx_snapshot().unwrap().is_none());
    assert!(store.fx_updated_date().unwrap().is_none());

    let snap = common::snapshot(json!({"USD": 1.0, "EUR": 0.9}));
    store.set_fx_snapshot(&snap).unwrap();
    store.set_fx_updated_date("2025-08-23").unwrap();

    assert_eq!(store.fx_snapshot().unwrap(), Some(snap));
    assert_eq!(store.fx_updated_date().unwrap().as_deref(), Some("2025-08-23"));

    store.clear_fx_cache().unwrap();
    assert!(store.fx_snapshot().unwrap().is_none());
    assert!(store.fx_updated_date().unwrap().is_none());
}

#[test]
fn display_rates_do_not_clobber_the_raw_snapshot() {
    let store = mem_store();
    let snap = common::snapshot(json!({"USD": 1.0, "EUR": 0.9}));
    store.set_fx_snapshot(&snap).unwrap();

    let mut display = billsync::models::RateTable::new();
    display.insert("EUR".to_string(), 1.0);
    display.insert("USD".to_string(), 1.0 / 0.9);
    store.set_display_rates(&display).unwrap();

    assert_eq!(store.fx_snapshot().unwrap(), Some(snap));
    assert_eq!(store.display_rates().unwrap(), Some(display));
}

#[test]
fn values_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("billsync.sqlite");

    {
        let store = Store::new(
            Connection::open(&path).unwrap(),
            Box::new(MemorySecrets::new()),
        )
        .unwrap();
        store.save_bills(&[bill(1, "Lunch", "-5")]).unwrap();
        store.save_user(&user(7, "EUR")).unwrap();
    }

    let store = Store::new(
        Connection::open(&path).unwrap(),
        Box::new(MemorySecrets::new()),
    )
    .unwrap();
    assert_eq!(store.bills().unwrap().len(), 1);
    assert_eq!(store.user().unwrap(), Some(user(7, "EUR")));
}

#[test]
fn clear_all_resets_the_session() {
    let store = mem_store();
    store.set_token("t0k").unwrap();
    store.save_user(&user(7, "EUR")).unwrap();
    store.save_bills(&[bill(1, "Lunch", "-5")]).unwrap();
    common::seed_fresh_fx(&store, json!({"USD": 1.0}));

    store.clear_all();

    assert!(store.token().unwrap().is_none());
    assert!(store.user().unwrap().is_none());
    assert!(store.bills().unwrap().is_empty());
    assert!(store.fx_snapshot().unwrap().is_none());
    assert!(store.fx_updated_date().unwrap().is_none());
    assert!(store.display_rates().unwrap().is_none());
}
