// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use billsync::api::ApiClient;
use billsync::error::{Error, Result};
use billsync::fx::{FxCache, FxConfig};
use billsync::http::{HttpReply, HttpTransport};
use billsync::models::{Bill, RateSnapshot, UserProfile};
use billsync::store::{SecretStore, Store};
use billsync::sync::SyncEngine;
use rusqlite::Connection;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// In-memory stand-in for the OS keyring.
pub struct MemorySecrets(RefCell<Option<String>>);

impl MemorySecrets {
    pub fn new() -> Self {
        MemorySecrets(RefCell::new(None))
    }
}

impl SecretStore for MemorySecrets {
    fn get(&self) -> Result<Option<String>> {
        Ok(self.0.borrow().clone())
    }

    fn set(&self, value: &str) -> Result<()> {
        *self.0.borrow_mut() = Some(value.to_string());
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        *self.0.borrow_mut() = None;
        Ok(())
    }
}

pub fn mem_store() -> Store {
    Store::new(
        Connection::open_in_memory().unwrap(),
        Box::new(MemorySecrets::new()),
    )
    .unwrap()
}

#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Scripted transport: replies are popped in order, every call is recorded.
/// An exhausted script answers with a network error.
#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<Result<HttpReply>>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(FakeTransport::default())
    }

    pub fn push_ok(&self, status: u16, body: &str) {
        self.replies.borrow_mut().push_back(Ok(HttpReply {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_err(&self, err: Error) {
        self.replies.borrow_mut().push_back(Err(err));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl HttpTransport for FakeTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&str>,
    ) -> Result<HttpReply> {
        self.calls.borrow_mut().push(Call {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            body: body.map(str::to_string),
        });
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Network("no scripted reply".to_string())))
    }
}

/// Orphan-rule workaround: `HttpTransport` and `Rc` are both foreign here,
/// so a shared handle needs a local newtype to implement the trait.
pub struct SharedTransport(pub Rc<FakeTransport>);

impl HttpTransport for SharedTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&str>,
    ) -> Result<HttpReply> {
        self.0.send(method, url, headers, body)
    }
}

pub fn api_client(transport: &Rc<FakeTransport>) -> ApiClient {
    ApiClient::new("http://api.test", Box::new(SharedTransport(transport.clone())))
}

pub fn fx_cache(transport: &Rc<FakeTransport>) -> FxCache {
    FxCache::new(
        FxConfig {
            endpoint: "http://fx.test".to_string(),
            api_key: "test-key".to_string(),
        },
        Box::new(SharedTransport(transport.clone())),
    )
}

pub struct Harness {
    pub api_transport: Rc<FakeTransport>,
    pub fx_transport: Rc<FakeTransport>,
    pub engine: SyncEngine,
}

/// Engine over a pre-seeded store with independent fake transports for the
/// bills backend and the FX provider.
pub fn engine_over(store: Store) -> Harness {
    let api_transport = FakeTransport::new();
    let fx_transport = FakeTransport::new();
    let engine = SyncEngine::new(
        store,
        api_client(&api_transport),
        fx_cache(&fx_transport),
    )
    .unwrap();
    Harness {
        api_transport,
        fx_transport,
        engine,
    }
}

pub fn bill(id: i64, subject: &str, amount: &str) -> Bill {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "date": "2025-08-01",
        "category": "food",
        "subject": subject,
        "remark": "",
        "method": "Cash",
        "amount": amount,
        "currency": "USD",
    }))
    .unwrap()
}

pub fn user(id: i64, currency: &str) -> UserProfile {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "username": "amy",
        "email": "amy@example.com",
        "defaultCurrency": currency,
    }))
    .unwrap()
}

pub fn snapshot(rates: serde_json::Value) -> RateSnapshot {
    serde_json::from_value(serde_json::json!({
        "result": "success",
        "base_code": "USD",
        "conversion_rates": rates,
    }))
    .unwrap()
}

/// Seeds the FX cache as fresh for today so sync paths skip the provider.
pub fn seed_fresh_fx(store: &Store, rates: serde_json::Value) {
    store.set_fx_snapshot(&snapshot(rates)).unwrap();
    store
        .set_fx_updated_date(&billsync::utils::utc_today())
        .unwrap();
}
