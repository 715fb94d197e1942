// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_BASE_URL: &str = "http://dcs5604.com/ngjiale";

fn excerpt(body: &str) -> String {
    body.chars().take(200).collect()
}

/// Authenticated JSON client for the bills backend. One attempt per call,
/// no retries; normalizes transport, status, and body-shape failures into
/// the crate error taxonomy.
pub struct ApiClient {
    base_url: String,
    transport: Box<dyn HttpTransport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Box<dyn HttpTransport>) -> Self {
        ApiClient {
            base_url: base_url.into(),
            transport,
        }
    }

    /// Base URL from `BILLSYNC_API_URL`, falling back to the stock backend.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("BILLSYNC_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(ApiClient::new(base_url, Box::new(ReqwestTransport::new()?)))
    }

    /// Issues one JSON request. Attaches `Authorization: Bearer <token>`
    /// when the store holds a token. An empty successful body deserializes
    /// as `{}`; a non-JSON body is reported with a truncated excerpt; a
    /// non-2xx status carries the body's `error` or `message` field when
    /// present.
    pub fn request<T: DeserializeOwned>(
        &self,
        store: &Store,
        method: &str,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let mut headers: Vec<(&str, String)> =
            vec![("Content-Type", "application/json".to_string())];
        if let Some(token) = store.token()? {
            headers.push(("Authorization", format!("Bearer {token}")));
        }

        let url = format!("{}{}", self.base_url, path);
        let body_text = body.map(|v| v.to_string());
        let reply = self
            .transport
            .send(method, &url, &headers, body_text.as_deref())?;

        let json: Value = if reply.body.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str(&reply.body) {
                Ok(v) => v,
                Err(_) => {
                    return Err(Error::MalformedResponse {
                        status: reply.status,
                        excerpt: excerpt(&reply.body),
                    });
                }
            }
        };

        if !reply.is_success() {
            let message = json
                .get("error")
                .and_then(Value::as_str)
                .or_else(|| json.get("message").and_then(Value::as_str))
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", reply.status));
            return Err(Error::Http {
                status: reply.status,
                message,
            });
        }

        Ok(serde_json::from_value(json)?)
    }

    pub fn get<T: DeserializeOwned>(&self, store: &Store, path: &str) -> Result<T> {
        self.request(store, "GET", path, None)
    }

    pub fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        store: &Store,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.request(store, "POST", path, Some(&body))
    }
}
