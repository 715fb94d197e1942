// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};

const UA: &str = concat!(
    "billsync/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/billsync/billsync)"
);

#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single-attempt HTTP seam. Every call is one request; retries, backoff,
/// timeouts, and cancellation are not part of this layer's contract.
pub trait HttpTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&str>,
    ) -> Result<HttpReply>;
}

pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        // No timeout on purpose: nothing in this layer configures one.
        let client = reqwest::blocking::Client::builder()
            .user_agent(UA)
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        method: &str,
        url: &str,
        headers: &[(&str, String)],
        body: Option<&str>,
    ) -> Result<HttpReply> {
        let method = reqwest::Method::from_bytes(method.as_bytes())
            .map_err(|_| Error::Network(format!("invalid HTTP method '{method}'")))?;
        let mut req = self.client.request(method, url);
        for (name, value) in headers {
            req = req.header(*name, value);
        }
        if let Some(b) = body {
            req = req.body(b.to_string());
        }
        let res = req.send()?;
        let status = res.status().as_u16();
        let body = res.text()?;
        Ok(HttpReply { status, body })
    }
}
