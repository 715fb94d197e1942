// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::http::{HttpTransport, ReqwestTransport};
use crate::models::{RateSnapshot, RateTable};
use crate::store::Store;
use crate::utils::{provider_header_date, utc_today};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

/// Intermediate reference currency used to rebase provider tables.
pub const PIVOT_CURRENCY: &str = "USD";

const DEFAULT_ENDPOINT: &str = "https://v6.exchangerate-api.com/v6";

#[derive(Debug, Clone)]
pub struct FxConfig {
    pub endpoint: String,
    pub api_key: String,
}

impl FxConfig {
    pub fn from_env() -> Self {
        FxConfig {
            endpoint: std::env::var("BILLSYNC_FX_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            api_key: std::env::var("BILLSYNC_FX_API_KEY").unwrap_or_default(),
        }
    }
}

/// Keeps the cached provider table at most one UTC calendar day stale and
/// degrades to the stale table on any fetch failure. The provider only
/// updates once per day, so freshness is a date comparison, not an elapsed
/// time; the only failure that surfaces is a first-ever fetch with no cache.
pub struct FxCache {
    config: FxConfig,
    transport: Box<dyn HttpTransport>,
}

impl FxCache {
    pub fn new(config: FxConfig, transport: Box<dyn HttpTransport>) -> Self {
        FxCache { config, transport }
    }

    pub fn from_env() -> Result<Self> {
        Ok(FxCache::new(
            FxConfig::from_env(),
            Box::new(ReqwestTransport::new()?),
        ))
    }

    /// Returns a provider snapshot for `base_code` that is fresh for today's
    /// UTC date, fetching at most once per day. Any failure after the cache
    /// was ever populated falls back to the cached snapshot.
    pub fn ensure_rates_up_to_date(&self, store: &Store, base_code: &str) -> Result<RateSnapshot> {
        let today = utc_today();
        let cached_date = store.fx_updated_date()?;
        let cached = store.fx_snapshot()?;

        // Fast path: today's table is already on disk.
        if cached_date.as_deref() == Some(today.as_str()) {
            if let Some(snapshot) = &cached {
                if snapshot.conversion_rates.is_some() {
                    return Ok(snapshot.clone());
                }
            }
        }

        let base = if base_code.is_empty() {
            PIVOT_CURRENCY.to_string()
        } else {
            base_code.to_uppercase()
        };
        let url = format!(
            "{}/{}/latest/{}",
            self.config.endpoint,
            self.config.api_key,
            urlencoding::encode(&base)
        );

        let reply = match self.transport.send("GET", &url, &[], None) {
            Ok(reply) => reply,
            Err(err) => {
                return match cached {
                    Some(snapshot) => {
                        log::warn!("FX fetch failed, serving stale cached rates: {err}");
                        Ok(snapshot)
                    }
                    None => Err(err),
                };
            }
        };

        let snapshot: RateSnapshot = match serde_json::from_str(&reply.body) {
            Ok(snapshot) => snapshot,
            Err(_) => {
                return match cached {
                    Some(snapshot) => Ok(snapshot),
                    None => Err(Error::MalformedResponse {
                        status: reply.status,
                        excerpt: reply.body.chars().take(200).collect(),
                    }),
                };
            }
        };

        if !reply.is_success() || snapshot.result.as_deref() != Some("success") {
            if let Some(snapshot) = cached {
                return Ok(snapshot);
            }
            return Err(match snapshot.error_type.as_deref() {
                Some("invalid-key") => Error::InvalidApiKey,
                Some("quota-reached") => Error::QuotaReached,
                Some(other) => Error::Provider(other.to_string()),
                None => Error::Http {
                    status: reply.status,
                    message: format!("FX HTTP {}", reply.status),
                },
            });
        }

        // Stamp with the provider's own "last updated" day when it parses,
        // else with today's computed stamp.
        let stamp = snapshot
            .time_last_update_utc
            .as_deref()
            .and_then(provider_header_date)
            .unwrap_or(today);
        store.set_fx_snapshot(&snapshot)?;
        store.set_fx_updated_date(&stamp)?;
        Ok(snapshot)
    }
}

/// Rebases a raw provider table to `base_code`: every entry is divided by
/// the reference entry for `base_code` and the base itself is pinned to
/// exactly 1. `None` when the snapshot has no rate section or no entry for
/// the base.
pub fn normalize_rates(snapshot: &RateSnapshot, base_code: &str) -> Option<RateTable> {
    let table = snapshot.conversion_rates.as_ref()?;
    let reference = *table.get(base_code)?;
    let mut rates: RateTable = table
        .iter()
        .map(|(code, value)| (code.clone(), value / reference))
        .collect();
    rates.insert(base_code.to_string(), 1.0);
    Some(rates)
}

/// Converts across two currencies quoted in the same table:
/// `amount * rate[to] / rate[from]`. `None` when a rate is missing or zero.
pub fn convert(amount: Decimal, from: &str, to: &str, rates: &RateTable) -> Option<Decimal> {
    if from == to {
        return Some(amount);
    }
    let rate_from = *rates.get(from)?;
    let rate_to = *rates.get(to)?;
    if rate_from == 0.0 {
        return None;
    }
    let factor = Decimal::from_f64(rate_to / rate_from)?;
    Some(amount * factor)
}
