// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::models::{Bill, RateSnapshot, RateTable, UserProfile};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.billsync", "Billsync", "billsync"));

// Persisted cache keys. The token lives in the confidential store, never in
// the kv table.
pub const TOKEN_KEY: &str = "auth_token";
const BILLS_KEY: &str = "bills_cache";
const USER_KEY: &str = "user_profile";
const RATES_KEY: &str = "currency_rates_json";
const RATES_DATE_KEY: &str = "currency_updated_utc";
const DISPLAY_RATES_KEY: &str = "display_rates_json";

/// Confidentiality-protected storage for the auth token.
pub trait SecretStore {
    fn get(&self) -> Result<Option<String>>;
    fn set(&self, value: &str) -> Result<()>;
    fn delete(&self) -> Result<()>;
}

/// Production secret store backed by the operating system keyring.
pub struct KeyringSecrets {
    service: String,
}

impl KeyringSecrets {
    pub fn new() -> Self {
        KeyringSecrets {
            service: APP.2.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, TOKEN_KEY).map_err(Error::from)
    }
}

impl Default for KeyringSecrets {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretStore for KeyringSecrets {
    fn get(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<()> {
        self.entry()?.set_password(value).map_err(Error::from)
    }

    fn delete(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

pub fn store_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .ok_or_else(|| Error::Config("could not determine platform data dir".into()))?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("billsync.sqlite"))
}

/// Persistent key-value store for the session caches: bill list snapshot,
/// user profile, FX snapshot and its UTC date stamp, and the display-ready
/// normalized rate table. The auth token is delegated to the `SecretStore`.
pub struct Store {
    conn: Connection,
    secrets: Box<dyn SecretStore>,
}

impl Store {
    pub fn open_default() -> Result<Store> {
        Store::open_at(&store_path()?)
    }

    pub fn open_at(path: &Path) -> Result<Store> {
        let conn = Connection::open(path)?;
        Store::new(conn, Box::new(KeyringSecrets::new()))
    }

    pub fn new(conn: Connection, secrets: Box<dyn SecretStore>) -> Result<Store> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv(
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(Store { conn, secrets })
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let v = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_raw(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }

    // auth token

    pub fn token(&self) -> Result<Option<String>> {
        self.secrets.get()
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        self.secrets.set(token)
    }

    pub fn clear_token(&self) -> Result<()> {
        self.secrets.delete()
    }

    // user profile

    pub fn user(&self) -> Result<Option<UserProfile>> {
        match self.get_raw(USER_KEY)? {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    pub fn save_user(&self, user: &UserProfile) -> Result<()> {
        self.set_raw(USER_KEY, &serde_json::to_string(user)?)
    }

    pub fn clear_user(&self) -> Result<()> {
        self.delete_raw(USER_KEY)
    }

    // bill collection snapshot

    /// Missing cache reads as an empty collection.
    pub fn bills(&self) -> Result<Vec<Bill>> {
        match self.get_raw(BILLS_KEY)? {
            Some(s) => Ok(serde_json::from_str(&s)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_bills(&self, bills: &[Bill]) -> Result<()> {
        self.set_raw(BILLS_KEY, &serde_json::to_string(bills)?)
    }

    // FX cache

    pub fn fx_snapshot(&self) -> Result<Option<RateSnapshot>> {
        match self.get_raw(RATES_KEY)? {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    pub fn set_fx_snapshot(&self, snapshot: &RateSnapshot) -> Result<()> {
        self.set_raw(RATES_KEY, &serde_json::to_string(snapshot)?)
    }

    pub fn fx_updated_date(&self) -> Result<Option<String>> {
        self.get_raw(RATES_DATE_KEY)
    }

    pub fn set_fx_updated_date(&self, yyyy_mm_dd: &str) -> Result<()> {
        self.set_raw(RATES_DATE_KEY, yyyy_mm_dd)
    }

    /// Display-ready table rebased to the user's default currency. Kept under
    /// its own key so it never clobbers the raw snapshot freshness check.
    pub fn display_rates(&self) -> Result<Option<RateTable>> {
        match self.get_raw(DISPLAY_RATES_KEY)? {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    pub fn set_display_rates(&self, rates: &RateTable) -> Result<()> {
        self.set_raw(DISPLAY_RATES_KEY, &serde_json::to_string(rates)?)
    }

    pub fn clear_fx_cache(&self) -> Result<()> {
        self.delete_raw(RATES_KEY)?;
        self.delete_raw(RATES_DATE_KEY)?;
        self.delete_raw(DISPLAY_RATES_KEY)
    }

    /// Logout path: drops the token, the profile, and the FX cache, and
    /// resets the bill cache to an empty list. Storage failures are logged,
    /// never propagated; logout must not be blockable.
    pub fn clear_all(&self) {
        if let Err(e) = self.try_clear_all() {
            log::error!("failed to clear local storage: {e}");
        }
    }

    fn try_clear_all(&self) -> Result<()> {
        self.clear_token()?;
        self.clear_user()?;
        self.save_bills(&[])?;
        self.clear_fx_cache()
    }
}
