// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Fixed category taxonomy. `Bill::category` is a key into one of these.
pub const EXPENDITURE_CATEGORIES: [&str; 6] =
    ["food", "shopping", "phone", "game", "snack", "daily"];
pub const INCOME_CATEGORIES: [&str; 5] =
    ["salary", "bonus", "investment", "financial", "part-time"];
pub const PAYMENT_METHODS: [&str; 3] = ["Cash", "Debit/Visa Card", "Bank"];

pub fn known_category(id: &str) -> bool {
    EXPENDITURE_CATEGORIES.contains(&id) || INCOME_CATEGORIES.contains(&id)
}

/// Canonical bill identity. The backend emits it as `id` on full records and
/// `billsID` on partial/edit payloads, sometimes as a JSON number and
/// sometimes as a string; this type absorbs both spellings at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BillId(pub String);

impl BillId {
    pub fn new(id: impl Into<String>) -> Self {
        BillId(id.into())
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BillId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BillId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => Ok(BillId(s)),
            serde_json::Value::Number(n) => Ok(BillId(n.to_string())),
            other => Err(D::Error::custom(format!(
                "expected string or number id, got {other}"
            ))),
        }
    }
}

/// Accepts a string or a number and yields the string form. PHP backends are
/// not consistent about identifier types.
fn de_opt_flexible_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// A single income or expense record. The sign of `amount` is the sole
/// discriminator between the two: negative is expense, positive is income.
/// `amount` is denominated in the user's default currency; `input_currency`
/// and `input_amount` retain what the user originally typed for display and
/// audit and never participate in totals.
///
/// Every field is optional because the backend returns partial shapes on
/// some paths; unknown fields are kept in `extra` so a cached bill
/// round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BillId>,
    #[serde(rename = "billsID", default, skip_serializing_if = "Option::is_none")]
    pub bills_id: Option<BillId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_amount: Option<Decimal>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Bill {
    /// Resolves the `id`/`billsID` alias pair: `id` wins when both are set.
    pub fn canonical_id(&self) -> Option<&BillId> {
        self.id.as_ref().or(self.bills_id.as_ref())
    }

    /// The single alias-aware identity comparison used everywhere.
    pub fn matches(&self, id: &BillId) -> bool {
        self.canonical_id() == Some(id)
    }

    /// Shallow-merges `patch` over this record, keeping the identity fields
    /// consistent: `billsID` becomes `target`, `id` is preserved when already
    /// present. Used only on the edit fallback path when the server returned
    /// no authoritative record.
    pub fn apply_patch(&mut self, patch: &BillPatch, target: &BillId) {
        if let Some(v) = &patch.date {
            self.date = Some(v.clone());
        }
        if let Some(v) = &patch.category {
            self.category = Some(v.clone());
        }
        if let Some(v) = &patch.subject {
            self.subject = Some(v.clone());
        }
        if let Some(v) = &patch.remark {
            self.remark = Some(v.clone());
        }
        if let Some(v) = &patch.method {
            self.method = Some(v.clone());
        }
        if let Some(v) = patch.amount {
            self.amount = Some(v);
        }
        if let Some(v) = &patch.currency {
            self.currency = Some(v.clone());
        }
        if let Some(v) = &patch.input_currency {
            self.input_currency = Some(v.clone());
        }
        if let Some(v) = patch.input_amount {
            self.input_amount = Some(v);
        }
        self.bills_id = Some(target.clone());
        if self.id.is_none() {
            self.id = Some(target.clone());
        }
    }
}

/// Create payload for `/addBills.php`. The server assigns the id.
#[derive(Debug, Clone, Serialize)]
pub struct NewBill {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub date: String,
    pub category: String,
    pub subject: String,
    pub remark: String,
    pub method: String,
    pub amount: Decimal,
    pub currency: String,
    pub input_currency: String,
    pub input_amount: Decimal,
}

/// Partial update for `/editBill.php`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_amount: Option<Decimal>,
}

/// Wire shape of an edit request: `{ billsID, ...patch }`.
#[derive(Debug, Clone, Serialize)]
pub struct EditRequest {
    #[serde(rename = "billsID")]
    pub bills_id: BillId,
    #[serde(flatten)]
    pub patch: BillPatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRequest {
    #[serde(rename = "billsID")]
    pub bills_id: BillId,
}

/// `GET /bills.php` response. A missing `bills` array means an empty list,
/// not an error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillList {
    pub bills: Option<Vec<Bill>>,
}

/// Add/edit response. The `bill` record is optional; its absence is an
/// ambiguous success that callers reconcile rather than guess about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillEnvelope {
    pub bill: Option<Bill>,
}

/// Generic acknowledgement body. Absent flags count as success.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ack {
    pub ok: Option<bool>,
    pub success: Option<bool>,
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    pub success: Option<bool>,
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// The logged-in user. `id` is required for every authenticated operation;
/// `default_currency` denominates all stored bill amounts and is the FX base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "de_opt_flexible_string")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "defaultCurrency",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_currency: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Flat code -> rate table. Values are "units of code per one unit of the
/// table's base currency".
pub type RateTable = BTreeMap<String, f64>;

/// Raw FX provider response, persisted verbatim as the cache record.
/// `conversion_rates` is keyed on the provider's fixed reference currency;
/// rebasing to another currency happens in `fx::normalize_rates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_rates: Option<RateTable>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_last_update_utc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
