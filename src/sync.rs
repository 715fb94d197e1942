// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::ApiClient;
use crate::error::Result;
use crate::fx::{self, FxCache};
use crate::models::{Bill, BillEnvelope, BillId, BillList, BillPatch, DeleteRequest, EditRequest, NewBill};
use crate::models::Ack;
use crate::store::Store;

/// Result of a delete: the server may explicitly reject the operation, in
/// which case the local collection is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted,
    Rejected { error: Option<String> },
}

/// Sole owner of the session's bill collection.
///
/// Every mutation follows the same strict sequence: remote call, local
/// mutation, persist. The in-memory collection and the persisted cache are
/// therefore never left inconsistent after a completed operation, though
/// both may lag the remote source until the next full sync. There is no
/// mutual exclusion across operations: if a caller interleaves a slow
/// `sync_from_server` with an optimistic mutation, the last write to the
/// collection wins.
pub struct SyncEngine {
    store: Store,
    api: ApiClient,
    fx: FxCache,
    bills: Vec<Bill>,
    loading: bool,
}

impl SyncEngine {
    /// Cold start: publish the cached collection before any network traffic
    /// so callers have data with zero latency. The remote refresh is the
    /// caller's explicit `sync_from_server` call.
    pub fn new(store: Store, api: ApiClient, fx: FxCache) -> Result<Self> {
        let mut engine = SyncEngine {
            store,
            api,
            fx,
            bills: Vec::new(),
            loading: true,
        };
        engine.bills = engine.store.bills()?;
        engine.loading = false;
        Ok(engine)
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn fx(&self) -> &FxCache {
        &self.fx
    }

    /// Best-effort background refresh. Never surfaces an error: every
    /// failure is logged and the previous collection stays in place.
    pub fn sync_from_server(&mut self) {
        if let Err(err) = self.try_sync() {
            log::error!("syncFromServer error: {err}");
        }
    }

    fn try_sync(&mut self) -> Result<()> {
        // Pre-login state is a warned no-op, not an error.
        let Some(user) = self.store.user()? else {
            log::warn!("syncFromServer: no logged-in user found in storage");
            return Ok(());
        };
        let Some(user_id) = user.id.clone() else {
            log::warn!("syncFromServer: stored user has no id");
            return Ok(());
        };

        // Refresh the pivot-based table, then keep a display-ready copy
        // rebased to the user's default currency.
        let raw = self.fx.ensure_rates_up_to_date(&self.store, fx::PIVOT_CURRENCY)?;
        let base = user
            .default_currency
            .clone()
            .unwrap_or_else(|| fx::PIVOT_CURRENCY.to_string())
            .to_uppercase();
        if let Some(normalized) = fx::normalize_rates(&raw, &base) {
            self.store.set_display_rates(&normalized)?;
        }
        // Second freshness pass, specific to the user's own currency.
        self.fx.ensure_rates_up_to_date(&self.store, &base)?;

        let path = format!("/bills.php?userID={}", urlencoding::encode(&user_id));
        let data: BillList = self.api.get(&self.store, &path)?;
        self.bills = data.bills.unwrap_or_default();
        self.store.save_bills(&self.bills)?;
        Ok(())
    }

    /// Creates a bill. A response carrying the created record is prepended
    /// to the collection; an ambiguous success (no record) triggers a full
    /// reconcile instead of guessing the new record's shape.
    pub fn add_bill(&mut self, payload: &NewBill) -> Result<BillEnvelope> {
        let res: BillEnvelope = self.api.post(&self.store, "/addBills.php", payload)?;
        match &res.bill {
            Some(bill) => {
                self.bills.insert(0, bill.clone());
                self.store.save_bills(&self.bills)?;
            }
            None => self.sync_from_server(),
        }
        Ok(res)
    }

    /// Edits a bill. The server's returned record fully replaces the local
    /// entry; when the server stays silent the patch is shallow-merged over
    /// the local copy as a best-effort fallback.
    pub fn edit_bill(&mut self, bills_id: &BillId, patch: &BillPatch) -> Result<()> {
        let req = EditRequest {
            bills_id: bills_id.clone(),
            patch: patch.clone(),
        };
        let res: BillEnvelope = self.api.post(&self.store, "/editBill.php", &req)?;
        if res.bill.is_none() {
            log::warn!("editBill: no bill returned from server; falling back to local merge");
        }
        for entry in &mut self.bills {
            if !entry.matches(bills_id) {
                continue;
            }
            match &res.bill {
                Some(server_bill) => *entry = server_bill.clone(),
                None => entry.apply_patch(patch, bills_id),
            }
        }
        self.store.save_bills(&self.bills)?;
        Ok(())
    }

    /// Deletes a bill. Only an explicit `ok: false` from the server aborts;
    /// an absent acknowledgement counts as success and the entry is removed.
    pub fn delete_bill(&mut self, bills_id: &BillId) -> Result<DeleteOutcome> {
        let req = DeleteRequest {
            bills_id: bills_id.clone(),
        };
        let res: Ack = self.api.post(&self.store, "/deleteBill.php", &req)?;
        if res.ok == Some(false) {
            log::warn!("deleteBill: rejected by server: {:?}", res.error);
            return Ok(DeleteOutcome::Rejected { error: res.error });
        }
        self.bills.retain(|b| !b.matches(bills_id));
        self.store.save_bills(&self.bills)?;
        Ok(DeleteOutcome::Deleted)
    }
}
