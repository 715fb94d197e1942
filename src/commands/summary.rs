// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::sync::SyncEngine;
use crate::utils::{fmt_money, parse_month, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Buckets the locally cached bills by calendar month and prints net totals
/// per category plus income/expense/net. Amount sign alone decides which
/// side a bill lands on.
pub fn handle(engine: &SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    for bill in engine.bills() {
        let Some(date) = &bill.date else { continue };
        if !date.starts_with(&month) {
            continue;
        }
        let amount = bill.amount.unwrap_or_default();
        if amount.is_sign_negative() {
            expense += -amount;
        } else {
            income += amount;
        }
        *by_category
            .entry(
                bill.category
                    .clone()
                    .unwrap_or_else(|| "uncategorized".to_string()),
            )
            .or_default() += amount;
    }

    let ccy = engine
        .store()
        .user()?
        .and_then(|u| u.default_currency)
        .unwrap_or_else(|| "USD".to_string());

    let rows: Vec<Vec<String>> = by_category
        .iter()
        .map(|(cat, total)| vec![cat.clone(), fmt_money(total, &ccy)])
        .collect();
    println!("{}", pretty_table(&["Category", "Net"], rows));
    println!("Income:  {}", fmt_money(&income, &ccy));
    println!("Expense: {}", fmt_money(&expense, &ccy));
    println!("Net:     {}", fmt_money(&(income - expense), &ccy));
    Ok(())
}
