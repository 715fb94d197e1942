// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Error;
use crate::fx;
use crate::models::{
    known_category, BillId, BillPatch, NewBill, EXPENDITURE_CATEGORIES, INCOME_CATEGORIES,
};
use crate::sync::{DeleteOutcome, SyncEngine};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::Result;

pub fn sync(engine: &mut SyncEngine) -> Result<()> {
    engine.sync_from_server();
    println!("Synced. {} bills in the local cache.", engine.bills().len());
    Ok(())
}

pub fn handle(engine: &mut SyncEngine, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(engine, sub)?,
        Some(("edit", sub)) => edit(engine, sub)?,
        Some(("delete", sub)) => delete(engine, sub)?,
        Some(("list", sub)) => list(engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn validated_category(raw: &str) -> Result<String> {
    let category = raw.to_lowercase();
    if !known_category(&category) {
        anyhow::bail!(
            "Unknown category '{}'. Expenditure: {}. Income: {}.",
            raw,
            EXPENDITURE_CATEGORIES.join(", "),
            INCOME_CATEGORIES.join(", ")
        );
    }
    Ok(category)
}

fn add(engine: &mut SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let user = engine.store().user()?.ok_or(Error::AuthRequired)?;
    let user_id = user.id.clone().ok_or(Error::AuthRequired)?;

    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let category = validated_category(sub.get_one::<String>("category").unwrap())?;
    let subject = sub.get_one::<String>("subject").unwrap().clone();
    let remark = sub.get_one::<String>("remark").unwrap().clone();
    let method = sub.get_one::<String>("method").unwrap().clone();
    let entered = parse_decimal(sub.get_one::<String>("amount").unwrap())?;

    let default_ccy = user
        .default_currency
        .clone()
        .unwrap_or_else(|| "USD".to_string())
        .to_uppercase();
    let input_ccy = sub
        .get_one::<String>("currency")
        .map(|s| s.to_uppercase())
        .unwrap_or_else(|| default_ccy.clone());

    // Stored amounts are always denominated in the default currency; the
    // typed currency/amount ride along untouched for audit.
    let stored = if input_ccy == default_ccy {
        entered
    } else {
        let rates = engine
            .store()
            .display_rates()?
            .ok_or_else(|| anyhow::anyhow!("No cached FX table; run `billsync sync` first"))?;
        fx::convert(entered, &input_ccy, &default_ccy, &rates).ok_or_else(|| {
            anyhow::anyhow!("No cached rate for {} -> {}", input_ccy, default_ccy)
        })?
    };

    let payload = NewBill {
        user_id,
        date: date.to_string(),
        category,
        subject: subject.clone(),
        remark,
        method,
        amount: stored,
        currency: default_ccy.clone(),
        input_currency: input_ccy,
        input_amount: entered,
    };
    engine.add_bill(&payload)?;
    println!(
        "Recorded '{}' {} on {}",
        subject,
        fmt_money(&stored, &default_ccy),
        date
    );
    Ok(())
}

fn edit(engine: &mut SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let id = BillId::new(sub.get_one::<String>("id").unwrap().clone());

    let mut patch = BillPatch::default();
    if let Some(d) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(d)?.to_string());
    }
    if let Some(c) = sub.get_one::<String>("category") {
        patch.category = Some(validated_category(c)?);
    }
    if let Some(s) = sub.get_one::<String>("subject") {
        patch.subject = Some(s.clone());
    }
    if let Some(r) = sub.get_one::<String>("remark") {
        patch.remark = Some(r.clone());
    }
    if let Some(m) = sub.get_one::<String>("method") {
        patch.method = Some(m.clone());
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(a)?);
    }

    engine.edit_bill(&id, &patch)?;
    println!("Updated bill {}", id);
    Ok(())
}

fn delete(engine: &mut SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let id = BillId::new(sub.get_one::<String>("id").unwrap().clone());
    match engine.delete_bill(&id)? {
        DeleteOutcome::Deleted => println!("Deleted bill {}", id),
        DeleteOutcome::Rejected { error } => println!(
            "Server refused to delete bill {}: {}",
            id,
            error.unwrap_or_else(|| "no reason given".to_string())
        ),
    }
    Ok(())
}

fn list(engine: &SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let bills = engine.bills();
    if !maybe_print_json(json_flag, jsonl_flag, &bills)? {
        let rows: Vec<Vec<String>> = bills
            .iter()
            .map(|b| {
                vec![
                    b.date.clone().unwrap_or_default(),
                    b.subject.clone().unwrap_or_default(),
                    b.category.clone().unwrap_or_default(),
                    b.amount
                        .map(|a| a.round_dp(2).to_string())
                        .unwrap_or_default(),
                    b.currency.clone().unwrap_or_default(),
                    b.method.clone().unwrap_or_default(),
                    b.canonical_id().map(|i| i.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Subject", "Category", "Amount", "Currency", "Method", "ID"],
                rows
            )
        );
    }
    Ok(())
}
