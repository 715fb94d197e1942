// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::fx;
use crate::sync::SyncEngine;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::{anyhow, Result};

pub fn handle(engine: &SyncEngine, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(engine, sub)?,
        Some(("convert", sub)) => convert(engine, sub)?,
        _ => {}
    }
    Ok(())
}

fn default_base(engine: &SyncEngine) -> Result<String> {
    Ok(engine
        .store()
        .user()?
        .and_then(|u| u.default_currency)
        .unwrap_or_else(|| fx::PIVOT_CURRENCY.to_string())
        .to_uppercase())
}

fn show(engine: &SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let base = match sub.get_one::<String>("base") {
        Some(b) => b.to_uppercase(),
        None => default_base(engine)?,
    };
    let snapshot = engine
        .fx()
        .ensure_rates_up_to_date(engine.store(), fx::PIVOT_CURRENCY)?;
    let rates = fx::normalize_rates(&snapshot, &base)
        .ok_or_else(|| anyhow!("no rates available for base {base}"))?;

    let rows: Vec<Vec<String>> = rates
        .iter()
        .map(|(code, rate)| vec![code.clone(), format!("{rate:.6}")])
        .collect();
    let header = format!("Per 1 {base}");
    println!("{}", pretty_table(&["Code", header.as_str()], rows));
    Ok(())
}

fn convert(engine: &SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().to_uppercase();
    let to = sub.get_one::<String>("to").unwrap().to_uppercase();

    let snapshot = engine
        .fx()
        .ensure_rates_up_to_date(engine.store(), fx::PIVOT_CURRENCY)?;
    let rates = fx::normalize_rates(&snapshot, fx::PIVOT_CURRENCY)
        .ok_or_else(|| anyhow!("no rate table available"))?;
    let converted = fx::convert(amount, &from, &to, &rates)
        .ok_or_else(|| anyhow!("missing rate for {from} or {to}"))?;

    println!("{} {} -> {} {}", amount, from, converted.round_dp(4), to);
    Ok(())
}
