// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use crate::sync::SyncEngine;
use anyhow::Result;

pub fn login(engine: &mut SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let password = sub.get_one::<String>("password").unwrap();

    let user = auth::login(engine.store(), engine.api(), email, password)?;

    // Warm the FX cache for the user's currency, then pull bills. Neither
    // step may block a successful login.
    let base = user
        .default_currency
        .clone()
        .unwrap_or_else(|| "USD".to_string());
    if let Err(e) = engine.fx().ensure_rates_up_to_date(engine.store(), &base) {
        log::warn!("FX warm-up after login failed: {e}");
    }
    engine.sync_from_server();

    println!(
        "Logged in as {} ({} bills cached)",
        user.username.as_deref().unwrap_or(email),
        engine.bills().len()
    );
    Ok(())
}

pub fn signup(engine: &SyncEngine, sub: &clap::ArgMatches) -> Result<()> {
    let username = sub.get_one::<String>("username").unwrap();
    let email = sub.get_one::<String>("email").unwrap();
    let password = sub.get_one::<String>("password").unwrap();
    let currency = sub.get_one::<String>("currency").unwrap().to_uppercase();

    auth::register(engine.store(), engine.api(), username, email, password, &currency)?;
    println!("Registration successful. You can now log in.");
    Ok(())
}

pub fn logout(engine: &SyncEngine) {
    auth::logout(engine.store());
    println!("Logged out.");
}
