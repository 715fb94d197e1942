// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth;
use crate::sync::SyncEngine;
use anyhow::Result;

pub fn handle(engine: &SyncEngine, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("update", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            let email = sub.get_one::<String>("email").unwrap();
            let user = auth::update_profile(engine.store(), engine.api(), username, email)?;
            println!(
                "Profile updated for {}",
                user.username.as_deref().unwrap_or(username)
            );
        }
        Some(("password", sub)) => {
            let old = sub.get_one::<String>("old").unwrap();
            let new = sub.get_one::<String>("new").unwrap();
            auth::update_password(engine.store(), engine.api(), old, new)?;
            println!("Password updated.");
        }
        _ => {}
    }
    Ok(())
}
