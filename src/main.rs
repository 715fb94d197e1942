// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use billsync::{api, cli, commands, fx, store, sync};

fn main() -> Result<()> {
    env_logger::init();

    let matches = cli::build_cli().get_matches();

    let store = store::Store::open_default()?;
    let api = api::ApiClient::from_env()?;
    let fx = fx::FxCache::from_env()?;
    let mut engine = sync::SyncEngine::new(store, api, fx)?;

    match matches.subcommand() {
        Some(("login", sub)) => commands::auth::login(&mut engine, sub)?,
        Some(("signup", sub)) => commands::auth::signup(&engine, sub)?,
        Some(("logout", _)) => commands::auth::logout(&engine),
        Some(("sync", _)) => commands::bills::sync(&mut engine)?,
        Some(("bill", sub)) => commands::bills::handle(&mut engine, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&engine, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&engine, sub)?,
        Some(("summary", sub)) => commands::summary::handle(&engine, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
