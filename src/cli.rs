// Copyright (c) 2025 Billsync Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("billsync")
        .about("Cache-first bill tracking client: offline-tolerant sync with a remote bills backend plus daily FX rate caching")
        .version(clap::crate_version!())
        .subcommand(
            Command::new("login")
                .about("Log in, warm the FX cache, and sync bills")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("signup")
                .about("Register a new account")
                .arg(Arg::new("username").long("username").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true))
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .default_value("USD")
                        .help("Default currency for all stored amounts"),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the local session (token, profile, caches)"))
        .subcommand(Command::new("sync").about("Refresh bills and FX rates from the server"))
        .subcommand(
            Command::new("bill")
                .about("Create, edit, delete, and list bills")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("subject").long("subject").required(true))
                        .arg(Arg::new("remark").long("remark").default_value(""))
                        .arg(Arg::new("method").long("method").default_value("Cash"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Signed amount; negative = expense, positive = income"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Currency the amount was typed in (default: your default currency)"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").long("id").required(true))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("subject").long("subject"))
                        .arg(Arg::new("remark").long("remark"))
                        .arg(Arg::new("method").long("method"))
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(
                    Command::new("delete").arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
                        .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue)),
                ),
        )
        .subcommand(
            Command::new("fx")
                .about("Inspect and use the cached FX rate table")
                .subcommand(
                    Command::new("show").arg(
                        Arg::new("base")
                            .long("base")
                            .help("Base currency to rebase the table to (default: your default currency)"),
                    ),
                )
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").long("amount").required(true).allow_hyphen_values(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("profile")
                .about("Update account details")
                .subcommand(
                    Command::new("update")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("email").long("email").required(true)),
                )
                .subcommand(
                    Command::new("password")
                        .arg(Arg::new("old").long("old").required(true))
                        .arg(Arg::new("new").long("new").required(true)),
                ),
        )
        .subcommand(
            Command::new("summary")
                .about("Monthly income/expense totals per category, from the local cache")
                .arg(Arg::new("month").required(true).help("YYYY-MM")),
        )
}
