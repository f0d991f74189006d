// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

// amounts stay strings here so a bad value reports "invalid amount"
fn amount_arg(name: &'static str) -> Arg {
    Arg::new(name).required(true).allow_negative_numbers(true)
}

pub fn build_cli() -> Command {
    Command::new("moneymate")
        .about("Personal bookkeeping: transactions, asset balances, budgets and reports")
        .version(clap::crate_version!())
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_parser(value_parser!(std::path::PathBuf))
                .help("Database file (default: MONEYMATE_DB or the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("More log output (-v info, -vv debug)"),
        )
        .subcommand(Command::new("init").about("Create the database if needed"))
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(amount_arg("amount"))
                        .arg(Arg::new("category").required(true))
                        .arg(Arg::new("description").required(true))
                        .arg(
                            Arg::new("asset")
                                .long("asset")
                                .help("Asset to link (substring match)"),
                        )
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as INCOME instead of EXPENSE"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(
                            Arg::new("guided")
                                .long("guided")
                                .action(ArgAction::SetTrue)
                                .help("Tag as entered through a guided flow"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("history").about("Most recent transactions").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("10"),
                    ),
                ))
                .subcommand(
                    Command::new("delete")
                        .about("Delete a transaction and undo its balance effect")
                        .arg(
                            Arg::new("last")
                                .long("last")
                                .action(ArgAction::SetTrue)
                                .help("The most recently recorded transaction"),
                        )
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Single transaction whose description contains this"),
                        )
                        .group(
                            ArgGroup::new("target")
                                .args(["last", "search"])
                                .required(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage asset balances")
                .subcommand(
                    Command::new("set")
                        .about("Set an asset's balance, creating it if needed")
                        .arg(Arg::new("name").required(true))
                        .arg(amount_arg("amount"))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .value_parser(["liquid", "credit", "investment", "other"])
                                .ignore_case(true),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("credit-limit").long("credit-limit"))
                        .arg(
                            Arg::new("billing-day")
                                .long("billing-day")
                                .value_parser(value_parser!(u32).range(1..=31)),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List assets")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove an asset; its transactions stay, unlinked")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("transfer")
                .about("Move money between two assets")
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .arg(amount_arg("amount")),
        )
        .subcommand(
            Command::new("export")
                .about("Export all transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("budget")
                .about("Monthly category budgets")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("category").required(true))
                        .arg(amount_arg("limit"))
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .help("Alert fraction, default 0.8"),
                        )
                        .arg(Arg::new("currency").long("currency")),
                )
                .subcommand(json_flags(
                    Command::new("status").about("Spending against each budget this month"),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Summaries")
                .subcommand(json_flags(Command::new("monthly").about("This month so far")))
                .subcommand(json_flags(
                    Command::new("weekly").about("Last 7 days against the 7 before"),
                ))
                .subcommand(json_flags(Command::new("assets").about("Balances by category")))
                .subcommand(
                    Command::new("category")
                        .about("This month's spending in one category")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("ask")
                .about("Free-form input through the classifier")
                .arg(Arg::new("text").required(true).num_args(1..))
                .arg(
                    Arg::new("image")
                        .long("image")
                        .value_parser(value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            Command::new("intent")
                .about("Apply a saved classifier reply")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(std::path::PathBuf)),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .help("Original message, kept as the transaction's raw text"),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency")
                        .about("Default currency for input that names none")
                        .arg(Arg::new("currency").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Consistency checks"))
}
