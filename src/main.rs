// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use moneymate::config::Config;
use moneymate::ledger::Ledger;
use moneymate::{cli, commands, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match matches.get_count("verbose") {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            _ => EnvFilter::new("debug"),
        }
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();

    let db_path = match matches.get_one::<PathBuf>("db") {
        Some(p) => p.clone(),
        None => Config::db_path_from_env()?,
    };
    let conn = db::open_or_init(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    let config = Config::load(&conn, db_path.clone())?;
    let mut ledger = Ledger::new(conn, config);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db_path.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("asset", sub)) => commands::assets::handle(&mut ledger, sub)?,
        Some(("transfer", sub)) => commands::transfer::handle(&mut ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(ledger.conn(), sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("ask", sub)) => commands::ask::handle(&mut ledger, sub)?,
        Some(("intent", sub)) => commands::ask::handle_saved(&mut ledger, sub)?,
        Some(("config", sub)) => commands::settings::handle(ledger.conn(), ledger.config(), sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&ledger)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
