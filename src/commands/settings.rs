// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{self, Config};
use crate::utils::pretty_table;
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(cfg),
        Some(("set-currency", sub)) => {
            let ccy = sub
                .get_one::<String>("currency")
                .context("Missing currency")?
                .trim()
                .to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency '{}', expected a 3-letter code", ccy);
            }
            config::set_base_currency(conn, &ccy)?;
            println!("Default currency set to {}", ccy);
            if std::env::var_os("MONEYMATE_CURRENCY").is_some() {
                println!("Note: MONEYMATE_CURRENCY is set and takes precedence");
            }
        }
        _ => show(cfg),
    }
    Ok(())
}

fn show(cfg: &Config) {
    let db = cfg
        .db_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(in memory)".to_string());
    let (url, timeout) = match &cfg.classifier {
        Some(c) => (c.url.clone(), format!("{}s", c.timeout.as_secs())),
        None => ("(not configured)".to_string(), "-".to_string()),
    };
    let rows = vec![
        vec!["default_currency".to_string(), cfg.default_currency.clone()],
        vec!["database".to_string(), db],
        vec!["classifier_url".to_string(), url],
        vec!["classifier_timeout".to_string(), timeout],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
}
