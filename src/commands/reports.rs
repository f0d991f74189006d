// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::report;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Context, Result};

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let as_of = ledger.now();
    let analyzer = ledger.analyzer();
    match m.subcommand() {
        Some(("monthly", sub)) => {
            let summary = analyzer.monthly_summary(as_of)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                println!("{}", report::monthly_summary(&summary));
                println!("Net Worth: {:.2}", analyzer.net_worth()?);
            }
        }
        Some(("weekly", sub)) => {
            let trend = analyzer.weekly_trend(as_of)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &trend)? {
                println!("{}", report::weekly_trend(&trend));
            }
        }
        Some(("assets", sub)) => {
            let summary = analyzer.asset_summary()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                let rows: Vec<Vec<String>> = summary
                    .distribution
                    .iter()
                    .map(|(c, v)| vec![c.clone(), format!("{:.2}", v)])
                    .collect();
                println!("{}", pretty_table(&["Category", "Balance"], rows));
                println!("{}", report::asset_summary(&summary));
                println!("Net Worth: {:.2}", analyzer.net_worth()?);
            }
        }
        Some(("category", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .context("Missing category name")?;
            let total = analyzer.category_spending(name, as_of)?;
            println!("{}", report::category_spending(name, &total));
        }
        _ => {}
    }
    Ok(())
}
