// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::report;
use crate::utils::{maybe_print_json, parse_decimal};
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ledger, sub)?,
        Some(("status", sub)) => status(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let category = sub
        .get_one::<String>("category")
        .context("Missing category")?;
    let raw = sub.get_one::<String>("limit").context("Missing limit")?;
    let limit = raw
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("invalid amount '{}'", raw))?;
    if limit < Decimal::ZERO {
        bail!("invalid amount '{}': a budget limit cannot be negative", raw);
    }
    let threshold = sub
        .get_one::<String>("threshold")
        .map(|s| parse_decimal(s))
        .transpose()?;
    let currency = sub.get_one::<String>("currency").map(String::as_str);

    let b = ledger.set_budget(category, limit, threshold, currency)?;
    println!(
        "Budget set for {} = {:.2} {} (alert at {}%)",
        b.category,
        b.limit_amount,
        b.currency,
        (b.alert_threshold * Decimal::ONE_HUNDRED).normalize()
    );
    Ok(())
}

fn status(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let lines = ledger.analyzer().budget_status(ledger.now())?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &lines)? {
        println!("{}", report::budget_status(&lines));
    }
    Ok(())
}
