// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{AssetUpdate, Ledger};
use crate::models::{Asset, AssetKind};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let asset = set(ledger, sub)?;
            println!(
                "{} ({}) balance set to {}",
                asset.name,
                asset.kind,
                fmt_money(&asset.balance, &asset.currency)
            );
        }
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => {
            let name = sub
                .get_one::<String>("name")
                .context("Missing asset name")?;
            let asset = ledger.remove_asset(name)?;
            println!("Removed asset '{}'", asset.name);
        }
        _ => {}
    }
    Ok(())
}

pub fn set(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<Asset> {
    let name = sub
        .get_one::<String>("name")
        .context("Missing asset name")?;
    let raw = sub
        .get_one::<String>("amount")
        .context("Missing amount")?;
    // balances may be zero or negative; only the number must parse
    let balance = raw
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("invalid amount '{}'", raw))?;

    let mut update = AssetUpdate::new(name, balance);
    if let Some(k) = sub.get_one::<String>("kind") {
        update = update.kind(k.parse::<AssetKind>()?);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        update = update.category(c);
    }
    update.currency = sub.get_one::<String>("currency").cloned();
    if let Some(l) = sub.get_one::<String>("credit-limit") {
        update.credit_limit = Some(parse_decimal(l)?);
    }
    update.billing_day = sub.get_one::<u32>("billing-day").copied();

    Ok(ledger.set_asset_balance(&update)?)
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let assets = ledger.list_assets()?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &assets)? {
        return Ok(());
    }
    if assets.is_empty() {
        println!("No assets yet. Add one with `moneymate asset set <name> <amount>`.");
        return Ok(());
    }
    let data: Vec<Vec<String>> = assets
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.kind.to_string(),
                a.category.clone(),
                format!("{:.2}", a.balance),
                a.currency.clone(),
                a.credit_limit.map(|l| format!("{:.2}", l)).unwrap_or_default(),
                a.billing_day.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Name", "Kind", "Category", "Balance", "CCY", "Limit", "Bill Day"],
            data
        )
    );
    let net_worth = ledger.analyzer().net_worth()?;
    println!("Net worth: {:.2}", net_worth);
    Ok(())
}
