// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::intent::{DeleteTarget, TxData};
use crate::ledger::{ApplyOutcome, DeleteOutcome, Ledger};
use crate::models::{Origin, TxType};
use crate::report;
use crate::store;
use crate::utils::{maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Context, Result, anyhow};
use serde::Serialize;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let outcome = add(ledger, sub)?;
            println!("{}", report::apply_outcome(&outcome));
        }
        Some(("history", sub)) => history(ledger, sub)?,
        Some(("delete", sub)) => {
            let (outcome, term) = delete(ledger, sub)?;
            println!("{}", report::delete_outcome(&outcome, term.as_deref()));
        }
        _ => {}
    }
    Ok(())
}

/// Validates every argument before touching the ledger.
pub fn add(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<ApplyOutcome> {
    let amount = parse_amount(required(sub, "amount")?)?;
    let category = required(sub, "category")?;
    let description = required(sub, "description")?;
    let tx_type = if sub.get_flag("income") {
        TxType::Income
    } else {
        TxType::Expense
    };
    let origin = if sub.get_flag("guided") {
        Origin::Guided
    } else {
        Origin::Manual
    };

    let mut data = TxData::new(amount, tx_type)
        .category(category)
        .description(description);
    if let Some(d) = sub.get_one::<String>("date") {
        data.date = Some(parse_date(d)?);
    }
    if let Some(c) = sub.get_one::<String>("currency") {
        data.currency = Some(c.to_uppercase());
    }
    // an explicit --asset must resolve; only classifier hints may fall through
    if let Some(hint) = sub.get_one::<String>("asset") {
        let asset = store::find_asset_fuzzy(ledger.conn(), hint)?
            .ok_or_else(|| anyhow!("Asset '{}' not found", hint))?;
        data = data.asset_id(asset.id);
    }

    let raw = format!("{} {} {}", amount, category, description);
    let outcome = ledger
        .apply_transaction(&data, origin, &raw)
        .context("Failed to record transaction")?;
    Ok(outcome)
}

#[derive(Serialize)]
pub struct HistoryRow {
    pub id: i64,
    pub timestamp: String,
    pub r#type: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub asset: String,
}

pub fn history_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<HistoryRow>> {
    let limit = sub.get_one::<usize>("limit").copied();
    let txs = ledger.history(limit)?;
    let mut rows = Vec::with_capacity(txs.len());
    for t in txs {
        let asset = match t.asset_id {
            Some(id) => store::asset_by_id(ledger.conn(), id)?
                .map(|a| a.name)
                .unwrap_or_default(),
            None => String::new(),
        };
        rows.push(HistoryRow {
            id: t.id,
            timestamp: crate::db::fmt_ts(&t.timestamp),
            r#type: t.r#type.to_string(),
            amount: format!("{:.2}", t.amount),
            currency: t.currency,
            category: t.category.unwrap_or_default(),
            description: t.description,
            asset,
        });
    }
    Ok(rows)
}

fn history(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = history_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        if data.is_empty() {
            println!("Your transaction history is empty.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.timestamp.clone(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.asset.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Time", "Type", "Amount", "CCY", "Category", "Description", "Asset"],
                rows,
            )
        );
    }
    Ok(())
}

/// Returns the outcome and the search term, if any.
pub fn delete(
    ledger: &mut Ledger,
    sub: &clap::ArgMatches,
) -> Result<(DeleteOutcome, Option<String>)> {
    let target = match sub.get_one::<String>("search") {
        Some(term) if !term.trim().is_empty() => DeleteTarget::Search(term.trim().to_string()),
        Some(_) => return Err(anyhow!("Search term must not be empty")),
        None => DeleteTarget::Last,
    };
    let outcome = ledger.delete(&target)?;
    let term = match target {
        DeleteTarget::Search(t) => Some(t),
        DeleteTarget::Last => None,
    };
    Ok((outcome, term))
}

fn required<'a>(sub: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    sub.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing required argument '{}'", name))
}
