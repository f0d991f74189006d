// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{Ledger, TransferOutcome};
use crate::models::Origin;
use crate::report;
use crate::utils::parse_amount;
use anyhow::{Context, Result};

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    let outcome = run(ledger, m)?;
    println!("{}", report::transfer_outcome(&outcome));
    Ok(())
}

pub fn run(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<TransferOutcome> {
    let from = m.get_one::<String>("from").context("Missing source asset")?;
    let to = m.get_one::<String>("to").context("Missing destination asset")?;
    let amount = parse_amount(m.get_one::<String>("amount").context("Missing amount")?)?;
    let outcome = ledger
        .transfer(from, to, amount, Origin::Manual)
        .with_context(|| format!("Transfer {} -> {} failed", from, to))?;
    Ok(outcome)
}
