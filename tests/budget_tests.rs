// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneymate::commands::budgets;
use moneymate::config::Config;
use moneymate::ledger::Ledger;
use moneymate::{cli, db};
use rust_decimal::Decimal;

fn setup() -> Ledger {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("EUR"));
    l.pin_clock(
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    );
    l
}

fn run(l: &mut Ledger, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args.iter().copied());
    match matches.subcommand() {
        Some(("budget", budget_m)) => budgets::handle(l, budget_m),
        _ => panic!("no budget subcommand"),
    }
}

#[test]
fn budget_set_uses_default_currency_and_threshold() {
    let mut l = setup();
    run(&mut l, &["moneymate", "budget", "set", "Dining", "50.00"]).unwrap();
    let b = &l.list_budgets().unwrap()[0];
    assert_eq!(b.category, "Dining");
    assert_eq!(b.limit_amount, "50".parse::<Decimal>().unwrap());
    assert_eq!(b.currency, "EUR");
    assert_eq!(b.alert_threshold, "0.8".parse::<Decimal>().unwrap());

    run(
        &mut l,
        &["moneymate", "budget", "set", "dining", "80", "--threshold", "0.9"],
    )
    .unwrap();
    let budgets = l.list_budgets().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].limit_amount, "80".parse::<Decimal>().unwrap());
    assert_eq!(budgets[0].alert_threshold, "0.9".parse::<Decimal>().unwrap());
}

#[test]
fn budget_set_rejects_bad_limit() {
    let mut l = setup();
    let err = run(&mut l, &["moneymate", "budget", "set", "Dining", "fifty"]).unwrap_err();
    assert!(err.to_string().starts_with("invalid amount"));
    assert!(run(&mut l, &["moneymate", "budget", "set", "Dining", "-5"]).is_err());
    assert!(l.list_budgets().unwrap().is_empty());
}

#[test]
fn budget_status_runs_on_empty_ledger() {
    let mut l = setup();
    run(&mut l, &["moneymate", "budget", "status"]).unwrap();
    assert!(l.analyzer().budget_status(l.now()).unwrap().is_empty());
}

#[test]
fn budget_set_rejects_bad_threshold() {
    let mut l = setup();
    let args = ["moneymate", "budget", "set", "Dining", "50", "--threshold", "most"];
    assert!(run(&mut l, &args).is_err());
    assert!(l.list_budgets().unwrap().is_empty());
}
