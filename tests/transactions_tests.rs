// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneymate::commands::{assets, transactions, transfer};
use moneymate::config::Config;
use moneymate::ledger::{ApplyOutcome, DeleteOutcome, Ledger};
use moneymate::models::{AssetKind, TxType};
use moneymate::{cli, db, store};
use rust_decimal::Decimal;

fn setup() -> Ledger {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("CNY"));
    l.pin_clock(
        NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    );
    l
}

/// Matches of the innermost subcommand.
fn leaf(args: &[&str]) -> clap::ArgMatches {
    let mut m = cli::build_cli().get_matches_from(args.iter().copied());
    while let Some((_, sub)) = m.subcommand() {
        let next = sub.clone();
        m = next;
    }
    m
}

fn tx_count(l: &Ledger) -> i64 {
    l.conn()
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn add_rejects_malformed_amount_without_writing() {
    let mut l = setup();
    for bad in ["abc", "12,5", "0", "-4"] {
        let m = leaf(&["moneymate", "tx", "add", bad, "Food", "lunch"]);
        let err = transactions::add(&mut l, &m).unwrap_err();
        assert!(err.to_string().starts_with("invalid amount"), "{}", err);
    }
    assert_eq!(tx_count(&l), 0);
}

#[test]
fn add_links_explicit_asset_and_tags_origin() {
    let mut l = setup();
    let m = leaf(&[
        "moneymate", "asset", "set", "Visa Card", "500", "--kind", "credit",
    ]);
    let visa = assets::set(&mut l, &m).unwrap();
    assert_eq!(visa.kind, AssetKind::Credit);

    let m = leaf(&[
        "moneymate", "tx", "add", "100", "Food", "team dinner", "--asset", "visa", "--guided",
    ]);
    match transactions::add(&mut l, &m).unwrap() {
        ApplyOutcome::Recorded { transaction, asset } => {
            assert_eq!(transaction.r#type, TxType::Expense);
            assert_eq!(transaction.description, "team dinner");
            assert!(transaction.raw_text.starts_with("[Guided] "));
            assert_eq!(asset.unwrap().balance, "600".parse::<Decimal>().unwrap());
        }
        other => panic!("unexpected {:?}", other),
    }

    let m = leaf(&[
        "moneymate", "tx", "add", "2000", "Salary", "March pay", "--income", "--date",
        "2026-03-01", "--currency", "usd",
    ]);
    match transactions::add(&mut l, &m).unwrap() {
        ApplyOutcome::Recorded { transaction, asset } => {
            assert_eq!(transaction.r#type, TxType::Income);
            assert_eq!(transaction.currency, "USD");
            assert_eq!(transaction.timestamp.date().to_string(), "2026-03-01");
            assert!(asset.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn add_with_unknown_asset_fails_without_writing() {
    let mut l = setup();
    let m = leaf(&[
        "moneymate", "tx", "add", "9", "Food", "snack", "--asset", "Nowhere",
    ]);
    assert!(transactions::add(&mut l, &m).is_err());
    assert_eq!(tx_count(&l), 0);
}

#[test]
fn history_limit_respected() {
    let mut l = setup();
    for (amount, desc) in [("1", "first"), ("2", "second"), ("3", "third")] {
        let m = leaf(&["moneymate", "tx", "add", amount, "Misc", desc]);
        transactions::add(&mut l, &m).unwrap();
    }
    let m = leaf(&["moneymate", "tx", "history", "--limit", "2"]);
    let rows = transactions::history_rows(&l, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].description, "third");
    assert_eq!(rows[0].amount, "3.00");
}

#[test]
fn delete_by_search_and_last() {
    let mut l = setup();
    for (amount, desc) in [("4", "Coffee beans"), ("5", "Bus ticket")] {
        let m = leaf(&["moneymate", "tx", "add", amount, "Misc", desc]);
        transactions::add(&mut l, &m).unwrap();
    }
    let m = leaf(&["moneymate", "tx", "delete", "--search", "coffee"]);
    let (outcome, term) = transactions::delete(&mut l, &m).unwrap();
    assert_eq!(term.as_deref(), Some("coffee"));
    assert!(matches!(outcome, DeleteOutcome::Deleted { .. }));

    let m = leaf(&["moneymate", "tx", "delete", "--last"]);
    let (outcome, term) = transactions::delete(&mut l, &m).unwrap();
    assert!(term.is_none());
    match outcome {
        DeleteOutcome::Deleted { removed, .. } => assert_eq!(removed[0].description, "Bus ticket"),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(tx_count(&l), 0);
}

#[test]
fn delete_requires_a_target() {
    let res = cli::build_cli().try_get_matches_from(["moneymate", "tx", "delete"]);
    assert!(res.is_err());
}

#[test]
fn transfer_command_moves_balances() {
    let mut l = setup();
    for args in [
        ["moneymate", "asset", "set", "Cash", "300", "--kind", "liquid"],
        ["moneymate", "asset", "set", "Bank", "700", "--kind", "LIQUID"],
    ] {
        assets::set(&mut l, &leaf(&args)).unwrap();
    }
    let m = leaf(&["moneymate", "transfer", "bank", "cash", "150.50"]);
    let t = transfer::run(&mut l, &m).unwrap();
    assert_eq!(t.source.name, "Bank");
    assert_eq!(
        store::find_asset_exact(l.conn(), "Cash").unwrap().unwrap().balance,
        "450.50".parse::<Decimal>().unwrap()
    );

    let m = leaf(&["moneymate", "transfer", "bank", "cash", "lots"]);
    assert!(transfer::run(&mut l, &m).is_err());
    assert_eq!(tx_count(&l), 2);
}
