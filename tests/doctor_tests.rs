// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneymate::commands::doctor;
use moneymate::config::Config;
use moneymate::db;
use moneymate::ledger::{AssetUpdate, Ledger};
use moneymate::models::{AssetKind, Origin};

#[test]
fn clean_ledger_has_no_issues() {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("CNY"));
    l.set_asset_balance(&AssetUpdate::new("A", "10".parse().unwrap()).kind(AssetKind::Liquid))
        .unwrap();
    l.set_asset_balance(&AssetUpdate::new("B", "10".parse().unwrap()).kind(AssetKind::Liquid))
        .unwrap();
    l.transfer("A", "B", "5".parse().unwrap(), Origin::Manual)
        .unwrap();
    assert!(doctor::find_issues(l.conn(), "CNY").unwrap().is_empty());
}

#[test]
fn reports_unpaired_legs_and_foreign_assets() {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("CNY"));
    l.set_asset_balance(&AssetUpdate::new("A", "10".parse().unwrap()).kind(AssetKind::Liquid))
        .unwrap();
    let mut usd = AssetUpdate::new("Brokerage", "10".parse().unwrap()).kind(AssetKind::Investment);
    usd.currency = Some("USD".into());
    l.set_asset_balance(&usd).unwrap();
    let t = l
        .transfer("A", "Brokerage", "5".parse().unwrap(), Origin::Manual)
        .unwrap();
    l.conn()
        .execute("DELETE FROM transactions WHERE id=?1", [t.credit.id])
        .unwrap();

    let issues = doctor::find_issues(l.conn(), "CNY").unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kinds, vec!["unpaired_transfer_leg", "asset_currency_differs"]);
    assert!(issues[0][1].contains("Transfer to Brokerage"));
}
