// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneymate::commands::exporter;
use moneymate::config::Config;
use moneymate::intent::TxData;
use moneymate::ledger::{AssetUpdate, Ledger};
use moneymate::models::{AssetKind, Origin, TxType};
use moneymate::{cli, db};
use serde_json::json;
use tempfile::tempdir;

fn seeded() -> Ledger {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("CNY"));
    l.pin_clock(
        NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap(),
    );
    l.set_asset_balance(&AssetUpdate::new("Checking", "100".parse().unwrap()).kind(AssetKind::Liquid))
        .unwrap();
    let data = TxData::new("12.34".parse().unwrap(), TxType::Expense)
        .category("Groceries")
        .description("Corner Shop")
        .asset_name("check");
    l.apply_transaction(&data, Origin::Manual, "corner shop 12.34")
        .unwrap();
    l
}

fn export_matches(format: &str, out: &str) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from([
        "moneymate", "export", "--format", format, "--out", out,
    ]);
    match matches.subcommand() {
        Some(("export", export_m)) => export_m.clone(),
        _ => panic!("no export subcommand"),
    }
}

#[test]
fn export_writes_pretty_json() {
    let l = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::handle(l.conn(), &export_matches("json", &out_str)).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "id": 1,
                "timestamp": "2026-01-02 08:15:00",
                "type": "EXPENSE",
                "amount": "12.34",
                "currency": "CNY",
                "category": "Groceries",
                "description": "Corner Shop",
                "asset": "Checking",
                "raw_text": "[Manual] corner shop 12.34"
            }
        ])
    );
}

#[test]
fn export_writes_csv_with_header() {
    let l = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    exporter::handle(l.conn(), &export_matches("CSV", &out_str)).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("id,timestamp,type,amount,currency,category,description,asset,raw_text")
    );
    assert_eq!(
        lines.next(),
        Some("1,2026-01-02 08:15:00,EXPENSE,12.34,CNY,Groceries,Corner Shop,Checking,[Manual] corner shop 12.34")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn export_rejects_unknown_format() {
    let l = seeded();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.unknown");
    let out_str = out_path.to_string_lossy().to_string();

    assert!(exporter::handle(l.conn(), &export_matches("xml", &out_str)).is_err());
    assert!(!out_path.exists());
}
