// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use moneymate::analyzer::TrendDirection;
use moneymate::config::Config;
use moneymate::db;
use moneymate::error::LedgerError;
use moneymate::intent::TxData;
use moneymate::ledger::{AssetUpdate, Ledger};
use moneymate::models::{AssetKind, Origin, TxType};
use moneymate::report;
use rust_decimal::Decimal;

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn ledger_at(now: NaiveDateTime) -> Ledger {
    let mut l = Ledger::new(db::open_in_memory().unwrap(), Config::new("CNY"));
    l.pin_clock(now);
    l
}

fn record(l: &mut Ledger, amount: &str, tx_type: TxType, category: Option<&str>, day: Option<u32>) {
    let mut data = TxData::new(dec(amount), tx_type);
    if let Some(c) = category {
        data = data.category(c);
    }
    if let Some(d) = day {
        data.date = NaiveDate::from_ymd_opt(2026, 3, d);
    }
    l.apply_transaction(&data, Origin::Manual, "").unwrap();
}

#[test]
fn monthly_summary_on_day_ten() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    record(&mut l, "5000", TxType::Income, Some("Salary"), None);
    record(&mut l, "1000", TxType::Expense, Some("Rent"), None);

    let s = l.analyzer().monthly_summary(now).unwrap();
    assert_eq!(s.period, "March 2026");
    assert_eq!(s.total_income, dec("5000"));
    assert_eq!(s.total_expense, dec("1000"));
    assert_eq!(s.net_savings, dec("4000"));
    assert_eq!(s.savings_rate, dec("80"));
    assert_eq!(s.daily_average, dec("100"));
    assert_eq!(s.categories.get("Rent"), Some(&dec("1000")));
    assert!(!s.categories.contains_key("Salary"));

    let text = report::monthly_summary(&s);
    assert!(text.contains("Savings Rate: 80.0%"));
    assert!(text.contains("Daily Avg Expense: 100.00"));
}

#[test]
fn monthly_summary_ignores_last_month_and_folds_uncategorized() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    let mut old = TxData::new(dec("70"), TxType::Expense).category("Rent");
    old.date = NaiveDate::from_ymd_opt(2026, 2, 27);
    l.apply_transaction(&old, Origin::Manual, "").unwrap();
    record(&mut l, "12", TxType::Expense, None, None);
    record(&mut l, "8", TxType::Expense, Some("  "), None);

    let s = l.analyzer().monthly_summary(now).unwrap();
    assert_eq!(s.total_expense, dec("20"));
    assert_eq!(s.savings_rate, Decimal::ZERO);
    assert_eq!(s.categories.get("Uncategorized"), Some(&dec("20")));
    assert_eq!(s.categories.len(), 1);
}

#[test]
fn weekly_trend_without_prior_week_is_unavailable() {
    let now = at(2026, 3, 20, 12);
    let mut l = ledger_at(now);
    record(&mut l, "50", TxType::Expense, Some("Food"), Some(18));

    let t = l.analyzer().weekly_trend(now).unwrap();
    assert_eq!(t.this_week_total, dec("50"));
    assert_eq!(t.last_week_total, Decimal::ZERO);
    assert!(t.change.is_none());
    assert!(report::weekly_trend(&t).contains("not available"));
}

#[test]
fn weekly_trend_reports_direction() {
    let now = at(2026, 3, 20, 12);
    let mut l = ledger_at(now);
    record(&mut l, "100", TxType::Expense, Some("Food"), Some(10));
    record(&mut l, "150", TxType::Expense, Some("Food"), Some(18));
    record(&mut l, "999", TxType::Income, Some("Salary"), Some(18));

    let t = l.analyzer().weekly_trend(now).unwrap();
    let change = t.change.unwrap();
    assert_eq!(change.direction, TrendDirection::Up);
    assert_eq!(change.percent, dec("50"));
    assert_eq!(t.trend_description, "up 50.0% vs last week");
}

#[test]
fn budget_half_spent_renders_half_bar() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    l.set_budget("Food", dec("200"), None, None).unwrap();
    l.set_budget("Fun", dec("0"), None, None).unwrap();
    record(&mut l, "100", TxType::Expense, Some("food"), None);

    let lines = l.analyzer().budget_status(now).unwrap();
    let food = lines.iter().find(|b| b.category == "Food").unwrap();
    assert_eq!(food.spent, dec("100"));
    assert_eq!(food.percent, dec("50"));
    assert_eq!(food.bar, "[█████░░░░░]");
    assert!(!food.alert);

    let fun = lines.iter().find(|b| b.category == "Fun").unwrap();
    assert_eq!(fun.percent, dec("100"));
    assert!(fun.alert);

    let text = report::budget_status(&lines);
    assert!(text.contains("Food: 100.00 / 200.00 CNY\n[█████░░░░░] 50%"));
}

#[test]
fn budget_alerts_at_threshold() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    l.set_budget("Taxi", dec("200"), None, None).unwrap();
    record(&mut l, "160", TxType::Expense, Some("Taxi"), None);
    let lines = l.analyzer().budget_status(now).unwrap();
    assert_eq!(lines[0].percent, dec("80"));
    assert!(lines[0].alert);
}

#[test]
fn category_spending_matches_substring() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    record(&mut l, "30", TxType::Expense, Some("Food"), None);
    record(&mut l, "12.5", TxType::Expense, Some("Fast food"), None);
    record(&mut l, "7", TxType::Expense, Some("Transport"), None);
    record(&mut l, "30", TxType::Income, Some("Food refund"), None);

    let total = l.analyzer().category_spending("FOOD", now).unwrap();
    assert_eq!(total, dec("42.5"));
    assert_eq!(
        report::category_spending("FOOD", &total),
        "Total spent on FOOD this month: 42.50"
    );
}

#[test]
fn net_worth_nets_credit_and_skips_other() {
    let mut l = ledger_at(at(2026, 3, 10, 12));
    for (name, kind, bal) in [
        ("Cash", AssetKind::Liquid, "1000"),
        ("Card", AssetKind::Credit, "300"),
        ("Fund", AssetKind::Investment, "500"),
        ("Car", AssetKind::Other, "99"),
    ] {
        l.set_asset_balance(&AssetUpdate::new(name, dec(bal)).kind(kind).category(name))
            .unwrap();
    }
    let a = l.analyzer();
    assert_eq!(a.net_worth().unwrap(), dec("1200"));

    let summary = a.asset_summary().unwrap();
    assert_eq!(summary.total_balance, dec("1899"));
    assert_eq!(summary.distribution.get("Card"), Some(&dec("300")));
    assert_eq!(summary.assets.len(), 4);
}

#[test]
fn tiny_budget_limit_saturates_instead_of_overflowing() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    l.set_budget("Snacks", dec("0.0000000000000000000000000001"), None, None)
        .unwrap();
    record(&mut l, "5", TxType::Expense, Some("Snacks"), None);

    let lines = l.analyzer().budget_status(now).unwrap();
    assert_eq!(lines[0].percent, Decimal::MAX);
    assert!(lines[0].alert);
    assert_eq!(lines[0].bar, "[██████████]");
}

#[test]
fn totals_beyond_decimal_range_are_an_error() {
    let now = at(2026, 3, 10, 12);
    let mut l = ledger_at(now);
    let max = Decimal::MAX.to_string();
    record(&mut l, &max, TxType::Expense, Some("Yacht"), None);
    record(&mut l, &max, TxType::Expense, Some("Island"), None);

    assert!(matches!(
        l.analyzer().monthly_summary(now),
        Err(LedgerError::InvalidData(_))
    ));
    assert!(l.analyzer().category_spending("a", now).is_err());
}
