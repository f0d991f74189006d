// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only aggregates over the account store.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::error::{LedgerError, Result};
use crate::models::{Asset, AssetKind, DEFAULT_ASSET_CATEGORY, Transaction, TxType};
use crate::store;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Cells in a budget progress bar.
pub const BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub period: String,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net_savings: Decimal,
    /// Percent of income kept; zero when there is no income.
    pub savings_rate: Decimal,
    pub daily_average: Decimal,
    /// EXPENSE totals by category.
    pub categories: BTreeMap<String, Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendChange {
    pub percent: Decimal,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTrend {
    pub this_week_total: Decimal,
    pub last_week_total: Decimal,
    /// `None` when last week had no spending to compare against.
    pub change: Option<TrendChange>,
    pub trend_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetLine {
    pub category: String,
    pub limit: Decimal,
    pub currency: String,
    pub spent: Decimal,
    pub percent: Decimal,
    pub alert_threshold: Decimal,
    pub alert: bool,
    pub bar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetSummary {
    pub total_balance: Decimal,
    pub distribution: BTreeMap<String, Decimal>,
    pub assets: Vec<Asset>,
}

pub struct Analyzer<'a> {
    conn: &'a Connection,
}

impl<'a> Analyzer<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn monthly_summary(&self, as_of: NaiveDateTime) -> Result<MonthlySummary> {
        let txs = store::transactions_between(self.conn, &month_start(&as_of), None, None)?;
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        let mut categories: BTreeMap<String, Decimal> = BTreeMap::new();
        for tx in &txs {
            match tx.r#type {
                TxType::Income => total_income = add(total_income, tx.amount)?,
                TxType::Expense => {
                    total_expense = add(total_expense, tx.amount)?;
                    let slot = categories.entry(category_key(tx)).or_insert(Decimal::ZERO);
                    *slot = add(*slot, tx.amount)?;
                }
            }
        }
        let net_savings = total_income
            .checked_sub(total_expense)
            .ok_or_else(overflow)?;
        let savings_rate = if total_income > Decimal::ZERO {
            percent_of(net_savings, total_income)
        } else {
            Decimal::ZERO
        };
        let days = Decimal::from(as_of.day().max(1));
        Ok(MonthlySummary {
            period: as_of.format("%B %Y").to_string(),
            total_income,
            total_expense,
            net_savings,
            savings_rate,
            daily_average: total_expense / days,
            categories,
        })
    }

    /// This month's spending in categories containing `name`, case-insensitively.
    pub fn category_spending(&self, name: &str, as_of: NaiveDateTime) -> Result<Decimal> {
        let needle = name.trim().to_lowercase();
        let txs = self.month_expenses(&as_of)?;
        total(
            txs.iter()
                .filter(|t| {
                    t.category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
                })
                .map(|t| t.amount),
        )
    }

    pub fn weekly_trend(&self, as_of: NaiveDateTime) -> Result<WeeklyTrend> {
        let week_ago = as_of - Duration::days(7);
        let two_weeks_ago = as_of - Duration::days(14);
        let this_week_total = self.expense_total(&week_ago, &as_of)?;
        let last_week_total = self.expense_total(&two_weeks_ago, &week_ago)?;

        let change = if last_week_total.is_zero() {
            None
        } else {
            let percent = percent_of(this_week_total - last_week_total, last_week_total);
            let direction = if percent > Decimal::ZERO {
                TrendDirection::Up
            } else if percent < Decimal::ZERO {
                TrendDirection::Down
            } else {
                TrendDirection::Flat
            };
            Some(TrendChange { percent, direction })
        };
        let trend_description = match &change {
            None => "not available (no spending last week)".to_string(),
            Some(c) => match c.direction {
                TrendDirection::Up => format!("up {:.1}% vs last week", c.percent.abs()),
                TrendDirection::Down => format!("down {:.1}% vs last week", c.percent.abs()),
                TrendDirection::Flat => "unchanged vs last week".to_string(),
            },
        };
        Ok(WeeklyTrend {
            this_week_total,
            last_week_total,
            change,
            trend_description,
        })
    }

    pub fn budget_status(&self, as_of: NaiveDateTime) -> Result<Vec<BudgetLine>> {
        let budgets = store::list_budgets(self.conn)?;
        let expenses = self.month_expenses(&as_of)?;
        let mut lines = Vec::with_capacity(budgets.len());
        for b in budgets {
            let spent = total(
                expenses
                    .iter()
                    .filter(|t| {
                        t.category
                            .as_deref()
                            .is_some_and(|c| c.trim().eq_ignore_ascii_case(b.category.trim()))
                    })
                    .map(|t| t.amount),
            )?;
            // a zero limit is a misconfiguration; show it as full
            let percent = if b.limit_amount.is_zero() {
                Decimal::ONE_HUNDRED
            } else {
                percent_of(spent, b.limit_amount)
            };
            // a threshold too large to scale can never be reached
            let alert = b
                .alert_threshold
                .checked_mul(Decimal::ONE_HUNDRED)
                .is_some_and(|t| percent >= t);
            lines.push(BudgetLine {
                category: b.category,
                limit: b.limit_amount,
                currency: b.currency,
                spent,
                percent,
                alert_threshold: b.alert_threshold,
                alert,
                bar: progress_bar(percent),
            });
        }
        Ok(lines)
    }

    /// Gross sum of all balances. CREDIT balances are added, not subtracted;
    /// see [`Analyzer::net_worth`] for the netted figure.
    pub fn asset_summary(&self) -> Result<AssetSummary> {
        let assets = store::list_assets(self.conn)?;
        let mut total_balance = Decimal::ZERO;
        let mut distribution: BTreeMap<String, Decimal> = BTreeMap::new();
        for a in &assets {
            total_balance = add(total_balance, a.balance)?;
            let key = if a.category.trim().is_empty() {
                DEFAULT_ASSET_CATEGORY.to_string()
            } else {
                a.category.clone()
            };
            let slot = distribution.entry(key).or_insert(Decimal::ZERO);
            *slot = add(*slot, a.balance)?;
        }
        Ok(AssetSummary {
            total_balance,
            distribution,
            assets,
        })
    }

    /// (LIQUID + INVESTMENT) - CREDIT. OTHER assets are left out.
    pub fn net_worth(&self) -> Result<Decimal> {
        let assets = store::list_assets(self.conn)?;
        assets.iter().try_fold(Decimal::ZERO, |acc, a| match a.kind {
            AssetKind::Liquid | AssetKind::Investment => add(acc, a.balance),
            AssetKind::Credit => acc.checked_sub(a.balance).ok_or_else(overflow),
            AssetKind::Other => Ok(acc),
        })
    }

    fn month_expenses(&self, as_of: &NaiveDateTime) -> Result<Vec<Transaction>> {
        store::transactions_between(
            self.conn,
            &month_start(as_of),
            None,
            Some(TxType::Expense),
        )
    }

    fn expense_total(&self, from: &NaiveDateTime, to: &NaiveDateTime) -> Result<Decimal> {
        let txs = store::transactions_between(self.conn, from, Some(to), Some(TxType::Expense))?;
        total(txs.iter().map(|t| t.amount))
    }
}

fn overflow() -> LedgerError {
    LedgerError::InvalidData("amount total exceeds the representable range".into())
}

fn add(acc: Decimal, amount: Decimal) -> Result<Decimal> {
    acc.checked_add(amount).ok_or_else(overflow)
}

fn total(mut amounts: impl Iterator<Item = Decimal>) -> Result<Decimal> {
    amounts.try_fold(Decimal::ZERO, add)
}

/// `part / whole * 100`, saturating at the Decimal range. `whole` is non-zero.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

pub fn month_start(as_of: &NaiveDateTime) -> NaiveDateTime {
    let date = as_of.date();
    date.with_day(1).unwrap_or(date).and_time(NaiveTime::MIN)
}

fn category_key(tx: &Transaction) -> String {
    match tx.category.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => UNCATEGORIZED.to_string(),
    }
}

/// Fixed-width bar, full at 100% even when spending is over the limit.
pub fn progress_bar(percent: Decimal) -> String {
    let capped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let per_cell = Decimal::ONE_HUNDRED / Decimal::from(BAR_WIDTH as u64);
    let filled = (capped / per_cell).floor();
    let filled = filled.to_usize().unwrap_or(0).min(BAR_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}
