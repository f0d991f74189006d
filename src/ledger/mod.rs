// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger engine: the only writer of transactions and asset balances.
//!
//! [`Ledger`] owns the SQLite connection. Every mutating operation takes
//! `&mut self` and runs inside a single SQLite transaction, so within a
//! process writes are serialized and each call either fully commits (rows and
//! balance adjustments together) or leaves the store untouched.

mod assets;
mod delete;
pub mod polarity;
mod record;
mod transfer;

use chrono::{Local, NaiveDateTime, Timelike};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::db::fmt_ts;
use crate::error::{LedgerError, Result};
use crate::intent::TxData;
use crate::models::{Asset, Budget, Transaction, TxType};
use crate::store;

pub use assets::{AssetUpdate, ObservationSummary};
pub use delete::DeleteOutcome;
pub use transfer::TransferOutcome;

/// Result of [`Ledger::apply_transaction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Recorded {
        transaction: Transaction,
        /// The linked asset after the balance adjustment.
        asset: Option<Asset>,
    },
    SkippedDuplicate {
        data: TxData,
        existing_id: i64,
    },
}

pub struct Ledger {
    conn: Connection,
    config: Config,
    pinned_now: Option<NaiveDateTime>,
}

impl Ledger {
    pub fn new(conn: Connection, config: Config) -> Self {
        Self {
            conn,
            config,
            pinned_now: None,
        }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn analyzer(&self) -> Analyzer<'_> {
        Analyzer::new(&self.conn)
    }

    /// Freeze the clock used for timestamps and the duplicate window.
    pub fn pin_clock(&mut self, now: NaiveDateTime) {
        self.pinned_now = Some(now);
    }

    pub fn now(&self) -> NaiveDateTime {
        self.pinned_now.unwrap_or_else(|| {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        })
    }

    pub fn set_budget(
        &mut self,
        category: &str,
        limit: Decimal,
        alert_threshold: Option<Decimal>,
        currency: Option<&str>,
    ) -> Result<Budget> {
        let category = category.trim();
        if category.is_empty() {
            return Err(LedgerError::MissingArgument("budget category".into()));
        }
        if limit < Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(limit.to_string()));
        }
        let threshold = alert_threshold.unwrap_or_else(|| Decimal::new(8, 1));
        if threshold <= Decimal::ZERO {
            return Err(LedgerError::InvalidData(format!(
                "alert threshold must be positive, got {}",
                threshold
            )));
        }
        let currency = self.currency_or_default(currency);
        let now = fmt_ts(&self.now());
        self.conn.execute(
            "INSERT INTO budgets(category, limit_amount, currency, alert_threshold, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(category) DO UPDATE SET limit_amount=excluded.limit_amount,
                currency=excluded.currency, alert_threshold=excluded.alert_threshold,
                updated_at=excluded.updated_at",
            params![
                category,
                limit.to_string(),
                currency,
                threshold.to_string(),
                now
            ],
        )?;
        tracing::info!(category, %limit, %threshold, "budget set");
        store::list_budgets(&self.conn)?
            .into_iter()
            .find(|b| b.category.eq_ignore_ascii_case(category))
            .ok_or_else(|| LedgerError::InvalidData(format!("budget '{}' vanished", category)))
    }

    pub fn history(&self, limit: Option<usize>) -> Result<Vec<Transaction>> {
        store::recent_transactions(&self.conn, limit)
    }

    pub fn list_assets(&self) -> Result<Vec<Asset>> {
        store::list_assets(&self.conn)
    }

    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        store::list_budgets(&self.conn)
    }

    fn currency_or_default(&self, currency: Option<&str>) -> String {
        currency
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.config.default_currency.clone())
    }
}

/// Row to insert into `transactions`.
struct NewTransaction<'a> {
    timestamp: NaiveDateTime,
    amount: Decimal,
    currency: &'a str,
    category: Option<&'a str>,
    tx_type: TxType,
    description: &'a str,
    raw_text: &'a str,
    asset_id: Option<i64>,
}

fn insert_transaction(conn: &Connection, row: &NewTransaction<'_>) -> Result<Transaction> {
    conn.execute(
        "INSERT INTO transactions(timestamp, amount, currency, category, type, description, raw_text, asset_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            fmt_ts(&row.timestamp),
            row.amount.to_string(),
            row.currency,
            row.category,
            row.tx_type.as_str(),
            row.description,
            row.raw_text,
            row.asset_id
        ],
    )?;
    let id = conn.last_insert_rowid();
    store::transaction_by_id(conn, id)?
        .ok_or_else(|| LedgerError::InvalidData(format!("transaction {} missing after insert", id)))
}

/// Add `delta` to the asset's balance and return the updated asset.
fn adjust_balance(
    conn: &Connection,
    asset: &Asset,
    delta: Decimal,
    now: &NaiveDateTime,
) -> Result<Asset> {
    let new_balance = asset.balance.checked_add(delta).ok_or_else(|| {
        LedgerError::InvalidAmount(format!(
            "{} overflows the balance of {}",
            delta, asset.name
        ))
    })?;
    conn.execute(
        "UPDATE assets SET balance=?1, updated_at=?2 WHERE id=?3",
        params![new_balance.to_string(), fmt_ts(now), asset.id],
    )?;
    tracing::debug!(asset = %asset.name, %delta, %new_balance, "balance adjusted");
    store::asset_by_id(conn, asset.id)?
        .ok_or_else(|| LedgerError::AssetNotFound(asset.name.clone()))
}
