// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::types::Type;
use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::error::{LedgerError, Result};
use crate::models::{Asset, AssetKind, Budget, TS_FORMAT, Transaction, TxType};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Moneymate", "moneymate"));

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        LedgerError::InvalidData("Could not determine platform-specific data dir".into())
    })?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.join("moneymate.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    init_schema(&conn)?;
    tracing::debug!("Opened ledger database at {}", path.display());
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL DEFAULT 'OTHERS',
        kind TEXT NOT NULL DEFAULT 'OTHER'
            CHECK(kind IN ('LIQUID','CREDIT','INVESTMENT','OTHER')),
        balance TEXT NOT NULL DEFAULT '0',
        currency TEXT NOT NULL,
        credit_limit TEXT,
        billing_day INTEGER,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        category TEXT,
        type TEXT NOT NULL CHECK(type IN ('INCOME','EXPENSE')),
        description TEXT NOT NULL DEFAULT '',
        raw_text TEXT NOT NULL DEFAULT '',
        asset_id INTEGER,
        counterpart_id INTEGER,
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_timestamp ON transactions(timestamp);

    CREATE TABLE IF NOT EXISTS budgets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL UNIQUE COLLATE NOCASE,
        limit_amount TEXT NOT NULL,
        currency TEXT NOT NULL,
        alert_threshold TEXT NOT NULL DEFAULT '0.8',
        updated_at TEXT NOT NULL
    );
    "#,
    )?;
    Ok(())
}

pub fn fmt_ts(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn get_decimal(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>().map_err(|e| conversion_error(idx, e))
}

fn get_opt_decimal(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let s: Option<String> = r.get(idx)?;
    s.map(|s| s.parse::<Decimal>().map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn get_ts(r: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let s: String = r.get(idx)?;
    NaiveDateTime::parse_from_str(&s, TS_FORMAT).map_err(|e| conversion_error(idx, e))
}

pub const TRANSACTION_COLUMNS: &str = "id, timestamp, amount, currency, category, type, \
     description, raw_text, asset_id, counterpart_id";

pub fn row_to_transaction(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let type_s: String = r.get(5)?;
    Ok(Transaction {
        id: r.get(0)?,
        timestamp: get_ts(r, 1)?,
        amount: get_decimal(r, 2)?,
        currency: r.get(3)?,
        category: r.get(4)?,
        r#type: type_s.parse::<TxType>().map_err(|e| conversion_error(5, e))?,
        description: r.get(6)?,
        raw_text: r.get(7)?,
        asset_id: r.get(8)?,
        counterpart_id: r.get(9)?,
    })
}

pub const ASSET_COLUMNS: &str =
    "id, name, category, kind, balance, currency, credit_limit, billing_day, updated_at";

pub fn row_to_asset(r: &Row<'_>) -> rusqlite::Result<Asset> {
    let kind_s: String = r.get(3)?;
    Ok(Asset {
        id: r.get(0)?,
        name: r.get(1)?,
        category: r.get(2)?,
        kind: kind_s.parse::<AssetKind>().map_err(|e| conversion_error(3, e))?,
        balance: get_decimal(r, 4)?,
        currency: r.get(5)?,
        credit_limit: get_opt_decimal(r, 6)?,
        billing_day: r.get(7)?,
        updated_at: get_ts(r, 8)?,
    })
}

pub const BUDGET_COLUMNS: &str =
    "id, category, limit_amount, currency, alert_threshold, updated_at";

pub fn row_to_budget(r: &Row<'_>) -> rusqlite::Result<Budget> {
    Ok(Budget {
        id: r.get(0)?,
        category: r.get(1)?,
        limit_amount: get_decimal(r, 2)?,
        currency: r.get(3)?,
        alert_threshold: get_decimal(r, 4)?,
        updated_at: get_ts(r, 5)?,
    })
}
