// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read queries over the account store, shared by the ledger and the analyzer.
//!
//! Asset lookup comes in two flavours on purpose:
//!
//! - [`find_asset_fuzzy`]: case-insensitive substring, first match by id. Used
//!   for convenience when linking a recorded transaction or resolving the two
//!   sides of a transfer.
//! - [`find_asset_exact`]: exact, case-sensitive name. Used for authoritative
//!   balance overwrites, where hitting the wrong asset would destroy data.
//!
//! Case folding for substring matches happens in Rust with full Unicode
//! lower-casing, the same fold the analyzer applies to categories. SQLite's
//! `lower()` only folds ASCII. Budget categories are the exception: their
//! uniqueness comes from `COLLATE NOCASE`, so they fold ASCII only.

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use crate::db::{
    ASSET_COLUMNS, BUDGET_COLUMNS, TRANSACTION_COLUMNS, fmt_ts, row_to_asset, row_to_budget,
    row_to_transaction,
};
use crate::error::Result;
use crate::models::{Asset, Budget, Transaction, TxType};

pub fn asset_by_id(conn: &Connection, id: i64) -> Result<Option<Asset>> {
    let sql = format!("SELECT {} FROM assets WHERE id=?1", ASSET_COLUMNS);
    Ok(conn.query_row(&sql, params![id], row_to_asset).optional()?)
}

pub fn find_asset_exact(conn: &Connection, name: &str) -> Result<Option<Asset>> {
    let sql = format!("SELECT {} FROM assets WHERE name=?1", ASSET_COLUMNS);
    Ok(conn
        .query_row(&sql, params![name.trim()], row_to_asset)
        .optional()?)
}

pub fn find_asset_fuzzy(conn: &Connection, hint: &str) -> Result<Option<Asset>> {
    let hint = hint.trim();
    if hint.is_empty() {
        return Ok(None);
    }
    let needle = hint.to_lowercase();
    let sql = format!("SELECT {} FROM assets ORDER BY id", ASSET_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_asset)?;
    for row in rows {
        let asset = row?;
        if contains_folded(&asset.name, &needle) {
            return Ok(Some(asset));
        }
    }
    Ok(None)
}

pub fn list_assets(conn: &Connection) -> Result<Vec<Asset>> {
    let sql = format!(
        "SELECT {} FROM assets ORDER BY category, name",
        ASSET_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_asset)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let sql = format!("SELECT {} FROM budgets ORDER BY category", BUDGET_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_budget)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn transaction_by_id(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let sql = format!("SELECT {} FROM transactions WHERE id=?1", TRANSACTION_COLUMNS);
    Ok(conn
        .query_row(&sql, params![id], row_to_transaction)
        .optional()?)
}

/// Most recently created transactions first.
pub fn recent_transactions(conn: &Connection, limit: Option<usize>) -> Result<Vec<Transaction>> {
    let mut sql = format!(
        "SELECT {} FROM transactions ORDER BY id DESC",
        TRANSACTION_COLUMNS
    );
    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Case-insensitive substring search on description, most recent first.
pub fn search_transactions(conn: &Connection, term: &str) -> Result<Vec<Transaction>> {
    let needle = term.trim().to_lowercase();
    let sql = format!(
        "SELECT {} FROM transactions ORDER BY id DESC",
        TRANSACTION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        let tx = row?;
        if contains_folded(&tx.description, &needle) {
            out.push(tx);
        }
    }
    Ok(out)
}

/// `needle` must already be lower-cased.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Transactions with `from <= timestamp < to`, oldest first. `to = None` is open-ended.
pub fn transactions_between(
    conn: &Connection,
    from: &NaiveDateTime,
    to: Option<&NaiveDateTime>,
    tx_type: Option<TxType>,
) -> Result<Vec<Transaction>> {
    let mut sql = format!(
        "SELECT {} FROM transactions WHERE timestamp >= ?1",
        TRANSACTION_COLUMNS
    );
    let mut args: Vec<String> = vec![fmt_ts(from)];
    if let Some(to) = to {
        sql.push_str(&format!(" AND timestamp < ?{}", args.len() + 1));
        args.push(fmt_ts(to));
    }
    if let Some(t) = tx_type {
        sql.push_str(&format!(" AND type = ?{}", args.len() + 1));
        args.push(t.as_str().to_string());
    }
    sql.push_str(" ORDER BY timestamp, id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), row_to_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
