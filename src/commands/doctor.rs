// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::TRANSFER_CATEGORY;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(ledger: &Ledger) -> Result<()> {
    let rows = find_issues(ledger.conn(), &ledger.config().default_currency)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Each row is `[issue, detail]`.
pub fn find_issues(conn: &Connection, default_currency: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) References to assets that no longer exist (read as unlinked)
    let mut stmt = conn.prepare(
        "SELECT t.id, t.asset_id FROM transactions t
         LEFT JOIN assets a ON a.id=t.asset_id
         WHERE t.asset_id IS NOT NULL AND a.id IS NULL
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let asset_id: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_asset_ref".into(),
            format!("tx #{} -> asset #{}", id, asset_id),
        ]);
    }

    // 2) Transfer legs without a live counterpart
    let mut stmt = conn.prepare(
        "SELECT t.id, t.description FROM transactions t
         LEFT JOIN transactions p ON p.id=t.counterpart_id
         WHERE t.category=?1 AND p.id IS NULL
         ORDER BY t.id",
    )?;
    let mut cur = stmt.query(params![TRANSFER_CATEGORY])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let desc: String = r.get(1)?;
        rows.push(vec![
            "unpaired_transfer_leg".into(),
            format!("tx #{} ({})", id, desc),
        ]);
    }

    // 3) Assets held in another currency; totals add them unconverted
    let mut stmt =
        conn.prepare("SELECT name, currency FROM assets WHERE currency != ?1 ORDER BY name")?;
    let mut cur = stmt.query(params![default_currency])?;
    while let Some(r) = cur.next()? {
        let name: String = r.get(0)?;
        let ccy: String = r.get(1)?;
        rows.push(vec![
            "asset_currency_differs".into(),
            format!("{} is in {} (default {})", name, ccy, default_currency),
        ]);
    }

    Ok(rows)
}
