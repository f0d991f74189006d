// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExportRow {
    pub id: i64,
    pub timestamp: String,
    pub r#type: String,
    pub amount: String,
    pub currency: String,
    pub category: Option<String>,
    pub description: String,
    pub asset: Option<String>,
    pub raw_text: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let fmt = m
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    let Some(out) = m.get_one::<String>("out") else {
        bail!("Missing --out path");
    };
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let rows = export_rows(conn)?;
    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        _ => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
    }
    tracing::info!(count = rows.len(), path = %out, format = %fmt, "exported transactions");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}

/// Every transaction, oldest first, with its asset's name when linked.
pub fn export_rows(conn: &Connection) -> Result<Vec<ExportRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.timestamp, t.type, t.amount, t.currency, t.category, t.description,
                a.name, t.raw_text
         FROM transactions t
         LEFT JOIN assets a ON t.asset_id=a.id
         ORDER BY t.timestamp, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(ExportRow {
            id: r.get(0)?,
            timestamp: r.get(1)?,
            r#type: r.get(2)?,
            amount: r.get(3)?,
            currency: r.get(4)?,
            category: r.get(5)?,
            description: r.get(6)?,
            asset: r.get(7)?,
            raw_text: r.get(8)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}
