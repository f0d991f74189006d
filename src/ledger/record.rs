// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, NaiveDateTime};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::polarity::balance_delta;
use super::{ApplyOutcome, Ledger, NewTransaction, adjust_balance, insert_transaction};
use crate::db::fmt_ts;
use crate::error::{LedgerError, Result};
use crate::intent::TxData;
use crate::models::{Asset, Origin, TxType};
use crate::store;

/// Lookback for duplicate suppression.
pub const DUPLICATE_WINDOW_HOURS: i64 = 24;

impl Ledger {
    /// Record one transaction, linking it to an asset when one resolves.
    ///
    /// An identical amount/type/category timestamped within the 24 hours up to
    /// now is treated as a re-submission and skipped without touching the
    /// store. Rows dated in the future never match.
    pub fn apply_transaction(
        &mut self,
        data: &TxData,
        origin: Origin,
        raw_text: &str,
    ) -> Result<ApplyOutcome> {
        let amount = match data.amount {
            Some(a) if a > Decimal::ZERO => a,
            Some(a) => return Err(LedgerError::InvalidAmount(a.to_string())),
            None => return Err(LedgerError::MissingArgument("amount".into())),
        };
        let now = self.now();
        let category = normalize(data.category.as_deref());

        if let Some(existing_id) =
            find_duplicate(&self.conn, amount, data.r#type, category.as_deref(), &now)?
        {
            tracing::info!(
                %amount,
                tx_type = %data.r#type,
                category = category.as_deref().unwrap_or(""),
                existing_id,
                "skipped duplicate transaction"
            );
            return Ok(ApplyOutcome::SkippedDuplicate {
                data: data.clone(),
                existing_id,
            });
        }

        let currency = self.currency_or_default(data.currency.as_deref());
        let timestamp = match data.date {
            Some(date) => date.and_time(now.time()),
            None => now,
        };
        let description = normalize(data.description.as_deref())
            .or_else(|| category.clone())
            .unwrap_or_default();
        let raw = format!("{} {}", origin.tag(), raw_text.trim())
            .trim_end()
            .to_string();

        let tx = self.conn.transaction()?;
        let asset = resolve_link(&tx, data)?;
        let transaction = insert_transaction(
            &tx,
            &NewTransaction {
                timestamp,
                amount,
                currency: &currency,
                category: category.as_deref(),
                tx_type: data.r#type,
                description: &description,
                raw_text: &raw,
                asset_id: asset.as_ref().map(|a| a.id),
            },
        )?;
        let asset = match asset {
            Some(asset) => {
                let delta = balance_delta(asset.kind, data.r#type, amount);
                Some(adjust_balance(&tx, &asset, delta, &now)?)
            }
            None => None,
        };
        tx.commit()?;

        tracing::info!(
            id = transaction.id,
            %amount,
            tx_type = %data.r#type,
            asset = asset.as_ref().map(|a| a.name.as_str()).unwrap_or("-"),
            "recorded transaction"
        );
        Ok(ApplyOutcome::Recorded { transaction, asset })
    }
}

fn normalize(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Explicit id first, then the fuzzy name hint. An unresolvable hint leaves
/// the transaction unlinked.
fn resolve_link(conn: &Connection, data: &TxData) -> Result<Option<Asset>> {
    if let Some(id) = data.asset_id {
        return store::asset_by_id(conn, id)?
            .map(Some)
            .ok_or_else(|| LedgerError::AssetNotFound(format!("#{}", id)));
    }
    match data.asset_name.as_deref() {
        Some(hint) if !hint.trim().is_empty() => {
            let found = store::find_asset_fuzzy(conn, hint)?;
            if found.is_none() {
                tracing::warn!(hint, "asset hint did not resolve, recording unlinked");
            }
            Ok(found)
        }
        _ => Ok(None),
    }
}

fn find_duplicate(
    conn: &Connection,
    amount: Decimal,
    tx_type: TxType,
    category: Option<&str>,
    now: &NaiveDateTime,
) -> Result<Option<i64>> {
    let since = *now - Duration::hours(DUPLICATE_WINDOW_HOURS);
    let mut stmt = conn.prepare(
        "SELECT id, amount FROM transactions
         WHERE type=?1 AND category IS ?2 AND timestamp >= ?3 AND timestamp <= ?4
         ORDER BY id DESC",
    )?;
    let mut rows = stmt.query(params![
        tx_type.as_str(),
        category,
        fmt_ts(&since),
        fmt_ts(now)
    ])?;
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let stored: String = r.get(1)?;
        let stored = stored
            .parse::<Decimal>()
            .map_err(|_| LedgerError::InvalidData(format!("stored amount '{}' on #{}", stored, id)))?;
        if stored == amount {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
