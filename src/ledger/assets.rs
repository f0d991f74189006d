// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

use super::Ledger;
use crate::db::fmt_ts;
use crate::error::{LedgerError, Result};
use crate::intent::AssetObservation;
use crate::models::{Asset, AssetKind, DEFAULT_ASSET_CATEGORY};
use crate::store;

/// Differences below this are treated as the same reading.
pub const OBSERVATION_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSummary {
    pub updated: Vec<Asset>,
    pub unchanged: Vec<String>,
    /// Observations that could not be written, with the reason.
    pub failed: Vec<(String, String)>,
}

impl ObservationSummary {
    pub fn is_empty(&self) -> bool {
        self.updated.is_empty() && self.unchanged.is_empty() && self.failed.is_empty()
    }
}

/// Explicit balance-set request for one asset, matched by exact name.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetUpdate {
    pub name: String,
    pub balance: Decimal,
    pub kind: Option<AssetKind>,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub billing_day: Option<u32>,
}

impl AssetUpdate {
    pub fn new(name: &str, balance: Decimal) -> Self {
        Self {
            name: name.trim().to_string(),
            balance,
            kind: None,
            category: None,
            currency: None,
            credit_limit: None,
            billing_day: None,
        }
    }

    pub fn kind(mut self, kind: AssetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
}

enum ObservationResult {
    Updated(Asset),
    Unchanged,
}

impl Ledger {
    /// Apply authoritative balance readings.
    ///
    /// Each reading resolves by exact name. Readings within 0.01 of the stored
    /// balance are left alone; others overwrite it. Unknown names create a new
    /// asset. The batch commits as one unit, with a savepoint per reading so a
    /// bad one is reported in `failed` without sinking the rest.
    pub fn apply_asset_observations(
        &mut self,
        observations: &[AssetObservation],
    ) -> Result<ObservationSummary> {
        let now = self.now();
        let default_currency = self.config.default_currency.clone();
        let mut summary = ObservationSummary::default();

        let mut tx = self.conn.transaction()?;
        for obs in observations {
            let name = obs.name.trim();
            if name.is_empty() {
                continue;
            }
            let sp = tx.savepoint()?;
            match observe_one(&sp, name, obs, &default_currency, &now) {
                Ok(result) => {
                    sp.commit()?;
                    match result {
                        ObservationResult::Updated(asset) => summary.updated.push(asset),
                        ObservationResult::Unchanged => summary.unchanged.push(name.to_string()),
                    }
                }
                Err(e) => {
                    // dropping the savepoint rolls it back
                    drop(sp);
                    tracing::warn!(asset = name, error = %e, "asset observation failed");
                    summary.failed.push((name.to_string(), e.to_string()));
                }
            }
        }
        tx.commit()?;

        tracing::info!(
            updated = summary.updated.len(),
            unchanged = summary.unchanged.len(),
            failed = summary.failed.len(),
            "applied asset observations"
        );
        Ok(summary)
    }

    /// Set an asset's balance outright, creating the asset if needed.
    pub fn set_asset_balance(&mut self, update: &AssetUpdate) -> Result<Asset> {
        let name = update.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingArgument("asset name".into()));
        }
        let now = fmt_ts(&self.now());
        let default_currency = self.config.default_currency.clone();
        let currency = update
            .currency
            .as_deref()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty());
        let category = update
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let tx = self.conn.transaction()?;
        match store::find_asset_exact(&tx, name)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE assets SET balance=?1, kind=COALESCE(?2, kind),
                        category=COALESCE(?3, category), currency=COALESCE(?4, currency),
                        credit_limit=COALESCE(?5, credit_limit),
                        billing_day=COALESCE(?6, billing_day), updated_at=?7
                     WHERE id=?8",
                    params![
                        update.balance.to_string(),
                        update.kind.map(|k| k.as_str()),
                        category,
                        currency,
                        update.credit_limit.map(|d| d.to_string()),
                        update.billing_day,
                        now,
                        existing.id
                    ],
                )?;
            }
            None => {
                tx.execute(
                    "INSERT INTO assets(name, category, kind, balance, currency, credit_limit, billing_day, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        name,
                        category.unwrap_or(DEFAULT_ASSET_CATEGORY),
                        update.kind.unwrap_or(AssetKind::Other).as_str(),
                        update.balance.to_string(),
                        currency.as_deref().unwrap_or(&default_currency),
                        update.credit_limit.map(|d| d.to_string()),
                        update.billing_day,
                        now
                    ],
                )?;
            }
        }
        let asset = store::find_asset_exact(&tx, name)?
            .ok_or_else(|| LedgerError::AssetNotFound(name.to_string()))?;
        tx.commit()?;
        tracing::info!(asset = name, balance = %asset.balance, kind = %asset.kind, "asset balance set");
        Ok(asset)
    }

    /// Remove an asset by exact name. Its transactions stay, unlinked.
    pub fn remove_asset(&mut self, name: &str) -> Result<Asset> {
        let tx = self.conn.transaction()?;
        let asset = store::find_asset_exact(&tx, name)?
            .ok_or_else(|| LedgerError::AssetNotFound(name.trim().to_string()))?;
        let unlinked = tx.execute(
            "UPDATE transactions SET asset_id=NULL WHERE asset_id=?1",
            params![asset.id],
        )?;
        tx.execute("DELETE FROM assets WHERE id=?1", params![asset.id])?;
        tx.commit()?;
        tracing::info!(asset = %asset.name, unlinked, "asset removed");
        Ok(asset)
    }
}

fn observe_one(
    conn: &Connection,
    name: &str,
    obs: &AssetObservation,
    default_currency: &str,
    now: &NaiveDateTime,
) -> Result<ObservationResult> {
    let category = obs
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    let currency = obs
        .currency
        .as_deref()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty());

    match store::find_asset_exact(conn, name)? {
        Some(existing) => {
            // a difference too large to represent is never within epsilon
            let unchanged = existing
                .balance
                .checked_sub(obs.balance)
                .is_some_and(|d| d.abs() < OBSERVATION_EPSILON);
            if unchanged {
                return Ok(ObservationResult::Unchanged);
            }
            conn.execute(
                "UPDATE assets SET balance=?1, category=COALESCE(?2, category),
                    currency=COALESCE(?3, currency), updated_at=?4
                 WHERE id=?5",
                params![
                    obs.balance.to_string(),
                    category,
                    currency,
                    fmt_ts(now),
                    existing.id
                ],
            )?;
        }
        None => {
            conn.execute(
                "INSERT INTO assets(name, category, kind, balance, currency, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    name,
                    category.unwrap_or(DEFAULT_ASSET_CATEGORY),
                    AssetKind::Other.as_str(),
                    obs.balance.to_string(),
                    currency.as_deref().unwrap_or(default_currency),
                    fmt_ts(now)
                ],
            )?;
        }
    }
    let asset = store::find_asset_exact(conn, name)?
        .ok_or_else(|| LedgerError::AssetNotFound(name.to_string()))?;
    Ok(ObservationResult::Updated(asset))
}
