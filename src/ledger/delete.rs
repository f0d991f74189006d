// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::params;

use super::polarity::reversal_delta;
use super::{Ledger, adjust_balance};
use crate::error::Result;
use crate::intent::DeleteTarget;
use crate::models::{Asset, Transaction};
use crate::store;

/// At most this many candidates are returned for an ambiguous search.
pub const MAX_DELETE_CANDIDATES: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted {
        /// The selected transaction first, then its transfer counterpart if any.
        removed: Vec<Transaction>,
        /// Assets whose balance was restored, after the reversal.
        restored: Vec<Asset>,
    },
    NotFound,
    Ambiguous {
        total: usize,
        candidates: Vec<Transaction>,
    },
}

impl Ledger {
    /// Delete a transaction and undo its balance effect.
    ///
    /// Deleting either leg of a transfer removes both legs, so a transfer
    /// never survives half-reversed.
    pub fn delete(&mut self, target: &DeleteTarget) -> Result<DeleteOutcome> {
        let now = self.now();

        let tx = self.conn.transaction()?;
        let selected = match target {
            DeleteTarget::Last => match store::recent_transactions(&tx, Some(1))?.pop() {
                Some(t) => t,
                None => return Ok(DeleteOutcome::NotFound),
            },
            DeleteTarget::Search(term) => {
                let mut matches = store::search_transactions(&tx, term)?;
                match matches.len() {
                    0 => return Ok(DeleteOutcome::NotFound),
                    1 => matches.remove(0),
                    total => {
                        matches.truncate(MAX_DELETE_CANDIDATES);
                        return Ok(DeleteOutcome::Ambiguous {
                            total,
                            candidates: matches,
                        });
                    }
                }
            }
        };

        let mut removed = vec![selected];
        if let Some(peer_id) = removed[0].counterpart_id {
            if let Some(peer) = store::transaction_by_id(&tx, peer_id)? {
                removed.push(peer);
            }
        }

        let mut restored: Vec<Asset> = Vec::new();
        for row in &removed {
            // a dangling reference counts as unlinked
            let Some(asset_id) = row.asset_id else {
                continue;
            };
            let Some(asset) = store::asset_by_id(&tx, asset_id)? else {
                continue;
            };
            let delta = reversal_delta(asset.kind, row.r#type, row.amount);
            let updated = adjust_balance(&tx, &asset, delta, &now)?;
            restored.retain(|a| a.id != updated.id);
            restored.push(updated);
        }
        for row in &removed {
            tx.execute("DELETE FROM transactions WHERE id=?1", params![row.id])?;
        }
        tx.commit()?;

        tracing::info!(
            ids = ?removed.iter().map(|t| t.id).collect::<Vec<_>>(),
            restored = restored.len(),
            "deleted transaction"
        );
        Ok(DeleteOutcome::Deleted { removed, restored })
    }
}
