// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::params;
use rust_decimal::Decimal;

use super::polarity::balance_delta;
use super::{Ledger, NewTransaction, adjust_balance, insert_transaction};
use crate::error::{LedgerError, Result};
use crate::models::{Asset, Origin, TRANSFER_CATEGORY, Transaction, TxType};
use crate::store;

#[derive(Debug, Clone, PartialEq)]
pub struct TransferOutcome {
    pub source: Asset,
    pub destination: Asset,
    /// EXPENSE leg on the source.
    pub debit: Transaction,
    /// INCOME leg on the destination.
    pub credit: Transaction,
}

impl Ledger {
    /// Move `amount` between two assets resolved by fuzzy name.
    ///
    /// The source takes an EXPENSE effect and the destination an INCOME
    /// effect, so paying a card from cash lowers both balances. Two rows are
    /// written, each pointing at the other through `counterpart_id`.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: Decimal,
        origin: Origin,
    ) -> Result<TransferOutcome> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(amount.to_string()));
        }
        let now = self.now();

        let tx = self.conn.transaction()?;
        let source = store::find_asset_fuzzy(&tx, from)?
            .ok_or_else(|| LedgerError::AssetNotFound(from.trim().to_string()))?;
        let destination = store::find_asset_fuzzy(&tx, to)?
            .ok_or_else(|| LedgerError::AssetNotFound(to.trim().to_string()))?;
        if source.id == destination.id {
            return Err(LedgerError::InvalidTransfer(format!(
                "'{}' and '{}' both resolve to {}",
                from, to, source.name
            )));
        }

        let raw = format!(
            "{} transfer {} -> {} {}",
            origin.tag(),
            source.name,
            destination.name,
            amount
        );
        let debit_desc = format!("Transfer to {}", destination.name);
        let credit_desc = format!("Transfer from {}", source.name);

        let debit = insert_transaction(
            &tx,
            &NewTransaction {
                timestamp: now,
                amount,
                currency: &source.currency,
                category: Some(TRANSFER_CATEGORY),
                tx_type: TxType::Expense,
                description: &debit_desc,
                raw_text: &raw,
                asset_id: Some(source.id),
            },
        )?;
        let credit = insert_transaction(
            &tx,
            &NewTransaction {
                timestamp: now,
                amount,
                currency: &source.currency,
                category: Some(TRANSFER_CATEGORY),
                tx_type: TxType::Income,
                description: &credit_desc,
                raw_text: &raw,
                asset_id: Some(destination.id),
            },
        )?;
        tx.execute(
            "UPDATE transactions SET counterpart_id=?1 WHERE id=?2",
            params![credit.id, debit.id],
        )?;
        tx.execute(
            "UPDATE transactions SET counterpart_id=?1 WHERE id=?2",
            params![debit.id, credit.id],
        )?;

        let source = adjust_balance(
            &tx,
            &source,
            balance_delta(source.kind, TxType::Expense, amount),
            &now,
        )?;
        let destination = adjust_balance(
            &tx,
            &destination,
            balance_delta(destination.kind, TxType::Income, amount),
            &now,
        )?;
        let debit = Transaction {
            counterpart_id: Some(credit.id),
            ..debit
        };
        let credit = Transaction {
            counterpart_id: Some(debit.id),
            ..credit
        };
        tx.commit()?;

        tracing::info!(
            from = %source.name,
            to = %destination.name,
            %amount,
            "transfer recorded"
        );
        Ok(TransferOutcome {
            source,
            destination,
            debit,
            credit,
        })
    }
}
