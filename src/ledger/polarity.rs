// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sign convention between transaction type and asset kind.
//!
//! Every balance mutation in the ledger goes through [`balance_delta`] or its
//! inverse [`reversal_delta`]; recording, transfers and deletions never
//! compute signs on their own.
//!
//! | kind                        | EXPENSE | INCOME |
//! |-----------------------------|---------|--------|
//! | LIQUID / INVESTMENT / OTHER | -amount | +amount|
//! | CREDIT (balance is debt)    | +amount | -amount|

use rust_decimal::Decimal;

use crate::models::{AssetKind, TxType};

/// Signed change applied to an asset balance when a transaction is recorded.
pub fn balance_delta(kind: AssetKind, tx_type: TxType, amount: Decimal) -> Decimal {
    let magnitude = amount.abs();
    match (kind, tx_type) {
        (AssetKind::Credit, TxType::Expense) => magnitude,
        (AssetKind::Credit, TxType::Income) => -magnitude,
        (_, TxType::Expense) => -magnitude,
        (_, TxType::Income) => magnitude,
    }
}

/// Signed change that undoes [`balance_delta`] for the same inputs.
pub fn reversal_delta(kind: AssetKind, tx_type: TxType, amount: Decimal) -> Decimal {
    -balance_delta(kind, tx_type, amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [AssetKind; 4] = [
        AssetKind::Liquid,
        AssetKind::Credit,
        AssetKind::Investment,
        AssetKind::Other,
    ];

    #[test]
    fn credit_debt_grows_on_expense() {
        let hundred = Decimal::from(100);
        assert_eq!(balance_delta(AssetKind::Credit, TxType::Expense, hundred), hundred);
        assert_eq!(balance_delta(AssetKind::Credit, TxType::Income, hundred), -hundred);
        assert_eq!(balance_delta(AssetKind::Liquid, TxType::Expense, hundred), -hundred);
        assert_eq!(balance_delta(AssetKind::Investment, TxType::Income, hundred), hundred);
    }

    #[test]
    fn reversal_cancels_every_combination() {
        let amount: Decimal = "42.17".parse().unwrap();
        for kind in KINDS {
            for tx_type in [TxType::Income, TxType::Expense] {
                let sum = balance_delta(kind, tx_type, amount) + reversal_delta(kind, tx_type, amount);
                assert!(sum.is_zero(), "{kind} {tx_type}");
            }
        }
    }
}
