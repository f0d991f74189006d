// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Storage format for every timestamp column. Sorts lexically.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Category given to both legs of a transfer.
pub const TRANSFER_CATEGORY: &str = "TRANSFER";

/// Display bucket for assets without a category.
pub const DEFAULT_ASSET_CATEGORY: &str = "OTHERS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TxType {
    Income,
    Expense,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "INCOME",
            TxType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TxType::Income),
            "EXPENSE" => Ok(TxType::Expense),
            other => Err(LedgerError::InvalidData(format!(
                "unknown transaction type '{}'",
                other
            ))),
        }
    }
}

/// Asset kind. Governs balance polarity, not display grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetKind {
    Liquid,
    Credit,
    Investment,
    Other,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Liquid => "LIQUID",
            AssetKind::Credit => "CREDIT",
            AssetKind::Investment => "INVESTMENT",
            AssetKind::Other => "OTHER",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LIQUID" => Ok(AssetKind::Liquid),
            "CREDIT" => Ok(AssetKind::Credit),
            "INVESTMENT" => Ok(AssetKind::Investment),
            "OTHER" => Ok(AssetKind::Other),
            other => Err(LedgerError::InvalidData(format!(
                "unknown asset kind '{}'",
                other
            ))),
        }
    }
}

/// Where a transaction came from. Prefixed onto `raw_text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Manual,
    Guided,
    AutoDetected,
}

impl Origin {
    pub fn tag(&self) -> &'static str {
        match self {
            Origin::Manual => "[Manual]",
            Origin::Guided => "[Guided]",
            Origin::AutoDetected => "[Auto-Detected]",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub amount: Decimal,
    pub currency: String,
    pub category: Option<String>,
    pub r#type: TxType,
    pub description: String,
    pub raw_text: String,
    pub asset_id: Option<i64>,
    pub counterpart_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub kind: AssetKind,
    pub balance: Decimal,
    pub currency: String,
    pub credit_limit: Option<Decimal>,
    pub billing_day: Option<u32>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub limit_amount: Decimal,
    pub currency: String,
    pub alert_threshold: Decimal,
    pub updated_at: NaiveDateTime,
}
