// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Structured intents produced by the classifier.
//!
//! A classified input is either actionable data (a transaction, asset balance
//! observations, or both at once), a transfer, a delete request, a query, or a
//! chat reply.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::error::{LedgerError, Result};
use crate::models::TxType;

const DEFAULT_CHAT_REPLY: &str = "I'm here to help you manage your finances!";
const UNCLEAR_DELETE_REPLY: &str = "I'm not sure which transaction you want me to delete.";
const UNCLEAR_TRANSFER_REPLY: &str =
    "To record a transfer I need the source account, the destination account and an amount.";

/// Transaction payload of a record intent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TxData {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type", default = "default_tx_type", deserialize_with = "de_tx_type")]
    pub r#type: TxType,
    #[serde(default)]
    pub description: Option<String>,
    /// Fuzzy hint; resolved by substring match.
    #[serde(default)]
    pub asset_name: Option<String>,
    /// Explicit asset id; wins over `asset_name`. Never read from the wire.
    #[serde(skip)]
    pub asset_id: Option<i64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TxData {
    pub fn new(amount: Decimal, r#type: TxType) -> Self {
        Self {
            amount: Some(amount),
            currency: None,
            category: None,
            r#type,
            description: None,
            asset_name: None,
            asset_id: None,
            date: None,
        }
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn asset_name(mut self, name: &str) -> Self {
        self.asset_name = Some(name.to_string());
        self
    }

    pub fn asset_id(mut self, id: i64) -> Self {
        self.asset_id = Some(id);
        self
    }

    /// True when the payload carries a positive amount.
    pub fn is_actionable(&self) -> bool {
        self.amount.is_some_and(|a| a > Decimal::ZERO)
    }
}

fn default_tx_type() -> TxType {
    TxType::Expense
}

fn de_tx_type<'de, D>(d: D) -> std::result::Result<TxType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    match raw {
        Some(s) => s.parse::<TxType>().map_err(serde::de::Error::custom),
        None => Ok(default_tx_type()),
    }
}

/// One authoritative balance reading for a named asset.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetObservation {
    pub name: String,
    pub balance: Decimal,
    pub category: Option<String>,
    pub currency: Option<String>,
}

impl AssetObservation {
    pub fn new(name: &str, balance: Decimal) -> Self {
        Self {
            name: name.to_string(),
            balance,
            category: None,
            currency: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Last,
    Search(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub specific_category: Option<String>,
    pub time_period: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Transaction, observations, or both ("mixed" input).
    Record {
        transaction: Option<TxData>,
        assets: Vec<AssetObservation>,
    },
    Transfer(TransferRequest),
    Delete(DeleteTarget),
    Query(QueryRequest),
    Chat(String),
}

impl Intent {
    pub fn chat(reply: &str) -> Self {
        Intent::Chat(reply.to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawObservation {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    balance: Option<Decimal>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTransfer {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    amount: Option<Decimal>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIntent {
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    transaction_data: Option<TxData>,
    #[serde(default)]
    assets: Option<Vec<RawObservation>>,
    #[serde(default)]
    transfer: Option<RawTransfer>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    search_term: Option<String>,
    #[serde(default)]
    specific_category: Option<String>,
    #[serde(default)]
    time_period: Option<String>,
    #[serde(default)]
    reply: Option<String>,
}

impl From<RawIntent> for Intent {
    fn from(raw: RawIntent) -> Self {
        let transaction = raw.transaction_data.filter(TxData::is_actionable);
        let assets: Vec<AssetObservation> = raw
            .assets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|o| {
                let name = o.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;
                Some(AssetObservation {
                    name,
                    balance: o.balance?,
                    category: o.category.filter(|c| !c.trim().is_empty()),
                    currency: o.currency.filter(|c| !c.trim().is_empty()),
                })
            })
            .collect();

        if transaction.is_some() || !assets.is_empty() {
            return Intent::Record {
                transaction,
                assets,
            };
        }

        let tag = raw.intent.unwrap_or_default().trim().to_ascii_uppercase();
        match tag.as_str() {
            "TRANSFER" => {
                let t = raw.transfer.unwrap_or_default();
                let from = t.from.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
                let to = t.to.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
                match (from, to, t.amount) {
                    (Some(from), Some(to), Some(amount)) if amount > Decimal::ZERO => {
                        Intent::Transfer(TransferRequest { from, to, amount })
                    }
                    _ => Intent::chat(UNCLEAR_TRANSFER_REPLY),
                }
            }
            "DELETE" => {
                let target = raw.target.unwrap_or_default().trim().to_ascii_uppercase();
                let term = raw
                    .search_term
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty());
                match (target.as_str(), term) {
                    ("LAST", _) => Intent::Delete(DeleteTarget::Last),
                    ("SEARCH", Some(term)) => Intent::Delete(DeleteTarget::Search(term)),
                    _ => Intent::chat(UNCLEAR_DELETE_REPLY),
                }
            }
            "QUERY" => Intent::Query(QueryRequest {
                specific_category: raw.specific_category.filter(|s| !s.trim().is_empty()),
                time_period: raw.time_period.filter(|s| !s.trim().is_empty()),
            }),
            _ => Intent::Chat(raw.reply.unwrap_or_else(|| DEFAULT_CHAT_REPLY.to_string())),
        }
    }
}

/// Parse a classifier reply into an [`Intent`].
///
/// Models often wrap the JSON in code fences or prose, so the outermost
/// `{ ... }` span is extracted before decoding.
pub fn parse_reply(response: &str) -> Result<Intent> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => {
            let json_str = &response[s..=e];
            let raw: RawIntent = serde_json::from_str(json_str).map_err(|e| {
                let truncated = if json_str.len() > 200 {
                    format!("{}...", truncate(json_str, 200))
                } else {
                    json_str.to_string()
                };
                LedgerError::Classifier(format!("Invalid intent JSON: {} | Raw: {}", e, truncated))
            })?;
            Ok(raw.into())
        }
        _ => Err(LedgerError::Classifier(format!(
            "No JSON found in classifier reply | Raw: {}",
            truncate(response, 200)
        ))),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_intent_inside_code_fence() {
        let reply = r#"```json
        {
            "intent": "MIXED",
            "transaction_data": {"amount": 12.5, "currency": "CNY", "category": "Yield",
                                 "type": "income", "description": "Fund profit"},
            "assets": [
                {"name": "Yu'e Bao", "balance": 10250.75, "category": "FUND"},
                {"name": "", "balance": 3},
                {"name": "Broken"}
            ]
        }
        ```"#;
        let intent = parse_reply(reply).unwrap();
        match intent {
            Intent::Record {
                transaction,
                assets,
            } => {
                let tx = transaction.unwrap();
                assert_eq!(tx.r#type, TxType::Income);
                assert_eq!(tx.amount, Some("12.5".parse().unwrap()));
                assert_eq!(assets.len(), 1);
                assert_eq!(assets[0].name, "Yu'e Bao");
                assert_eq!(assets[0].category.as_deref(), Some("FUND"));
            }
            other => panic!("unexpected intent {:?}", other),
        }
    }

    #[test]
    fn zero_amount_is_not_actionable() {
        let intent =
            parse_reply(r#"{"intent":"RECORD","transaction_data":{"amount":0},"reply":"hm"}"#)
                .unwrap();
        assert_eq!(intent, Intent::chat("hm"));
    }

    #[test]
    fn delete_search_needs_a_term() {
        let intent = parse_reply(r#"{"intent":"DELETE","target":"SEARCH"}"#).unwrap();
        assert_eq!(intent, Intent::chat(UNCLEAR_DELETE_REPLY));
        let intent =
            parse_reply(r#"{"intent":"DELETE","target":"search","search_term":" coffee "}"#)
                .unwrap();
        assert_eq!(intent, Intent::Delete(DeleteTarget::Search("coffee".into())));
    }

    #[test]
    fn transfer_needs_both_sides_and_amount() {
        let intent = parse_reply(
            r#"{"intent":"TRANSFER","transfer":{"from":"Alipay","to":"Visa","amount":"200"}}"#,
        )
        .unwrap();
        assert_eq!(
            intent,
            Intent::Transfer(TransferRequest {
                from: "Alipay".into(),
                to: "Visa".into(),
                amount: Decimal::from(200),
            })
        );
        let intent =
            parse_reply(r#"{"intent":"TRANSFER","transfer":{"from":"Alipay","amount":5}}"#)
                .unwrap();
        assert_eq!(intent, Intent::chat(UNCLEAR_TRANSFER_REPLY));
    }

    #[test]
    fn query_and_chat_fallback() {
        let intent =
            parse_reply(r#"{"intent":"QUERY","specific_category":"Food","time_period":""}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::Query(QueryRequest {
                specific_category: Some("Food".into()),
                time_period: None,
            })
        );
        assert_eq!(
            parse_reply(r#"{"intent":"CHAT"}"#).unwrap(),
            Intent::chat(DEFAULT_CHAT_REPLY)
        );
    }

    #[test]
    fn garbage_reply_is_a_classifier_error() {
        assert!(matches!(
            parse_reply("sorry, I cannot help"),
            Err(LedgerError::Classifier(_))
        ));
        assert!(matches!(
            parse_reply("{not json}"),
            Err(LedgerError::Classifier(_))
        ));
    }
}
