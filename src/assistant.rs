// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One message in, one reply out.
//!
//! Classifies the input, routes the intent to the ledger or the analyzer, and
//! renders the reply. A classifier failure never reaches the ledger.

use chrono::NaiveDateTime;

use crate::classifier::{Classifier, ClassifierInput};
use crate::error::{LedgerError, Result};
use crate::intent::{DeleteTarget, Intent};
use crate::ledger::Ledger;
use crate::models::Origin;
use crate::report;

pub const CLASSIFIER_FALLBACK_REPLY: &str =
    "Sorry, I couldn't understand that right now. Please try again, or use an explicit command.";

/// Handle one free-form input end to end.
pub fn handle_input(
    ledger: &mut Ledger,
    classifier: &dyn Classifier,
    input: &ClassifierInput,
) -> String {
    let intent = match classifier.classify(input) {
        Ok(intent) => intent,
        Err(e) => {
            tracing::warn!(error = %e, "classifier failed, falling back to chat");
            return CLASSIFIER_FALLBACK_REPLY.to_string();
        }
    };
    let as_of = ledger.now();
    match handle_intent(ledger, &intent, &input.text, as_of) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "failed to apply intent");
            format!("Error: {}", e)
        }
    }
}

/// Apply an already classified intent and render the reply.
pub fn handle_intent(
    ledger: &mut Ledger,
    intent: &Intent,
    raw_text: &str,
    as_of: NaiveDateTime,
) -> Result<String> {
    match intent {
        Intent::Record {
            transaction,
            assets,
        } => {
            let mut parts = Vec::new();
            if let Some(data) = transaction {
                let outcome = ledger.apply_transaction(data, Origin::AutoDetected, raw_text)?;
                parts.push(report::apply_outcome(&outcome));
            }
            if !assets.is_empty() {
                let summary = ledger.apply_asset_observations(assets)?;
                parts.push(report::observation_summary(&summary));
            }
            Ok(parts.join("\n\n"))
        }
        Intent::Transfer(req) => {
            match ledger.transfer(&req.from, &req.to, req.amount, Origin::AutoDetected) {
                Ok(outcome) => Ok(report::transfer_outcome(&outcome)),
                Err(LedgerError::AssetNotFound(name)) => {
                    Ok(format!("I couldn't find an asset matching '{}'.", name))
                }
                Err(LedgerError::InvalidTransfer(reason)) => {
                    Ok(format!("That transfer doesn't work: {}.", reason))
                }
                Err(e) => Err(e),
            }
        }
        Intent::Delete(target) => {
            let outcome = ledger.delete(target)?;
            let term = match target {
                DeleteTarget::Last => None,
                DeleteTarget::Search(term) => Some(term.as_str()),
            };
            Ok(report::delete_outcome(&outcome, term))
        }
        Intent::Query(q) => {
            let analyzer = ledger.analyzer();
            match q.specific_category.as_deref() {
                Some(category) => {
                    let total = analyzer.category_spending(category, as_of)?;
                    Ok(report::category_spending(category, &total))
                }
                None => {
                    let monthly = analyzer.monthly_summary(as_of)?;
                    let assets = analyzer.asset_summary()?;
                    let net_worth = analyzer.net_worth()?;
                    Ok(report::financial_context(&monthly, &assets, &net_worth))
                }
            }
        }
        Intent::Chat(reply) => Ok(reply.clone()),
    }
}
