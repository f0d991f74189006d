// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Text rendering for aggregates and ledger outcomes.
//!
//! Every function here is pure: same input, same text. The output is fed both
//! to the terminal and to the classifier as context for free-form questions.

use rust_decimal::Decimal;

use crate::analyzer::{AssetSummary, BudgetLine, MonthlySummary, WeeklyTrend};
use crate::ledger::{ApplyOutcome, DeleteOutcome, ObservationSummary, TransferOutcome};
use crate::models::Transaction;

fn money(d: &Decimal) -> String {
    format!("{:.2}", d)
}

pub fn monthly_summary(s: &MonthlySummary) -> String {
    let mut out = format!(
        "Period: {}\nTotal Income: {}\nTotal Expense: {}\nNet Savings: {}\nSavings Rate: {:.1}%\nDaily Avg Expense: {}\n",
        s.period,
        money(&s.total_income),
        money(&s.total_expense),
        money(&s.net_savings),
        s.savings_rate,
        money(&s.daily_average),
    );
    out.push_str("Expense Breakdown:\n");
    if s.categories.is_empty() {
        out.push_str("- (none)\n");
    }
    // largest first, name breaks ties
    let mut cats: Vec<(&String, &Decimal)> = s.categories.iter().collect();
    cats.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (name, amount) in cats {
        out.push_str(&format!("- {}: {}\n", name, money(amount)));
    }
    out.trim_end().to_string()
}

pub fn asset_summary(s: &AssetSummary) -> String {
    let mut out = format!("Total Asset Balance: {}\nDistribution:\n", money(&s.total_balance));
    if s.distribution.is_empty() {
        out.push_str("- (no assets)\n");
    }
    for (category, amount) in &s.distribution {
        out.push_str(&format!("- {}: {}\n", category, money(amount)));
    }
    out.trim_end().to_string()
}

pub fn weekly_trend(t: &WeeklyTrend) -> String {
    format!(
        "This Week: {}\nLast Week: {}\nTrend: {}",
        money(&t.this_week_total),
        money(&t.last_week_total),
        t.trend_description
    )
}

pub fn budget_status(lines: &[BudgetLine]) -> String {
    if lines.is_empty() {
        return "No budgets set.".to_string();
    }
    lines
        .iter()
        .map(|b| {
            let mut line = format!(
                "{}: {} / {} {}\n{} {:.0}%",
                b.category,
                money(&b.spent),
                money(&b.limit),
                b.currency,
                b.bar,
                b.percent
            );
            if b.alert {
                line.push_str(" (over alert threshold)");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn category_spending(category: &str, total: &Decimal) -> String {
    format!("Total spent on {} this month: {}", category, money(total))
}

/// Monthly summary, asset distribution and net worth in one block.
pub fn financial_context(
    monthly: &MonthlySummary,
    assets: &AssetSummary,
    net_worth: &Decimal,
) -> String {
    format!(
        "--- Financial Summary ---\n{}\n\n--- Asset Distribution ---\n{}\nNet Worth: {}",
        monthly_summary(monthly),
        asset_summary(assets),
        money(net_worth)
    )
}

pub fn apply_outcome(outcome: &ApplyOutcome) -> String {
    match outcome {
        ApplyOutcome::Recorded { transaction, asset } => {
            let mut out = format!(
                "Recorded {}\n{}: {} {}",
                transaction.r#type,
                transaction.category.as_deref().unwrap_or("Uncategorized"),
                transaction.amount,
                transaction.currency
            );
            if let Some(a) = asset {
                out.push_str(&format!("\n{} balance: {} {}", a.name, money(&a.balance), a.currency));
            }
            out
        }
        ApplyOutcome::SkippedDuplicate { data, .. } => format!(
            "Skipped Duplicate: {} {} (recorded recently)",
            data.r#type,
            data.amount.map(|a| a.to_string()).unwrap_or_default()
        ),
    }
}

pub fn observation_summary(s: &ObservationSummary) -> String {
    if s.is_empty() {
        return "No asset data found or all up to date.".to_string();
    }
    let mut parts = Vec::new();
    if !s.updated.is_empty() {
        let lines: Vec<String> = s
            .updated
            .iter()
            .map(|a| format!("- {}: {} {}", a.name, a.balance, a.currency))
            .collect();
        parts.push(format!("Assets Updated:\n{}", lines.join("\n")));
    }
    if !s.unchanged.is_empty() {
        parts.push(format!("Unchanged: {}", s.unchanged.join(", ")));
    }
    if !s.failed.is_empty() {
        let lines: Vec<String> = s
            .failed
            .iter()
            .map(|(name, reason)| format!("- {}: {}", name, reason))
            .collect();
        parts.push(format!("Not Updated:\n{}", lines.join("\n")));
    }
    parts.join("\n\n")
}

pub fn transfer_outcome(t: &TransferOutcome) -> String {
    format!(
        "Transferred {} {} from {} to {}\n{}: {} {}\n{}: {} {}",
        t.debit.amount,
        t.debit.currency,
        t.source.name,
        t.destination.name,
        t.source.name,
        money(&t.source.balance),
        t.source.currency,
        t.destination.name,
        money(&t.destination.balance),
        t.destination.currency
    )
}

fn tx_brief(t: &Transaction) -> String {
    format!("{} ({} {})", t.description, t.amount, t.currency)
}

/// `term` is the search term, or `None` for a delete-last request.
pub fn delete_outcome(outcome: &DeleteOutcome, term: Option<&str>) -> String {
    match outcome {
        DeleteOutcome::NotFound => match term {
            Some(term) => format!("I couldn't find any transaction matching '{}'.", term),
            None => "Your transaction history is empty.".to_string(),
        },
        DeleteOutcome::Ambiguous { total, candidates } => {
            let mut out = format!(
                "Found {} matches for '{}'. Please be more specific (e.g. mention the amount).\n",
                total,
                term.unwrap_or_default()
            );
            for c in candidates {
                out.push_str(&format!("\n- {}", tx_brief(c)));
            }
            out
        }
        DeleteOutcome::Deleted { removed, restored } => {
            let mut out = removed
                .iter()
                .map(|t| format!("Deleted: {}", tx_brief(t)))
                .collect::<Vec<_>>()
                .join("\n");
            for a in restored {
                out.push_str(&format!("\n{} balance: {} {}", a.name, money(&a.balance), a.currency));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn summary() -> MonthlySummary {
        let mut categories = BTreeMap::new();
        categories.insert("Food".to_string(), Decimal::from(300));
        categories.insert("Rent".to_string(), Decimal::from(700));
        MonthlySummary {
            period: "March 2026".into(),
            total_income: Decimal::from(5000),
            total_expense: Decimal::from(1000),
            net_savings: Decimal::from(4000),
            savings_rate: Decimal::from(80),
            daily_average: Decimal::from(100),
            categories,
        }
    }

    #[test]
    fn monthly_lists_biggest_category_first() {
        let text = monthly_summary(&summary());
        assert!(text.starts_with("Period: March 2026\nTotal Income: 5000.00"));
        assert!(text.contains("Savings Rate: 80.0%"));
        let rent = text.find("- Rent: 700.00").unwrap();
        let food = text.find("- Food: 300.00").unwrap();
        assert!(rent < food);
    }

    #[test]
    fn formatting_is_deterministic() {
        assert_eq!(monthly_summary(&summary()), monthly_summary(&summary()));
    }

    #[test]
    fn empty_observation_summary() {
        assert_eq!(
            observation_summary(&ObservationSummary::default()),
            "No asset data found or all up to date."
        );
    }
}
