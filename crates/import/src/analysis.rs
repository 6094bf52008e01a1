use std::collections::HashMap;

use chrono::NaiveDate;
use finlens_core::{Money, TransactionRecord, TransactionType};
use serde::Serialize;

/// Headline figures for a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    #[serde(rename = "Total Deposits")]
    pub total_deposits: Money,
    #[serde(rename = "Total Withdrawals")]
    pub total_withdrawals: Money,
    #[serde(rename = "Highest Deposit")]
    pub highest_deposit: Option<Money>,
    #[serde(rename = "Highest Withdrawal")]
    pub highest_withdrawal: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyShare {
    pub name: String,
    pub count: usize,
    /// Fraction of all transactions, 0.0–1.0.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementAnalysis {
    pub summary: StatementSummary,
    pub distribution: Vec<CounterpartyShare>,
    pub timeline: Vec<TimelinePoint>,
}

pub fn summarize(records: &[TransactionRecord]) -> StatementSummary {
    let credits = || records.iter().filter(|r| r.is_credit()).map(|r| r.amount);
    let debits = || records.iter().filter(|r| r.is_debit()).map(|r| r.amount);

    StatementSummary {
        total_deposits: total(credits()),
        total_withdrawals: total(debits()),
        highest_deposit: credits().max(),
        highest_withdrawal: debits().max(),
    }
}

/// Amounts that would overflow the running total are left out.
fn total(amounts: impl Iterator<Item = Money>) -> Money {
    amounts.fold(Money::zero(), |sum, amount| match sum.checked_add(amount) {
        Some(next) => next,
        None => {
            tracing::warn!(%amount, "amount overflows statement total, skipped");
            sum
        }
    })
}

/// Transaction count per counterparty, most frequent first, ties by name.
pub fn counterparty_distribution(records: &[TransactionRecord]) -> Vec<CounterpartyShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *counts.entry(r.name.as_str()).or_default() += 1;
    }

    let total = records.len().max(1) as f64;
    let mut shares: Vec<CounterpartyShare> = counts
        .into_iter()
        .map(|(name, count)| CounterpartyShare {
            name: name.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    shares
}

/// Amounts over time in chronological order.
pub fn timeline(records: &[TransactionRecord]) -> Vec<TimelinePoint> {
    let mut points: Vec<TimelinePoint> = records
        .iter()
        .map(|r| TimelinePoint { date: r.date, kind: r.kind, amount: r.amount })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

pub fn analyze(records: &[TransactionRecord]) -> StatementAnalysis {
    StatementAnalysis {
        summary: summarize(records),
        distribution: counterparty_distribution(records),
        timeline: timeline(records),
    }
}
