use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    /// Statement suffix: `Cr` or `Dr`.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "Cr" => Some(TransactionType::Credit),
            "Dr" => Some(TransactionType::Debit),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Credit => write!(f, "Credit"),
            TransactionType::Debit => write!(f, "Debit"),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Credit" | "Cr" => Ok(TransactionType::Credit),
            "Debit" | "Dr" => Ok(TransactionType::Debit),
            other => Err(format!("Unknown transaction type: '{other}'")),
        }
    }
}

/// One row of a bank statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub narration: String,
    pub kind: TransactionType,
    pub amount: Money,
    /// Counterparty inferred from the narration.
    pub name: String,
}

impl TransactionRecord {
    pub fn new(date: NaiveDate, narration: impl Into<String>, kind: TransactionType, amount: Money) -> Self {
        Self {
            date,
            narration: narration.into(),
            kind,
            amount,
            name: UNKNOWN_COUNTERPARTY.to_string(),
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.kind == TransactionType::Debit
    }
}

/// Stable chronological sort; same-day rows keep statement order.
pub fn sort_chronologically(records: &mut [TransactionRecord]) {
    records.sort_by_key(|r| r.date);
}
