use std::sync::OnceLock;

use chrono::NaiveDate;
use finlens_core::{sort_chronologically, Money, TransactionRecord, TransactionType};
use regex::Regex;
use thiserror::Error;

use crate::names;

/// Statement dates are day-month-year.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

fn re_line() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"(\d{2}-\d{2}-\d{4})\s+(.*?)\s+(\d{1,3}(?:,\d{3})*\.\d{2})\((Dr|Cr)\)")
            .expect("invalid regex")
    })
}

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("No valid transactions found")]
    NoTransactions,
}

/// Parse one `DATE NARRATION AMOUNT(Dr|Cr)` line. The name is left as
/// `Unknown`; see [`names::assign_names`].
pub fn parse_line(line: &str) -> Option<TransactionRecord> {
    let c = re_line().captures(line)?;
    let date = NaiveDate::parse_from_str(c.get(1)?.as_str(), DATE_FORMAT).ok()?;
    let narration = c.get(2)?.as_str().trim();
    let amount = Money::parse(c.get(3)?.as_str())?;
    let kind = TransactionType::from_marker(c.get(4)?.as_str())?;
    Some(TransactionRecord::new(date, narration, kind, amount))
}

/// Every parseable line in statement order. Lines that do not parse are
/// skipped silently.
pub fn parse_transactions(text: &str) -> Vec<TransactionRecord> {
    text.lines()
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                tracing::debug!(line, "skipping statement line");
            }
            parsed
        })
        .collect()
}

/// Full statement pass: parse lines, infer counterparties, sort by date.
pub fn parse_statement(text: &str) -> Result<Vec<TransactionRecord>, StatementError> {
    let mut records = parse_transactions(text);
    if records.is_empty() {
        return Err(StatementError::NoTransactions);
    }
    names::assign_names(&mut records);
    sort_chronologically(&mut records);
    tracing::info!(count = records.len(), "statement parsed");
    Ok(records)
}
