use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::money::Money;

/// The known structured layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BankStatement,
    ProfitLoss,
    BalanceSheet,
    CashFlow,
    Invoice,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::BankStatement,
        DocumentType::ProfitLoss,
        DocumentType::BalanceSheet,
        DocumentType::CashFlow,
        DocumentType::Invoice,
    ];

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::BankStatement => "Bank Statements",
            DocumentType::ProfitLoss => "Profit & Loss Statements",
            DocumentType::BalanceSheet => "Balance Sheets",
            DocumentType::CashFlow => "Cash Flow Statements",
            DocumentType::Invoice => "Invoice",
        }
    }

    /// Chart title used when presenting the extracted fields.
    pub fn summary_title(self) -> &'static str {
        match self {
            DocumentType::BankStatement => "Bank Statement Analysis",
            DocumentType::ProfitLoss => "Profit & Loss Summary",
            DocumentType::BalanceSheet => "Balance Sheet Summary",
            DocumentType::CashFlow => "Cash Flow Summary",
            DocumentType::Invoice => "Invoice Breakdown",
        }
    }

    /// Bank statements produce a transaction table rather than a field map.
    pub fn is_tabular(self) -> bool {
        matches!(self, DocumentType::BankStatement)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = String;

    /// Accepts the menu label or a short kebab-case alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        match key.as_str() {
            "bank statements" | "bank-statement" | "bank_statement" => Ok(DocumentType::BankStatement),
            "profit & loss statements" | "profit-loss" | "profit_loss" | "pnl" => {
                Ok(DocumentType::ProfitLoss)
            }
            "balance sheets" | "balance-sheet" | "balance_sheet" => Ok(DocumentType::BalanceSheet),
            "cash flow statements" | "cash-flow" | "cash_flow" => Ok(DocumentType::CashFlow),
            "invoice" | "invoices" => Ok(DocumentType::Invoice),
            _ => Err(format!("Unknown document type: '{s}'")),
        }
    }
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Amount(Money),
    Text(String),
}

impl FieldValue {
    pub fn as_amount(&self) -> Option<Money> {
        match self {
            FieldValue::Amount(m) => Some(*m),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Amount(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Amount(m) => write!(f, "{m}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

/// Named results of one extraction pass, kept in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Replacing keeps the first position.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn insert_amount(&mut self, name: impl Into<String>, amount: Money) {
        self.insert(name, FieldValue::Amount(amount));
    }

    pub fn insert_text(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.insert(name, FieldValue::Text(text.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn amount(&self, name: &str) -> Option<Money> {
        self.get(name).and_then(FieldValue::as_amount)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Only the numeric fields, for charting.
    pub fn amounts(&self) -> impl Iterator<Item = (&str, Money)> {
        self.entries
            .iter()
            .filter_map(|(n, v)| v.as_amount().map(|m| (n.as_str(), m)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_type_parses_labels_and_aliases() {
        for t in DocumentType::ALL {
            assert_eq!(DocumentType::from_str(t.label()).unwrap(), t);
        }
        assert_eq!(DocumentType::from_str("cash-flow").unwrap(), DocumentType::CashFlow);
        assert_eq!(DocumentType::from_str(" INVOICE ").unwrap(), DocumentType::Invoice);
        assert!(DocumentType::from_str("Stock Market Analyzer").is_err());
    }

    #[test]
    fn only_bank_statements_are_tabular() {
        assert!(DocumentType::BankStatement.is_tabular());
        assert!(!DocumentType::Invoice.is_tabular());
    }

    #[test]
    fn field_map_keeps_insertion_order() {
        let mut map = FieldMap::new();
        map.insert_amount("Total Assets", Money::from_paise(100));
        map.insert_text("Invoice Number", "INV-1");
        map.insert_amount("Total Assets", Money::from_paise(200));

        let names: Vec<_> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Total Assets", "Invoice Number"]);
        assert_eq!(map.amount("Total Assets"), Some(Money::from_paise(200)));
        assert_eq!(map.text("Invoice Number"), Some("INV-1"));
        assert_eq!(map.amounts().count(), 1);
    }

    #[test]
    fn field_map_serializes_as_ordered_object() {
        let mut map = FieldMap::new();
        map.insert_text("Invoice Number", "N/A");
        map.insert_amount("CGST", Money::from_paise(90_000));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Invoice Number":"N/A","CGST":"900.00"}"#);
    }
}
