use std::sync::OnceLock;

use finlens_core::{DocumentType, FieldMap, Money};
use regex::Regex;

pub const NOT_AVAILABLE: &str = "N/A";

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_total_assets, r"Total Assets[\s\S]*?(\d{1,3}(?:,\d{3})*)");
re!(re_total_liabilities, r"Total Liabilities[\s\S]*?(\d{1,3}(?:,\d{3})*)");
re!(re_fixed_assets, r"Fixed Assets[\s\S]*?(\d{1,3}(?:,\d{3})*)");

re!(re_revenue, r"Revenue From Operations[\s\S]*?(\d{1,3}(?:,\d{3})*)");
re!(re_total_income, r"Total Income \(I \+ II\)[\s\S]*?(\d{1,3}(?:,\d{3})*)");
re!(re_total_expenses, r"Total expenses \(IV\)[\s\S]*?(\d{1,3}(?:,\d{3})*)");

re!(re_cash_operating, r"Net Cash Flow generated from/\(used in\) Operating Activities.*?([\d,]+)");
re!(re_cash_investing, r"Net Cash Flow used in Investing Activities.*?([\d,]+)");
re!(re_cash_financing, r"Net Cash Flow generated from Financing Activities.*?([\d,]+)");

re!(re_invoice_number, r"Invoice Number\s*:\s*([A-Z0-9-]+)");
re!(re_invoice_total, r"TOTAL:\s*₹([\d,]+\.\d{2})");
re!(re_cgst, r"CGST\s*₹([\d,]+\.\d{2})");
re!(re_sgst, r"SGST\s*₹([\d,]+\.\d{2})");

type FieldPattern = (&'static str, fn() -> &'static Regex);

const BALANCE_SHEET_FIELDS: &[FieldPattern] = &[
    ("Total Assets", re_total_assets),
    ("Total Liabilities", re_total_liabilities),
    ("Fixed Assets", re_fixed_assets),
];

const PROFIT_LOSS_FIELDS: &[FieldPattern] = &[
    ("Revenue From Operations", re_revenue),
    ("Total Income", re_total_income),
    ("Total Expenses", re_total_expenses),
];

const CASH_FLOW_FIELDS: &[FieldPattern] = &[
    ("Net Cash from Operating", re_cash_operating),
    ("Net Cash from Investing", re_cash_investing),
    ("Net Cash from Financing", re_cash_financing),
];

// ── Public extraction API ─────────────────────────────────────────────────────

/// Regex field extraction for the known statement layouts.
///
/// Extraction is best-effort: a field whose pattern does not match (or whose
/// capture is not a number) is reported as zero, identifiers as `N/A`.
/// Nothing is cross-checked between fields.
pub struct Extractor;

impl Extractor {
    pub fn extract(text: &str, doc_type: DocumentType) -> FieldMap {
        match doc_type {
            DocumentType::BalanceSheet => Self::balance_sheet(text),
            DocumentType::ProfitLoss => Self::profit_loss(text),
            DocumentType::CashFlow => Self::cash_flow(text),
            DocumentType::Invoice => Self::invoice(text),
            DocumentType::BankStatement => {
                tracing::debug!("bank statements are parsed as transactions, not fields");
                FieldMap::new()
            }
        }
    }

    pub fn balance_sheet(text: &str) -> FieldMap {
        apply_patterns(text, BALANCE_SHEET_FIELDS)
    }

    pub fn profit_loss(text: &str) -> FieldMap {
        apply_patterns(text, PROFIT_LOSS_FIELDS)
    }

    pub fn cash_flow(text: &str) -> FieldMap {
        apply_patterns(text, CASH_FLOW_FIELDS)
    }

    /// Invoice number, GST split and totals.
    ///
    /// The first two `TOTAL: ₹` figures are read as (tax amount, invoice
    /// total); a single figure is the invoice total. When CGST and SGST are
    /// not both printed, the tax amount is split evenly between them.
    pub fn invoice(text: &str) -> FieldMap {
        let invoice_number = re_invoice_number()
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let totals: Vec<Money> = re_invoice_total()
            .captures_iter(text)
            .filter_map(|c| Money::parse(c.get(1)?.as_str()))
            .collect();

        let (tax_amount, total_amount) = match totals.as_slice() {
            [tax, total, ..] => (*tax, *total),
            [total] => (Money::zero(), *total),
            [] => (Money::zero(), Money::zero()),
        };

        let printed = match (first_amount(re_cgst(), text), first_amount(re_sgst(), text)) {
            (Some(cgst), Some(sgst)) => match cgst.checked_add(sgst) {
                Some(total_tax) => Some((cgst, sgst, total_tax)),
                None => {
                    tracing::warn!("CGST + SGST overflows, splitting the tax amount instead");
                    None
                }
            },
            _ => None,
        };
        let (cgst, sgst, total_tax) = printed.unwrap_or_else(|| {
            let half = tax_amount.halve();
            (half, half, tax_amount)
        });

        let mut fields = FieldMap::new();
        fields.insert_text("Invoice Number", invoice_number);
        fields.insert_amount("CGST", cgst);
        fields.insert_amount("SGST", sgst);
        fields.insert_amount("Total Tax Amount", total_tax);
        fields.insert_amount("Total Amount", total_amount);
        fields
    }
}

fn apply_patterns(text: &str, patterns: &[FieldPattern]) -> FieldMap {
    let mut fields = FieldMap::new();
    for (name, pattern) in patterns {
        let value = first_amount(pattern(), text).unwrap_or_else(|| {
            tracing::debug!(field = name, "no match, defaulting to zero");
            Money::zero()
        });
        fields.insert_amount(*name, value);
    }
    fields
}

/// First match's first group, thousands separators stripped.
fn first_amount(re: &Regex, text: &str) -> Option<Money> {
    let c = re.captures(text)?;
    Money::parse(c.get(1)?.as_str())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
