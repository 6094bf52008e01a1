use std::fmt::Write as _;
use std::path::Path;

use finlens_core::{DocumentType, FieldMap, TransactionRecord};
use finlens_import::{ClusteredTable, StatementAnalysis, CLUSTER_COUNT};
use finlens_loan::LoanDecision;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const BAR_WIDTH: usize = 40;
const BAR: char = '█';

/// Left-aligned columns separated by two spaces, with a dashed rule under
/// the header.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(c, &w)| format!("{c:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Horizontal bars scaled so the largest value spans the full width.
pub fn bar_chart(title: &str, rows: &[(String, Decimal)]) -> String {
    let mut out = format!("{title}\n");
    let max = rows.iter().map(|(_, v)| v.abs()).max().unwrap_or(Decimal::ZERO);
    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    for (label, value) in rows {
        let len = if max.is_zero() {
            0
        } else {
            (value.abs() / max * Decimal::from(BAR_WIDTH))
                .round()
                .to_usize()
                .unwrap_or(0)
        };
        let bar: String = std::iter::repeat(BAR).take(len).collect();
        let _ = writeln!(out, "{label:<label_width$}  {bar} {value:.2}");
    }
    out
}

pub fn render_fields(doc_type: DocumentType, fields: &FieldMap) -> String {
    let mut out = format!("{}\n\n", doc_type.summary_title());
    let rows: Vec<Vec<String>> = fields
        .iter()
        .map(|(name, value)| vec![name.to_string(), value.to_string()])
        .collect();
    out.push_str(&table(&["Field", "Value"], &rows));

    let amounts: Vec<(String, Decimal)> = fields
        .amounts()
        .map(|(name, m)| (name.to_string(), m.as_decimal()))
        .collect();
    if !amounts.is_empty() {
        out.push('\n');
        out.push_str(&bar_chart("Amounts (₹)", &amounts));
    }
    out
}

pub fn render_transactions(records: &[TransactionRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.date.format("%d-%m-%Y").to_string(),
                r.narration.clone(),
                r.kind.to_string(),
                r.amount.to_string(),
                r.name.clone(),
            ]
        })
        .collect();
    table(&["Date", "Narration", "Transaction Type", "Amount", "Name"], &rows)
}

pub fn render_statement(
    records: &[TransactionRecord],
    analysis: &StatementAnalysis,
    csv_path: Option<&Path>,
) -> String {
    let mut out = format!("{}\n\n", DocumentType::BankStatement.summary_title());
    out.push_str(&render_transactions(records));

    let s = &analysis.summary;
    let optional = |m: Option<finlens_core::Money>| m.map_or_else(|| "-".to_string(), |m| m.to_string());
    out.push('\n');
    out.push_str(&table(
        &["Summary", "Amount"],
        &[
            vec!["Total Deposits".into(), s.total_deposits.to_string()],
            vec!["Total Withdrawals".into(), s.total_withdrawals.to_string()],
            vec!["Highest Deposit".into(), optional(s.highest_deposit)],
            vec!["Highest Withdrawal".into(), optional(s.highest_withdrawal)],
        ],
    ));

    out.push_str("\nTransaction Distribution by Name\n");
    let rows: Vec<Vec<String>> = analysis
        .distribution
        .iter()
        .map(|d| vec![d.name.clone(), d.count.to_string(), format!("{:.1}%", d.share * 100.0)])
        .collect();
    out.push_str(&table(&["Name", "Count", "Share"], &rows));

    let timeline: Vec<(String, Decimal)> = analysis
        .timeline
        .iter()
        .map(|p| (format!("{} {}", p.date.format("%d-%m-%Y"), p.kind), p.amount.as_decimal()))
        .collect();
    if !timeline.is_empty() {
        out.push('\n');
        out.push_str(&bar_chart("Transaction Amounts Over Time", &timeline));
    }

    if let Some(path) = csv_path {
        let _ = writeln!(out, "\nCSV written to {}", path.display());
    }
    out
}

pub fn render_translation(original: &str, translated: &str) -> String {
    format!("Extracted Text\n\n{original}\n\nTranslated Text\n\n{translated}\n")
}

/// The uploaded rows with a trailing `Cluster` column, then rows per cluster.
pub fn render_clusters(t: &ClusteredTable) -> String {
    let mut out = format!("K-Means Clustering: {} vs. {}\n\n", t.x, t.y);

    let mut headers: Vec<&str> = t.headers.iter().map(String::as_str).collect();
    headers.push("Cluster");
    let rows: Vec<Vec<String>> = t
        .rows
        .iter()
        .zip(&t.clusters)
        .map(|(row, label)| {
            let mut cells = row.clone();
            cells.push(label.to_string());
            cells
        })
        .collect();
    out.push_str(&table(&headers, &rows));

    let sizes: Vec<(String, Decimal)> = (0..CLUSTER_COUNT)
        .map(|c| {
            let n = t.clusters.iter().filter(|l| **l == c).count();
            (format!("Cluster {c}"), Decimal::from(n))
        })
        .collect();
    out.push('\n');
    out.push_str(&bar_chart("Rows per cluster", &sizes));
    out
}

pub fn render_loan(decision: &LoanDecision) -> String {
    let Some(amount) = decision.amount.filter(|_| decision.is_approved()) else {
        return "Loan Rejected. No loan available.\n".to_string();
    };

    let mut out = format!("Loan Approved\nMaximum loan amount: ₹{amount} Lakh\n");
    if decision.schemes.is_empty() {
        out.push_str("\nNo listed scheme covers this amount.\n");
    } else {
        out.push_str("\nSuitable loan schemes:\n");
        for name in &decision.schemes {
            let _ = writeln!(out, "  - {name}");
        }
    }
    out
}
