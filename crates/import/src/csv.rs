use chrono::NaiveDate;
use finlens_core::{Money, TransactionRecord, TransactionType};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::names;
use crate::statement::DATE_FORMAT;

pub const STATEMENT_CSV_NAME: &str = "bank_statement.csv";

#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid date on row {row}: {value}")]
    InvalidDate { row: usize, value: String },
    #[error("Invalid amount on row {row}: {value}")]
    InvalidAmount { row: usize, value: String },
    #[error("Invalid transaction type on row {row}: {value}")]
    InvalidType { row: usize, value: String },
    #[error("No data rows")]
    NoDataRows,
}

/// On-disk row layout of a converted statement.
#[derive(Debug, Serialize, Deserialize)]
struct StatementRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Narration")]
    narration: String,
    #[serde(rename = "Transaction Type")]
    kind: String,
    #[serde(rename = "Amount")]
    amount: String,
}

impl From<&TransactionRecord> for StatementRow {
    fn from(r: &TransactionRecord) -> Self {
        StatementRow {
            date: r.date.format(DATE_FORMAT).to_string(),
            narration: r.narration.clone(),
            kind: r.kind.to_string(),
            amount: format!("{:.2}", r.amount.as_decimal()),
        }
    }
}

pub fn write_csv<W: Write>(records: &[TransactionRecord], out: W) -> Result<(), CsvError> {
    let mut writer = csv::Writer::from_writer(out);
    for r in records {
        writer.serialize(StatementRow::from(r))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `bank_statement.csv` under `output_dir`, creating the directory.
pub fn write_to_dir(records: &[TransactionRecord], output_dir: &Path) -> Result<PathBuf, CsvError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(STATEMENT_CSV_NAME);
    let file = std::fs::File::create(&path)?;
    write_csv(records, std::io::BufWriter::new(file))?;
    tracing::info!(path = %path.display(), rows = records.len(), "statement CSV written");
    Ok(path)
}

/// Read a statement CSV (`Date,Narration,Transaction Type,Amount`) and infer
/// counterparty names.
pub fn read_csv<R: Read>(data: R) -> Result<Vec<TransactionRecord>, CsvError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<StatementRow>().enumerate() {
        let row_no = idx + 2; // header is row 1
        let row = result?;

        let date = parse_date(&row.date).ok_or_else(|| CsvError::InvalidDate {
            row: row_no,
            value: row.date.clone(),
        })?;
        let amount = Money::parse(&row.amount).ok_or_else(|| CsvError::InvalidAmount {
            row: row_no,
            value: row.amount.clone(),
        })?;
        let kind: TransactionType = row.kind.parse().map_err(|_| CsvError::InvalidType {
            row: row_no,
            value: row.kind.clone(),
        })?;

        records.push(TransactionRecord::new(date, row.narration, kind, amount));
    }

    if records.is_empty() {
        return Err(CsvError::NoDataRows);
    }

    names::assign_names(&mut records);
    Ok(records)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    [DATE_FORMAT, "%Y-%m-%d", "%d/%m/%Y", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(
                date(2024, 1, 5),
                "UPI/SWIGGY/401234/Food, late",
                TransactionType::Debit,
                Money::from_paise(1_250_50),
            ),
            TransactionRecord::new(
                date(2024, 1, 6),
                "NEFT ACME CORP",
                TransactionType::Credit,
                Money::from_paise(50_000_00),
            ),
        ]
    }

    #[test]
    fn write_uses_statement_header_and_day_first_dates() {
        let mut buf = Vec::new();
        write_csv(&sample(), &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Date,Narration,Transaction Type,Amount"));
        assert_eq!(lines.next(), Some("05-01-2024,\"UPI/SWIGGY/401234/Food, late\",Debit,1250.50"));
        assert_eq!(lines.next(), Some("06-01-2024,NEFT ACME CORP,Credit,50000.00"));
    }

    #[test]
    fn written_file_reads_back_with_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_to_dir(&sample(), &dir.path().join("processed_data")).unwrap();
        assert!(path.ends_with(STATEMENT_CSV_NAME));

        let rows = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "SWIGGY");
        assert_eq!(rows[1].name, "NEFT ACME CORP");
        assert_eq!(rows[1].amount, Money::from_paise(50_000_00));
    }

    #[test]
    fn read_accepts_iso_dates_and_grouped_amounts() {
        let data = "Date,Narration,Transaction Type,Amount\n2024-02-01, rent ,Debit,\"12,000\"\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].date, date(2024, 2, 1));
        assert_eq!(rows[0].narration, "rent");
        assert_eq!(rows[0].amount, Money::from_paise(12_000_00));
    }

    #[test]
    fn read_reports_bad_rows() {
        let data = "Date,Narration,Transaction Type,Amount\n01-01-2024,x,Debit,1.00\nyesterday,x,Debit,1.00\n";
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(CsvError::InvalidDate { row: 3, .. })
        ));

        let data = "Date,Narration,Transaction Type,Amount\n01-01-2024,x,Refund,1.00\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(CsvError::InvalidType { .. })));

        let data = "Date,Narration,Transaction Type,Amount\n01-01-2024,x,Debit,lots\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(CsvError::InvalidAmount { .. })));
    }

    #[test]
    fn read_without_rows_errors() {
        let data = "Date,Narration,Transaction Type,Amount\n";
        assert!(matches!(read_csv(data.as_bytes()), Err(CsvError::NoDataRows)));
    }
}
