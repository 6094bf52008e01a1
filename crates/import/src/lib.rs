pub mod analysis;
pub mod cluster;
pub mod csv;
pub mod names;
pub mod statement;

pub use crate::analysis::{analyze, CounterpartyShare, StatementAnalysis, StatementSummary, TimelinePoint};
pub use crate::cluster::{cluster_csv, ClusterError, ClusteredTable, CsvTable, CLUSTER_COUNT};
pub use crate::csv::{CsvError, STATEMENT_CSV_NAME};
pub use crate::names::{assign_names, infer_name};
pub use crate::statement::{parse_line, parse_statement, parse_transactions, StatementError};

pub mod import {
    use finlens_core::TransactionRecord;
    use std::path::{Path, PathBuf};

    /// Parse statement text and write the CSV artifact under `output_dir`.
    pub fn convert_statement(
        text: &str,
        output_dir: &Path,
    ) -> Result<(Vec<TransactionRecord>, PathBuf), ConvertError> {
        let records = crate::statement::parse_statement(text)?;
        let path = crate::csv::write_to_dir(&records, output_dir)?;
        Ok((records, path))
    }

    pub fn import_statement_csv<R: std::io::Read>(
        data: R,
    ) -> Result<Vec<TransactionRecord>, crate::csv::CsvError> {
        let mut records = crate::csv::read_csv(data)?;
        finlens_core::sort_chronologically(&mut records);
        Ok(records)
    }

    #[derive(Debug, thiserror::Error)]
    pub enum ConvertError {
        #[error(transparent)]
        Statement(#[from] crate::statement::StatementError),
        #[error(transparent)]
        Csv(#[from] crate::csv::CsvError),
    }

}
