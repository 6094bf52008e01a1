use std::io::Read;

use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::Serialize;
use thiserror::Error;

pub const CLUSTER_COUNT: usize = 3;
/// Fixed so the same upload always gets the same labels.
pub const CLUSTER_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("The CSV file is empty")]
    Empty,
    #[error("The CSV file must have at least two numeric columns for clustering (found {found})")]
    TooFewNumericColumns { found: usize },
    #[error("Column '{0}' is not a numeric column")]
    NotNumeric(String),
    #[error("Clustering needs at least {CLUSTER_COUNT} rows, got {rows}")]
    TooFewRows { rows: usize },
    #[error("K-means failed: {0}")]
    Fit(String),
}

/// An arbitrary CSV upload kept as text.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Columns whose every cell is a finite number, in file order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        (0..self.headers.len())
            .filter(|&i| self.values(i).is_some())
            .map(|i| self.headers[i].as_str())
            .collect()
    }

    fn values(&self, column: usize) -> Option<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                row.get(column)
                    .and_then(|cell| cell.trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect()
    }

    fn numeric_values(&self, name: &str) -> Result<Vec<f64>, ClusterError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| self.values(i))
            .ok_or_else(|| ClusterError::NotNumeric(name.to_string()))
    }
}

/// Rows labelled with their cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusteredTable {
    pub x: String,
    pub y: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub clusters: Vec<usize>,
}

pub fn read_table<R: Read>(data: R) -> Result<CsvTable, ClusterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;

    if headers.is_empty() || rows.is_empty() {
        return Err(ClusterError::Empty);
    }
    Ok(CsvTable { headers, rows })
}

/// K-means with [`CLUSTER_COUNT`] clusters over `(x, y)` points, seeded with
/// [`CLUSTER_SEED`].
pub fn kmeans(points: Array2<f64>) -> Result<Vec<usize>, ClusterError> {
    let rows = points.nrows();
    if rows < CLUSTER_COUNT {
        return Err(ClusterError::TooFewRows { rows });
    }

    let dataset = DatasetBase::from(points);
    let rng = Xoshiro256Plus::seed_from_u64(CLUSTER_SEED);
    let model = KMeans::params_with_rng(CLUSTER_COUNT, rng)
        .fit(&dataset)
        .map_err(|e| ClusterError::Fit(e.to_string()))?;
    let labels = model.predict(dataset.records());
    Ok(labels.to_vec())
}

/// Cluster a CSV upload on two numeric columns. Without an explicit choice the
/// first two numeric columns are used.
pub fn cluster_csv<R: Read>(
    data: R,
    x: Option<&str>,
    y: Option<&str>,
) -> Result<ClusteredTable, ClusterError> {
    let table = read_table(data)?;

    let numeric = table.numeric_columns();
    if numeric.len() < 2 {
        return Err(ClusterError::TooFewNumericColumns { found: numeric.len() });
    }
    let x = x.unwrap_or(numeric[0]).to_string();
    let y = y.unwrap_or(numeric[1]).to_string();

    let xs = table.numeric_values(&x)?;
    let ys = table.numeric_values(&y)?;
    let points = Array2::from_shape_fn((xs.len(), 2), |(i, j)| if j == 0 { xs[i] } else { ys[i] });

    let clusters = kmeans(points)?;
    tracing::info!(rows = clusters.len(), x = %x, y = %y, "CSV clustered");

    Ok(ClusteredTable { x, y, headers: table.headers, rows: table.rows, clusters })
}
