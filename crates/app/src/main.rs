use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use finlens_core::DocumentType;
use finlens_loan::{Exam, LoanApplication};
use tracing_subscriber::EnvFilter;

mod backends;
mod commands;
mod config;
mod report;

use commands::{Context, FailureKind};
use config::AppConfig;

/// Financial document extraction, bank statement analysis and loan
/// eligibility.
#[derive(Debug, Parser)]
#[command(name = "finlens", version)]
struct Cli {
    /// Config file (defaults to the per-user finlens/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Print machine-readable JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// OCR extraction of a structured financial document.
    Extract {
        file: PathBuf,
        /// "Balance Sheets", "Profit & Loss Statements", "Cash Flow Statements",
        /// "Invoice", "Bank Statements" or a short alias like `cash-flow`.
        #[arg(long)]
        doc_type: DocumentType,
    },
    /// Multi-language OCR followed by translation.
    Translate {
        file: PathBuf,
        /// Target language code, overriding the configured one.
        #[arg(long)]
        target: Option<String>,
    },
    /// Bank statement analysis from a PDF, image, DOCX or converted CSV.
    Statement {
        file: PathBuf,
        /// Where the converted CSV is written.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// K-means clustering of a CSV on two numeric columns.
    Cluster {
        file: PathBuf,
        /// X-axis column (defaults to the first numeric column).
        #[arg(long)]
        x: Option<String>,
        /// Y-axis column (defaults to the second numeric column).
        #[arg(long)]
        y: Option<String>,
    },
    /// Loan eligibility prediction.
    Loan(LoanArgs),
}

#[derive(Debug, Args)]
struct LoanArgs {
    #[arg(long)]
    marks_10th: f64,
    #[arg(long)]
    marks_12th: f64,
    #[arg(long)]
    cgpa: f64,
    #[arg(long)]
    parents_credit_score: f64,
    #[arg(long)]
    student_credit_score: f64,
    /// INR.
    #[arg(long)]
    total_assets: f64,
    /// INR.
    #[arg(long, default_value_t = 0.0)]
    fixed_deposits: f64,
    #[arg(long)]
    exam: Exam,
    #[arg(long)]
    rank: f64,
    /// Model file, overriding `model_path` from the config.
    #[arg(long)]
    model: Option<PathBuf>,
}

impl From<&LoanArgs> for LoanApplication {
    fn from(a: &LoanArgs) -> Self {
        LoanApplication {
            marks_10th: a.marks_10th,
            marks_12th: a.marks_12th,
            cgpa: a.cgpa,
            parents_credit_score: a.parents_credit_score,
            student_credit_score: a.student_credit_score,
            total_assets: a.total_assets,
            fixed_deposits: a.fixed_deposits,
            exam: a.exam,
            exam_rank: a.rank,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            let kind = FailureKind::of(&err);
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{}", kind.message(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let ctx = Context::new(config, cli.json);

    match &cli.command {
        Command::Extract { file, doc_type } => commands::extract(&ctx, file, *doc_type).await,
        Command::Translate { file, target } => commands::translate(&ctx, file, target.as_deref()).await,
        Command::Statement { file, output_dir } => {
            commands::statement(&ctx, file, output_dir.as_deref()).await
        }
        Command::Cluster { file, x, y } => {
            commands::cluster(&ctx, file, x.as_deref(), y.as_deref()).await
        }
        Command::Loan(args) => commands::loan(&ctx, &LoanApplication::from(args), args.model.as_deref()),
    }
}
