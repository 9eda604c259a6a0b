//! CLI argument definitions for the match pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hirematch",
    version,
    about = "Candidate/job match prediction pipeline",
    long_about = "Train and query a candidate/job match classifier.\n\n\
                  Ingests applicant, prospect, and vacancy JSON exports, builds\n\
                  features, trains a gradient-boosted model, and ranks candidates\n\
                  per vacancy."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow candidate names and other personal fields in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run every pipeline stage in order: preprocess, features, train, evaluate.
    Run(RunArgs),

    /// Flatten and clean the raw JSON exports into the preprocessed table.
    Preprocess(StageArgs),

    /// Build the engineered feature table from the preprocessed table.
    Features(StageArgs),

    /// Train the match classifier on the engineered table.
    Train(TrainArgs),

    /// Evaluate the trained model and write report artifacts.
    Evaluate(EvaluateArgs),

    /// Rank candidates for one vacancy using the trained model.
    Rank(RankArgs),
}

#[derive(Parser)]
pub struct StageArgs {
    /// Directory with the raw JSON exports (applicants, prospects, vagas).
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data/raw")]
    pub data_dir: PathBuf,

    /// Directory for intermediate CSV tables.
    #[arg(long = "work-dir", value_name = "DIR", default_value = "data/processed")]
    pub work_dir: PathBuf,

    /// Skip best-effort uploads to the configured object store.
    #[arg(long = "no-upload")]
    pub no_upload: bool,
}

#[derive(Parser)]
pub struct TrainArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Directory for the trained model artifacts.
    #[arg(long = "artifacts-dir", value_name = "DIR", default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Number of hyperparameter search trials.
    #[arg(long = "trials", default_value_t = 30)]
    pub trials: usize,

    /// Seed for the split and the hyperparameter sampler.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}

#[derive(Parser)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Directory with the trained model artifacts.
    #[arg(long = "artifacts-dir", value_name = "DIR", default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Directory for evaluation reports.
    #[arg(long = "reports-dir", value_name = "DIR", default_value = "reports/metrics")]
    pub reports_dir: PathBuf,

    /// Seed used when the model was trained.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}

#[derive(Parser)]
pub struct RankArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Directory with the trained model artifacts.
    #[arg(long = "artifacts-dir", value_name = "DIR", default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Vacancy id to rank candidates for.
    #[arg(value_name = "JOB_ID")]
    pub job_id: String,

    /// Minimum match score to include.
    #[arg(long = "min-score", default_value_t = 0.0)]
    pub min_score: f64,

    /// Maximum number of candidates to show.
    #[arg(long = "top", default_value_t = 5)]
    pub top_n: usize,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub stage: StageArgs,

    /// Directory for the trained model artifacts.
    #[arg(long = "artifacts-dir", value_name = "DIR", default_value = "models")]
    pub artifacts_dir: PathBuf,

    /// Directory for evaluation reports.
    #[arg(long = "reports-dir", value_name = "DIR", default_value = "reports/metrics")]
    pub reports_dir: PathBuf,

    /// Number of hyperparameter search trials.
    #[arg(long = "trials", default_value_t = 30)]
    pub trials: usize,

    /// Seed for the split and the hyperparameter sampler.
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
