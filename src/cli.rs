//! CLI argument parsing for signstat

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for assembled context
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable evidence text (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "signstat")]
#[command(version)]
#[command(about = "N-gram and transition statistics for sign sequences", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute unigram, bigram, trigram, position and transition tables
    Stats {
        /// Corpus JSON: a list of sequences or {"sequences": [...]}
        input: PathBuf,
        /// Where to write the statistics payload
        output: PathBuf,
    },

    /// Assemble transition evidence for one sign in one sequence
    Context {
        /// Statistics payload or any JSON transition table
        #[arg(long = "stats", value_name = "FILE")]
        stats: Option<PathBuf>,

        /// Target sign
        #[arg(long = "sign")]
        sign: String,

        /// Comma-separated sequence of signs (e.g. M1,M2,M1)
        #[arg(long = "sequence", value_delimiter = ',')]
        sequence: Vec<String>,

        /// Aggregation over occurrences: mean or max (unknown names mean "mean")
        #[arg(long = "aggregation", value_name = "METHOD")]
        aggregation: Option<String>,

        /// Inscription whose seal context should be attached
        #[arg(long = "inscription", value_name = "ID")]
        inscription: Option<String>,

        /// Seal contexts JSON (overrides the configured path)
        #[arg(long = "seal-contexts", value_name = "FILE")]
        seal_contexts: Option<PathBuf>,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Normalize raw seal analysis keyed by inscription and persist it
    Seal {
        /// Raw analysis JSON: {"<inscription_id>": {...}, ...}
        input: PathBuf,
        /// Where to write canonical seal contexts
        output: PathBuf,
    },
}
