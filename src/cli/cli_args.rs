use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// minisql - run simple SQL queries against CSV and JSON files
#[derive(Parser, Debug)]
#[command(name = "minisql")]
#[command(about = "Minimal in-memory SQL query engine over delimited text files")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Field delimiter for delimited text files
    #[arg(short, long, global = true, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Output format for query results
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start the interactive query loop (default)
    Repl {
        /// File to load before the first prompt
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Execute a single SQL query against a file
    Query {
        /// Data file to query
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// SQL query to execute
        #[arg(value_name = "SQL")]
        sql: String,
    },

    /// Show the table name, columns and row count of a file
    Schema {
        /// Data file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header, rule and ` | `-separated lines
    #[default]
    Plain,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Plain => write!(f, "plain"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
