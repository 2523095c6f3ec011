use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// SQL Query Advisor - Static index and rewrite advice for SQL statements
#[derive(Parser, Debug)]
#[command(name = "sql-query-advisor")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze SQL statements and recommend indexes and rewrites
    Analyze {
        /// Path to a SQL file (use - for stdin); repeat to analyze several
        #[arg(short, long = "queries")]
        queries: Vec<PathBuf>,

        /// SQL text given inline
        #[arg(long, conflicts_with = "queries")]
        sql: Option<String>,

        /// SQL dialect for tokenizing
        #[arg(long, value_enum, default_value = "generic")]
        dialect: Dialect,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Attach predicted impact labels to index recommendations
        #[arg(long)]
        impact: bool,

        /// Exit with status 1 when any anti-pattern is found
        #[arg(long)]
        strict: bool,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show the analyzed statement and debug logging
        #[arg(short, long)]
        verbose: bool
    },

    /// Render a PostgreSQL EXPLAIN (FORMAT JSON) result as a plan tree
    Explain {
        /// Path to the EXPLAIN JSON output (use - for stdin)
        #[arg(short, long)]
        plan: PathBuf,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        output_format: Format,

        /// Disable colored output
        #[arg(long)]
        no_color: bool
    }
}

impl Commands {
    pub fn verbose(&self) -> bool {
        matches!(self, Self::Analyze { verbose: true, .. })
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Dialect {
    Generic,
    Mysql,
    Postgresql,
    Sqlite,
    Clickhouse
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Yaml
}
