//! # SQL Query Advisor
//!
//! Static index and rewrite advice for SQL statements.
//!
//! `sql-query-advisor` parses a statement without touching a database,
//! classifies which columns appear in WHERE, JOIN ... ON, ORDER BY and
//! GROUP BY, flags common anti-patterns and proposes `CREATE INDEX`
//! statements and rewrites.
//!
//! # Quick Start
//!
//! ```bash
//! # Analyze a file
//! sql-query-advisor analyze -q query.sql
//!
//! # Inline statement, JSON output
//! sql-query-advisor analyze --sql "SELECT * FROM users" -f json
//!
//! # Several files in parallel, fail the build on anti-patterns
//! sql-query-advisor analyze -q a.sql -q b.sql --strict
//!
//! # Render a PostgreSQL EXPLAIN (FORMAT JSON) result
//! psql -XAtc "EXPLAIN (FORMAT JSON, ANALYZE) SELECT 1" | sql-query-advisor explain --plan -
//! ```
//!
//! # Exit Codes
//!
//! - `0` - Success
//! - `1` - Error, or anti-patterns found with `--strict`
//!
//! # Logging
//!
//! Diagnostics go to stderr. `SQL_ADVISOR_LOG` takes a filter such as
//! `debug` or `sql_query_advisor=trace`; `--verbose` raises the default from
//! `warn` to `debug`.

use std::process;

use clap::Parser;
use sql_query_advisor::{
    app::{AnalyzeParams, run_analyze, run_explain},
    cli::{Cli, Commands},
    config::Config,
    error::AppResult
};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SQL_ADVISOR_LOG";

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run() -> AppResult<i32> {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());
    let config = Config::load()?;

    let result = match cli.command {
        Commands::Analyze {
            queries,
            sql,
            dialect,
            output_format,
            impact,
            strict,
            no_color,
            verbose
        } => {
            let params = AnalyzeParams {
                queries_paths: queries
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect(),
                sql,
                dialect,
                output_format,
                impact,
                strict,
                verbose,
                no_color
            };
            run_analyze(params, config)?
        }
        Commands::Explain {
            plan,
            output_format,
            no_color
        } => run_explain(&plan.display().to_string(), output_format, no_color)?
    };
    println!("{}", result.output);
    Ok(result.exit_code)
}
