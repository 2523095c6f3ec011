//! Application logic for the SQL Query Advisor CLI.
//!
//! This module contains the core application logic separated from the main
//! entry point to enable testing.

use std::{
    fs::read_to_string,
    io::{self, Read}
};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    cli::{Dialect, Format},
    config::{Config, LimitsConfig},
    error::{AppResult, config_error, file_read_error, input_limit_error, query_parse_error},
    output::{OutputFormat, OutputOptions, QueryResult, format_batch, format_plan, format_response},
    plan::PlanResponse,
    query::SqlDialect,
    report::{Advisor, AdvisorResponse}
};

/// Source label used for `--sql`
pub const INLINE_SOURCE: &str = "--sql";

/// Parameters for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeParams {
    pub queries_paths: Vec<String>,
    pub sql:           Option<String>,
    pub dialect:       Dialect,
    pub output_format: Format,
    pub impact:        bool,
    pub strict:        bool,
    pub verbose:       bool,
    pub no_color:      bool
}

/// Rendered output and process exit code
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output:    String
}

/// Convert CLI dialect to internal SqlDialect
pub fn convert_dialect(dialect: Dialect) -> SqlDialect {
    match dialect {
        Dialect::Generic => SqlDialect::Generic,
        Dialect::Mysql => SqlDialect::MySQL,
        Dialect::Postgresql => SqlDialect::PostgreSQL,
        Dialect::Sqlite => SqlDialect::SQLite,
        Dialect::Clickhouse => SqlDialect::ClickHouse
    }
}

/// Convert CLI format to internal OutputFormat
pub fn convert_format(format: Format) -> OutputFormat {
    match format {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Yaml => OutputFormat::Yaml
    }
}

/// Create output options from parameters
pub fn create_output_options(format: Format, no_color: bool, verbose: bool) -> OutputOptions {
    OutputOptions {
        format: convert_format(format),
        colored: !no_color,
        verbose
    }
}

/// Calculate exit code for analyzed inputs
///
/// `1` when any input failed, or when `strict` is set and any anti-pattern
/// was found; `0` otherwise.
pub fn calculate_exit_code(results: &[QueryResult], strict: bool) -> i32 {
    let failed = results.iter().any(|r| r.error.is_some());
    let flagged = strict && results.iter().any(QueryResult::has_anti_patterns);
    i32::from(failed || flagged)
}

/// Read queries from file or stdin
pub fn read_queries_input(path: &str) -> AppResult<String> {
    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| file_read_error("stdin", e))?;
        Ok(buffer)
    } else {
        read_to_string(path).map_err(|e| file_read_error(path, e))
    }
}

/// Deepest parenthesis nesting outside string literals and quoted names
pub fn nesting_depth(sql: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut quote: Option<char> = None;
    for c in sql.chars() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"' | '`') => quote = Some(c),
            (None, '(') => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            (None, ')') => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Reject input outside the configured bounds before it reaches the parser
pub fn check_input_bounds(sql: &str, limits: &LimitsConfig) -> AppResult<()> {
    if sql.len() > limits.max_statement_bytes {
        return Err(input_limit_error(format!(
            "Input is {} bytes, limit is {} bytes",
            sql.len(),
            limits.max_statement_bytes
        )));
    }
    let depth = nesting_depth(sql);
    if depth > limits.max_nesting_depth {
        return Err(input_limit_error(format!(
            "Parenthesis nesting depth {} exceeds limit {}",
            depth, limits.max_nesting_depth
        )));
    }
    Ok(())
}

/// Bound-check, parse and analyze one input
pub fn analyze_input(
    advisor: &Advisor,
    sql: &str,
    dialect: SqlDialect,
    limits: &LimitsConfig
) -> AppResult<AdvisorResponse> {
    check_input_bounds(sql, limits)?;
    advisor
        .analyze_with_dialect(sql, dialect)
        .map_err(|e| query_parse_error(e.to_string()))
}

/// Collect `(source, sql)` pairs from `--sql` or the `-q` paths
fn collect_inputs(params: &AnalyzeParams) -> AppResult<Vec<(String, String)>> {
    if let Some(sql) = &params.sql {
        return Ok(vec![(INLINE_SOURCE.to_string(), sql.clone())]);
    }
    if params.queries_paths.is_empty() {
        return Err(config_error("No input given: use -q FILE or --sql TEXT"));
    }
    params
        .queries_paths
        .iter()
        .map(|path| Ok((path.clone(), read_queries_input(path)?)))
        .collect()
}

/// Run the analyze command
///
/// # Notes
///
/// - A single input renders its response directly and fails the command on
///   error
/// - Several inputs are analyzed in parallel; each failure is reported in
///   its own entry and output keeps input order
pub fn run_analyze(params: AnalyzeParams, mut config: Config) -> AppResult<CommandResult> {
    config.impact.enabled |= params.impact;
    let inputs = collect_inputs(&params)?;
    let advisor = Advisor::from_config(&config);
    let dialect = convert_dialect(params.dialect);
    let output_opts = create_output_options(params.output_format, params.no_color, params.verbose);
    info!(
        inputs = inputs.len(),
        impact = advisor.has_classifier(),
        "analyzing"
    );

    if let [(_, sql)] = inputs.as_slice() {
        let response = analyze_input(&advisor, sql, dialect, &config.limits)?;
        let exit_code = i32::from(params.strict && !response.report.anti_patterns.is_empty());
        return Ok(CommandResult {
            exit_code,
            output: format_response(&response, &output_opts)
        });
    }

    let results: Vec<QueryResult> = inputs
        .par_iter()
        .map(|(source, sql)| {
            let outcome = analyze_input(&advisor, sql, dialect, &config.limits);
            if let Err(e) = &outcome {
                debug!(source = %source, error = %e, "input failed");
            }
            let (response, error) = match outcome {
                Ok(response) => (Some(response), None),
                Err(e) => (None, Some(e.to_string()))
            };
            QueryResult {
                source: source.clone(),
                response,
                error
            }
        })
        .collect();
    Ok(CommandResult {
        exit_code: calculate_exit_code(&results, params.strict),
        output:    format_batch(&results, &output_opts)
    })
}

/// Run the explain command
///
/// A plan that cannot be read is rendered as an error payload with exit
/// code `1`.
pub fn run_explain(plan_path: &str, format: Format, no_color: bool) -> AppResult<CommandResult> {
    let input = read_queries_input(plan_path)?;
    let response = PlanResponse::from_json(&input);
    let output_opts = create_output_options(format, no_color, false);
    Ok(CommandResult {
        exit_code: i32::from(response.is_error()),
        output:    format_plan(&response, &output_opts)
    })
}
