use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::{
    advisor::Impact,
    plan::{PlanNode, PlanResponse},
    report::AdvisorResponse,
    usage::ClauseRole
};

/// Output format for results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml
}

/// Output options
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format:  OutputFormat,
    pub colored: bool,
    pub verbose: bool
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format:  OutputFormat::Text,
            colored: true,
            verbose: false
        }
    }
}

/// Result for one input of a batch
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    /// File path, `-` for stdin, or `--sql`
    pub source:   String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<AdvisorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error:    Option<String>
}

impl QueryResult {
    pub fn has_anti_patterns(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(|r| !r.report.anti_patterns.is_empty())
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value).unwrap_or_default()),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value).unwrap_or_default()),
        OutputFormat::Text => None
    }
}

fn paint(text: &str, opts: &OutputOptions, style: fn(&str) -> ColoredString) -> String {
    if opts.colored {
        style(text).to_string()
    } else {
        text.to_string()
    }
}

/// Format a single response
pub fn format_response(response: &AdvisorResponse, opts: &OutputOptions) -> String {
    serialize(response, opts.format).unwrap_or_else(|| {
        let mut output = paint("=== SQL Query Analysis ===\n\n", opts, |s| s.bold());
        output.push_str(&format_text_response(response, opts));
        output
    })
}

/// Format the results of several inputs, in input order
pub fn format_batch(results: &[QueryResult], opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(&results, opts.format) {
        return serialized;
    }
    let mut output = String::new();
    for result in results {
        let header = format!("=== {} ===\n", result.source);
        output.push_str(&paint(&header, opts, |s| s.bold()));
        if let Some(response) = &result.response {
            output.push_str(&format_text_response(response, opts));
        }
        if let Some(error) = &result.error {
            output.push_str(&paint(&format!("Error: {}\n", error), opts, |s| s.red()));
        }
        output.push('\n');
    }
    output
}

fn format_text_response(response: &AdvisorResponse, opts: &OutputOptions) -> String {
    let report = &response.report;
    let mut text = String::new();
    text.push_str(&format!("Query type: {}\n", report.query_type));
    text.push_str(&format!("Tables: {}\n", report.tables.join(", ")));
    text.push_str(&format!("Joins: {}\n", report.join_count));
    if opts.verbose {
        text.push_str(&format!("SQL: {}\n", report.raw_sql.trim()));
    }

    text.push_str(&paint("\nAnti-patterns:\n", opts, |s| s.cyan().bold()));
    if report.anti_patterns.is_empty() {
        text.push_str("  none\n");
    }
    for finding in &report.anti_patterns {
        let kind = format!("[{}]", finding.kind);
        text.push_str(&format!(
            "  {} ({}) {}\n",
            paint(&kind, opts, |s| s.yellow()),
            finding.kind.category(),
            finding.message
        ));
    }

    let usage = &report.column_usage;
    if !usage.is_empty() {
        text.push_str(&paint("\nColumn usage:\n", opts, |s| s.cyan().bold()));
        for role in ClauseRole::ALL {
            let columns: Vec<String> = usage.get(role).iter().map(ToString::to_string).collect();
            if !columns.is_empty() {
                text.push_str(&format!("  {}: {}\n", role, columns.join(", ")));
            }
        }
    }

    text.push_str(&paint("\nIndex recommendations:\n", opts, |s| s.cyan().bold()));
    if response.index_recommendations.is_empty() {
        text.push_str("  none\n");
    }
    for recommendation in &response.index_recommendations {
        let impact = format!("[{}]", recommendation.impact);
        let impact = match recommendation.impact {
            Impact::High => paint(&impact, opts, |s| s.red()),
            Impact::Medium => paint(&impact, opts, |s| s.yellow())
        };
        text.push_str(&format!("  {} {}\n", impact, recommendation.statement));
        text.push_str(&format!("      {}\n", recommendation.reason));
        if let Some(label) = recommendation.predicted_impact {
            text.push_str(&format!("      predicted impact: {}\n", label));
        }
    }

    if !response.rewrite_suggestions.is_empty() {
        text.push_str(&paint("\nRewrite suggestions:\n", opts, |s| s.cyan().bold()));
        for suggestion in &response.rewrite_suggestions {
            let kind = format!("[{}]", suggestion.kind);
            text.push_str(&format!("  {} {}\n", paint(&kind, opts, |s| s.green()), suggestion.reason));
            for line in suggestion.suggested_sql.trim().lines() {
                text.push_str(&format!("      {}\n", line));
            }
        }
    }
    text
}

/// Format an execution plan or its error payload
pub fn format_plan(response: &PlanResponse, opts: &OutputOptions) -> String {
    if let Some(serialized) = serialize(response, opts.format) {
        return serialized;
    }
    match response {
        PlanResponse::Plan {
            plan
        } => {
            let mut output = paint("=== Execution Plan ===\n\n", opts, |s| s.bold());
            write_plan_node(plan, 0, opts, &mut output);
            output
        }
        PlanResponse::Error {
            error
        } => paint(&format!("Error: {}\n", error), opts, |s| s.red())
    }
}

fn write_plan_node(node: &PlanNode, depth: usize, opts: &OutputOptions, out: &mut String) {
    let indent = "  ".repeat(depth);
    let arrow = if depth == 0 { "" } else { "-> " };
    out.push_str(&format!(
        "{}{}{} (cost={:.2} rows={} time={:.3}ms actual_rows={})\n",
        indent,
        arrow,
        paint(&node.node_type, opts, |s| s.cyan().bold()),
        node.estimated_cost,
        node.estimated_rows,
        node.actual_time_ms,
        node.actual_rows
    ));
    for detail in &node.details {
        out.push_str(&format!("{}     {}\n", indent, detail));
    }
    for child in &node.children {
        write_plan_node(child, depth + 1, opts, out);
    }
}
