use serde_json::json;
use sql_query_advisor::{
    output::{
        OutputFormat, OutputOptions, QueryResult, format_batch, format_plan, format_response
    },
    plan::PlanResponse,
    report::{Advisor, AdvisorResponse}
};

fn plain(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        colored: false,
        verbose: false
    }
}

fn analyze(sql: &str) -> AdvisorResponse {
    Advisor::new().analyze(sql).unwrap()
}

fn result(source: &str, sql: &str) -> QueryResult {
    QueryResult {
        source:   source.to_string(),
        response: Some(analyze(sql)),
        error:    None
    }
}

#[test]
fn test_output_format_default() {
    assert!(matches!(OutputFormat::default(), OutputFormat::Text));
}

#[test]
fn test_output_options_default() {
    let opts = OutputOptions::default();
    assert!(matches!(opts.format, OutputFormat::Text));
    assert!(opts.colored);
    assert!(!opts.verbose);
}

#[test]
fn test_format_response_text() {
    let response = analyze(
        "SELECT * FROM users u JOIN orders o ON u.id = o.user_id WHERE u.a = 1 AND u.b = 2"
    );
    let output = format_response(&response, &plain(OutputFormat::Text));

    assert!(output.starts_with("=== SQL Query Analysis ==="));
    assert!(output.contains("Query type: SELECT"));
    assert!(output.contains("Tables: orders, users"));
    assert!(output.contains("Joins: 1"));
    assert!(output.contains("[SELECT_STAR] (Style) Avoid using 'SELECT *'."));
    assert!(output.contains("where_filters: u.a, u.b"));
    assert!(output.contains("join_keys: o.user_id, u.id"));
    assert!(output.contains("[High] CREATE INDEX idx_users_a_b ON users (a, b);"));
    assert!(!output.contains("Rewrite suggestions:"));
}

#[test]
fn test_format_response_text_shows_categories() {
    let delete = analyze("DELETE FROM orders");
    let output = format_response(&delete, &plain(OutputFormat::Text));
    assert!(output.contains("[MISSING_WHERE_CLAUSE] (Security) The DELETE statement"));

    let filtered = analyze("SELECT id FROM users WHERE LOWER(email) = 'x'");
    let output = format_response(&filtered, &plain(OutputFormat::Text));
    assert!(output.contains("[FUNCTION_ON_COLUMN_IN_WHERE] (Performance) Found a function call"));
}

#[test]
fn test_format_response_text_without_findings() {
    let output = format_response(&analyze("SELECT 1"), &plain(OutputFormat::Text));
    assert!(output.contains("Anti-patterns:\n  none"));
    assert!(output.contains("Index recommendations:\n  none"));
    assert!(!output.contains("Column usage:"));
}

#[test]
fn test_format_response_text_rewrites() {
    let response = analyze("SELECT a FROM t1 UNION SELECT a FROM t2");
    let output = format_response(&response, &plain(OutputFormat::Text));
    assert!(output.contains("Rewrite suggestions:"));
    assert!(output.contains("[REPLACE_UNION_WITH_UNION_ALL]"));
    assert!(output.contains("SELECT a FROM t1 UNION ALL SELECT a FROM t2"));
}

#[test]
fn test_format_response_verbose_shows_sql() {
    let response = analyze("SELECT id FROM users;");
    let opts = OutputOptions {
        verbose: true,
        ..plain(OutputFormat::Text)
    };
    assert!(format_response(&response, &opts).contains("SQL: SELECT id FROM users;"));
}

#[test]
fn test_format_response_json() {
    let response = analyze("SELECT id FROM users u WHERE u.id = 1");
    let output = format_response(&response, &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["query_type"], "SELECT");
    assert_eq!(
        value["index_recommendations"][0]["statement"],
        "CREATE INDEX idx_users_id ON users (id);"
    );
}

#[test]
fn test_format_response_yaml() {
    let response = analyze("SELECT id FROM users");
    let output = format_response(&response, &plain(OutputFormat::Yaml));
    assert!(output.contains("query_type: SELECT"));
    assert!(output.contains("- users"));
}

#[test]
fn test_format_batch_text() {
    let results = vec![
        result("a.sql", "SELECT id FROM users"),
        QueryResult {
            source:   "b.sql".to_string(),
            response: None,
            error:    Some("no SQL statement found in input".to_string())
        },
    ];
    let output = format_batch(&results, &plain(OutputFormat::Text));
    let a = output.find("=== a.sql ===").unwrap();
    let b = output.find("=== b.sql ===").unwrap();
    assert!(a < b);
    assert!(output.contains("Error: no SQL statement found in input"));
}

#[test]
fn test_format_batch_json() {
    let results = vec![
        result("a.sql", "SELECT id FROM users"),
        result("b.sql", "DELETE FROM orders"),
    ];
    let output = format_batch(&results, &plain(OutputFormat::Json));
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value[0]["source"], "a.sql");
    assert_eq!(value[1]["source"], "b.sql");
    assert_eq!(
        value[1]["response"]["anti_patterns"][0]["type"],
        "MISSING_WHERE_CLAUSE"
    );
    assert!(value[0].get("error").is_none());
}

#[test]
fn test_query_result_has_anti_patterns() {
    assert!(result("a.sql", "SELECT * FROM users").has_anti_patterns());
    assert!(!result("a.sql", "SELECT id FROM users").has_anti_patterns());
}

#[test]
fn test_format_plan_text() {
    let response = PlanResponse::from_explain(&json!([{
        "Plan": {
            "Node Type": "Nested Loop",
            "Total Cost": 10.0,
            "Plan Rows": 5,
            "Join Filter": "(a.id = b.id)",
            "Plans": [{ "Node Type": "Seq Scan", "Plan Rows": 5 }]
        }
    }]));
    let output = format_plan(&response, &plain(OutputFormat::Text));
    assert!(output.starts_with("=== Execution Plan ==="));
    assert!(output.contains("Nested Loop (cost=10.00 rows=5"));
    assert!(output.contains("Join Filter: (a.id = b.id)"));
    assert!(output.contains("  -> Seq Scan"));
}

#[test]
fn test_format_plan_error() {
    let response = PlanResponse::from_json("nope");
    let output = format_plan(&response, &plain(OutputFormat::Text));
    assert!(output.starts_with("Error: invalid JSON"));

    let json = format_plan(&response, &plain(OutputFormat::Json));
    assert!(json.contains("\"error\""));
}
