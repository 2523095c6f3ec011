use sql_query_advisor::{
    config::{Config, ImpactConfig},
    error::ParseError,
    impact::{ImpactClassifier, ImpactFeatures, ImpactLabel, ThresholdClassifier},
    query::{SqlDialect, StatementKind},
    report::{Advisor, BenchmarkRequest}
};

const COMPOSITE_SQL: &str =
    "SELECT u.name FROM users u JOIN orders o ON u.id=o.user_id WHERE u.a=1 AND u.b=2;";

struct Fixed(ImpactLabel);

impl ImpactClassifier for Fixed {
    fn predict(&self, _features: &ImpactFeatures) -> ImpactLabel {
        self.0
    }
}

#[test]
fn test_report_fields() {
    let response = Advisor::new().analyze(COMPOSITE_SQL).unwrap();
    assert_eq!(response.report.query_type, StatementKind::Select);
    assert_eq!(response.report.tables, vec!["orders", "users"]);
    assert_eq!(response.report.join_count, 1);
    assert!(response.report.anti_patterns.is_empty());
    assert_eq!(response.index_recommendations.len(), 3);
    assert!(response.rewrite_suggestions.is_empty());
}

#[test]
fn test_join_count_follows_table_count() {
    let advisor = Advisor::new();
    for sql in [
        "SELECT 1",
        "SELECT a FROM t",
        "SELECT a FROM t JOIN s ON t.id = s.id",
        "SELECT a FROM t, s, r"
    ] {
        let report = advisor.analyze(sql).unwrap().report;
        assert_eq!(report.join_count, report.tables.len().saturating_sub(1), "{sql}");
    }
}

#[test]
fn test_analysis_is_deterministic() {
    let advisor = Advisor::new();
    let first = serde_json::to_string(&advisor.analyze(COMPOSITE_SQL).unwrap()).unwrap();
    let second = serde_json::to_string(&advisor.analyze(COMPOSITE_SQL).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_json_shape() {
    let response = Advisor::new()
        .analyze("SELECT * FROM users u WHERE u.id = 1")
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["query_type"], "SELECT");
    assert_eq!(json["tables"][0], "users");
    assert_eq!(json["anti_patterns"][0]["type"], "SELECT_STAR");
    assert_eq!(json["column_usage"]["where_filters"][0][0], "u");
    assert_eq!(json["column_usage"]["where_filters"][0][1], "id");
    assert_eq!(json["join_count"], 0);
    assert!(json["index_recommendations"].is_array());
    assert!(json["rewrite_suggestions"].is_array());
    assert!(json.get("aliases").is_none());
    assert!(json.get("raw_sql").is_none());
}

#[test]
fn test_parse_failures_surface() {
    assert_eq!(
        Advisor::new().analyze("   ").unwrap_err(),
        ParseError::EmptyInput
    );
}

#[test]
fn test_dialect_is_forwarded() {
    let response = Advisor::new()
        .analyze_with_dialect("SELECT `a` FROM `t` WHERE `t`.`a` = 1", SqlDialect::MySQL)
        .unwrap();
    assert_eq!(response.report.tables, vec!["t"]);
    assert_eq!(
        response.index_recommendations[0].statement,
        "CREATE INDEX idx_t_a ON t (a);"
    );
}

#[test]
fn test_threshold_classifier_labels_recommendations() {
    // one join and two filter columns score 3
    let response = Advisor::new()
        .with_classifier(ThresholdClassifier::default())
        .analyze(COMPOSITE_SQL)
        .unwrap();
    assert!(
        response
            .index_recommendations
            .iter()
            .all(|r| r.predicted_impact == Some(ImpactLabel::Medium))
    );
}

#[test]
fn test_custom_classifier() {
    let advisor = Advisor::new().with_classifier(Fixed(ImpactLabel::Low));
    assert!(advisor.has_classifier());
    let response = advisor.analyze(COMPOSITE_SQL).unwrap();
    assert_eq!(
        response.index_recommendations[0].predicted_impact,
        Some(ImpactLabel::Low)
    );
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["index_recommendations"][0]["predicted_impact"], "Low");
}

#[test]
fn test_classifier_does_not_change_other_fields() {
    let plain = Advisor::new().analyze(COMPOSITE_SQL).unwrap();
    let labeled = Advisor::new()
        .with_classifier(Fixed(ImpactLabel::High))
        .analyze(COMPOSITE_SQL)
        .unwrap();
    let statements = |r: &sql_query_advisor::report::AdvisorResponse| -> Vec<String> {
        r.index_recommendations
            .iter()
            .map(|i| i.statement.clone())
            .collect()
    };
    assert_eq!(statements(&plain), statements(&labeled));
    assert_eq!(plain.report.tables, labeled.report.tables);
}

#[test]
fn test_threshold_classifier_bands() {
    let classifier = ThresholdClassifier::from_config(&ImpactConfig {
        enabled:      true,
        medium_score: 2,
        high_score:   5
    });
    let features = |join_count, where_clause_count| ImpactFeatures {
        join_count,
        where_clause_count
    };
    assert_eq!(classifier.predict(&features(0, 1)), ImpactLabel::Low);
    assert_eq!(classifier.predict(&features(1, 1)), ImpactLabel::Medium);
    assert_eq!(classifier.predict(&features(2, 3)), ImpactLabel::High);
}

#[test]
fn test_from_config() {
    let mut config = Config::default();
    assert!(!Advisor::from_config(&config).has_classifier());

    config.impact.enabled = true;
    config.rules.disabled = vec!["SELECT_STAR".to_string()];
    let advisor = Advisor::from_config(&config);
    assert!(advisor.has_classifier());
    let response = advisor.analyze("SELECT * FROM users").unwrap();
    assert!(response.report.anti_patterns.is_empty());
}

#[test]
fn test_impact_features() {
    let response = Advisor::new().analyze(COMPOSITE_SQL).unwrap();
    assert_eq!(
        response.report.impact_features(),
        ImpactFeatures {
            join_count:         1,
            where_clause_count: 2
        }
    );
}

#[test]
fn test_benchmark_request() {
    let response = Advisor::new()
        .analyze("SELECT a FROM t1 UNION SELECT a FROM t2; SELECT 2")
        .unwrap();
    let request = BenchmarkRequest::from_response(&response);
    assert_eq!(request.tables, vec!["t1", "t2"]);
    assert_eq!(request.original_sql, "SELECT a FROM t1 UNION SELECT a FROM t2;");
    assert_eq!(request.suggestions.len(), 1);
    assert!(request.is_runnable());
}

#[test]
fn test_named_parameters_do_not_inflate_impact_features() {
    let response = Advisor::new()
        .analyze("SELECT e.a FROM emp e WHERE e.a = :p AND e.b = 2")
        .unwrap();
    assert_eq!(response.report.impact_features().where_clause_count, 2);
    assert_eq!(
        response.index_recommendations[0].statement,
        "CREATE INDEX idx_emp_a_b ON emp (a, b);"
    );
}
