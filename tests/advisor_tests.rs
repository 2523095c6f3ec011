use sql_query_advisor::{
    advisor::{Impact, IndexRecommendation, advise},
    query::parse,
    report::{AnalysisReport, Advisor},
    rules::RuleRunner
};

fn recommend(sql: &str) -> Vec<IndexRecommendation> {
    let statement = parse(sql).unwrap();
    advise(&AnalysisReport::build(&statement, &RuleRunner::new()))
}

fn statements(sql: &str) -> Vec<String> {
    recommend(sql).into_iter().map(|r| r.statement).collect()
}

#[test]
fn test_composite_then_join_keys() {
    let result = recommend(
        "SELECT u.name FROM users u JOIN orders o ON u.id=o.user_id WHERE u.a=1 AND u.b=2;"
    );
    let created: Vec<&str> = result.iter().map(|r| r.statement.as_str()).collect();
    assert_eq!(
        created,
        vec![
            "CREATE INDEX idx_users_a_b ON users (a, b);",
            "CREATE INDEX idx_orders_user_id ON orders (user_id);",
            "CREATE INDEX idx_users_id ON users (id);",
        ]
    );
    assert_eq!(
        result[0].reason,
        "Columns a, b are used together in the WHERE clause."
    );
    assert_eq!(
        result[1].reason,
        "Column 'user_id' is used for a JOIN condition."
    );
    assert!(result.iter().all(|r| r.impact == Impact::High));
    assert!(result.iter().all(|r| r.predicted_impact.is_none()));
}

#[test]
fn test_single_where_filter() {
    let result = recommend("SELECT id FROM users u WHERE u.email = 'x'");
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].statement, "CREATE INDEX idx_users_email ON users (email);");
    assert_eq!(
        result[0].reason,
        "Column 'email' is used for filtering in the WHERE clause."
    );
    assert_eq!(result[0].impact, Impact::High);
}

#[test]
fn test_order_by_is_medium_impact() {
    let result = recommend("SELECT id FROM users u ORDER BY u.created_at");
    assert_eq!(result.len(), 1);
    assert_eq!(
        result[0].statement,
        "CREATE INDEX idx_users_created_at ON users (created_at);"
    );
    assert_eq!(
        result[0].reason,
        "Column 'created_at' is used for sorting in the ORDER BY clause."
    );
    assert_eq!(result[0].impact, Impact::Medium);
}

#[test]
fn test_unqualified_columns_are_dropped() {
    assert!(recommend("SELECT id FROM users WHERE email = 'x'").is_empty());
}

#[test]
fn test_unresolved_alias_is_dropped() {
    assert!(recommend("SELECT id FROM users u WHERE x.flag = 1").is_empty());
}

#[test]
fn test_group_by_never_recommends() {
    assert!(recommend("SELECT u.dept, COUNT(*) FROM users u GROUP BY u.dept").is_empty());
}

#[test]
fn test_filters_on_different_tables_stay_single() {
    assert_eq!(
        statements(
            "SELECT 1 FROM users u JOIN orders o ON u.id = o.uid WHERE u.a = 1 AND o.b = 2"
        ),
        vec![
            "CREATE INDEX idx_orders_b ON orders (b);",
            "CREATE INDEX idx_users_a ON users (a);",
            "CREATE INDEX idx_orders_uid ON orders (uid);",
            "CREATE INDEX idx_users_id ON users (id);",
        ]
    );
}

#[test]
fn test_composite_columns_suppress_other_roles() {
    assert_eq!(
        statements("SELECT 1 FROM users u JOIN orders o ON u.a = o.x WHERE u.a=1 AND u.b=2"),
        vec![
            "CREATE INDEX idx_users_a_b ON users (a, b);",
            "CREATE INDEX idx_orders_x ON orders (x);",
        ]
    );
}

#[test]
fn test_repeated_column_is_not_composite() {
    assert_eq!(
        statements("SELECT 1 FROM users u WHERE u.a = 1 OR u.a = 2"),
        vec!["CREATE INDEX idx_users_a ON users (a);"]
    );
}

#[test]
fn test_table_name_as_qualifier() {
    assert_eq!(
        statements("SELECT id FROM users WHERE users.email = 'x'"),
        vec!["CREATE INDEX idx_users_email ON users (email);"]
    );
}

#[test]
fn test_recommendations_are_deterministic() {
    let sql = "SELECT 1 FROM users u JOIN orders o ON u.id = o.uid WHERE u.a = 1 AND o.b = 2 ORDER BY o.ts";
    let advisor = Advisor::new();
    let first = advisor.analyze(sql).unwrap().index_recommendations;
    let second = advisor.analyze(sql).unwrap().index_recommendations;
    assert_eq!(first, second);
}

#[test]
fn test_recommendation_serialization() {
    let result = recommend("SELECT id FROM users u WHERE u.email = 'x'");
    let json = serde_json::to_value(&result[0]).unwrap();
    assert_eq!(json["impact"], "High");
    assert_eq!(json["statement"], "CREATE INDEX idx_users_email ON users (email);");
    assert!(json.get("predicted_impact").is_none());
}
