//! Rewrite suggestion engine.
//!
//! Independent [`RewriteRule`]s matched against the syntax tree, each
//! contributing at most one suggestion. Every suggestion carries non-empty
//! `suggested_sql` and `reason` text so a benchmark harness can run it.

mod subquery;
mod union;

use serde::Serialize;
pub use subquery::InSubqueryToJoin;
pub use union::UnionWithoutAll;

use crate::query::Statement;

/// Kind of rewrite proposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RewriteKind {
    ReplaceUnionWithUnionAll,
    RewriteSubqueryToJoin
}

impl std::fmt::Display for RewriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReplaceUnionWithUnionAll => write!(f, "REPLACE_UNION_WITH_UNION_ALL"),
            Self::RewriteSubqueryToJoin => write!(f, "REWRITE_SUBQUERY_TO_JOIN")
        }
    }
}

/// A proposed textual rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteSuggestion {
    #[serde(rename = "type")]
    pub kind:          RewriteKind,
    pub suggested_sql: String,
    pub reason:        String
}

/// Pattern over a statement with a fix to propose
pub trait RewriteRule: Send + Sync {
    fn kind(&self) -> RewriteKind;

    /// Suggestion for the first match, if any
    fn suggest(&self, statement: &Statement) -> Option<RewriteSuggestion>;
}

/// Evaluate every rewrite rule in order: UNION first, then IN-subquery
pub fn suggest_rewrites(statement: &Statement) -> Vec<RewriteSuggestion> {
    let rules: [&dyn RewriteRule; 2] = [&UnionWithoutAll, &InSubqueryToJoin];
    rules
        .iter()
        .filter_map(|rule| rule.suggest(statement))
        .collect()
}
