use super::{RewriteKind, RewriteRule, RewriteSuggestion};
use crate::{query::Statement, syntax::Node};

const TEMPLATE: &str =
    "-- Example Rewrite:\nSELECT t1.*\nFROM table1 t1\nJOIN table2 t2 ON t1.column = t2.column;";

const REASON: &str = "Found a subquery in an `IN` clause. Rewriting this as a `JOIN` is often significantly more performant as it allows the database planner to create a better execution strategy.";

/// `col IN (SELECT ...)` inside WHERE.
///
/// The suggestion is a generic template, not a rewrite of the user's tables.
pub struct InSubqueryToJoin;

impl RewriteRule for InSubqueryToJoin {
    fn kind(&self) -> RewriteKind {
        RewriteKind::RewriteSubqueryToJoin
    }

    fn suggest(&self, statement: &Statement) -> Option<RewriteSuggestion> {
        let where_clause = statement.tree().where_clause()?;
        if !where_clause.any(&is_in_subquery) {
            return None;
        }
        Some(RewriteSuggestion {
            kind:          self.kind(),
            suggested_sql: TEMPLATE.to_string(),
            reason:        REASON.to_string()
        })
    }
}

fn is_in_subquery(node: &Node) -> bool {
    let Node::Comparison(children) = node else {
        return false;
    };
    children.iter().any(|n| n.is_keyword("IN"))
        && children.iter().any(|n| {
            matches!(n, Node::Parenthesis(inner) if inner.iter().any(|i| i.is_keyword("SELECT")))
        })
}
