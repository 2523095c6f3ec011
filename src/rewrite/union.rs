use super::{RewriteKind, RewriteRule, RewriteSuggestion};
use crate::{query::Statement, syntax::Node};

const REASON: &str = "If duplicate removal is not needed, `UNION ALL` is faster as it avoids a sort/hash operation.";

/// `UNION` (or `UNION DISTINCT`) where `UNION ALL` may do
pub struct UnionWithoutAll;

impl RewriteRule for UnionWithoutAll {
    fn kind(&self) -> RewriteKind {
        RewriteKind::ReplaceUnionWithUnionAll
    }

    fn suggest(&self, statement: &Statement) -> Option<RewriteSuggestion> {
        let tree = statement.tree();
        let (union_at, next) = tree
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_keyword("UNION"))
            .map(|(i, _)| (i, tree.next_significant(i)))
            .find(|(_, next)| !next.is_some_and(|(_, node)| node.is_keyword("ALL")))?;
        let distinct_at = next
            .filter(|(_, node)| node.is_keyword("DISTINCT"))
            .map(|(i, _)| i);

        let mut suggested_sql = String::new();
        for (i, node) in tree.nodes().iter().enumerate() {
            if Some(i) == distinct_at {
                suggested_sql.push_str(&keyword_like(node, "ALL"));
                continue;
            }
            suggested_sql.push_str(&node.to_string());
            if i == union_at && distinct_at.is_none() {
                suggested_sql.push(' ');
                suggested_sql.push_str(&keyword_like(node, "ALL"));
            }
        }
        Some(RewriteSuggestion {
            kind: self.kind(),
            suggested_sql,
            reason: REASON.to_string()
        })
    }
}

/// `keyword` in the letter case of `node`'s source text
fn keyword_like(node: &Node, keyword: &str) -> String {
    let text = node.to_string();
    if text.chars().any(|c| c.is_ascii_uppercase()) {
        keyword.to_ascii_uppercase()
    } else {
        keyword.to_ascii_lowercase()
    }
}
