use super::{AntiPatternFinding, AntiPatternKind, Rule, RuleInfo};
use crate::{
    query::{Statement, StatementKind},
    syntax::Node
};

/// SELECT * fetches every column
pub struct SelectStar;

impl Rule for SelectStar {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            kind: AntiPatternKind::SelectStar,
            name: "SELECT * usage"
        }
    }

    fn check(&self, statement: &Statement) -> Option<AntiPatternFinding> {
        if statement.kind() != StatementKind::Select {
            return None;
        }
        // Only a bare top-level `*`; `t.*`, `COUNT(*)` and `a * b` are not
        // wildcards at this level
        let has_star = statement
            .tree()
            .nodes()
            .iter()
            .any(|node| matches!(node, Node::Wildcard(_)));
        has_star.then(|| AntiPatternFinding::new(self.info().kind, "Avoid using 'SELECT *'."))
    }
}
