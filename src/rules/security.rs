use super::{AntiPatternFinding, AntiPatternKind, Rule, RuleInfo};
use crate::query::{Statement, StatementKind};

/// UPDATE or DELETE without WHERE affects all rows
pub struct MissingWhereClause;

impl Rule for MissingWhereClause {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            kind: AntiPatternKind::MissingWhereClause,
            name: "UPDATE/DELETE without WHERE"
        }
    }

    fn check(&self, statement: &Statement) -> Option<AntiPatternFinding> {
        let kind = statement.kind();
        if !matches!(kind, StatementKind::Update | StatementKind::Delete) {
            return None;
        }
        if statement.where_clause().is_some() {
            return None;
        }
        Some(AntiPatternFinding::new(
            self.info().kind,
            format!("The {kind} statement lacks a WHERE clause.")
        ))
    }
}
