use std::sync::LazyLock;

use regex::Regex;

use super::{AntiPatternFinding, AntiPatternKind, Rule, RuleInfo};
use crate::query::Statement;

/// Word directly followed by a parenthesized single, possibly dotted, name:
/// `LOWER(u.name)`, `YEAR (created_at)`.
///
/// Textual match over the WHERE clause. Also fires on `IN (1)`, and nested
/// calls such as `LOWER(TRIM(name))` match through the inner call. Calls with
/// several arguments such as `COALESCE(a, b)` are missed.
static FUNCTION_CALL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\s*\(\s*[\w.]+\s*\)").expect("valid regex"));

/// Function call wrapping a column in WHERE prevents index usage
pub struct FunctionOnColumnInWhere;

impl Rule for FunctionOnColumnInWhere {
    fn info(&self) -> RuleInfo {
        RuleInfo {
            kind: AntiPatternKind::FunctionOnColumnInWhere,
            name: "Function on column in WHERE"
        }
    }

    fn check(&self, statement: &Statement) -> Option<AntiPatternFinding> {
        let where_clause = statement.where_clause()?;
        FUNCTION_CALL_REGEX.is_match(&where_clause).then(|| {
            AntiPatternFinding::new(
                self.info().kind,
                "Found a function call on a column in the WHERE clause."
            )
        })
    }
}
