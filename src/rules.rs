//! Anti-pattern detector.
//!
//! A fixed set of independent rules evaluated against one parsed
//! [`Statement`]. Every enabled rule runs; none short-circuits another, and
//! findings keep rule order.
//!
//! # Rules
//!
//! | Id | Category | Fires when |
//! |----|----------|------------|
//! | `SELECT_STAR` | Style | SELECT with a bare top-level `*` |
//! | `MISSING_WHERE_CLAUSE` | Security | UPDATE or DELETE without WHERE |
//! | `FUNCTION_ON_COLUMN_IN_WHERE` | Performance | WHERE text contains `name(col)` |
//!
//! # Configuration
//!
//! ```toml
//! [rules]
//! disabled = ["SELECT_STAR"]
//! ```
//!
//! # Implementing Custom Rules
//!
//! ```
//! use sql_query_advisor::{
//!     query::Statement,
//!     rules::{AntiPatternFinding, AntiPatternKind, Rule, RuleInfo}
//! };
//!
//! pub struct Always;
//!
//! impl Rule for Always {
//!     fn info(&self) -> RuleInfo {
//!         RuleInfo {
//!             kind: AntiPatternKind::SelectStar,
//!             name: "Always"
//!         }
//!     }
//!
//!     fn check(&self, _statement: &Statement) -> Option<AntiPatternFinding> {
//!         Some(AntiPatternFinding::new(self.info().kind, "always"))
//!     }
//! }
//! ```

mod performance;
mod security;
mod style;
mod types;

use tracing::trace;
pub use types::{AntiPatternFinding, AntiPatternKind, RuleCategory, RuleInfo};

use crate::{config::RulesConfig, query::Statement};

/// Check for one anti-pattern.
///
/// Rules are total over any statement: an unmet precondition contributes
/// nothing. They must be `Send + Sync` so one runner can serve parallel
/// requests.
pub trait Rule: Send + Sync {
    /// Returns metadata about this rule.
    fn info(&self) -> RuleInfo;

    /// Inspect a statement, returning a finding when the pattern is present.
    fn check(&self, statement: &Statement) -> Option<AntiPatternFinding>;
}

/// Ordered collection of enabled rules.
///
/// # Example
///
/// ```
/// use sql_query_advisor::{config::RulesConfig, query::parse, rules::RuleRunner};
///
/// let config = RulesConfig {
///     disabled: vec!["select_star".into()]
/// };
///
/// let runner = RuleRunner::with_config(&config);
/// let statement = parse("SELECT * FROM users").unwrap();
/// assert!(runner.detect(&statement).is_empty());
/// ```
pub struct RuleRunner {
    rules: Vec<Box<dyn Rule>>
}

impl Default for RuleRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRunner {
    /// Create a runner with every rule enabled
    pub fn new() -> Self {
        Self::with_config(&RulesConfig::default())
    }

    /// Create a runner without the rules listed in `config.disabled`
    ///
    /// # Notes
    ///
    /// - Ids are matched case-insensitively
    /// - Unknown ids are ignored
    pub fn with_config(config: &RulesConfig) -> Self {
        let all_rules: Vec<Box<dyn Rule>> = vec![
            Box::new(style::SelectStar),
            Box::new(security::MissingWhereClause),
            Box::new(performance::FunctionOnColumnInWhere),
        ];
        let rules = all_rules
            .into_iter()
            .filter(|r| {
                !config
                    .disabled
                    .iter()
                    .any(|d| d.eq_ignore_ascii_case(r.info().kind.id()))
            })
            .collect();
        Self {
            rules
        }
    }

    /// Metadata of the enabled rules, in evaluation order
    pub fn rules(&self) -> Vec<RuleInfo> {
        self.rules.iter().map(|r| r.info()).collect()
    }

    /// Evaluate every enabled rule against `statement`
    pub fn detect(&self, statement: &Statement) -> Vec<AntiPatternFinding> {
        self.rules
            .iter()
            .filter_map(|rule| {
                let finding = rule.check(statement);
                trace!(rule = rule.info().name, matched = finding.is_some(), "rule evaluated");
                finding
            })
            .collect()
    }
}

/// Evaluate the default rule set against `statement`
pub fn detect_anti_patterns(statement: &Statement) -> Vec<AntiPatternFinding> {
    RuleRunner::new().detect(statement)
}
