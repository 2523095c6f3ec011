//! Type definitions for the anti-pattern detector.
//!
//! - [`AntiPatternKind`] - Identifier of each detectable construct
//! - [`RuleCategory`] - Grouping shown next to each finding in text output
//! - [`AntiPatternFinding`] - A single detection, serialized as `{type, message}`

use serde::Serialize;

/// Construct a rule detects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AntiPatternKind {
    SelectStar,
    MissingWhereClause,
    FunctionOnColumnInWhere
}

impl AntiPatternKind {
    /// Identifier used in output and in `[rules] disabled`
    pub fn id(self) -> &'static str {
        match self {
            Self::SelectStar => "SELECT_STAR",
            Self::MissingWhereClause => "MISSING_WHERE_CLAUSE",
            Self::FunctionOnColumnInWhere => "FUNCTION_ON_COLUMN_IN_WHERE"
        }
    }

    pub fn category(self) -> RuleCategory {
        match self {
            Self::SelectStar => RuleCategory::Style,
            Self::MissingWhereClause => RuleCategory::Security,
            Self::FunctionOnColumnInWhere => RuleCategory::Performance
        }
    }
}

impl std::fmt::Display for AntiPatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Category of a rule for grouping in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuleCategory {
    /// Constructs that defeat indexes or force extra work
    Performance,
    /// Habits that hide intent
    Style,
    /// Statements that may touch every row
    Security
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Performance => write!(f, "Performance"),
            Self::Style => write!(f, "Style"),
            Self::Security => write!(f, "Security")
        }
    }
}

/// A single anti-pattern found in a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AntiPatternFinding {
    #[serde(rename = "type")]
    pub kind:    AntiPatternKind,
    pub message: String
}

impl AntiPatternFinding {
    pub fn new(kind: AntiPatternKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into()
        }
    }
}

/// Metadata about a rule for identification and configuration.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    /// Kind of finding the rule emits; also fixes its category
    pub kind: AntiPatternKind,
    /// Human-readable rule name
    pub name: &'static str
}
