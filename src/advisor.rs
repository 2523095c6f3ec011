//! Index advisor.
//!
//! Turns the classified column usage of an [`AnalysisReport`] into
//! `CREATE INDEX` recommendations:
//!
//! 1. WHERE filters are grouped by resolved table; a table filtered on more
//!    than one distinct column gets one composite index over the sorted
//!    columns, and those `(alias, column)` pairs are claimed
//! 2. Remaining WHERE filters, join keys and ORDER BY columns, in that order,
//!    each get a single-column index unless already claimed
//!
//! Columns whose alias does not resolve to a table are dropped. GROUP BY
//! columns never produce a recommendation.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::{
    impact::ImpactLabel,
    query::AliasTable,
    report::AnalysisReport,
    usage::{ClauseRole, ColumnReference}
};

/// Expected benefit of an index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Impact {
    Medium,
    High
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High")
        }
    }
}

/// A proposed index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRecommendation {
    /// Complete `CREATE INDEX` statement
    pub statement:        String,
    pub reason:           String,
    pub impact:           Impact,
    /// Label from an injected impact classifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_impact: Option<ImpactLabel>
}

/// Roles producing single-column indexes, in emission order
const SINGLE_COLUMN_ROLES: [(ClauseRole, &str, Impact); 3] = [
    (ClauseRole::WhereFilters, "filtering in the WHERE clause", Impact::High),
    (ClauseRole::JoinKeys, "a JOIN condition", Impact::High),
    (ClauseRole::OrderBy, "sorting in the ORDER BY clause", Impact::Medium)
];

/// Propose indexes for the column usage recorded in `report`.
///
/// Output order is composite recommendations (by first appearance of their
/// table among the sorted filters), then single-column ones by role.
pub fn advise(report: &AnalysisReport) -> Vec<IndexRecommendation> {
    let aliases = &report.aliases;
    let mut recommendations = Vec::new();
    let mut claimed: BTreeSet<&ColumnReference> = BTreeSet::new();

    for (table, references) in filters_by_table(&report.column_usage.where_filters, aliases) {
        let columns: BTreeSet<&str> = references.iter().map(|r| r.column()).collect();
        if columns.len() < 2 {
            continue;
        }
        let columns: Vec<&str> = columns.into_iter().collect();
        let list = columns.join(", ");
        recommendations.push(IndexRecommendation {
            statement:        create_index(table, &columns),
            reason:           format!("Columns {} are used together in the WHERE clause.", list),
            impact:           Impact::High,
            predicted_impact: None
        });
        claimed.extend(references);
    }

    for (role, usage, impact) in SINGLE_COLUMN_ROLES {
        for reference in report.column_usage.get(role) {
            if claimed.contains(reference) {
                continue;
            }
            let Some(table) = aliases.resolve(reference.alias()) else {
                debug!(%reference, role = %role, "alias does not resolve to a table");
                continue;
            };
            let column = reference.column();
            recommendations.push(IndexRecommendation {
                statement: create_index(table, &[column]),
                reason: format!("Column '{}' is used for {}.", column, usage),
                impact,
                predicted_impact: None
            });
        }
    }
    recommendations
}

/// WHERE filters grouped by the table their alias resolves to
fn filters_by_table<'a>(
    filters: &'a BTreeSet<ColumnReference>,
    aliases: &'a AliasTable
) -> IndexMap<&'a str, Vec<&'a ColumnReference>> {
    let mut grouped: IndexMap<&str, Vec<&ColumnReference>> = IndexMap::new();
    for reference in filters {
        if let Some(table) = aliases.resolve(reference.alias()) {
            grouped.entry(table).or_default().push(reference);
        }
    }
    grouped
}

fn create_index(table: &str, columns: &[&str]) -> String {
    format!(
        "CREATE INDEX idx_{}_{} ON {} ({});",
        table,
        columns.join("_"),
        table,
        columns.join(", ")
    )
}
