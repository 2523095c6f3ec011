//! Clause-usage classifier.
//!
//! Buckets column references by the clause they appear in. The scan walks
//! the statement's top-level nodes once, threading a [`ClauseState`] through
//! a fold:
//!
//! - `ON` arms the join state; the next comparison is searched for join keys
//! - a `WHERE` group is searched entirely for filters
//! - `ORDER BY` / `GROUP BY` mark the next significant sibling for capture
//!
//! Within a captured subtree, function names are skipped but their arguments
//! are searched, and nodes in a FROM/JOIN position of a nested subquery are
//! never treated as columns.

use std::collections::BTreeSet;

use compact_str::CompactString;
use serde::Serialize;

use crate::{
    query::TableScan,
    syntax::{Node, SyntaxTree}
};

/// Alias recorded for a column with no qualifier
pub const UNKNOWN_ALIAS: &str = "unknown";

/// Clause a column reference appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseRole {
    WhereFilters,
    JoinKeys,
    OrderBy,
    GroupBy
}

impl ClauseRole {
    pub const ALL: [Self; 4] = [Self::WhereFilters, Self::JoinKeys, Self::OrderBy, Self::GroupBy];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WhereFilters => "where_filters",
            Self::JoinKeys => "join_keys",
            Self::OrderBy => "order_by",
            Self::GroupBy => "group_by"
        }
    }
}

impl std::fmt::Display for ClauseRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(alias, column)` pair; serialized as a two-element array
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ColumnReference(pub CompactString, pub CompactString);

impl ColumnReference {
    pub fn new(alias: impl Into<CompactString>, column: impl Into<CompactString>) -> Self {
        Self(alias.into(), column.into())
    }

    /// Qualifier as written, or [`UNKNOWN_ALIAS`]
    pub fn alias(&self) -> &str {
        &self.0
    }

    pub fn column(&self) -> &str {
        &self.1
    }
}

impl std::fmt::Display for ColumnReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// Column references per clause role, deduplicated and sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClauseUsageMap {
    pub where_filters: BTreeSet<ColumnReference>,
    pub join_keys:     BTreeSet<ColumnReference>,
    pub order_by:      BTreeSet<ColumnReference>,
    pub group_by:      BTreeSet<ColumnReference>
}

impl ClauseUsageMap {
    pub fn get(&self, role: ClauseRole) -> &BTreeSet<ColumnReference> {
        match role {
            ClauseRole::WhereFilters => &self.where_filters,
            ClauseRole::JoinKeys => &self.join_keys,
            ClauseRole::OrderBy => &self.order_by,
            ClauseRole::GroupBy => &self.group_by
        }
    }

    fn get_mut(&mut self, role: ClauseRole) -> &mut BTreeSet<ColumnReference> {
        match role {
            ClauseRole::WhereFilters => &mut self.where_filters,
            ClauseRole::JoinKeys => &mut self.join_keys,
            ClauseRole::OrderBy => &mut self.order_by,
            ClauseRole::GroupBy => &mut self.group_by
        }
    }

    pub fn is_empty(&self) -> bool {
        ClauseRole::ALL.iter().all(|&role| self.get(role).is_empty())
    }
}

/// Running state of the top-level scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClauseState {
    /// An `ON` keyword was seen and its comparison is still pending
    pub after_on: bool,
    /// Role whose subject is the next significant sibling
    pub pending:  Option<ClauseRole>
}

impl ClauseState {
    /// Advance over one top-level node, returning the role its subtree is
    /// captured under, if any.
    pub fn step(&mut self, node: &Node) -> Option<ClauseRole> {
        if node.is_whitespace() {
            return None;
        }
        let mut capture = self.pending.take();
        match node {
            Node::Keyword(_) if node.is_keyword("ON") => {
                self.after_on = true;
                return capture;
            }
            Node::Keyword(leaf) => {
                if leaf.normalized.contains("ORDER BY") {
                    self.pending = Some(ClauseRole::OrderBy);
                } else if leaf.normalized.contains("GROUP BY") {
                    self.pending = Some(ClauseRole::GroupBy);
                }
            }
            Node::Comparison(_) if self.after_on => {
                self.after_on = false;
                capture = capture.or(Some(ClauseRole::JoinKeys));
            }
            Node::Where(_) => capture = Some(ClauseRole::WhereFilters),
            _ => {}
        }
        capture
    }
}

/// Classify every column reference of the statement by clause role.
///
/// Total over any tree; buckets stay empty when nothing matches.
pub fn classify(tree: &SyntaxTree) -> ClauseUsageMap {
    tree.nodes()
        .iter()
        .scan(ClauseState::default(), |state, node| Some((state.step(node), node)))
        .fold(ClauseUsageMap::default(), |mut usage, (role, node)| {
            if let Some(role) = role {
                collect(node, usage.get_mut(role));
            }
            usage
        })
}

fn collect(node: &Node, out: &mut BTreeSet<ColumnReference>) {
    match node {
        Node::Function(function) => {
            for argument in function.arguments() {
                collect(argument, out);
            }
        }
        Node::Identifier(identifier) => {
            if let Some(column) = identifier.column_name() {
                let alias = identifier.qualifier.as_deref().unwrap_or(UNKNOWN_ALIAS);
                out.insert(ColumnReference::new(alias, column));
            }
            collect_children(&identifier.children, out);
        }
        other => collect_children(other.children(), out)
    }
}

fn collect_children(children: &[Node], out: &mut BTreeSet<ColumnReference>) {
    let mut scan = TableScan::default();
    for child in children {
        if !scan.step(child) {
            collect(child, out);
        }
    }
}
