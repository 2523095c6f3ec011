use compact_str::CompactString;
use indexmap::IndexMap;
use serde::Serialize;

use crate::syntax::{Node, SyntaxTree};

/// Keywords after which the next significant node names a table
const TABLE_KEYWORDS: &[&str] = &[
    "FROM",
    "JOIN",
    "LEFT JOIN",
    "RIGHT JOIN",
    "INNER JOIN",
    "LEFT OUTER JOIN",
    "RIGHT OUTER JOIN",
    "FULL JOIN",
    "FULL OUTER JOIN",
    "CROSS JOIN",
    "NATURAL JOIN",
    "UPDATE",
    "INTO"
];

/// Whether `keyword` (normalized) introduces a table reference
pub fn introduces_table(keyword: &str) -> bool {
    TABLE_KEYWORDS.contains(&keyword)
}

/// Table as written in a FROM/JOIN position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReference {
    /// Alias, or the real name when none was given
    pub alias:     CompactString,
    pub real_name: CompactString
}

/// Forward scan state for table positions.
///
/// Set after a table-introducing keyword, kept across whitespace and commas,
/// cleared by the first other significant node.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableScan {
    expecting: bool
}

impl TableScan {
    /// Feed the next sibling; returns `true` when it sits in a table position.
    pub fn step(&mut self, node: &Node) -> bool {
        if node.is_whitespace() || node.is_punctuation(",") {
            return false;
        }
        if node.keyword().is_some_and(introduces_table) {
            self.expecting = true;
            return false;
        }
        std::mem::take(&mut self.expecting)
    }
}

/// References named by a node found in a table position
pub fn table_references(node: &Node) -> Vec<TableReference> {
    match node {
        Node::IdentifierList(items) => items.iter().filter_map(single_reference).collect(),
        other => single_reference(other).into_iter().collect()
    }
}

fn single_reference(node: &Node) -> Option<TableReference> {
    let (real_name, alias) = match node {
        Node::Identifier(identifier) => (identifier.column_name()?, identifier.alias.as_deref()),
        // `INTO users(id, name)`
        Node::Function(function) => (function.name.rsplit('.').next()?, None),
        _ => return None
    };
    Some(TableReference {
        alias:     CompactString::from(alias.unwrap_or(real_name)),
        real_name: CompactString::from(real_name)
    })
}

/// Alias to real table name, in insertion order.
///
/// A repeated alias keeps the last table bound to it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: IndexMap<CompactString, CompactString>
}

impl AliasTable {
    /// Build from the top level of a statement
    pub fn from_tree(tree: &SyntaxTree) -> Self {
        Self::from_nodes(tree.nodes())
    }

    /// Build from one run of sibling nodes
    pub fn from_nodes(nodes: &[Node]) -> Self {
        let mut table = Self::default();
        let mut scan = TableScan::default();
        for node in nodes {
            if scan.step(node) {
                for reference in table_references(node) {
                    table.insert(reference);
                }
            }
        }
        table
    }

    pub fn insert(&mut self, reference: TableReference) {
        self.entries.insert(reference.alias, reference.real_name);
    }

    /// Real table name bound to `alias`
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(CompactString::as_str)
    }

    /// Whether `name` is a known alias or real table name
    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.contains_key(name) || self.entries.values().any(|real| real == name)
    }

    /// Distinct real table names, sorted
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.entries.values().map(ToString::to_string).collect();
        tables.sort_unstable();
        tables.dedup();
        tables
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
