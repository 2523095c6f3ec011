use serde::Serialize;

use super::{alias::AliasTable, extract::extract_columns};
use crate::syntax::{Node, SyntaxTree};

/// Kind of statement, taken from its leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
#[non_exhaustive]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other
}

impl StatementKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "SELECT" => Some(Self::Select),
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None
        }
    }

    /// Classify a tree by its first keyword.
    ///
    /// A leading `WITH` is skipped to the first top-level DML keyword; the
    /// common table expressions themselves sit inside parentheses.
    pub fn from_tree(tree: &SyntaxTree) -> Self {
        let Some(first) = tree.first_significant().and_then(Node::keyword) else {
            return Self::Other;
        };
        if first == "WITH" {
            return tree
                .nodes()
                .iter()
                .filter_map(Node::keyword)
                .find_map(Self::from_keyword)
                .unwrap_or(Self::Other);
        }
        Self::from_keyword(first).unwrap_or(Self::Other)
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "SELECT"),
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::Other => write!(f, "OTHER")
        }
    }
}

/// Parsed statement with its derived indices
#[derive(Debug, Clone)]
pub struct Statement {
    tree:      SyntaxTree,
    kind:      StatementKind,
    aliases:   AliasTable,
    columns:   Vec<String>,
    discarded: usize
}

impl Statement {
    pub(crate) fn new(tree: SyntaxTree, discarded: usize) -> Self {
        let kind = StatementKind::from_tree(&tree);
        let aliases = AliasTable::from_tree(&tree);
        let columns = extract_columns(&tree, &aliases);
        Self {
            tree,
            kind,
            aliases,
            columns,
            discarded
        }
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Distinct real table names, sorted
    pub fn tables(&self) -> Vec<String> {
        self.aliases.tables()
    }

    /// Distinct referenced column names, sorted
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw text of the first top-level `WHERE` clause
    pub fn where_clause(&self) -> Option<String> {
        self.tree.where_clause().map(ToString::to_string)
    }

    /// Text of the analyzed statement
    pub fn raw(&self) -> String {
        self.tree.to_string()
    }

    /// Number of statements after the first that were ignored
    pub fn discarded_statements(&self) -> usize {
        self.discarded
    }
}
