//! Syntax tree for a single SQL statement.
//!
//! Text is lexed with the [`sqlparser`] tokenizer and then grouped into a
//! tagged [`Node`] tree: keywords, identifiers, identifier lists,
//! comparisons, functions, parentheses and `WHERE` clauses. Grouping is
//! lossless, so rendering a tree reproduces the statement text, and it never
//! fails on unfamiliar grammar: whatever cannot be grouped stays a leaf.

mod group;
mod lexer;
mod node;

use std::fmt;

use sqlparser::dialect::Dialect;

pub use node::{Function, Identifier, Leaf, Node};

use crate::error::ParseError;

/// Grouped statement. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    nodes: Vec<Node>
}

impl SyntaxTree {
    /// Top-level nodes in source order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// First top-level `WHERE` group
    pub fn where_clause(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| matches!(n, Node::Where(_)))
    }

    /// Next non-whitespace top-level node after `index`
    pub fn next_significant(&self, index: usize) -> Option<(usize, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, n)| !n.is_whitespace())
    }

    /// First non-whitespace top-level node
    pub fn first_significant(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| !n.is_whitespace())
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.nodes.iter().try_for_each(|n| write!(f, "{n}"))
    }
}

/// Statements found in the input, each already grouped
#[derive(Debug)]
pub struct Statements {
    pub trees: Vec<SyntaxTree>
}

/// Lex and group every statement of `sql`.
///
/// Statements are split on `;` outside parentheses; the separator stays with
/// the statement it terminates. Statements holding only whitespace are
/// dropped.
pub fn parse_statements(sql: &str, dialect: &dyn Dialect) -> Result<Statements, ParseError> {
    let leaves = lexer::lex(sql, dialect)?;
    let trees = split_statements(leaves)
        .into_iter()
        .filter(|leaves| leaves.iter().any(|n| !n.is_whitespace() && !n.is_punctuation(";")))
        .map(|leaves| SyntaxTree {
            nodes: group::group(leaves)
        })
        .collect();
    Ok(Statements {
        trees
    })
}

fn split_statements(leaves: Vec<Node>) -> Vec<Vec<Node>> {
    let mut statements = Vec::new();
    let mut current = Vec::new();
    let mut depth = 0usize;
    for leaf in leaves {
        if leaf.is_punctuation("(") {
            depth += 1;
        } else if leaf.is_punctuation(")") {
            depth = depth.saturating_sub(1);
        }
        let terminates = depth == 0 && leaf.is_punctuation(";");
        current.push(leaf);
        if terminates {
            statements.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        statements.push(current);
    }
    statements
}
