use std::collections::BTreeSet;

use super::alias::{AliasTable, TableScan};
use crate::syntax::{Node, SyntaxTree};

/// Distinct column names referenced anywhere in the statement, sorted.
///
/// Function names are never columns but their arguments are searched.
/// Identifiers naming a known table or alias, and nodes in a FROM/JOIN
/// position at any nesting level, are skipped.
pub fn extract_columns(tree: &SyntaxTree, aliases: &AliasTable) -> Vec<String> {
    let mut columns = BTreeSet::new();
    collect_siblings(tree.nodes(), aliases, &mut columns);
    columns.into_iter().collect()
}

fn collect_siblings(nodes: &[Node], aliases: &AliasTable, columns: &mut BTreeSet<String>) {
    let mut scan = TableScan::default();
    for node in nodes {
        if !scan.step(node) {
            collect(node, aliases, columns);
        }
    }
}

fn collect(node: &Node, aliases: &AliasTable, columns: &mut BTreeSet<String>) {
    if let Node::Identifier(identifier) = node
        && let Some(name) = identifier.column_name()
        && !aliases.contains_name(name)
    {
        columns.insert(name.to_string());
    }
    collect_siblings(node.children(), aliases, columns);
}
