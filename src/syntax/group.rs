//! Grouping passes turning flat leaves into the syntax tree.
//!
//! Each nesting level goes through the same pipeline:
//!
//! 1. compound keywords (`LEFT JOIN`, `ORDER BY`)
//! 2. identifiers, functions and aliases
//! 3. comparisons
//! 4. identifier lists
//! 5. `WHERE` clauses
//!
//! Parentheses are nested first; their contents run the pipeline as soon as
//! the closing parenthesis is seen.

use std::collections::VecDeque;

use smallvec::{SmallVec, smallvec};

use super::node::{Function, Identifier, Leaf, Node};

/// Compound keywords, longest variants first
const COMPOUND_KEYWORDS: &[&[&str]] = &[
    &["ORDER", "BY"],
    &["GROUP", "BY"],
    &["PARTITION", "BY"],
    &["LEFT", "OUTER", "JOIN"],
    &["LEFT", "JOIN"],
    &["RIGHT", "OUTER", "JOIN"],
    &["RIGHT", "JOIN"],
    &["FULL", "OUTER", "JOIN"],
    &["FULL", "JOIN"],
    &["INNER", "JOIN"],
    &["CROSS", "JOIN"],
    &["NATURAL", "JOIN"]
];

/// Keywords that end a `WHERE` clause at the same nesting level
const WHERE_TERMINATORS: &[&str] = &[
    "ORDER BY",
    "GROUP BY",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "RETURNING",
    "FETCH",
    "WINDOW"
];

/// Group flat leaves of one statement into top-level nodes.
pub fn group(leaves: Vec<Node>) -> Vec<Node> {
    group_level(nest_parenthesis(leaves))
}

/// Input with lookahead used by every pass
struct Stream {
    items: VecDeque<Node>
}

impl Stream {
    fn new(nodes: Vec<Node>) -> Self {
        Self {
            items: nodes.into()
        }
    }

    fn next(&mut self) -> Option<Node> {
        self.items.pop_front()
    }

    fn peek(&self, offset: usize) -> Option<&Node> {
        self.items.get(offset)
    }

    /// Offset of the first non-whitespace node at or after `from`
    fn significant(&self, from: usize) -> Option<usize> {
        (from..self.items.len()).find(|&i| !self.items[i].is_whitespace())
    }

    /// Pop `count` nodes in order
    fn take(&mut self, count: usize) -> Vec<Node> {
        let count = count.min(self.items.len());
        self.items.drain(..count).collect()
    }
}

fn group_level(nodes: Vec<Node>) -> Vec<Node> {
    let nodes = merge_keywords(nodes);
    let nodes = group_identifiers(nodes);
    let nodes = group_comparisons(nodes);
    let nodes = group_identifier_lists(nodes);
    group_where(nodes)
}

fn nest_parenthesis(leaves: Vec<Node>) -> Vec<Node> {
    let mut stack: Vec<Vec<Node>> = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    for leaf in leaves {
        if leaf.is_punctuation("(") {
            stack.push(std::mem::take(&mut current));
            current.push(leaf);
        } else if leaf.is_punctuation(")")
            && let Some(parent) = stack.pop()
        {
            current.push(leaf);
            let group = close_parenthesis(std::mem::replace(&mut current, parent));
            current.push(group);
        } else {
            current.push(leaf);
        }
    }
    // Unbalanced input: close whatever is still open
    while let Some(parent) = stack.pop() {
        let group = close_parenthesis(std::mem::replace(&mut current, parent));
        current.push(group);
    }
    current
}

fn close_parenthesis(mut children: Vec<Node>) -> Node {
    let closing = if children.len() > 1 && children.last().is_some_and(|n| n.is_punctuation(")"))
    {
        children.pop()
    } else {
        None
    };
    let inner = children.split_off(1.min(children.len()));
    children.extend(group_level(inner));
    children.extend(closing);
    Node::Parenthesis(children)
}

fn merge_keywords(nodes: Vec<Node>) -> Vec<Node> {
    let mut stream = Stream::new(nodes);
    let mut out = Vec::new();
    while let Some(node) = stream.next() {
        let compound = node
            .keyword()
            .and_then(|first| match_compound(first, &stream));
        match compound {
            Some((pattern, consumed)) => {
                let mut text = node.to_string();
                for part in stream.take(consumed) {
                    text.push_str(&part.to_string());
                }
                out.push(Node::Keyword(Leaf::new(text, pattern.join(" "))));
            }
            None => out.push(node)
        }
    }
    out
}

fn match_compound(first: &str, stream: &Stream) -> Option<(&'static [&'static str], usize)> {
    COMPOUND_KEYWORDS.iter().copied().find_map(|pattern| {
        if pattern[0] != first {
            return None;
        }
        let mut consumed = 0;
        for word in &pattern[1..] {
            let at = stream.significant(consumed)?;
            if !stream.peek(at)?.is_keyword(word) {
                return None;
            }
            consumed = at + 1;
        }
        Some((pattern, consumed))
    })
}

fn group_identifiers(nodes: Vec<Node>) -> Vec<Node> {
    let mut stream = Stream::new(nodes);
    let mut out: Vec<Node> = Vec::new();
    while let Some(node) = stream.next() {
        let node = match node {
            Node::Name(leaf) => qualified_name(leaf, &mut stream),
            Node::Wildcard(leaf) if ends_with_operand(&out) => Node::Operator(leaf),
            other => other
        };
        let node = attach_alias(node, &mut stream);
        out.push(attach_ordering(node, &mut stream));
    }
    out
}

/// `name(.name)*`, `name.*` or `name(...)`
fn qualified_name(first: Leaf, stream: &mut Stream) -> Node {
    let mut parts: SmallVec<[String; 3]> = smallvec![first.normalized.clone()];
    let mut children = vec![Node::Name(first)];
    while stream.peek(0).is_some_and(|n| n.is_punctuation("."))
        && stream
            .peek(1)
            .is_some_and(|n| matches!(n, Node::Name(_) | Node::Keyword(_) | Node::Wildcard(_)))
    {
        for part in stream.take(2) {
            match part {
                Node::Keyword(leaf) => {
                    parts.push(leaf.text.clone());
                    children.push(Node::Name(Leaf::plain(leaf.text)));
                }
                Node::Name(leaf) | Node::Wildcard(leaf) => {
                    parts.push(leaf.normalized.clone());
                    children.push(Node::Name(leaf));
                }
                other => children.push(other)
            }
        }
    }
    if matches!(stream.peek(0), Some(Node::Parenthesis(_))) {
        children.extend(stream.next());
        return Node::Function(Function {
            name: parts.join("."),
            children
        });
    }
    let name = parts.pop();
    Node::Identifier(Identifier {
        qualifier: parts.pop(),
        name,
        alias: None,
        children
    })
}

fn ends_with_operand(out: &[Node]) -> bool {
    out.iter()
        .rev()
        .find(|n| !n.is_whitespace())
        .is_some_and(|n| {
            matches!(
                n,
                Node::Identifier(_) | Node::Function(_) | Node::Literal(_) | Node::Parenthesis(_)
            )
        })
}

fn accepts_alias(node: &Node) -> bool {
    match node {
        Node::Identifier(identifier) => {
            identifier.alias.is_none() && identifier.column_name().is_some()
        }
        Node::Function(_) | Node::Parenthesis(_) => true,
        _ => false
    }
}

/// `expr [AS] alias`
fn attach_alias(node: Node, stream: &mut Stream) -> Node {
    if !accepts_alias(&node) {
        return node;
    }
    let Some(at) = stream.significant(0) else {
        return node;
    };
    let (alias_at, explicit) = if stream.peek(at).is_some_and(|n| n.is_keyword("AS")) {
        match stream.significant(at + 1) {
            Some(next) => (next, true),
            None => return node
        }
    } else {
        (at, false)
    };
    let Some(Node::Name(alias)) = stream.peek(alias_at) else {
        return node;
    };
    // An implicit alias must be separated by whitespace and must not start
    // another qualified name or a call
    if !explicit
        && (at == 0
            || stream
                .peek(alias_at + 1)
                .is_some_and(|n| n.is_punctuation(".") || matches!(n, Node::Parenthesis(_))))
    {
        return node;
    }
    let alias = alias.normalized.clone();
    let tail = stream.take(alias_at + 1);
    let mut identifier = into_identifier(node);
    identifier.alias = Some(alias);
    identifier.children.extend(tail);
    Node::Identifier(identifier)
}

/// `expr ASC|DESC` inside ORDER BY lists
fn attach_ordering(node: Node, stream: &mut Stream) -> Node {
    if !matches!(node, Node::Identifier(_) | Node::Function(_)) {
        return node;
    }
    let Some(at) = stream.significant(0) else {
        return node;
    };
    if !stream
        .peek(at)
        .is_some_and(|n| n.is_keyword("ASC") || n.is_keyword("DESC"))
    {
        return node;
    }
    let tail = stream.take(at + 1);
    let mut identifier = into_identifier(node);
    identifier.children.extend(tail);
    Node::Identifier(identifier)
}

fn into_identifier(node: Node) -> Identifier {
    match node {
        Node::Identifier(identifier) => identifier,
        other => Identifier {
            qualifier: None,
            name:      None,
            alias:     None,
            children:  vec![other]
        }
    }
}

fn is_comparison_operator(node: &Node) -> bool {
    node.is_comparator()
        || node.is_keyword("IN")
        || node.is_keyword("LIKE")
        || node.is_keyword("ILIKE")
        || node.is_keyword("IS")
}

fn group_comparisons(nodes: Vec<Node>) -> Vec<Node> {
    let mut stream = Stream::new(nodes);
    let mut out: Vec<Node> = Vec::new();
    while let Some(node) = stream.next() {
        if !is_comparison_operator(&node) {
            out.push(node);
            continue;
        }
        let allows_not =
            node.is_keyword("IN") || node.is_keyword("LIKE") || node.is_keyword("ILIKE");
        let Some(mut children) = take_left_operand(&mut out, allows_not) else {
            out.push(node);
            continue;
        };
        let is_is = node.is_keyword("IS");
        children.push(node);
        if is_is
            && let Some(at) = stream.significant(0)
            && stream.peek(at).is_some_and(|n| n.is_keyword("NOT"))
        {
            children.extend(stream.take(at + 1));
        }
        if let Some(at) = stream.significant(0)
            && stream.peek(at).is_some_and(Node::is_operand)
        {
            children.extend(stream.take(at + 1));
        }
        out.push(Node::Comparison(children));
    }
    out
}

/// Split the left operand (and an optional `NOT`) off the end of `out`
fn take_left_operand(out: &mut Vec<Node>, allows_not: bool) -> Option<Vec<Node>> {
    let mut index = last_significant(out, out.len())?;
    if allows_not && out[index].is_keyword("NOT") {
        index = last_significant(out, index)?;
    }
    if !out[index].is_operand() {
        return None;
    }
    Some(out.split_off(index))
}

/// Index of the last non-whitespace node before `end`
fn last_significant(nodes: &[Node], end: usize) -> Option<usize> {
    (0..end).rev().find(|&i| !nodes[i].is_whitespace())
}

fn is_list_item(node: &Node) -> bool {
    matches!(
        node,
        Node::Identifier(_)
            | Node::Function(_)
            | Node::Literal(_)
            | Node::Wildcard(_)
            | Node::Comparison(_)
            | Node::IdentifierList(_)
    ) || node.is_keyword("NULL")
}

fn group_identifier_lists(nodes: Vec<Node>) -> Vec<Node> {
    let mut stream = Stream::new(nodes);
    let mut out: Vec<Node> = Vec::new();
    while let Some(node) = stream.next() {
        if !node.is_punctuation(",") {
            out.push(node);
            continue;
        }
        let left = last_significant(&out, out.len()).filter(|&i| is_list_item(&out[i]));
        let right = stream
            .significant(0)
            .filter(|&at| stream.peek(at).is_some_and(is_list_item));
        let (Some(left), Some(right)) = (left, right) else {
            out.push(node);
            continue;
        };
        let mut items = Vec::new();
        for part in out.split_off(left) {
            match part {
                Node::IdentifierList(children) if items.is_empty() => items.extend(children),
                other => items.push(other)
            }
        }
        items.push(node);
        items.extend(stream.take(right + 1));
        out.push(Node::IdentifierList(items));
    }
    out
}

fn group_where(nodes: Vec<Node>) -> Vec<Node> {
    let mut stream = Stream::new(nodes);
    let mut out = Vec::new();
    while let Some(node) = stream.next() {
        if !node.is_keyword("WHERE") {
            out.push(node);
            continue;
        }
        let end = (0..stream.items.len())
            .find(|&i| {
                stream
                    .peek(i)
                    .and_then(Node::keyword)
                    .is_some_and(|kw| WHERE_TERMINATORS.contains(&kw))
            })
            .unwrap_or(stream.items.len());
        let mut children = vec![node];
        children.extend(stream.take(end));
        out.push(Node::Where(children));
    }
    out
}

#[cfg(test)]
mod tests {
    use sqlparser::dialect::GenericDialect;

    use super::*;
    use crate::syntax::lexer::lex;

    fn grouped(sql: &str) -> Vec<Node> {
        group(lex(sql, &GenericDialect {}).unwrap())
    }

    fn significant(nodes: &[Node]) -> Vec<&Node> {
        nodes.iter().filter(|n| !n.is_whitespace()).collect()
    }

    #[test]
    fn test_grouping_preserves_text() {
        let sql = "SELECT u.name, COUNT(o.id) AS total FROM users u\n  LEFT JOIN orders o ON u.id = o.user_id WHERE u.a = 1 ORDER BY total DESC;";
        let text: String = grouped(sql).iter().map(|n| n.to_string()).collect();
        assert_eq!(text, sql);
    }

    #[test]
    fn test_compound_join_keyword() {
        let nodes = grouped("SELECT a FROM t LEFT  OUTER JOIN s ON t.id = s.id");
        assert!(nodes.iter().any(|n| n.is_keyword("LEFT OUTER JOIN")));
    }

    #[test]
    fn test_qualified_identifier() {
        let nodes = grouped("SELECT u.name FROM users");
        match &nodes[2] {
            Node::Identifier(identifier) => {
                assert_eq!(identifier.qualifier.as_deref(), Some("u"));
                assert_eq!(identifier.name.as_deref(), Some("name"));
            }
            other => panic!("expected identifier, got {other:?}")
        }
    }

    #[test]
    fn test_implicit_table_alias() {
        let nodes = grouped("SELECT a FROM users u WHERE a = 1");
        let table = significant(&nodes)[3];
        match table {
            Node::Identifier(identifier) => {
                assert_eq!(identifier.name.as_deref(), Some("users"));
                assert_eq!(identifier.alias.as_deref(), Some("u"));
            }
            other => panic!("expected identifier, got {other:?}")
        }
    }

    #[test]
    fn test_function_with_alias_wraps_expression() {
        let nodes = grouped("SELECT COUNT(o.id) AS total FROM orders o");
        match &nodes[2] {
            Node::Identifier(identifier) => {
                assert!(identifier.name.is_none());
                assert_eq!(identifier.alias.as_deref(), Some("total"));
                assert!(matches!(identifier.children[0], Node::Function(_)));
            }
            other => panic!("expected identifier, got {other:?}")
        }
    }

    #[test]
    fn test_comparison_inside_where() {
        let nodes = grouped("DELETE FROM t WHERE id = 1 AND name LIKE 'a%'");
        let Some(Node::Where(children)) = nodes.last() else {
            panic!("expected trailing where clause");
        };
        let comparisons = children
            .iter()
            .filter(|n| matches!(n, Node::Comparison(_)))
            .count();
        assert_eq!(comparisons, 2);
    }

    #[test]
    fn test_not_in_subquery_is_one_comparison() {
        let nodes = grouped("SELECT a FROM t WHERE id NOT IN (SELECT id FROM s)");
        let Some(Node::Where(children)) = nodes.last() else {
            panic!("expected trailing where clause");
        };
        let comparison = children
            .iter()
            .find(|n| matches!(n, Node::Comparison(_)))
            .expect("comparison");
        assert!(comparison.children().iter().any(|n| n.is_keyword("NOT")));
        assert!(comparison.children().iter().any(|n| n.is_keyword("IN")));
    }

    #[test]
    fn test_where_stops_at_order_by() {
        let nodes = grouped("SELECT a FROM t WHERE a = 1 ORDER BY a");
        let kinds: Vec<bool> = significant(&nodes)
            .iter()
            .map(|n| matches!(n, Node::Where(_)))
            .collect();
        assert_eq!(kinds, vec![false, false, false, false, true, false, false]);
    }

    #[test]
    fn test_identifier_list_with_ordering() {
        let nodes = grouped("SELECT a FROM t ORDER BY a DESC, b");
        assert!(matches!(nodes.last(), Some(Node::IdentifierList(_))));
    }

    #[test]
    fn test_multiplication_is_not_wildcard() {
        let nodes = grouped("SELECT price * 2 FROM t");
        assert!(!nodes.iter().any(|n| matches!(n, Node::Wildcard(_))));
        let nodes = grouped("SELECT * FROM t");
        assert!(matches!(nodes[2], Node::Wildcard(_)));
    }

    #[test]
    fn test_unbalanced_parenthesis_is_closed() {
        let nodes = grouped("SELECT COUNT(a FROM t");
        assert!(nodes.iter().any(|n| matches!(n, Node::Function(_))));
    }
}
