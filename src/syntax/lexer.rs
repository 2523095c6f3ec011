use sqlparser::{
    dialect::Dialect,
    tokenizer::{Token, Tokenizer}
};

use super::node::{Leaf, Node};
use crate::error::ParseError;

/// Words treated as structural keywords.
///
/// Anything else the tokenizer reports as a keyword (`NAME`, `DATE`,
/// `STATUS`, ...) stays a name so it can be used as a column.
fn is_structural_keyword(word: &str) -> bool {
    matches!(
        word,
        "ALL"
            | "AND"
            | "AS"
            | "ASC"
            | "BETWEEN"
            | "BY"
            | "CASE"
            | "CROSS"
            | "DELETE"
            | "DESC"
            | "DISTINCT"
            | "ELSE"
            | "END"
            | "EXCEPT"
            | "EXISTS"
            | "FETCH"
            | "FOR"
            | "FROM"
            | "FULL"
            | "GROUP"
            | "HAVING"
            | "ILIKE"
            | "IN"
            | "INNER"
            | "INSERT"
            | "INTERSECT"
            | "INTO"
            | "IS"
            | "JOIN"
            | "LATERAL"
            | "LEFT"
            | "LIKE"
            | "LIMIT"
            | "NATURAL"
            | "NOT"
            | "NULL"
            | "NULLS"
            | "OFFSET"
            | "ON"
            | "OR"
            | "ORDER"
            | "OUTER"
            | "OVER"
            | "PARTITION"
            | "RETURNING"
            | "RIGHT"
            | "SELECT"
            | "SET"
            | "THEN"
            | "UNION"
            | "UPDATE"
            | "USING"
            | "VALUES"
            | "WHEN"
            | "WHERE"
            | "WINDOW"
            | "WITH"
    )
}

/// Tokenize `sql` into flat leaf nodes.
///
/// A colon directly followed by a word is a named bind parameter (`:id`) and
/// becomes a single literal.
pub fn lex(sql: &str, dialect: &dyn Dialect) -> Result<Vec<Node>, ParseError> {
    let tokens = Tokenizer::new(dialect, sql)
        .tokenize()
        .map_err(|e| ParseError::Tokenize(e.to_string()))?;
    let mut leaves = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();
    while let Some(token) = tokens.next() {
        if token == Token::Colon
            && let Some(word) = tokens.next_if(|next| matches!(next, Token::Word(_)))
        {
            leaves.push(Node::Literal(Leaf::plain(format!(":{word}"))));
            continue;
        }
        leaves.extend(to_leaf(token));
    }
    Ok(leaves)
}

fn to_leaf(token: Token) -> Option<Node> {
    let text = token.to_string();
    let node = match token {
        Token::EOF => return None,
        Token::Word(word) => {
            let upper = word.value.to_uppercase();
            if word.quote_style.is_some() {
                Node::Name(Leaf::new(text, word.value))
            } else if upper == "TRUE" || upper == "FALSE" {
                Node::Literal(Leaf::new(text, upper))
            } else if is_structural_keyword(&upper) {
                Node::Keyword(Leaf::new(text, upper))
            } else {
                Node::Name(Leaf::new(text, word.value))
            }
        }
        Token::Whitespace(_) => Node::Whitespace(Leaf::plain(text)),
        Token::Number(..)
        | Token::SingleQuotedString(_)
        | Token::DoubleQuotedString(_)
        | Token::SingleQuotedByteStringLiteral(_)
        | Token::DoubleQuotedByteStringLiteral(_)
        | Token::NationalStringLiteral(_)
        | Token::EscapedStringLiteral(_)
        | Token::HexStringLiteral(_)
        | Token::DollarQuotedString(_)
        | Token::Placeholder(_) => Node::Literal(Leaf::plain(text)),
        Token::Comma | Token::SemiColon | Token::Period | Token::LParen | Token::RParen => {
            Node::Punctuation(Leaf::plain(text))
        }
        Token::Mul => Node::Wildcard(Leaf::plain(text)),
        _ => Node::Operator(Leaf::plain(text))
    };
    Some(node)
}

#[cfg(test)]
mod tests {
    use sqlparser::dialect::GenericDialect;

    use super::*;

    #[test]
    fn test_column_named_like_keyword_stays_name() {
        let nodes = lex("SELECT name FROM users", &GenericDialect {}).unwrap();
        assert!(matches!(&nodes[2], Node::Name(leaf) if leaf.normalized == "name"));
    }

    #[test]
    fn test_keywords_are_normalized_to_upper_case() {
        let nodes = lex("select a from t", &GenericDialect {}).unwrap();
        assert_eq!(nodes[0].keyword(), Some("SELECT"));
        assert_eq!(nodes[0].to_string(), "select");
    }

    #[test]
    fn test_quoted_identifier_keeps_quotes_in_text() {
        let nodes = lex("SELECT \"order\" FROM t", &GenericDialect {}).unwrap();
        assert!(matches!(&nodes[2], Node::Name(leaf) if leaf.normalized == "order"));
        assert_eq!(nodes[2].to_string(), "\"order\"");
    }

    #[test]
    fn test_named_parameter_is_one_literal() {
        let nodes = lex("a = :user_id", &GenericDialect {}).unwrap();
        assert!(matches!(nodes.last(), Some(Node::Literal(leaf)) if leaf.text == ":user_id"));
        assert!(!nodes.iter().any(|n| matches!(n, Node::Name(leaf) if leaf.text == "user_id")));
    }

    #[test]
    fn test_unterminated_string_fails() {
        let result = lex("SELECT 'abc FROM t", &GenericDialect {});
        assert!(matches!(result, Err(ParseError::Tokenize(_))));
    }
}
