use std::{borrow::Cow, fmt};

/// Terminal token with its source text and normalized form.
///
/// Keywords normalize to upper case with single spaces (`LEFT JOIN`), names
/// to their unquoted value; every other leaf normalizes to its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub text:       String,
    pub normalized: String
}

impl Leaf {
    pub fn new(text: impl Into<String>, normalized: impl Into<String>) -> Self {
        Self {
            text:       text.into(),
            normalized: normalized.into()
        }
    }

    /// Leaf whose normalized form equals its text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            normalized: text.clone(),
            text
        }
    }
}

/// Possibly qualified name, optionally aliased.
///
/// `name` is `None` when the identifier wraps an expression such as
/// `COUNT(o.id) AS total` or a derived table `(SELECT ...) sub`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub qualifier: Option<String>,
    pub name:      Option<String>,
    pub alias:     Option<String>,
    pub children:  Vec<Node>
}

impl Identifier {
    /// Alias if present, otherwise the real name
    pub fn display_name(&self) -> Option<&str> {
        self.alias.as_deref().or(self.name.as_deref())
    }

    /// Real name unless it is a `*` projection
    pub fn column_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| *name != "*")
    }
}

/// Function call: name followed directly by a parenthesized argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name:     String,
    pub children: Vec<Node>
}

impl Function {
    /// Parenthesized argument groups, the name parts excluded
    pub fn arguments(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter(|child| matches!(child, Node::Parenthesis(_)))
    }
}

/// Syntax tree node.
///
/// Leaves carry source text; groups own their children in source order so
/// concatenating the text of all nodes reproduces the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Keyword(Leaf),
    Name(Leaf),
    Literal(Leaf),
    Operator(Leaf),
    Wildcard(Leaf),
    Punctuation(Leaf),
    Whitespace(Leaf),
    Identifier(Identifier),
    IdentifierList(Vec<Node>),
    Comparison(Vec<Node>),
    Function(Function),
    Parenthesis(Vec<Node>),
    Where(Vec<Node>)
}

const COMPARATORS: [&str; 9] = ["=", "==", "!=", "<>", "<", ">", "<=", ">=", "<=>"];

impl Node {
    /// Direct children; empty for leaves
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Identifier(identifier) => &identifier.children,
            Self::Function(function) => &function.children,
            Self::IdentifierList(children)
            | Self::Comparison(children)
            | Self::Parenthesis(children)
            | Self::Where(children) => children,
            Self::Keyword(_)
            | Self::Name(_)
            | Self::Literal(_)
            | Self::Operator(_)
            | Self::Wildcard(_)
            | Self::Punctuation(_)
            | Self::Whitespace(_) => &[]
        }
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Keyword(leaf)
            | Self::Name(leaf)
            | Self::Literal(leaf)
            | Self::Operator(leaf)
            | Self::Wildcard(leaf)
            | Self::Punctuation(leaf)
            | Self::Whitespace(leaf) => Some(leaf),
            _ => None
        }
    }

    /// Normalized text; groups normalize to their source text
    pub fn normalized(&self) -> Cow<'_, str> {
        match self.leaf() {
            Some(leaf) => Cow::Borrowed(leaf.normalized.as_str()),
            None => Cow::Owned(self.to_string())
        }
    }

    /// Normalized keyword text, if this is a keyword
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Self::Keyword(leaf) => Some(leaf.normalized.as_str()),
            _ => None
        }
    }

    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.keyword() == Some(keyword)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace(_))
    }

    pub fn is_punctuation(&self, text: &str) -> bool {
        matches!(self, Self::Punctuation(leaf) if leaf.text == text)
    }

    pub fn is_comparator(&self) -> bool {
        matches!(self, Self::Operator(leaf) if COMPARATORS.contains(&leaf.text.as_str()))
    }

    /// Value-producing node that can stand on either side of a comparison
    pub fn is_operand(&self) -> bool {
        matches!(
            self,
            Self::Identifier(_) | Self::Function(_) | Self::Literal(_) | Self::Parenthesis(_)
        ) || self.is_keyword("NULL")
    }

    /// Depth-first search over this node and its descendants
    pub fn any(&self, predicate: &dyn Fn(&Node) -> bool) -> bool {
        predicate(self) || self.children().iter().any(|child| child.any(predicate))
    }

    fn write_text(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.leaf() {
            Some(leaf) => out.write_str(&leaf.text),
            None => self
                .children()
                .iter()
                .try_for_each(|child| child.write_text(out))
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_text(f)
    }
}
