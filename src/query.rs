//! Statement parser.
//!
//! Turns raw text into a [`Statement`]: the grouped [`SyntaxTree`] of the
//! first statement plus the indices every later stage reads (statement kind,
//! [`AliasTable`], referenced columns, `WHERE` text).
//!
//! [`SyntaxTree`]: crate::syntax::SyntaxTree

mod alias;
mod extract;
mod types;

use sqlparser::dialect::{
    ClickHouseDialect, Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect
};
use tracing::debug;
pub use alias::{AliasTable, TableReference, TableScan, table_references};
pub use types::{Statement, StatementKind};

use crate::{error::ParseError, syntax::parse_statements};

/// SQL dialect used by the tokenizer
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub enum SqlDialect {
    #[default]
    Generic,
    MySQL,
    PostgreSQL,
    SQLite,
    ClickHouse
}

impl SqlDialect {
    /// Convert to sqlparser dialect for tokenizing
    pub fn into_parser_dialect(self) -> Box<dyn Dialect> {
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::MySQL => Box::new(MySqlDialect {}),
            Self::PostgreSQL => Box::new(PostgreSqlDialect {}),
            Self::SQLite => Box::new(SQLiteDialect {}),
            Self::ClickHouse => Box::new(ClickHouseDialect {})
        }
    }
}

/// Parse the first statement of `sql` with the generic dialect.
///
/// # Errors
///
/// [`ParseError::EmptyInput`] when the input holds no statement,
/// [`ParseError::Tokenize`] when the text cannot be tokenized at all.
pub fn parse(sql: &str) -> Result<Statement, ParseError> {
    parse_with_dialect(sql, SqlDialect::Generic)
}

/// Parse the first statement of `sql`.
///
/// # Notes
///
/// - Statements after the first are discarded; the count is kept in
///   [`Statement::discarded_statements`]
/// - Unsupported grammar degrades to ungrouped leaves instead of failing
pub fn parse_with_dialect(sql: &str, dialect: SqlDialect) -> Result<Statement, ParseError> {
    let parser_dialect = dialect.into_parser_dialect();
    let mut trees = parse_statements(sql, parser_dialect.as_ref())?
        .trees
        .into_iter();
    let tree = trees.next().ok_or(ParseError::EmptyInput)?;
    let discarded = trees.count();
    if discarded > 0 {
        debug!(discarded, "only the first statement is analyzed");
    }
    Ok(Statement::new(tree, discarded))
}
