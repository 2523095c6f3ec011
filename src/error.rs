pub use masterror::{AppError, AppResult};
use thiserror::Error;

/// Failure to obtain any statement from the input.
///
/// Unsupported grammar is never an error: the parser keeps whatever it can
/// group. Only input with no statement at all, or text the tokenizer cannot
/// read, fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no SQL statement found in input")]
    EmptyInput,
    #[error("{0}")]
    Tokenize(String)
}

/// Execution plan that cannot be converted into a plan tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid JSON: {0}")]
    Json(String),
    #[error("empty EXPLAIN result")]
    Empty,
    #[error("expected a plan node object")]
    NotAnObject
}

/// Create file read error
pub fn file_read_error(path: &str, source: std::io::Error) -> AppError {
    AppError::internal(format!("Failed to read file '{}': {}", path, source))
}

/// Create query parse error with optional position info
pub fn query_parse_error(message: impl Into<String>) -> AppError {
    let msg = message.into();
    AppError::bad_request(format_sql_error("Query parse error", &msg))
}

/// Create config error
pub fn config_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Create error for input rejected before parsing
pub fn input_limit_error(message: impl Into<String>) -> AppError {
    AppError::bad_request(message.into())
}

/// Format SQL error with position highlighting
fn format_sql_error(prefix: &str, message: &str) -> String {
    // Tokenizer errors end with "at Line: X, Column: Y"
    if let Some(pos) = extract_position(message) {
        format!(
            "{} at line {}, column {}:\n  {}",
            prefix, pos.line, pos.column, message
        )
    } else {
        format!("{}:\n  {}", prefix, message)
    }
}

struct SqlPosition {
    line:   usize,
    column: usize
}

fn extract_position(message: &str) -> Option<SqlPosition> {
    let line_marker = "Line: ";
    let col_marker = ", Column";

    let line_start = message.find(line_marker)? + line_marker.len();
    let col_offset = message[line_start..].find(col_marker)?;
    let line = message[line_start..line_start + col_offset].parse().ok()?;

    let rest = message[line_start + col_offset + col_marker.len()..]
        .trim_start_matches(':')
        .trim_start();
    let col_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let column = rest[..col_end].parse().ok()?;

    Some(SqlPosition {
        line,
        column
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_with_colon() {
        let pos = extract_position("Unterminated string literal at Line: 2, Column: 14").unwrap();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 14);
    }

    #[test]
    fn test_position_without_colon() {
        let pos = extract_position("Expected ) at Line: 3, Column 25").unwrap();
        assert_eq!(pos.line, 3);
        assert_eq!(pos.column, 25);
    }

    #[test]
    fn test_no_position() {
        assert!(extract_position("something broke").is_none());
    }
}
