//! # SQL Query Advisor Library
//!
//! Static analysis of a single SQL statement: clause usage, anti-patterns,
//! index recommendations and rewrite suggestions.
//!
//! ```
//! use sql_query_advisor::report::Advisor;
//!
//! let response = Advisor::new()
//!     .analyze("SELECT u.name FROM users u WHERE u.a = 1 AND u.b = 2;")
//!     .unwrap();
//! assert_eq!(
//!     response.index_recommendations[0].statement,
//!     "CREATE INDEX idx_users_a_b ON users (a, b);"
//! );
//! ```

pub mod advisor;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod impact;
pub mod output;
pub mod plan;
pub mod query;
pub mod report;
pub mod rewrite;
pub mod rules;
pub mod syntax;
pub mod usage;

pub use masterror;
