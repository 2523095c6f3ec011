//! Configuration loading and management.
//!
//! Configuration is loaded from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. `.sql-advisor.toml` in current directory
//! 4. `~/.config/sql-advisor/config.toml`
//! 5. Default values
//!
//! # Configuration File Format
//!
//! ```toml
//! [rules]
//! disabled = ["SELECT_STAR"]
//!
//! [impact]
//! enabled = true
//! medium_score = 3
//! high_score = 4
//!
//! [limits]
//! max_statement_bytes = 65536
//! max_nesting_depth = 32
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description |
//! |----------|-------------|
//! | `SQL_ADVISOR_MAX_BYTES` | Largest accepted statement, in bytes |
//! | `SQL_ADVISOR_MAX_DEPTH` | Deepest accepted parenthesis nesting |
//! | `SQL_ADVISOR_IMPACT` | `1` or `true` attaches predicted impact labels |
//! | `SQL_ADVISOR_LOG` | Log filter, read by the binary |

use std::{env, fs, path::PathBuf};

use serde::Deserialize;

use crate::error::{AppResult, config_error};

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub rules:  RulesConfig,
    #[serde(default)]
    pub impact: ImpactConfig,
    #[serde(default)]
    pub limits: LimitsConfig
}

/// Rules configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct RulesConfig {
    /// Disabled anti-pattern ids
    #[serde(default)]
    pub disabled: Vec<String>
}

/// Impact classifier configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImpactConfig {
    pub enabled:      bool,
    /// Lowest `join_count + where_clause_count` labelled Medium
    pub medium_score: usize,
    /// Lowest `join_count + where_clause_count` labelled High
    pub high_score:   usize
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            enabled:      false,
            medium_score: 3,
            high_score:   4
        }
    }
}

/// Bounds checked before a statement reaches the parser
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    pub max_statement_bytes: usize,
    pub max_nesting_depth:   usize
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_statement_bytes: 64 * 1024,
            max_nesting_depth:   32
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file in current directory (.sql-advisor.toml)
    /// 3. Config file in home directory (~/.config/sql-advisor/config.toml)
    /// 4. Default values
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sql-advisor")
                .join("config.toml");
            if home_config.exists() {
                config = Self::from_file(&home_config)?;
            }
        }

        // Current directory overrides home
        let local_config = PathBuf::from(".sql-advisor.toml");
        if local_config.exists() {
            config = Self::from_file(&local_config)?;
        }

        config.apply_env(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a single TOML document
    pub fn from_toml(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| config_error(format!("Invalid config file: {}", e)))
    }

    fn from_file(path: &PathBuf) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| config_error(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Override fields from environment variables looked up through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> AppResult<()> {
        if let Some(bytes) = var("SQL_ADVISOR_MAX_BYTES") {
            self.limits.max_statement_bytes = parse_env_number("SQL_ADVISOR_MAX_BYTES", &bytes)?;
        }
        if let Some(depth) = var("SQL_ADVISOR_MAX_DEPTH") {
            self.limits.max_nesting_depth = parse_env_number("SQL_ADVISOR_MAX_DEPTH", &depth)?;
        }
        if let Some(impact) = var("SQL_ADVISOR_IMPACT") {
            self.impact.enabled = matches!(impact.trim(), "1" | "true" | "TRUE" | "yes");
        }
        Ok(())
    }
}

fn parse_env_number(key: &str, value: &str) -> AppResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| config_error(format!("{} must be a non-negative integer, got '{}'", key, value)))
}
