//! Reporting boundary.
//!
//! [`Advisor`] runs the whole pipeline for one request and bundles the
//! outputs into an [`AdvisorResponse`]:
//!
//! ```text
//! raw text ─▶ parse ─▶ Statement ─┬─▶ classify ─▶ AnalysisReport ─▶ advise
//!                                 ├─▶ rules ─────────┘
//!                                 └─▶ suggest_rewrites
//! ```
//!
//! Requests share no state, so one advisor may serve many threads.

use serde::Serialize;

use crate::{
    advisor::{IndexRecommendation, advise},
    config::Config,
    error::ParseError,
    impact::{ImpactClassifier, ImpactFeatures, ThresholdClassifier},
    query::{AliasTable, SqlDialect, Statement, StatementKind, parse_with_dialect},
    rewrite::{RewriteSuggestion, suggest_rewrites},
    rules::{AntiPatternFinding, RuleRunner},
    usage::{ClauseUsageMap, classify}
};

/// Structural analysis of one statement.
///
/// Built once per request and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub query_type:    StatementKind,
    pub tables:        Vec<String>,
    pub anti_patterns: Vec<AntiPatternFinding>,
    pub column_usage:  ClauseUsageMap,
    /// `max(0, distinct tables - 1)`
    pub join_count:    usize,
    #[serde(skip)]
    pub aliases:       AliasTable,
    #[serde(skip)]
    pub raw_sql:       String
}

impl AnalysisReport {
    pub fn build(statement: &Statement, rules: &RuleRunner) -> Self {
        let tables = statement.tables();
        Self {
            query_type: statement.kind(),
            join_count: tables.len().saturating_sub(1),
            tables,
            anti_patterns: rules.detect(statement),
            column_usage: classify(statement.tree()),
            aliases: statement.aliases().clone(),
            raw_sql: statement.raw()
        }
    }

    /// Classifier input for this statement
    pub fn impact_features(&self) -> ImpactFeatures {
        ImpactFeatures {
            join_count:         self.join_count,
            where_clause_count: self.column_usage.where_filters.len()
        }
    }
}

/// Complete response for one statement
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorResponse {
    #[serde(flatten)]
    pub report:                AnalysisReport,
    pub index_recommendations: Vec<IndexRecommendation>,
    pub rewrite_suggestions:   Vec<RewriteSuggestion>
}

/// Pipeline with its configured rules and optional impact classifier
pub struct Advisor {
    rules:      RuleRunner,
    classifier: Option<Box<dyn ImpactClassifier>>
}

impl Default for Advisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Advisor {
    /// Every rule enabled, no classifier
    pub fn new() -> Self {
        Self {
            rules:      RuleRunner::new(),
            classifier: None
        }
    }

    /// Rules from `[rules]`; a threshold classifier when `[impact]` is enabled
    pub fn from_config(config: &Config) -> Self {
        let advisor = Self::new().with_rules(RuleRunner::with_config(&config.rules));
        if config.impact.enabled {
            advisor.with_classifier(ThresholdClassifier::from_config(&config.impact))
        } else {
            advisor
        }
    }

    pub fn with_rules(mut self, rules: RuleRunner) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_classifier(mut self, classifier: impl ImpactClassifier + 'static) -> Self {
        self.classifier = Some(Box::new(classifier));
        self
    }

    pub fn has_classifier(&self) -> bool {
        self.classifier.is_some()
    }

    /// Analyze the first statement of `sql` with the generic dialect
    pub fn analyze(&self, sql: &str) -> Result<AdvisorResponse, ParseError> {
        self.analyze_with_dialect(sql, SqlDialect::Generic)
    }

    pub fn analyze_with_dialect(
        &self,
        sql: &str,
        dialect: SqlDialect
    ) -> Result<AdvisorResponse, ParseError> {
        let statement = parse_with_dialect(sql, dialect)?;
        Ok(self.analyze_statement(&statement))
    }

    /// Run every stage over an already parsed statement
    pub fn analyze_statement(&self, statement: &Statement) -> AdvisorResponse {
        let report = AnalysisReport::build(statement, &self.rules);
        let mut index_recommendations = advise(&report);
        if let Some(classifier) = &self.classifier {
            let label = classifier.predict(&report.impact_features());
            for recommendation in &mut index_recommendations {
                recommendation.predicted_impact = Some(label);
            }
        }
        AdvisorResponse {
            index_recommendations,
            rewrite_suggestions: suggest_rewrites(statement),
            report
        }
    }
}

/// Payload for a benchmark harness timing the statement and its rewrites
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkRequest {
    pub tables:       Vec<String>,
    /// Rendered first statement; trailing statements of the input are dropped
    pub original_sql: String,
    pub suggestions:  Vec<RewriteSuggestion>
}

impl BenchmarkRequest {
    pub fn from_response(response: &AdvisorResponse) -> Self {
        Self {
            tables:       response.report.tables.clone(),
            original_sql: response.report.raw_sql.clone(),
            suggestions:  response.rewrite_suggestions.clone()
        }
    }

    /// Whether every suggestion carries SQL and a reason
    pub fn is_runnable(&self) -> bool {
        self.suggestions
            .iter()
            .all(|s| !s.suggested_sql.trim().is_empty() && !s.reason.trim().is_empty())
    }
}
