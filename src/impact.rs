//! Optional impact classifier.
//!
//! A classifier maps coarse statement features to a categorical label that
//! is attached to index recommendations as an annotation. It is injected
//! into [`Advisor`](crate::report::Advisor); without one the report carries
//! no labels and is otherwise identical.

use serde::Serialize;

use crate::config::ImpactConfig;

/// Predicted benefit of a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ImpactLabel {
    Low,
    Medium,
    High
}

impl std::fmt::Display for ImpactLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High")
        }
    }
}

/// Classifier input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImpactFeatures {
    pub join_count:         usize,
    /// Number of distinct WHERE filter columns
    pub where_clause_count: usize
}

/// Source of impact labels
pub trait ImpactClassifier: Send + Sync {
    fn predict(&self, features: &ImpactFeatures) -> ImpactLabel;
}

/// Labels by the sum of joins and filter columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdClassifier {
    pub medium_score: usize,
    pub high_score:   usize
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self::from_config(&ImpactConfig::default())
    }
}

impl ThresholdClassifier {
    pub fn from_config(config: &ImpactConfig) -> Self {
        Self {
            medium_score: config.medium_score,
            high_score:   config.high_score
        }
    }
}

impl ImpactClassifier for ThresholdClassifier {
    fn predict(&self, features: &ImpactFeatures) -> ImpactLabel {
        let score = features.join_count + features.where_clause_count;
        if score >= self.high_score {
            ImpactLabel::High
        } else if score >= self.medium_score {
            ImpactLabel::Medium
        } else {
            ImpactLabel::Low
        }
    }
}
