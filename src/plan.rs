//! Execution-plan contract.
//!
//! Running `EXPLAIN` against a live database is left to the caller. This
//! module converts the PostgreSQL `EXPLAIN (FORMAT JSON)` output it gets back
//! into a compact [`PlanNode`] tree and wraps the outcome in a
//! [`PlanResponse`], so a failure is a payload rather than a crash.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PlanError;

/// Plan node attributes copied into [`PlanNode::details`], in order
const DETAIL_KEYS: [&str; 4] = ["Join Filter", "Hash Cond", "Filter", "Index Cond"];

/// One operator of an execution plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanNode {
    pub node_type:      String,
    pub estimated_cost: f64,
    pub estimated_rows: u64,
    pub actual_time_ms: f64,
    pub actual_rows:    u64,
    /// `"<attribute>: <value>"` for join and filter conditions
    #[serde(default)]
    pub details:        Vec<String>,
    #[serde(default)]
    pub children:       Vec<PlanNode>
}

impl PlanNode {
    /// Convert `EXPLAIN (FORMAT JSON)` output.
    ///
    /// Accepts the full result (`[{"Plan": {...}}]`), a single
    /// `{"Plan": {...}}` object, or a bare plan node. Missing metrics read
    /// as zero and a missing node type as `"Unknown"`.
    ///
    /// # Errors
    ///
    /// [`PlanError::Empty`] for an empty result array,
    /// [`PlanError::NotAnObject`] when no JSON object sits where a plan node
    /// is expected.
    pub fn from_explain(value: &Value) -> Result<Self, PlanError> {
        let root = match value {
            Value::Array(items) => items.first().ok_or(PlanError::Empty)?,
            other => other
        };
        let root = root.as_object().ok_or(PlanError::NotAnObject)?;
        let node = match root.get("Plan") {
            Some(plan) => plan.as_object().ok_or(PlanError::NotAnObject)?,
            None => root
        };
        Ok(Self::from_object(node))
    }

    fn from_object(node: &Map<String, Value>) -> Self {
        let details = DETAIL_KEYS
            .iter()
            .filter_map(|key| node.get(*key).map(|value| format!("{}: {}", key, text(value))))
            .collect();
        let children = node
            .get("Plans")
            .and_then(Value::as_array)
            .map(|plans| {
                plans
                    .iter()
                    .filter_map(Value::as_object)
                    .map(Self::from_object)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            node_type: node
                .get("Node Type")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
            estimated_cost: float(node, "Total Cost"),
            estimated_rows: count(node, "Plan Rows"),
            actual_time_ms: float(node, "Actual Total Time"),
            actual_rows: count(node, "Actual Rows"),
            details,
            children
        }
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

fn float(node: &Map<String, Value>, key: &str) -> f64 {
    node.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn count(node: &Map<String, Value>, key: &str) -> u64 {
    node.get(key)
        .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0).round() as u64)))
        .unwrap_or(0)
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string()
    }
}

/// Outcome of an explain request: `{"plan": ...}` or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlanResponse {
    Plan { plan: PlanNode },
    Error { error: String }
}

impl PlanResponse {
    pub fn from_explain(value: &Value) -> Self {
        match PlanNode::from_explain(value) {
            Ok(plan) => Self::Plan {
                plan
            },
            Err(e) => Self::Error {
                error: e.to_string()
            }
        }
    }

    /// Parse raw JSON text, reporting malformed input as an error payload
    pub fn from_json(input: &str) -> Self {
        match serde_json::from_str::<Value>(input) {
            Ok(value) => Self::from_explain(&value),
            Err(e) => Self::Error {
                error: PlanError::Json(e.to_string()).to_string()
            }
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
