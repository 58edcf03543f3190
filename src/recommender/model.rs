use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::scorer::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

/// Stable identifier of the rule that produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    MissingMetaDescription,
    MissingTitle,
    ShortTitle,
    MissingH1,
    MultipleH1,
    ThinContent,
    MissingH2,
    InsecureScheme,
    FewLinks,
    MissingSchema,
}

/// Rubric points a fix would recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreImpact {
    /// Sub-score that gains the most from the fix.
    pub category: Category,
    pub points: u32,
    /// Current total plus `points`, capped at 100.
    pub projected_total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub rule: RuleId,
    pub priority: Priority,
    pub title: String,
    /// Rough effort, e.g. "10-15 min".
    pub estimated_time_range: String,
    pub description: String,
    pub impact_statements: Vec<String>,
    pub remediation_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_markup: Option<String>,
    pub best_practices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_impact: Option<ScoreImpact>,
}
