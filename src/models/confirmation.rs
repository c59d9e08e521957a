use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ScreenplayLabel;

/// Identifier shared by every line of one paste operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub String);

impl BatchId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlates a pending confirmation with its batch and line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationId {
    pub batch_id: BatchId,
    pub line_index: usize,
}

/// A line whose label was rendered provisionally and awaits a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingConfirmation {
    pub id: CorrelationId,
    pub line: String,
    pub suggested_label: ScreenplayLabel,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

/// Final label chosen for a previously pending line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub line_index: usize,
    pub suggested_label: ScreenplayLabel,
    pub final_label: ScreenplayLabel,
}

impl Resolution {
    pub fn changed(&self) -> bool {
        self.suggested_label != self.final_label
    }
}
