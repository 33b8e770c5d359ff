//! Whale threshold DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::WhaleThresholds;

/// One token's whale threshold.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ThresholdEntry {
    /// Token symbol. Stored uppercase; matched case-insensitively.
    pub token: String,
    /// Minimum amount at which an event counts as a whale action
    /// (inclusive).
    pub amount: u64,
}

/// Response body for `GET /thresholds`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ThresholdsResponse {
    /// Configured per-token thresholds, token-ordered.
    pub thresholds: Vec<ThresholdEntry>,
    /// Threshold applied to tokens without an explicit entry.
    pub default_threshold: u64,
}

impl ThresholdsResponse {
    /// Renders a threshold snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &WhaleThresholds) -> Self {
        Self {
            thresholds: snapshot
                .entries()
                .map(|(token, amount)| ThresholdEntry {
                    token: token.to_string(),
                    amount,
                })
                .collect(),
            default_threshold: crate::domain::DEFAULT_WHALE_THRESHOLD,
        }
    }
}

/// Request body for `PUT /thresholds`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateThresholdsRequest {
    /// Thresholds to apply.
    pub thresholds: Vec<ThresholdEntry>,
    /// When `true`, the entries replace the whole table; otherwise they
    /// are merged over the current one.
    #[serde(default)]
    pub replace: bool,
}
