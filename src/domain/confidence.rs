// ============================================================
// Layer 3 — Confidence Bucketing
// ============================================================
// A raw confidence score is hard to read at a glance, so the
// display layer shows a three-bucket classification instead.
// The buckets are derived at display time, never stored.
//
// The ranges are non-overlapping and cover [0, 1] by
// construction:
//   High   ≥ 0.7
//   Medium ≥ 0.4 and < 0.7
//   Low    < 0.4

use serde::{Deserialize, Serialize};

/// Display bucket for a confidence score in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Classify a score. Total over all floats: anything below
    /// 0.4 (including out-of-range garbage) lands in Low, so a
    /// malformed score can never panic the display path.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Human-readable label for the bucket.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High   => "High",
            Self::Medium => "Medium",
            Self::Low    => "Low",
        }
    }
}
