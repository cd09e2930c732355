use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse risk bucket derived from a score value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    Caution,
    High,
}

impl RiskLabel {
    /// `< 40` is high risk, `40..70` caution, `>= 70` low.
    pub fn for_value(value: u8) -> Self {
        if value < 40 {
            RiskLabel::High
        } else if value < 70 {
            RiskLabel::Caution
        } else {
            RiskLabel::Low
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "low"),
            RiskLabel::Caution => write!(f, "caution"),
            RiskLabel::High => write!(f, "high"),
        }
    }
}

/// A session's privacy score. Always recomputed from the record, never edited directly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreResult {
    pub value: u8,
    pub label: RiskLabel,
}

impl Default for ScoreResult {
    fn default() -> Self {
        Self {
            value: 100,
            label: RiskLabel::Low,
        }
    }
}
