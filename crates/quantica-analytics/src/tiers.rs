//! The single home of every scoring threshold.
//!
//! Dimension levels (0–10 averages), overall-score tiers (0–100) and the
//! color-by-value rule all live here, so the engine, the assembler and
//! both rendering backends read the same numbers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A dimension is critical when its current average sits below this line.
pub const CRITICAL_THRESHOLD: f64 = 5.0;

/// Averages at or above this are on target.
pub const TARGET_AVERAGE: f64 = 7.0;

/// Classification of a 0–10 dimension average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Level {
    Critical,
    Attention,
    Good,
    Excellent,
}

impl Level {
    pub fn from_average(avg: f64) -> Self {
        if avg >= 7.0 {
            Level::Excellent
        } else if avg >= 5.0 {
            Level::Good
        } else if avg >= 3.0 {
            Level::Attention
        } else {
            Level::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Critical => "Crítico",
            Level::Attention => "Atenção",
            Level::Good => "Bom",
            Level::Excellent => "Excelente",
        }
    }
}

/// Three-tier interpretation of the 0–100 overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreTier {
    Excellent,
    Good,
    Attention,
}

impl ScoreTier {
    pub fn from_score(score: u32) -> Self {
        if score >= 70 {
            ScoreTier::Excellent
        } else if score >= 50 {
            ScoreTier::Good
        } else {
            ScoreTier::Attention
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excelente",
            ScoreTier::Good => "Bom",
            ScoreTier::Attention => "Atenção",
        }
    }

    /// The color bucket this tier maps to, so badges and score text use
    /// the same palette as table cells.
    pub fn value_tier(self) -> ValueTier {
        match self {
            ScoreTier::Excellent => ValueTier::Success,
            ScoreTier::Good => ValueTier::Warning,
            ScoreTier::Attention => ValueTier::Critical,
        }
    }
}

/// Color bucket for a 0–10 value. Drives table cells, summary badges and
/// progress bars in every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ValueTier {
    Success,
    Warning,
    Critical,
}

impl ValueTier {
    pub fn from_value(value: f64) -> Self {
        if value >= 7.0 {
            ValueTier::Success
        } else if value >= 5.0 {
            ValueTier::Warning
        } else {
            ValueTier::Critical
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(Level::from_average(7.0), Level::Excellent);
        assert_eq!(Level::from_average(6.9), Level::Good);
        assert_eq!(Level::from_average(5.0), Level::Good);
        assert_eq!(Level::from_average(4.9), Level::Attention);
        assert_eq!(Level::from_average(3.0), Level::Attention);
        assert_eq!(Level::from_average(2.9), Level::Critical);
        assert_eq!(Level::from_average(0.0), Level::Critical);
    }

    #[test]
    fn score_tier_boundaries() {
        assert_eq!(ScoreTier::from_score(100), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(70), ScoreTier::Excellent);
        assert_eq!(ScoreTier::from_score(69), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(50), ScoreTier::Good);
        assert_eq!(ScoreTier::from_score(49), ScoreTier::Attention);
        assert_eq!(ScoreTier::from_score(0), ScoreTier::Attention);
    }

    #[test]
    fn value_tier_boundaries() {
        assert_eq!(ValueTier::from_value(10.0), ValueTier::Success);
        assert_eq!(ValueTier::from_value(7.0), ValueTier::Success);
        assert_eq!(ValueTier::from_value(6.99), ValueTier::Warning);
        assert_eq!(ValueTier::from_value(5.0), ValueTier::Warning);
        assert_eq!(ValueTier::from_value(4.99), ValueTier::Critical);
    }

    #[test]
    fn score_tier_maps_onto_palette() {
        assert_eq!(ScoreTier::Excellent.value_tier(), ValueTier::Success);
        assert_eq!(ScoreTier::Good.value_tier(), ValueTier::Warning);
        assert_eq!(ScoreTier::Attention.value_tier(), ValueTier::Critical);
    }
}
