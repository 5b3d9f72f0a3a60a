//! The report model: a format-agnostic tree bridging analysis and
//! document output. Built once by the assembler, consumed unchanged by
//! every rendering backend — which is what keeps the primary and
//! fallback documents numerically identical.

use serde::Serialize;

use quantica_analytics::tiers::{ScoreTier, ValueTier};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportModel {
    pub cover: CoverSection,
    /// `None` is the "no data yet" document state: the cover renders with
    /// an explanatory message instead of empty tables.
    pub body: Option<ReportBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverSection {
    pub patient_name: String,
    pub therapist_name: String,
    pub therapist_email: String,
    /// Display date, dd/mm/yyyy.
    pub generated_on: String,
    pub overall_score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBody {
    pub summary: ExecutiveSummary,
    pub insights: Vec<String>,
    /// One row per dimension, sorted ascending by current average so the
    /// most critical dimensions lead. This display ordering is distinct
    /// from the engine's first-seen critical order; neither replaces the
    /// other.
    pub field_rows: Vec<FieldRow>,
    /// Most recent sessions first.
    pub history: Vec<HistoryRow>,
    pub critical: Vec<CriticalCard>,
    pub recommendations: RecommendationSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub score: u32,
    pub tier: ScoreTier,
    pub tier_label: String,
    pub interpretation: String,
    pub total_sessions: u32,
    pub velocity_label: String,
    pub critical_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRow {
    pub dimension: String,
    pub average: f64,
    pub average_label: String,
    pub percentile: u32,
    pub level_label: String,
    pub tier: ValueTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub date: String,
    pub therapy_name: String,
    pub mean: Option<f64>,
    pub mean_label: String,
    pub status_label: String,
    pub tier: Option<ValueTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalCard {
    pub field: String,
    pub value: String,
    /// Distance to the shared target average, floored at zero.
    pub gap: f64,
    pub gap_label: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSection {
    pub items: Vec<String>,
    /// Fixed checklist echoing live counts (sessions, critical fields).
    pub next_steps: Vec<String>,
}
