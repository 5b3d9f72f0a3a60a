//! The aggregation engine: one patient's full session history in, one
//! [`AnalysisResult`] out. Pure and side-effect free; safe to call on
//! every render.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use quantica_core::models::session::Session;
use quantica_core::models::therapy::Therapy;

use crate::normalize::{self, DimensionTotals, FieldResolver};
use crate::tiers::{CRITICAL_THRESHOLD, Level};

/// Four-way trend classification between the oldest and newest session
/// in the analyzed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Velocity {
    RapidImprovement,
    ModerateImprovement,
    Stable,
    Regression,
}

impl Velocity {
    pub fn label(self) -> &'static str {
        match self {
            Velocity::RapidImprovement => "Melhora rápida",
            Velocity::ModerateImprovement => "Melhora moderada",
            Velocity::Stable => "Estável",
            Velocity::Regression => "Regressão",
        }
    }
}

/// Current state of one evaluated dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionScore {
    pub dimension: String,
    /// Mean of every scale answer pooled into this dimension, rounded to
    /// one decimal.
    pub current_average: f64,
    pub percentile: u32,
    pub level: Level,
}

/// A dimension averaging below the critical line, with a templated
/// follow-up recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriticalField {
    pub field: String,
    pub value: String,
    pub recommendation: String,
}

/// Derived analysis of a patient's session history. Recomputed on demand,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisResult {
    /// 0–100: mean of every numeric answer across all sessions × 10.
    pub overall_score: u32,
    pub total_sessions: u32,
    /// Keyed by dimension (not raw field label), in first-seen order.
    pub per_field_index: Vec<DimensionScore>,
    /// Dimensions below [`CRITICAL_THRESHOLD`], in detection order.
    /// Display ordering is the report assembler's concern, not ours.
    pub critical_fields: Vec<CriticalField>,
    pub improvement_velocity: Velocity,
}

/// Analyze a patient's history. `sessions` must be ordered most recent
/// first. Returns `None` when there is no history yet — callers treat
/// that as a first-class "no analysis" state, not an error.
pub fn analyze(
    sessions: &[Session],
    therapies: &HashMap<Uuid, Therapy>,
) -> Option<AnalysisResult> {
    if sessions.is_empty() {
        return None;
    }

    // Overall score: loose scan over every numeric answer, regardless of
    // which field or dimension it belongs to.
    let mut sum = 0.0;
    let mut count = 0u32;
    for session in sessions {
        for value in normalize::numeric_values(session) {
            sum += value;
            count += 1;
        }
    }
    let overall_score = if count == 0 {
        0
    } else {
        (sum / f64::from(count) * 10.0).round() as u32
    };

    // Per-dimension index over the whole history. Sessions referencing an
    // unknown therapy still counted above; here they contribute nothing.
    let mut totals = DimensionTotals::default();
    let mut resolvers: HashMap<Uuid, FieldResolver<'_>> = HashMap::new();
    for session in sessions {
        let Some(therapy) = therapies.get(&session.therapy_id) else {
            debug!(
                session_id = %session.id,
                therapy_id = %session.therapy_id,
                "session references unknown therapy; skipped in dimension index"
            );
            continue;
        };
        let resolver = resolvers
            .entry(session.therapy_id)
            .or_insert_with(|| FieldResolver::new(therapy));
        normalize::accumulate_session(session, resolver, &mut totals);
    }

    let mut per_field_index = Vec::new();
    let mut critical_fields = Vec::new();
    for (dimension, acc) in totals.iter() {
        let Some(mean) = acc.mean() else {
            continue;
        };
        let current_average = (mean * 10.0).round() / 10.0;
        per_field_index.push(DimensionScore {
            dimension: dimension.to_string(),
            current_average,
            percentile: (current_average * 10.0).round() as u32,
            level: Level::from_average(current_average),
        });
        if current_average < CRITICAL_THRESHOLD {
            critical_fields.push(CriticalField {
                field: dimension.to_string(),
                value: format!("{current_average:.1}"),
                recommendation: format!(
                    "Focar as próximas sessões em elevar {dimension} com técnicas direcionadas."
                ),
            });
        }
    }

    Some(AnalysisResult {
        overall_score,
        total_sessions: sessions.len() as u32,
        per_field_index,
        critical_fields,
        improvement_velocity: velocity(sessions),
    })
}

/// Endpoint delta between the oldest and newest session means. An
/// intentional two-point comparison, not a regression over the series;
/// a trend model would replace this one function.
fn velocity(sessions: &[Session]) -> Velocity {
    if sessions.len() < 2 {
        return Velocity::Stable;
    }
    let newest = normalize::session_mean(&sessions[0]);
    let oldest = normalize::session_mean(&sessions[sessions.len() - 1]);
    let (Some(newest), Some(oldest)) = (newest, oldest) else {
        // An endpoint without numeric answers cannot anchor a trend.
        return Velocity::Stable;
    };
    let delta = newest - oldest;
    if delta > 1.0 {
        Velocity::RapidImprovement
    } else if delta > 0.5 {
        Velocity::ModerateImprovement
    } else if delta < -0.5 {
        Velocity::Regression
    } else {
        Velocity::Stable
    }
}
