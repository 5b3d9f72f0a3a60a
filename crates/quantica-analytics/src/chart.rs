//! Chart-feed series for the frontend's radar/line visualizations.
//!
//! Deliberately a separate path from the scoring engine: dimensions with
//! a negative sense (dor, tensão, ...) are inverted here so every chart
//! axis reads higher-is-better. The inversion never touches
//! [`crate::engine::analyze`] — scores keep the raw orientation.

use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;
use uuid::Uuid;

use quantica_core::models::session::Session;
use quantica_core::models::therapy::Therapy;

use crate::normalize::{self, DimensionTotals, FieldResolver};

/// Dimension labels containing any of these (case-insensitive) read as
/// "lower is better" and are flipped for display.
const NEGATIVE_SENSE: &[&str] = &[
    "tensão",
    "tensao",
    "dor",
    "ansiedade",
    "estresse",
    "stress",
    "medo",
    "preocupação",
    "preocupacao",
];

pub fn is_negative_sense(dimension: &str) -> bool {
    let lower = dimension.to_lowercase();
    NEGATIVE_SENSE.iter().any(|term| lower.contains(term))
}

/// Value as charted: negative-sense dimensions become `10 - v`.
pub fn display_value(dimension: &str, value: f64) -> f64 {
    if is_negative_sense(dimension) {
        10.0 - value
    } else {
        value
    }
}

/// One plotted point: a dimension's mean for one session.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct ChartPoint {
    pub session_date: jiff::Timestamp,
    pub dimension: String,
    pub value: f64,
}

/// Per-session, per-dimension display series. `sessions` must be in
/// ascending date order (oldest first) so the series plots left to right.
pub fn dimension_series(
    sessions: &[Session],
    therapies: &HashMap<Uuid, Therapy>,
) -> Vec<ChartPoint> {
    let mut points = Vec::new();
    for session in sessions {
        let Some(therapy) = therapies.get(&session.therapy_id) else {
            continue;
        };
        let resolver = FieldResolver::new(therapy);
        let mut totals = DimensionTotals::default();
        normalize::accumulate_session(session, &resolver, &mut totals);
        for (dimension, acc) in totals.iter() {
            if let Some(mean) = acc.mean() {
                points.push(ChartPoint {
                    session_date: session.session_date,
                    dimension: dimension.to_string(),
                    value: display_value(dimension, mean),
                });
            }
        }
    }
    points
}
