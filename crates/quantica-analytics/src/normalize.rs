//! Field normalization: matching raw session answers against a therapy's
//! declared form schema and extracting numeric series from them.

use std::collections::HashMap;

use quantica_core::models::session::Session;
use quantica_core::models::therapy::{FieldType, Therapy, TherapyField};

/// Label → field lookup, built once per therapy so raw answer keys are
/// resolved against the schema a single time instead of re-matched on
/// every access.
pub struct FieldResolver<'a> {
    therapy: &'a Therapy,
    by_label: HashMap<&'a str, &'a TherapyField>,
}

impl<'a> FieldResolver<'a> {
    pub fn new(therapy: &'a Therapy) -> Self {
        let by_label = therapy
            .form_fields
            .iter()
            .map(|f| (f.label.as_str(), f))
            .collect();
        Self { therapy, by_label }
    }

    pub fn field(&self, label: &str) -> Option<&'a TherapyField> {
        self.by_label.get(label).copied()
    }

    /// Dimensions of the therapy's scale fields, in declaration order.
    pub fn scale_dimensions(&self) -> impl Iterator<Item = &'a str> {
        self.therapy
            .form_fields
            .iter()
            .filter(|f| f.field_type == FieldType::Scale1To10)
            .map(|f| f.dimension.as_str())
    }
}

/// Running sum/count pair for one dimension.
#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u32,
}

impl Accumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

/// Per-dimension accumulators that remember first-seen order. The engine
/// reports dimensions in the order they were registered, never re-sorted.
#[derive(Debug, Default)]
pub struct DimensionTotals {
    order: Vec<String>,
    totals: HashMap<String, Accumulator>,
}

impl DimensionTotals {
    pub fn register(&mut self, dimension: &str) {
        if !self.totals.contains_key(dimension) {
            self.order.push(dimension.to_string());
            self.totals.insert(dimension.to_string(), Accumulator::default());
        }
    }

    pub fn add(&mut self, dimension: &str, value: f64) {
        self.register(dimension);
        if let Some(acc) = self.totals.get_mut(dimension) {
            acc.add(value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Accumulator)> {
        self.order
            .iter()
            .filter_map(|d| self.totals.get(d).map(|acc| (d.as_str(), acc)))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Interpret a raw answer as a number. Scales arrive as JSON numbers from
/// the web form; older records stored them as strings.
pub fn parse_numeric(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Pool one session's scale answers into `totals`, keyed by dimension.
///
/// Dimensions declared by the therapy are registered up front (in
/// declaration order) so reporting order stays deterministic regardless
/// of the answer map's iteration order. Unparseable answers and answers
/// to non-scale fields contribute nothing.
pub fn accumulate_session(
    session: &Session,
    resolver: &FieldResolver<'_>,
    totals: &mut DimensionTotals,
) {
    for dimension in resolver.scale_dimensions() {
        totals.register(dimension);
    }
    for (label, raw) in &session.results {
        if let Some(field) = resolver.field(label)
            && field.field_type == FieldType::Scale1To10
            && let Some(value) = parse_numeric(raw)
        {
            totals.add(&field.dimension, value);
        }
    }
}

/// Loose scan: every numeric answer in the session, ignoring which field
/// or dimension it belongs to. Feeds the overall score and the velocity
/// endpoints — deliberately broader than the per-dimension pooling.
pub fn numeric_values(session: &Session) -> impl Iterator<Item = f64> + '_ {
    session.results.values().filter_map(parse_numeric)
}

/// Mean of the loose scan; `None` when the session has no numeric answers.
pub fn session_mean(session: &Session) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0u32;
    for value in numeric_values(session) {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / f64::from(count))
}
