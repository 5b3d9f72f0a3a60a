use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The kind of answer a session form field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FieldType {
    /// 0–10 scale. The only type that feeds numeric aggregation.
    Scale1To10,
    ShortText,
    LongText,
    MultipleChoice,
    Checkbox,
}

/// One field of a therapy's session form.
///
/// Several fields may share a `dimension`; their answers are pooled when
/// that dimension is scored.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TherapyField {
    pub label: String,
    pub field_type: FieldType,
    /// Evaluative axis this field contributes to (e.g. "Energético",
    /// "Emocional").
    pub dimension: String,
    /// Choices for `MultipleChoice` fields.
    pub options: Option<Vec<String>>,
}

/// Chart shape the frontend suggests for this therapy's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VisualizationType {
    Radar,
    Bar,
    Line,
}

/// Immutable catalog entry describing one therapy protocol.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Therapy {
    pub id: Uuid,
    pub name: String,
    pub form_fields: Vec<TherapyField>,
    pub evaluated_dimensions: Vec<String>,
    pub visualization: VisualizationType,
}
