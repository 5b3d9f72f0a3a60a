use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// One recorded therapeutic encounter. Immutable after creation — there
/// is no update or delete path for sessions.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Session {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub therapy_id: Uuid,
    pub session_date: jiff::Timestamp,
    /// Raw answers keyed by form-field label. Free-form: numbers for
    /// scales, strings for text and choice fields. Older records stored
    /// scale answers as strings; the normalizer accepts both.
    #[serde(default)]
    pub results: HashMap<String, serde_json::Value>,
    pub general_notes: Option<String>,
}
