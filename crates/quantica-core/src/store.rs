use uuid::Uuid;

use crate::error::CoreError;
use crate::models::patient::Patient;
use crate::models::session::Session;
use crate::models::therapy::Therapy;

/// Sort direction for session listings. Callers state it explicitly:
/// reports consume history most recent first, trend series oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Data-access seam. The storage layer (HTTP API, local database)
/// implements this; analytics and export only ever see the trait.
pub trait RecordStore {
    fn list_sessions(
        &self,
        patient_id: Uuid,
        order: SortOrder,
    ) -> Result<Vec<Session>, CoreError>;

    fn list_therapies(&self) -> Result<Vec<Therapy>, CoreError>;

    fn get_patient(&self, id: Uuid) -> Result<Patient, CoreError>;
}
