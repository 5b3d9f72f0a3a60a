use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("patient not found: {0}")]
    PatientNotFound(Uuid),

    #[error("therapy not found: {0}")]
    TherapyNotFound(Uuid),

    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
