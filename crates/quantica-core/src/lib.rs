//! quantica-core
//!
//! Pure domain types and the record-store seam. No analytics, no
//! rendering — this is the shared vocabulary of the Quantica system.

pub mod error;
pub mod models;
pub mod store;
