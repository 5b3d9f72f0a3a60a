//! quantica-analytics
//!
//! Session analytics: field normalization, history aggregation, and the
//! shared tier thresholds. Pure functions over quantica-core records —
//! no I/O, no caching; every analysis is recomputed on demand.

pub mod chart;
pub mod engine;
pub mod normalize;
pub mod tiers;
