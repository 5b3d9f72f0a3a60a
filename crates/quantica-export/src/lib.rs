//! quantica-export
//!
//! Report generation for patient session history: assembles the report
//! model from analysis results, renders it to PDF through the
//! primary/fallback backend pair, and exposes a DOCX summary export.

pub mod assembler;
pub mod backend;
pub mod docx;
pub mod error;
pub mod html;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod render;
pub mod styles;

use std::collections::HashMap;

use jiff::Timestamp;
use uuid::Uuid;

use quantica_analytics::engine;
use quantica_core::models::patient::Therapist;
use quantica_core::models::session::Session;
use quantica_core::models::therapy::Therapy;
use quantica_core::store::{RecordStore, SortOrder};

use crate::assembler::ReportInputs;
use crate::backend::render_with_fallback;
use crate::error::ExportError;
use crate::html::WeasyPrintBackend;
use crate::pdf::LocalPdfBackend;

pub const PDF_MIME: &str = "application/pdf";

/// A finished report, ready to hand to the download layer.
#[derive(Debug)]
pub struct ReportDownload {
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    /// True when the fallback engine produced the bytes.
    pub degraded: bool,
    pub backend: &'static str,
}

/// Download filename for a patient's report: spaces in the name become
/// underscores, the date is the generation date.
pub fn report_filename(patient_name: &str, generated_at: Timestamp) -> String {
    let name = patient_name.trim().replace(' ', "_");
    format!(
        "Relatorio_Quantico_{name}_{}.pdf",
        generated_at.strftime("%Y-%m-%d")
    )
}

/// Run the full pipeline for one patient: analyze the history, assemble
/// the report model and render it. `sessions` must be ordered most
/// recent first.
pub fn generate_report(
    patient_name: &str,
    therapist: &Therapist,
    sessions: &[Session],
    therapies: &HashMap<Uuid, Therapy>,
    generated_at: Timestamp,
) -> Result<ReportDownload, ExportError> {
    let analysis = engine::analyze(sessions, therapies);

    let report = assembler::build_report_model(&ReportInputs {
        patient_name,
        therapist,
        analysis: analysis.as_ref(),
        sessions,
        therapies,
        generated_at,
    });

    let styles = styles::DocumentStyles::default();
    let rendered = render_with_fallback(
        &report,
        &styles,
        &WeasyPrintBackend::default(),
        &LocalPdfBackend,
    )?;

    Ok(ReportDownload {
        filename: report_filename(patient_name, generated_at),
        mime: PDF_MIME,
        bytes: rendered.bytes,
        degraded: rendered.degraded,
        backend: rendered.backend,
    })
}

/// Store-backed variant of [`generate_report`]: fetches the patient,
/// their session history and the therapy catalog, then runs the
/// pipeline.
pub fn generate_report_for_patient(
    store: &dyn RecordStore,
    patient_id: Uuid,
    therapist: &Therapist,
    generated_at: Timestamp,
) -> Result<ReportDownload, ExportError> {
    let patient = store.get_patient(patient_id)?;
    let sessions = store.list_sessions(patient_id, SortOrder::Descending)?;
    let therapies: HashMap<Uuid, Therapy> = store
        .list_therapies()?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    generate_report(&patient.name, therapist, &sessions, &therapies, generated_at)
}
