//! Backend selection: try the high-fidelity path, fall back to the
//! local engine. Both consume the same [`ReportModel`], so the numbers
//! in the document cannot differ between paths — only visual fidelity.

use tracing::{debug, warn};

use crate::error::ExportError;
use crate::model::ReportModel;
use crate::styles::DocumentStyles;

/// A layout engine able to turn a report model into PDF bytes.
pub trait RenderBackend {
    fn id(&self) -> &'static str;

    fn render(
        &self,
        report: &ReportModel,
        styles: &DocumentStyles,
    ) -> Result<Vec<u8>, ExportError>;
}

/// Outcome of a render attempt, including which backend produced it.
#[derive(Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub backend: &'static str,
    /// True when the fallback engine produced the document. Callers
    /// surface this as a non-blocking notice, not an error.
    pub degraded: bool,
}

/// Render via `primary`, retrying exactly once through `fallback` when
/// the primary path fails.
pub fn render_with_fallback(
    report: &ReportModel,
    styles: &DocumentStyles,
    primary: &dyn RenderBackend,
    fallback: &dyn RenderBackend,
) -> Result<RenderedReport, ExportError> {
    match primary.render(report, styles) {
        Ok(bytes) => {
            debug!(backend = primary.id(), size = bytes.len(), "report rendered");
            Ok(RenderedReport {
                bytes,
                backend: primary.id(),
                degraded: false,
            })
        }
        Err(primary_err) => {
            warn!(
                backend = primary.id(),
                error = %primary_err,
                "primary rendering backend failed; retrying with fallback"
            );
            match fallback.render(report, styles) {
                Ok(bytes) => {
                    debug!(
                        backend = fallback.id(),
                        size = bytes.len(),
                        "report rendered by fallback"
                    );
                    Ok(RenderedReport {
                        bytes,
                        backend: fallback.id(),
                        degraded: true,
                    })
                }
                Err(fallback_err) => Err(ExportError::RenderFailed {
                    primary: primary_err.to_string(),
                    fallback: fallback_err.to_string(),
                }),
            }
        }
    }
}
