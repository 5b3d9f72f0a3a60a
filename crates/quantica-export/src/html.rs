//! The primary rendering backend: Tera-rendered HTML converted to PDF
//! by a local `weasyprint` process. Higher fidelity than the built-in
//! engine (paged CSS handles headers, zebra striping and `thead`
//! repetition natively), but only available where the converter is
//! installed — which is why [`crate::pdf::LocalPdfBackend`] exists.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::backend::RenderBackend;
use crate::error::ExportError;
use crate::model::ReportModel;
use crate::render::render_template;
use crate::styles::DocumentStyles;

const REPORT_TEMPLATE: &str = include_str!("../templates/report.html");

pub struct WeasyPrintBackend {
    converter: String,
}

impl Default for WeasyPrintBackend {
    fn default() -> Self {
        Self {
            converter: "weasyprint".to_string(),
        }
    }
}

impl WeasyPrintBackend {
    /// Use a converter binary other than `weasyprint` on PATH.
    pub fn with_converter(path: impl Into<String>) -> Self {
        Self {
            converter: path.into(),
        }
    }

    fn unavailable(reason: impl Into<String>) -> ExportError {
        ExportError::BackendUnavailable {
            backend: "weasyprint",
            reason: reason.into(),
        }
    }
}

/// Render the report model to the standalone HTML document the
/// converter consumes. Exposed separately so the template can be
/// exercised without the external binary.
pub fn render_html(
    report: &ReportModel,
    styles: &DocumentStyles,
) -> Result<String, ExportError> {
    render_template("report.html", REPORT_TEMPLATE, report, styles)
}

impl RenderBackend for WeasyPrintBackend {
    fn id(&self) -> &'static str {
        "weasyprint"
    }

    fn render(
        &self,
        report: &ReportModel,
        styles: &DocumentStyles,
    ) -> Result<Vec<u8>, ExportError> {
        let html = render_html(report, styles)?;

        let mut child = Command::new(&self.converter)
            .args(["-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Self::unavailable(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .map_err(|e| Self::unavailable(e.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Self::unavailable(e.to_string()))?;
        if !output.status.success() {
            return Err(Self::unavailable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        if !output.stdout.starts_with(b"%PDF") {
            return Err(Self::unavailable("converter did not produce a PDF"));
        }
        Ok(output.stdout)
    }
}
