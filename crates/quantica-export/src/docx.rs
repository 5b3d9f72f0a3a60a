//! DOCX summary export. A lighter companion to the PDF report: the same
//! model rendered through a Markdown template, then converted line by
//! line into an editable document the therapist can annotate.

use std::io::Cursor;

use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, Style, StyleType};

use crate::error::ExportError;
use crate::model::ReportModel;
use crate::render::render_template;
use crate::styles::DocumentStyles;

const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.md");

/// Render the report summary as DOCX bytes.
///
/// The intermediate Markdown uses a small subset:
/// - `# Heading` / `## Heading` / `### Heading` → document headings
/// - `- item` → bullet paragraph
/// - `**bold**` → bold run
/// - `---` → page break
/// - everything else → plain paragraph
pub fn export_docx_summary(
    report: &ReportModel,
    styles: &DocumentStyles,
) -> Result<Vec<u8>, ExportError> {
    let rendered = render_template("summary.md", SUMMARY_TEMPLATE, report, styles)?;
    markdown_to_docx(&rendered, styles)
}

fn markdown_to_docx(rendered: &str, styles: &DocumentStyles) -> Result<Vec<u8>, ExportError> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", styles.title_size))
        .add_style(heading_style("Heading2", "heading 2", styles.heading_size))
        .add_style(heading_style("Heading3", "heading 3", styles.body_size + 1.0));

    for line in rendered.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            docx = docx.add_paragraph(Paragraph::new());
            continue;
        }

        if let Some(text) = trimmed.strip_prefix("### ") {
            docx = docx.add_paragraph(heading_paragraph(text, "Heading3"));
        } else if let Some(text) = trimmed.strip_prefix("## ") {
            docx = docx.add_paragraph(heading_paragraph(text, "Heading2"));
        } else if let Some(text) = trimmed.strip_prefix("# ") {
            docx = docx.add_paragraph(heading_paragraph(text, "Heading1"));
        } else if let Some(text) = trimmed.strip_prefix("- ") {
            docx = docx.add_paragraph(bullet_paragraph(text, styles));
        } else if trimmed == "---" || trimmed == "***" {
            docx = docx
                .add_paragraph(Paragraph::new().add_run(Run::new().add_break(BreakType::Page)));
        } else {
            docx = docx.add_paragraph(body_paragraph(trimmed, styles));
        }
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

fn heading_style(style_id: &str, name: &str, size_pt: f64) -> Style {
    // OOXML sizes are half-points.
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size((size_pt * 2.0) as usize)
}

fn heading_paragraph(text: &str, style_id: &str) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text))
}

fn bullet_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let bullet_run = Run::new()
        .add_text("\u{2022} ")
        .fonts(RunFonts::new().ascii(&styles.body_font));

    let mut para = Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(bullet_run);

    for run in inline_runs(text, styles) {
        para = para.add_run(run);
    }

    para
}

fn body_paragraph(text: &str, styles: &DocumentStyles) -> Paragraph {
    let mut para = Paragraph::new().align(AlignmentType::Left);
    for run in inline_runs(text, styles) {
        para = para.add_run(run);
    }
    para
}

/// Split a line on `**` markers into alternating plain and bold runs.
/// An unbalanced trailing marker leaves the remainder plain.
fn inline_runs(text: &str, styles: &DocumentStyles) -> Vec<Run> {
    let fonts = || RunFonts::new().ascii(&styles.body_font);
    let segments: Vec<&str> = text.split("**").collect();

    let mut runs = Vec::new();
    if segments.len() % 2 == 0 {
        // Odd number of markers; render the line verbatim rather than
        // guessing where the bold span was meant to end.
        runs.push(Run::new().add_text(text).fonts(fonts()));
        return runs;
    }

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            continue;
        }
        let mut run = Run::new().add_text(*segment).fonts(fonts());
        if i % 2 == 1 {
            run = run.bold();
        }
        runs.push(run);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(runs: &[Run]) -> Vec<String> {
        runs.iter()
            .map(|r| {
                r.children
                    .iter()
                    .filter_map(|c| match c {
                        docx_rs::RunChild::Text(t) => Some(t.text.clone()),
                        _ => None,
                    })
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn inline_runs_split_bold_segments() {
        let styles = DocumentStyles::default();
        let runs = inline_runs("média **7.5** no período", &styles);
        assert_eq!(texts(&runs), vec!["média ", "7.5", " no período"]);
    }

    #[test]
    fn inline_runs_keep_unbalanced_marker_plain() {
        let styles = DocumentStyles::default();
        let runs = inline_runs("um ** sem fechamento", &styles);
        assert_eq!(texts(&runs), vec!["um ** sem fechamento"]);
    }

    #[test]
    fn inline_runs_plain_line_is_single_run() {
        let styles = DocumentStyles::default();
        let runs = inline_runs("sem marcação nenhuma", &styles);
        assert_eq!(runs.len(), 1);
    }
}
