use tera::{Context, Tera};

use quantica_analytics::tiers::ValueTier;

use crate::error::ExportError;
use crate::model::ReportModel;
use crate::styles::{DocumentStyles, tier_hex};

fn hex((r, g, b): (u8, u8, u8)) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Render one of the embedded report templates against a report model.
///
/// Templates see three variables: `report` (the full model tree),
/// `styles` (fonts, margins) and `palette` (CSS colors derived from the
/// shared tier rule). All numbers arrive pre-formatted — the templates
/// only place strings.
pub fn render_template(
    template_name: &str,
    template_content: &str,
    report: &ReportModel,
    styles: &DocumentStyles,
) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let mut context = Context::new();
    context.insert("report", report);
    context.insert("styles", styles);
    context.insert(
        "palette",
        &serde_json::json!({
            "success": tier_hex(ValueTier::Success),
            "warning": tier_hex(ValueTier::Warning),
            "critical": tier_hex(ValueTier::Critical),
            "primary": hex(styles.primary),
            "zebra": hex(styles.zebra),
            "text": hex(styles.text),
            "muted": hex(styles.muted),
        }),
    );

    let rendered = tera.render(template_name, &context)?;
    Ok(rendered)
}
