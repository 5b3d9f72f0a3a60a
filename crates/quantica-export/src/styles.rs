use serde::{Deserialize, Serialize};

use quantica_analytics::tiers::ValueTier;

/// Visual configuration shared by every rendering backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Body font. Must be a name both backends know; the local engine
    /// only ships the PDF builtins.
    pub body_font: String,
    pub body_size: f64,
    pub heading_size: f64,
    pub title_size: f64,
    /// Uniform page margin in millimeters.
    pub margin_mm: f64,
    /// Table-header fill and accent color.
    pub primary: (u8, u8, u8),
    /// Zebra-stripe fill for alternating table rows.
    pub zebra: (u8, u8, u8),
    pub text: (u8, u8, u8),
    pub muted: (u8, u8, u8),
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Helvetica".to_string(),
            body_size: 10.0,
            heading_size: 13.0,
            title_size: 24.0,
            margin_mm: 15.0,
            primary: (91, 44, 141),
            zebra: (242, 240, 247),
            text: (33, 33, 33),
            muted: (120, 120, 120),
        }
    }
}

/// The one palette behind the shared color-by-value rule. Both backends
/// go through here; neither carries its own copy of the thresholds.
pub fn tier_color(tier: ValueTier) -> (u8, u8, u8) {
    match tier {
        ValueTier::Success => (0, 176, 80),
        ValueTier::Warning => (255, 165, 0),
        ValueTier::Critical => (217, 32, 32),
    }
}

/// CSS hex form of [`tier_color`], for the HTML backend's template.
pub fn tier_hex(tier: ValueTier) -> String {
    let (r, g, b) = tier_color(tier);
    format!("#{r:02x}{g:02x}{b:02x}")
}
