use serde::{Deserialize, Serialize};

/// Document styling configuration for the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Font for body text.
    pub body_font: String,

    /// Font for the brand title and section headings.
    pub heading_font: String,

    /// Body text font size in points.
    pub body_size: usize,

    /// Brand title font size in points.
    pub title_size: usize,

    /// Section heading font size in points.
    pub heading_size: usize,

    /// Disclaimer and footer font size in points.
    pub small_size: usize,

    /// Hex RGB without `#`, used for the title and section headings.
    pub brand_color: String,

    /// Hex RGB without `#`, used for metadata and the footer.
    pub muted_color: String,

    /// Page margin in inches (applied uniformly).
    pub margin_inches: f64,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Helvetica".to_string(),
            heading_font: "Helvetica".to_string(),
            body_size: 11,
            title_size: 24,
            heading_size: 14,
            small_size: 9,
            brand_color: "E50914".to_string(),
            muted_color: "666666".to_string(),
            margin_inches: 0.8,
        }
    }
}

impl DocumentStyles {
    /// Margin in twentieths of a point, the unit OOXML page margins use.
    pub fn margin_twips(&self) -> i32 {
        (self.margin_inches * 1440.0).round() as i32
    }
}
