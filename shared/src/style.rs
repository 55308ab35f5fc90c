use serde::{Deserialize, Serialize};

/// Symbolic fill token. The controller only ever speaks in tokens; the
/// renderer maps them to colors through a [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HighlightStyle {
    #[default]
    Baseline,
    Focused,
    CoHighlighted,
}

/// CSS colors for each fill token plus the unit outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub baseline: String,
    pub focused: String,
    pub co_highlighted: String,
    pub stroke: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            baseline: "#303642".to_owned(),
            focused: "#25ade5".to_owned(),
            co_highlighted: "rgba(37, 173, 229, 0.5)".to_owned(),
            stroke: "#f0e2d8".to_owned(),
        }
    }
}

impl Palette {
    pub fn fill(&self, style: HighlightStyle) -> &str {
        match style {
            HighlightStyle::Baseline => &self.baseline,
            HighlightStyle::Focused => &self.focused,
            HighlightStyle::CoHighlighted => &self.co_highlighted,
        }
    }
}
