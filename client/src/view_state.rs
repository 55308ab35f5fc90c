use std::collections::HashMap;

use territory_map_shared::{HighlightStyle, MapSurface, UnitKey};

/// Tooltip overlay state. `x`/`y` are page coordinates of the pointer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TooltipState {
    pub html: String,
    pub visible: bool,
    pub x: f64,
    pub y: f64,
}

/// Reactive-free picture of what the map currently shows. Wrapped in a
/// `RwSignal` by the app; every controller command lands here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapViewState {
    fills: HashMap<UnitKey, HighlightStyle>,
    pub tooltip: TooltipState,
    /// Card to bring into view, bumped with a nonce so repeated clicks on the
    /// same unit still trigger a scroll.
    pub scroll_request: Option<(String, u64)>,
}

impl MapViewState {
    /// Fill style of `unit`. Units never touched are baseline.
    pub fn style_of(&self, unit: &UnitKey) -> HighlightStyle {
        self.fills.get(unit).copied().unwrap_or_default()
    }
}

impl MapSurface for MapViewState {
    fn set_fill(&mut self, unit: &UnitKey, style: HighlightStyle) {
        if style == HighlightStyle::Baseline {
            self.fills.remove(unit);
        } else {
            self.fills.insert(unit.clone(), style);
        }
    }

    fn show_tooltip(&mut self, html: &str) {
        self.tooltip.html = html.to_owned();
        self.tooltip.visible = true;
    }

    fn move_tooltip(&mut self, x: f64, y: f64) {
        self.tooltip.x = x;
        self.tooltip.y = y;
    }

    fn hide_tooltip(&mut self) {
        self.tooltip.visible = false;
    }

    fn scroll_into_view(&mut self, card_id: &str) {
        let nonce = self.scroll_request.as_ref().map_or(0, |(_, n)| n + 1);
        self.scroll_request = Some((card_id.to_owned(), nonce));
    }
}
