use leptos::prelude::*;

use crate::app::ViewState;

/// Vertical offset so the tooltip sits above the pointer instead of under it.
pub const TOOLTIP_OFFSET_Y: f64 = -28.0;

pub fn tooltip_position(x: f64, y: f64) -> (String, String) {
    (format!("{x}px"), format!("{}px", y + TOOLTIP_OFFSET_Y))
}

/// Tooltip that follows the pointer while a unit is focused. The body is the
/// pre-escaped HTML produced by the highlight controller.
#[component]
pub fn Tooltip() -> impl IntoView {
    let ViewState(view_state) = expect_context();
    let tooltip = Memo::new(move |_| view_state.with(|state| state.tooltip.clone()));

    view! {
        <div
            style="position: absolute; pointer-events: none; z-index: 100; background: #161921; border: 1px solid #282c3e; border-radius: 6px; box-shadow: 0 4px 16px rgba(0,0,0,0.5); padding: 8px 10px; max-width: 240px; font-size: 0.75rem; line-height: 1.45; color: #e2e0d8;"
            style:display=move || if tooltip.with(|t| t.visible) { "block" } else { "none" }
            style:left=move || tooltip.with(|t| tooltip_position(t.x, t.y).0)
            style:top=move || tooltip.with(|t| tooltip_position(t.x, t.y).1)
            inner_html=move || tooltip.with(|t| t.html.clone())
        />
    }
}
