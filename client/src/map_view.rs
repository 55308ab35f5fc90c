use std::sync::Arc;

use leptos::prelude::*;
use territory_map_shared::{HighlightStyle, MapModel};

use crate::app::{Controller, LoadedMap, LoadedMapSignal, ViewState, dispatch};
use crate::layout::{ShapeGeometry, UnitShape};

/// SVG map of every unit. Renders nothing until the payload has loaded.
#[component]
pub fn MapView() -> impl IntoView {
    let LoadedMapSignal(loaded) = expect_context();

    move || match loaded.get() {
        Some(map) => view! { <MapSvg map=map /> }.into_any(),
        None => ().into_any(),
    }
}

#[component]
fn MapSvg(map: LoadedMap) -> impl IntoView {
    let view_box = map.layout.view_box();
    let shapes = map
        .layout
        .shapes
        .iter()
        .cloned()
        .map(|shape| view! { <UnitShapeView shape=shape model=Arc::clone(&map.model) /> })
        .collect_view();

    view! {
        <svg
            viewBox=view_box
            preserveAspectRatio="xMidYMin meet"
            style="width: 100%; height: auto; display: block; padding: 12px; box-sizing: border-box;"
        >
            {shapes}
        </svg>
    }
}

#[component]
fn UnitShapeView(shape: UnitShape, model: Arc<MapModel>) -> impl IntoView {
    let ViewState(view_state) = expect_context();
    let Controller(controller) = expect_context();

    let style = {
        let key = shape.key.clone();
        Memo::new(move |_| view_state.with(|state| state.style_of(&key)))
    };
    let fill = {
        let model = Arc::clone(&model);
        move || model.palette.fill(style.get()).to_owned()
    };
    let stroke = model.palette.stroke.clone();
    let stroke_width = move || {
        if style.get() == HighlightStyle::Focused {
            "2"
        } else {
            "1"
        }
    };

    let on_enter = {
        let key = shape.key.clone();
        move |e: web_sys::MouseEvent| {
            let (x, y) = (f64::from(e.page_x()), f64::from(e.page_y()));
            dispatch(controller, view_state, |ctl| ctl.on_enter_at(&key, x, y));
        }
    };
    let on_leave = {
        let key = shape.key.clone();
        move |_: web_sys::MouseEvent| dispatch(controller, view_state, |ctl| ctl.on_exit(&key))
    };
    let on_move = move |e: web_sys::MouseEvent| {
        let (x, y) = (f64::from(e.page_x()), f64::from(e.page_y()));
        dispatch(controller, view_state, |ctl| ctl.on_move(x, y));
    };
    let on_click = {
        let key = shape.key.clone();
        move |_: web_sys::MouseEvent| dispatch(controller, view_state, |ctl| ctl.on_click(&key))
    };

    let dom_id = shape.key.to_string();
    let label = shape.label_anchor();
    match shape.geometry {
        ShapeGeometry::Path(d) => view! {
            <path
                id=dom_id
                d=d
                fill=fill
                stroke=stroke
                stroke-width=stroke_width
                style="cursor: pointer; transition: fill 0.12s;"
                on:mouseenter=on_enter
                on:mouseleave=on_leave
                on:mousemove=on_move
                on:click=on_click
            />
        }
        .into_any(),
        ShapeGeometry::Tile { x, y, size } => {
            let (label_x, label_y) = label.unwrap_or((x, y));
            view! {
                <g>
                    <rect
                        id=dom_id
                        x=x.to_string()
                        y=y.to_string()
                        width=size.to_string()
                        height=size.to_string()
                        rx="6"
                        fill=fill
                        stroke=stroke
                        stroke-width=stroke_width
                        style="cursor: pointer; transition: fill 0.12s;"
                        on:mouseenter=on_enter
                        on:mouseleave=on_leave
                        on:mousemove=on_move
                        on:click=on_click
                    />
                    <text
                        x=label_x.to_string()
                        y=label_y.to_string()
                        text-anchor="middle"
                        dominant-baseline="middle"
                        pointer-events="none"
                        fill="#e2e0d8"
                        font-size="12"
                    >
                        {shape.name}
                    </text>
                </g>
            }
            .into_any()
        }
    }
}
