use leptos::prelude::*;
use territory_map_shared::{HighlightStyle, MapModel, Palette, UnitKey};

use crate::app::{LoadedMapSignal, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub struct CardRow {
    pub key: UnitKey,
    pub card_id: String,
    pub name: String,
    pub territory: Option<String>,
    pub rep_name: String,
    pub rep_contact: String,
}

/// One card per registered unit, in provider order.
pub fn card_rows(model: &MapModel) -> Vec<CardRow> {
    model
        .registry
        .iter()
        .map(|unit| {
            let content = model.tooltip_for(&unit.key);
            CardRow {
                key: unit.key.clone(),
                card_id: unit.key.card_id(),
                name: content.name,
                territory: model.index.lookup(&unit.key).cloned(),
                rep_name: content.rep_name,
                rep_contact: content.rep_contact,
            }
        })
        .collect()
}

/// Cards echo the map: highlighted units borrow their fill colour, the rest
/// keep the panel's neutral outline.
pub fn card_border(palette: &Palette, style: HighlightStyle) -> String {
    match style {
        HighlightStyle::Baseline => CARD_OUTLINE.to_owned(),
        lit => palette.fill(lit).to_owned(),
    }
}

const CARD_OUTLINE: &str = "#282c3e";

#[component]
pub fn ContactCards() -> impl IntoView {
    let LoadedMapSignal(loaded) = expect_context();
    let palette = Memo::new(move |_| {
        loaded.with(|map| map.as_ref().map(|m| m.model.palette.clone()).unwrap_or_default())
    });
    let rows = Memo::new(move |_| {
        loaded.with(|map| map.as_ref().map(|m| card_rows(&m.model)).unwrap_or_default())
    });

    view! {
        <div style="height: 100%; overflow-y: auto; background: #13161f; border-left: 1px solid #282c3e; padding: 10px; box-sizing: border-box;">
            <div style="font-size: 0.7rem; letter-spacing: 0.08em; text-transform: uppercase; color: #5a5860; margin: 2px 2px 10px;">
                "Contacts"
            </div>
            <For
                each=move || rows.get()
                key=|row| row.key.clone()
                children=move |row| view! { <ContactCard row=row palette=palette.get() /> }
            />
        </div>
    }
}

#[component]
fn ContactCard(row: CardRow, palette: Palette) -> impl IntoView {
    let ViewState(view_state) = expect_context();
    let style = {
        let key = row.key.clone();
        Memo::new(move |_| view_state.with(|state| state.style_of(&key)))
    };
    let border = move || card_border(&palette, style.get());

    view! {
        <div
            id=row.card_id
            style="margin-bottom: 8px; padding: 8px 10px; background: #161921; border: 1px solid; border-radius: 6px; transition: border-color 0.12s;"
            style:border-color=border
        >
            <div style="font-size: 0.82rem; font-weight: 700;">{row.name}</div>
            {row.territory.map(|territory| view! {
                <div style="font-size: 0.65rem; color: #5a5860; font-family: 'JetBrains Mono', monospace;">{territory}</div>
            })}
            <div style="font-size: 0.7rem; color: #9a9590; margin-top: 4px;">
                "Sales Rep: " {row.rep_name}
            </div>
            <div style="font-size: 0.7rem; color: #9a9590;">
                "Contact: " {row.rep_contact}
            </div>
        </div>
    }
}
