use std::sync::Arc;

use gloo_storage::Storage;
use leptos::prelude::*;
use territory_map_shared::{HighlightController, MapCommand, MapModel, MapSurface};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::cards::ContactCards;
use crate::data;
use crate::layout::{self, MapLayout};
use crate::map_view::MapView;
use crate::tooltip::Tooltip;
use crate::view_state::MapViewState;

pub(crate) const CARDS_WIDTH: f64 = 320.0;
const SETTINGS_KEY: &str = "territory_map_settings";

/// Newtype wrappers so each signal gets its own context slot.
#[derive(Clone, Copy)]
pub(crate) struct ViewState(pub RwSignal<MapViewState>);
#[derive(Clone, Copy)]
pub(crate) struct Controller(pub StoredValue<Option<HighlightController>>);
#[derive(Clone, Copy)]
pub(crate) struct CardsOpen(pub RwSignal<bool>);
#[derive(Clone, Copy)]
pub(crate) struct LoadedMapSignal(pub RwSignal<Option<LoadedMap>>);

/// Everything derived from one `/api/map` response.
#[derive(Clone)]
pub(crate) struct LoadedMap {
    pub model: Arc<MapModel>,
    pub layout: Arc<MapLayout>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum LoadStatus {
    Loading,
    Failed(String),
    Ready { units: usize, territories: usize },
}

impl LoadStatus {
    fn message(&self) -> String {
        match self {
            LoadStatus::Loading => "Loading map...".to_owned(),
            LoadStatus::Failed(e) => format!("Map unavailable: {e}"),
            LoadStatus::Ready { units, territories } => {
                format!("{units} units \u{00B7} {territories} territories")
            }
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    cards_open: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { cards_open: true }
    }
}

/// Run one controller event and push the resulting commands into the view.
/// Events that arrive before the map has loaded are dropped.
pub(crate) fn dispatch(
    controller: StoredValue<Option<HighlightController>>,
    view: RwSignal<MapViewState>,
    event: impl FnOnce(&mut HighlightController) -> Vec<MapCommand>,
) {
    let commands = controller
        .try_update_value(|slot| slot.as_mut().map(event))
        .flatten()
        .unwrap_or_default();
    if !commands.is_empty() {
        view.update(|state| state.apply_all(&commands));
    }
}

fn scroll_card_into_view(card_id: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(card) = document.get_element_by_id(card_id) else {
        return;
    };
    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(web_sys::ScrollLogicalPosition::Nearest);
    card.scroll_into_view_with_scroll_into_view_options(&options);
}

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    let view_state: RwSignal<MapViewState> = RwSignal::new(MapViewState::default());
    let controller: StoredValue<Option<HighlightController>> = StoredValue::new(None);
    let loaded: RwSignal<Option<LoadedMap>> = RwSignal::new(None);
    let status: RwSignal<LoadStatus> = RwSignal::new(LoadStatus::Loading);
    let saved: Settings = gloo_storage::LocalStorage::get(SETTINGS_KEY).unwrap_or_default();
    let cards_open: RwSignal<bool> = RwSignal::new(saved.cards_open);

    provide_context(ViewState(view_state));
    provide_context(Controller(controller));
    provide_context(CardsOpen(cards_open));
    provide_context(LoadedMapSignal(loaded));

    // Persist settings to localStorage on any change
    Effect::new(move || {
        let settings = Settings {
            cards_open: cards_open.get(),
        };
        let _ = gloo_storage::LocalStorage::set(SETTINGS_KEY, &settings);
    });

    // Fetch the map once on mount and build the controller from it.
    Effect::new(move || {
        spawn_local(async move {
            match data::fetch_map_payload().await {
                Ok(payload) => {
                    let model = Arc::new(MapModel::from_payload(&payload));
                    for issue in model.issues() {
                        web_sys::console::warn_1(
                            &format!("Territory definition issue: {issue}").into(),
                        );
                    }
                    status.set(LoadStatus::Ready {
                        units: model.registry.len(),
                        territories: model.definition.len(),
                    });
                    controller.set_value(Some(HighlightController::new(Arc::clone(&model))));
                    view_state.set(MapViewState::default());
                    loaded.set(Some(LoadedMap {
                        model,
                        layout: Arc::new(layout::layout_units(&payload.units)),
                    }));
                }
                Err(e) => {
                    web_sys::console::warn_1(&format!("Map fetch failed: {e}").into());
                    status.set(LoadStatus::Failed(e));
                }
            }
        });
    });

    // Bring the clicked unit's card into view, opening the panel first if needed.
    let scroll_request = Memo::new(move |_| view_state.with(|state| state.scroll_request.clone()));
    Effect::new(move || {
        let Some((card_id, _)) = scroll_request.get() else {
            return;
        };
        if cards_open.get_untracked() {
            scroll_card_into_view(&card_id);
            return;
        }
        cards_open.set(true);
        let Some(window) = web_sys::window() else {
            return;
        };
        let cb = wasm_bindgen::closure::Closure::once(move || {
            scroll_card_into_view(&card_id);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.as_ref().unchecked_ref(),
            220,
        );
        cb.forget();
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative; background: #0c0e17; color: #e2e0d8; font-family: 'Inter', system-ui, sans-serif;">
            <div
                style="position: absolute; inset: 0; display: flex; flex-direction: column; transition: right 0.2s;"
                style:right=move || if cards_open.get() { format!("{CARDS_WIDTH}px") } else { "0px".to_owned() }
            >
                <div style="padding: 8px 14px; font-size: 0.72rem; color: #9a9590; font-family: 'JetBrains Mono', monospace; border-bottom: 1px solid #282c3e;">
                    {move || status.with(LoadStatus::message)}
                </div>
                <div style="flex: 1; min-height: 0; overflow: auto;">
                    <MapView />
                </div>
            </div>
            <div
                style="position: absolute; top: 0; right: 0; bottom: 0; transition: transform 0.2s;"
                style:width=format!("{CARDS_WIDTH}px")
                style:transform=move || if cards_open.get() { "translateX(0)" } else { "translateX(100%)" }
            >
                <CardsToggle />
                <ContactCards />
            </div>
        </div>
        <Tooltip />
    }
}

/// Toggle button attached to the cards panel's left edge.
#[component]
fn CardsToggle() -> impl IntoView {
    let CardsOpen(cards_open) = expect_context();

    view! {
        <button
            title=move || if cards_open.get() { "Hide contacts" } else { "Show contacts" }
            style="position: absolute; top: 44px; left: -44px; z-index: 11; width: 32px; height: 32px; background: #13161f; border: 1px solid #282c3e; border-radius: 6px; cursor: pointer; color: #9a9590; font-size: 1.1rem; line-height: 1;"
            on:click=move |_| cards_open.update(|v| *v = !*v)
        >
            {move || if cards_open.get() { "\u{00BB}" } else { "\u{00AB}" }}
        </button>
    }
}
