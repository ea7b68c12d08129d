use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use arealens_shared::{Datasets, MapSession};

use crate::canvas::{InfoCard, MapCanvas};
use crate::legend::Legend;
use crate::loader::{self, LoadStatus};
use crate::sidebar::FilterPanel;
use crate::viewport::{FOCUS_SCALE, Viewport, project};

/// Newtype wrappers give the signals distinct types for leptos context.
#[derive(Clone, Copy)]
pub(crate) struct SessionSignal(pub RwSignal<MapSession>);
#[derive(Clone, Copy)]
pub(crate) struct DatasetsSignal(pub RwSignal<Option<Datasets>>);

pub(crate) fn canvas_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (1200.0, 800.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(1200.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    (w, h)
}

fn set_loading_shell_step(step: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(step_el) = document.get_element_by_id("app-loading-step") {
        step_el.set_text_content(Some(step));
    }
}

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Frame the analyzed business and its competitors. Falls back to a fixed
/// city-scale view when the points are degenerate (no horizontal or
/// vertical spread).
fn fit_viewport_to_data(vp: &mut Viewport, data: &Datasets, width: f64, height: f64) {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    let points = std::iter::once((data.my_place.longitude, data.my_place.latitude)).chain(
        data.competitors
            .iter()
            .map(|competitor| (competitor.longitude, competitor.latitude)),
    );
    for (lon, lat) in points {
        let (x, y) = project(lon, lat);
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    if max_x - min_x > f64::EPSILON && max_y - min_y > f64::EPSILON {
        vp.fit_bounds(min_x, min_y, max_x, max_y, width, height);
    } else {
        let (wx, wy) = project(data.my_place.longitude, data.my_place.latitude);
        vp.center_on(wx, wy, FOCUS_SCALE, width, height);
    }
}

/// Root application component. Owns every signal and provides them via
/// context; all session mutation flows through the reducer transitions.
#[component]
pub fn App() -> impl IntoView {
    let session = RwSignal::new(MapSession::new(Vec::new()));
    let datasets: RwSignal<Option<Datasets>> = RwSignal::new(None);
    let viewport = RwSignal::new(Viewport::default());
    let load_status = RwSignal::new(LoadStatus::Pending("Initializing"));

    provide_context(SessionSignal(session));
    provide_context(DatasetsSignal(datasets));
    provide_context(viewport);

    // One-shot dataset load on mount. Industries back-fill once, before the
    // datasets signal flips the app to ready.
    Effect::new(move || {
        spawn_local(async move {
            match loader::load_datasets(load_status).await {
                Ok(data) => {
                    let industries = data.available_industries();
                    session.update(|s| s.backfill_industries(&industries));
                    let (width, height) = canvas_dimensions();
                    viewport.update(|vp| fit_viewport_to_data(vp, &data, width, height));
                    datasets.set(Some(data));
                    load_status.set(LoadStatus::Ready);
                }
                Err(message) => load_status.set(LoadStatus::Failed(message)),
            }
        });
    });

    // Keep the static loading shell in sync with load progress.
    Effect::new(move || match load_status.get() {
        LoadStatus::Pending(step) => set_loading_shell_step(step),
        LoadStatus::Ready | LoadStatus::Failed(_) => remove_loading_shell(),
    });

    view! {
        <div style="position: fixed; inset: 0; background: #f5f5f5; overflow: hidden;">
            {move || match load_status.get() {
                LoadStatus::Pending(step) => {
                    view! {
                        <div style="display: flex; align-items: center; justify-content: center; height: 100%; color: #666; font-family: system-ui, sans-serif; font-size: 1rem;">
                            {step}
                        </div>
                    }
                        .into_any()
                }
                LoadStatus::Failed(message) => {
                    view! {
                        <div style="display: flex; align-items: center; justify-content: center; height: 100%; font-family: system-ui, sans-serif;">
                            <div style="max-width: 420px; background: #fdecea; border: 1px solid #f5c6c0; color: #8a2a20; border-radius: 10px; padding: 18px; font-size: 0.9rem;">
                                {format!("Failed to load map data: {message}")}
                            </div>
                        </div>
                    }
                        .into_any()
                }
                LoadStatus::Ready => {
                    view! {
                        <MapCanvas />
                        <FilterPanel />
                        <Legend />
                        <InfoCard />
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
