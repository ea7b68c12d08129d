use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use arealens_shared::colors::{Rgba, marker_color, marker_radius};
use arealens_shared::{DataType, Datasets, Entity, Geometry, MapSession, colors};

use crate::app::{DatasetsSignal, SessionSignal, canvas_dimensions};
use crate::colors::rgba_css;
use crate::viewport::{Viewport, project};

/// Slack added around a marker's resting radius during hit-testing.
const HIT_SLACK_PX: f64 = 2.0;

/// Pointer travel below this many pixels still counts as a click.
const CLICK_DRAG_TOLERANCE_PX: f64 = 5.0;

const BACKGROUND_CSS: &str = "#e9e7e2";
const SHAPE_OUTLINE_CSS: &str = "rgba(255,255,255,1.000)";
const MARKER_OUTLINE_CSS: &str = "rgba(255,255,255,0.900)";

/// One renderable overlay polygon, projected into world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayShape {
    pub ring: Vec<(f64, f64)>,
    pub fill: Rgba,
}

/// One marker, projected into world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDot {
    pub entity: Entity,
    pub world: (f64, f64),
}

fn push_shape(shapes: &mut Vec<OverlayShape>, polygon: &Geometry, fill: Rgba) {
    if !polygon.has_valid_coordinates() {
        return;
    }
    let ring = polygon
        .outer_ring()
        .iter()
        .map(|&[lon, lat]| project(lon, lat))
        .collect();
    shapes.push(OverlayShape { ring, fill });
}

/// Customer-geography overlay polygons for the current session state.
/// Pure and deterministic, so memoized rebuilds are safe to skip.
pub fn build_overlay_shapes(data: &Datasets, session: &MapSession) -> Vec<OverlayShape> {
    if !session.filters.show_customer_data {
        return Vec::new();
    }

    let mut shapes = Vec::new();
    match session.filters.data_type {
        DataType::TradeArea => {
            let mut pids: Vec<&String> = session.visible_trade_areas.iter().collect();
            pids.sort();
            for pid in pids {
                let mut areas = data.trade_areas_for(pid, &session.filters.selected_bands);
                // Wider bands underneath the concentrated core.
                areas.sort_by(|a, b| b.band.cmp(&a.band));
                for area in areas {
                    push_shape(&mut shapes, &area.polygon, colors::trade_area_color(area.band));
                }
            }
        }
        DataType::HomeZipcodes => {
            if let Some(pid) = session.visible_home_zipcodes.as_deref() {
                for shape in data.home_zipcode_shapes(pid) {
                    push_shape(
                        &mut shapes,
                        shape.polygon,
                        colors::home_zipcode_color(shape.percentage),
                    );
                }
            }
        }
    }
    shapes
}

/// Markers in draw order: filtered competitors first, the analyzed
/// business last so it always renders on top.
pub fn build_markers(data: &Datasets, session: &MapSession) -> Vec<MarkerDot> {
    let mut markers = Vec::new();
    if session.filters.show_competitors {
        for competitor in data.filtered_competitors(&session.filters) {
            markers.push(MarkerDot {
                entity: Entity::Competitor(competitor.clone()),
                world: project(competitor.longitude, competitor.latitude),
            });
        }
    }
    markers.push(MarkerDot {
        entity: Entity::Place(data.my_place.clone()),
        world: project(data.my_place.longitude, data.my_place.latitude),
    });
    markers
}

/// Topmost marker whose screen-space disc contains the point.
pub fn hit_test<'a>(
    markers: &'a [MarkerDot],
    viewport: &Viewport,
    sx: f64,
    sy: f64,
) -> Option<&'a MarkerDot> {
    markers.iter().rev().find(|marker| {
        let (mx, my) = viewport.world_to_screen(marker.world.0, marker.world.1);
        let radius = marker_radius(marker.entity.is_my_place(), false) + HIT_SLACK_PX;
        let dx = sx - mx;
        let dy = sy - my;
        dx * dx + dy * dy <= radius * radius
    })
}

fn draw_scene(
    canvas: &HtmlCanvasElement,
    size: (f64, f64),
    vp: &Viewport,
    shapes: &[OverlayShape],
    markers: &[MarkerDot],
    hovered_id: Option<&str>,
) {
    let (width, height) = size;
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0);
    canvas.set_width((width * dpr) as u32);
    canvas.set_height((height * dpr) as u32);

    let Some(ctx) = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
    else {
        return;
    };
    let _ = ctx.scale(dpr, dpr);

    ctx.set_fill_style_str(BACKGROUND_CSS);
    ctx.fill_rect(0.0, 0.0, width, height);

    for shape in shapes {
        let Some(&(first_x, first_y)) = shape.ring.first() else {
            continue;
        };
        ctx.begin_path();
        let (sx, sy) = vp.world_to_screen(first_x, first_y);
        ctx.move_to(sx, sy);
        for &(wx, wy) in &shape.ring[1..] {
            let (sx, sy) = vp.world_to_screen(wx, wy);
            ctx.line_to(sx, sy);
        }
        ctx.close_path();
        ctx.set_fill_style_str(&rgba_css(shape.fill));
        ctx.fill();
        ctx.set_stroke_style_str(SHAPE_OUTLINE_CSS);
        ctx.set_line_width(2.0);
        ctx.stroke();
    }

    for marker in markers {
        let is_mine = marker.entity.is_my_place();
        let hovered = hovered_id == Some(marker.entity.id());
        let (sx, sy) = vp.world_to_screen(marker.world.0, marker.world.1);
        ctx.begin_path();
        let _ = ctx.arc(sx, sy, marker_radius(is_mine, hovered), 0.0, std::f64::consts::TAU);
        ctx.set_fill_style_str(&rgba_css(marker_color(is_mine, hovered)));
        ctx.fill();
        ctx.set_stroke_style_str(MARKER_OUTLINE_CSS);
        ctx.set_line_width(1.5);
        ctx.stroke();
    }
}

struct ResizeBinding {
    window: web_sys::Window,
    _callback: Closure<dyn Fn()>,
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Full-viewport map canvas: overlays under markers, pointer pan/zoom,
/// hover and click hit-testing against the marker layer.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let SessionSignal(session) = expect_context();
    let DatasetsSignal(datasets) = expect_context();
    let viewport: RwSignal<Viewport> = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let window_size = RwSignal::new(canvas_dimensions());

    // Re-measure on window resize, replacing any previous binding.
    Effect::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        RESIZE_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                old.window.set_onresize(None);
            }
        });
        let callback = Closure::<dyn Fn()>::new(move || {
            window_size.set(canvas_dimensions());
        });
        window.set_onresize(Some(callback.as_ref().unchecked_ref()));
        RESIZE_BINDING.with(|slot| {
            *slot.borrow_mut() = Some(ResizeBinding {
                window: window.clone(),
                _callback: callback,
            });
        });
    });

    let overlay_shapes = Memo::new(move |_| {
        datasets.with(|data| {
            session.with(|s| {
                data.as_ref()
                    .map(|d| build_overlay_shapes(d, s))
                    .unwrap_or_default()
            })
        })
    });
    let markers = Memo::new(move |_| {
        datasets.with(|data| {
            session.with(|s| data.as_ref().map(|d| build_markers(d, s)).unwrap_or_default())
        })
    });
    let hovered_id = Memo::new(move |_| {
        session.with(|s| s.hovered.as_ref().map(|entity| entity.id().to_string()))
    });

    // Redraw whenever a relevant state slice changes.
    Effect::new(move || {
        let size = window_size.get();
        let vp = viewport.get();
        let Some(canvas) = canvas_ref.get() else {
            return;
        };
        overlay_shapes.with(|shapes| {
            markers.with(|dots| {
                hovered_id.with(|hovered| {
                    draw_scene(&canvas, size, &vp, shapes, dots, hovered.as_deref());
                });
            });
        });
    });

    // Drag state
    let is_dragging = Rc::new(Cell::new(false));
    let drag_start = Rc::new(Cell::new((0.0f64, 0.0f64)));
    let last_pos = Rc::new(Cell::new((0.0f64, 0.0f64)));

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        viewport.update(|vp| vp.zoom_at(delta, x, y));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let drag_start = drag_start.clone();
        let last_pos = last_pos.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            drag_start.set((e.client_x() as f64, e.client_y() as f64));
            last_pos.set((e.client_x() as f64, e.client_y() as f64));
            session.update(|s| s.on_place_hover(None));

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_pos = last_pos.clone();
        move |e: PointerEvent| {
            if is_dragging.get() {
                let (lx, ly) = last_pos.get();
                let dx = e.client_x() as f64 - lx;
                let dy = e.client_y() as f64 - ly;
                last_pos.set((e.client_x() as f64, e.client_y() as f64));
                viewport.update(|vp| vp.pan(dx, dy));
                return;
            }

            let vp = viewport.get_untracked();
            let hit = markers.with_untracked(|dots| {
                hit_test(dots, &vp, e.offset_x() as f64, e.offset_y() as f64)
                    .map(|dot| dot.entity.clone())
            });
            let hit_id = hit.as_ref().map(|entity| entity.id().to_string());
            let current = session.with_untracked(|s| {
                s.hovered.as_ref().map(|entity| entity.id().to_string())
            });
            if hit_id != current {
                session.update(|s| s.on_place_hover(hit));
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = {
        move |_: PointerEvent| {
            if session.with_untracked(|s| s.hovered.is_some()) {
                session.update(|s| s.on_place_hover(None));
            }
        }
    };

    let on_click = {
        let drag_start = drag_start.clone();
        move |e: MouseEvent| {
            let (sx, sy) = drag_start.get();
            let dx = (e.client_x() as f64 - sx).abs();
            let dy = (e.client_y() as f64 - sy).abs();
            if dx >= CLICK_DRAG_TOLERANCE_PX || dy >= CLICK_DRAG_TOLERANCE_PX {
                return;
            }

            let vp = viewport.get_untracked();
            let hit = markers.with_untracked(|dots| {
                hit_test(dots, &vp, e.offset_x() as f64, e.offset_y() as f64)
                    .map(|dot| dot.entity.clone())
            });
            match hit {
                Some(entity) => session.update(|s| s.on_place_click(&entity)),
                None => session.update(|s| s.on_map_click()),
            }
        }
    };

    view! {
        <div
            style="position: absolute; inset: 0; overflow: hidden; cursor: grab;"
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            on:click=on_click
        >
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%;"
            />
        </div>
    }
}

/// Bottom-center card for the clicked entity, with the current mode's
/// overlay control and a close button.
#[component]
pub fn InfoCard() -> impl IntoView {
    let SessionSignal(session) = expect_context();
    let DatasetsSignal(datasets) = expect_context();

    view! {
        {move || {
            session.with(|s| s.clicked.clone()).map(|entity| {
                let card_mode = session.with(|s| s.filters.data_type);
                let customer_data_enabled = session.with(|s| s.filters.show_customer_data);
                let place_id = entity.id().to_string();
                let overlay_shown = session.with(|s| match card_mode {
                    DataType::TradeArea => s.visible_trade_areas.contains(&place_id),
                    DataType::HomeZipcodes => {
                        s.visible_home_zipcodes.as_deref() == Some(place_id.as_str())
                    }
                });
                let has_data = datasets.with(|data| {
                    data.as_ref().is_some_and(|d| match card_mode {
                        DataType::TradeArea => d.has_trade_area_data(&place_id),
                        DataType::HomeZipcodes => d.has_home_zipcode_data(&place_id),
                    })
                });
                let button_label = match (card_mode, overlay_shown) {
                    (DataType::TradeArea, false) => "Show Trade Area",
                    (DataType::TradeArea, true) => "Hide Trade Area",
                    (DataType::HomeZipcodes, false) => "Show Home Zipcodes",
                    (DataType::HomeZipcodes, true) => "Hide Home Zipcodes",
                };
                let detail = match &entity {
                    Entity::Competitor(competitor) => Some((
                        competitor.sub_category.clone(),
                        competitor.distance,
                    )),
                    Entity::Place(_) => None,
                };
                let name = entity.name().to_string();
                let name_color = if entity.is_my_place() { "#1976d2" } else { "#333333" };
                let entity_for_action = entity.clone();
                let on_action = move |_| {
                    session.update(|s| {
                        s.on_place_action(&entity_for_action, card_mode, !overlay_shown);
                    });
                };
                let on_close = move |_| session.update(|s| s.on_tooltip_close());

                view! {
                    <div style="position: absolute; bottom: 20px; left: 50%; transform: translateX(-50%); min-width: 280px; max-width: 400px; background: rgba(255,255,255,0.98); border: 1px solid rgba(0,0,0,0.08); border-radius: 10px; padding: 18px; box-shadow: 0 6px 24px rgba(0,0,0,0.16); font-family: system-ui, sans-serif;">
                        <div style=format!("font-size: 1.05rem; font-weight: 600; margin-bottom: 8px; color: {name_color};")>
                            {name}
                        </div>
                        {detail.map(|(sub_category, distance)| view! {
                            <div style="font-size: 0.8rem; color: #666; margin-bottom: 2px;">
                                {format!("Industry: {sub_category}")}
                            </div>
                            <div style="font-size: 0.8rem; color: #666; margin-bottom: 8px;">
                                {format!("Distance: {distance:.2} km")}
                            </div>
                        })}
                        <button
                            style="display: block; width: 100%; padding: 8px 10px; margin-top: 8px; border-radius: 6px; border: 1px solid #1976d2; background: #1976d2; color: #fff; font-size: 0.85rem; cursor: pointer;"
                            prop:disabled=move || !has_data || !customer_data_enabled
                            on:click=on_action
                        >
                            {button_label}
                        </button>
                        <button
                            style="display: block; width: 100%; padding: 6px 10px; margin-top: 8px; border-radius: 6px; border: none; background: transparent; color: #555; font-size: 0.8rem; cursor: pointer;"
                            on:click=on_close
                        >
                            "Close"
                        </button>
                    </div>
                }
            })
        }}
    }
}
