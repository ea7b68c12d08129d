use leptos::prelude::*;

use arealens_shared::{DataType, FilterUpdate, TRADE_AREA_BANDS};

use crate::app::{DatasetsSignal, SessionSignal};

const PANEL_STYLE: &str = "position: absolute; top: 16px; left: 16px; bottom: 16px; width: 300px; overflow-y: auto; background: rgba(255,255,255,0.97); border: 1px solid rgba(0,0,0,0.08); border-radius: 12px; padding: 18px; box-shadow: 0 6px 24px rgba(0,0,0,0.12); font-family: system-ui, sans-serif;";
const INPUT_STYLE: &str = "width: 100%; box-sizing: border-box; padding: 7px 9px; border: 1px solid #ddd; border-radius: 6px; font-size: 0.85rem; background: #fff; color: #333;";

#[component]
fn SectionHeader(title: &'static str) -> impl IntoView {
    view! {
        <div style="font-size: 0.72rem; text-transform: uppercase; letter-spacing: 0.08em; color: #888; margin: 16px 0 6px;">
            {title}
        </div>
    }
}

#[component]
fn ToggleRow(
    label: &'static str,
    #[prop(into)] checked: Signal<bool>,
    #[prop(into)] on_toggle: Callback<bool>,
) -> impl IntoView {
    view! {
        <label style="display: flex; align-items: center; justify-content: space-between; padding: 6px 0; font-size: 0.85rem; color: #333; cursor: pointer;">
            <span>{label}</span>
            <input
                type="checkbox"
                prop:checked=move || checked.get()
                on:change=move |ev| on_toggle.run(event_target_checked(&ev))
            />
        </label>
    }
}

/// Segmented selector button for the overlay mode. Switching mode routes
/// through the reducer, which clears the departing mode's overlay.
#[component]
fn ModeButton(label: &'static str, mode: DataType) -> impl IntoView {
    let SessionSignal(session) = expect_context();
    let active = Memo::new(move |_| session.with(|s| s.filters.data_type == mode));
    view! {
        <button
            style=move || {
                format!(
                    "flex: 1; padding: 7px 0; font-size: 0.8rem; border-radius: 6px; cursor: pointer; border: 1px solid #1976d2; {}",
                    if active.get() {
                        "background: #1976d2; color: #fff;"
                    } else {
                        "background: transparent; color: #1976d2;"
                    },
                )
            }
            on:click=move |_| {
                session.update(|s| {
                    s.apply_filters(FilterUpdate {
                        data_type: Some(mode),
                        ..FilterUpdate::default()
                    });
                });
            }
        >
            {label}
        </button>
    }
}

#[component]
fn BandCheckbox(band: u8) -> impl IntoView {
    let SessionSignal(session) = expect_context();
    view! {
        <label style="display: flex; align-items: center; gap: 5px; font-size: 0.82rem; color: #333; cursor: pointer;">
            <input
                type="checkbox"
                prop:checked=move || session.with(|s| s.filters.selected_bands.contains(&band))
                on:change=move |ev| {
                    let selected = event_target_checked(&ev);
                    session.update(|s| {
                        let mut bands = s.filters.selected_bands.clone();
                        if selected {
                            if !bands.contains(&band) {
                                bands.push(band);
                                bands.sort_unstable();
                            }
                        } else {
                            bands.retain(|other| *other != band);
                        }
                        s.apply_filters(FilterUpdate {
                            selected_bands: Some(bands),
                            ..FilterUpdate::default()
                        });
                    });
                }
            />
            <span>{format!("{band}%")}</span>
        </label>
    }
}

/// Filter sidebar: search, radius, industries, overlay mode and bands,
/// visibility toggles, and the filtered-competitor count.
#[component]
pub fn FilterPanel() -> impl IntoView {
    let SessionSignal(session) = expect_context();
    let DatasetsSignal(datasets) = expect_context();

    let available_industries = Memo::new(move |_| {
        datasets.with(|data| {
            data.as_ref()
                .map(|d| d.available_industries())
                .unwrap_or_default()
        })
    });
    let competitor_total = Memo::new(move |_| {
        datasets.with(|data| data.as_ref().map(|d| d.competitors.len()).unwrap_or(0))
    });
    let filtered_count = Memo::new(move |_| {
        datasets.with(|data| {
            session.with(|s| {
                data.as_ref()
                    .map(|d| d.filtered_competitors(&s.filters).len())
                    .unwrap_or(0)
            })
        })
    });
    let data_type = Memo::new(move |_| session.with(|s| s.filters.data_type));

    view! {
        <div style=PANEL_STYLE>
            <div style="font-size: 1.1rem; font-weight: 600; color: #1976d2;">
                "Filters & Controls"
            </div>

            <SectionHeader title="Search" />
            <input
                type="text"
                placeholder="Search by business name"
                style=INPUT_STYLE
                prop:value=move || session.with(|s| s.filters.search_query.clone())
                on:input=move |ev| {
                    session.update(|s| {
                        s.apply_filters(FilterUpdate {
                            search_query: Some(event_target_value(&ev)),
                            ..FilterUpdate::default()
                        });
                    });
                }
            />

            <SectionHeader title="Radius (km, 0 = no limit)" />
            <input
                type="number"
                min="0"
                step="0.5"
                style=INPUT_STYLE
                prop:value=move || session.with(|s| s.filters.radius_km.to_string())
                on:input=move |ev| {
                    let radius = event_target_value(&ev).parse().unwrap_or(0.0);
                    session.update(|s| {
                        s.apply_filters(FilterUpdate {
                            radius_km: Some(radius),
                            ..FilterUpdate::default()
                        });
                    });
                }
            />

            <SectionHeader title="Industries" />
            <For
                each=move || available_industries.get()
                key=|industry| industry.clone()
                children=move |industry: String| {
                    let checked_industry = industry.clone();
                    let toggled_industry = industry.clone();
                    view! {
                        <label style="display: flex; align-items: center; gap: 8px; padding: 3px 0; font-size: 0.85rem; color: #333; cursor: pointer;">
                            <input
                                type="checkbox"
                                prop:checked=move || {
                                    session.with(|s| s.filters.industries.contains(&checked_industry))
                                }
                                on:change=move |ev| {
                                    let selected = event_target_checked(&ev);
                                    session.update(|s| {
                                        let mut industries = s.filters.industries.clone();
                                        if selected {
                                            if !industries.contains(&toggled_industry) {
                                                industries.push(toggled_industry.clone());
                                            }
                                        } else {
                                            industries.retain(|label| label != &toggled_industry);
                                        }
                                        s.apply_filters(FilterUpdate {
                                            industries: Some(industries),
                                            ..FilterUpdate::default()
                                        });
                                    });
                                }
                            />
                            <span>{industry.clone()}</span>
                        </label>
                    }
                }
            />

            <SectionHeader title="Customer Data" />
            <div style="display: flex; gap: 6px;">
                <ModeButton label="Trade Area" mode=DataType::TradeArea />
                <ModeButton label="Home Zipcodes" mode=DataType::HomeZipcodes />
            </div>

            <Show when=move || data_type.get() == DataType::TradeArea>
                <div style="display: flex; gap: 12px; margin-top: 8px;">
                    {TRADE_AREA_BANDS
                        .iter()
                        .map(|&band| view! { <BandCheckbox band /> })
                        .collect_view()}
                </div>
            </Show>

            <ToggleRow
                label="Show customer data"
                checked=Signal::derive(move || session.with(|s| s.filters.show_customer_data))
                on_toggle=Callback::new(move |show: bool| {
                    session.update(|s| {
                        s.apply_filters(FilterUpdate {
                            show_customer_data: Some(show),
                            ..FilterUpdate::default()
                        });
                    });
                })
            />
            <ToggleRow
                label="Show competitors"
                checked=Signal::derive(move || session.with(|s| s.filters.show_competitors))
                on_toggle=Callback::new(move |show: bool| {
                    session.update(|s| {
                        s.apply_filters(FilterUpdate {
                            show_competitors: Some(show),
                            ..FilterUpdate::default()
                        });
                    });
                })
            />

            <div style="margin-top: 14px; font-size: 0.78rem; color: #777;">
                {move || format!("{} of {} competitors shown", filtered_count.get(), competitor_total.get())}
            </div>
        </div>
    }
}
