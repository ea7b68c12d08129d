use leptos::prelude::*;

use arealens_shared::DataType;
use arealens_shared::colors::{home_zipcode_color, trade_area_color};

use crate::app::SessionSignal;
use crate::colors::rgba_css;

const PANEL_STYLE: &str = "position: absolute; top: 16px; right: 16px; width: 230px; background: rgba(255,255,255,0.97); border: 1px solid rgba(0,0,0,0.08); border-radius: 12px; padding: 16px; box-shadow: 0 6px 24px rgba(0,0,0,0.12); font-family: system-ui, sans-serif;";
const TITLE_STYLE: &str = "font-size: 0.95rem; font-weight: 600; color: #333; margin-bottom: 8px;";
const NOTE_STYLE: &str = "font-size: 0.7rem; color: #888; margin-top: 8px;";

#[component]
fn LegendRow(swatch: String, label: String) -> impl IntoView {
    view! {
        <div style="display: flex; align-items: center; gap: 8px; padding: 3px 0;">
            <span style=format!(
                "width: 18px; height: 18px; border-radius: 4px; border: 1px solid rgba(0,0,0,0.1); background: {swatch};"
            )></span>
            <span style="font-size: 0.8rem; color: #333;">{label}</span>
        </div>
    }
}

/// Legend for whichever overlay mode is active. Hidden entirely while
/// customer data is switched off.
#[component]
pub fn Legend() -> impl IntoView {
    let SessionSignal(session) = expect_context();

    let visible = Memo::new(move |_| session.with(|s| s.filters.show_customer_data));
    let data_type = Memo::new(move |_| session.with(|s| s.filters.data_type));
    let bands = Memo::new(move |_| {
        session.with(|s| {
            let mut bands = s.filters.selected_bands.clone();
            bands.sort_unstable();
            bands
        })
    });

    view! {
        <Show when=move || visible.get()>
            <div style=PANEL_STYLE>
                {move || match data_type.get() {
                    DataType::TradeArea => {
                        view! {
                            <div style=TITLE_STYLE>"Trade Area Legend"</div>
                            <For
                                each=move || bands.get()
                                key=|band| *band
                                children=move |band: u8| {
                                    view! {
                                        <LegendRow
                                            swatch=rgba_css(trade_area_color(band))
                                            label=format!("{band}% trade area")
                                        />
                                    }
                                }
                            />
                            <div style=NOTE_STYLE>
                                "Smaller percentage = concentrated core customer area"
                            </div>
                        }
                            .into_any()
                    }
                    DataType::HomeZipcodes => {
                        view! {
                            <div style=TITLE_STYLE>"Home Zipcodes Legend"</div>
                            {(0..7u32)
                                .map(|bucket| {
                                    let low = bucket * 15;
                                    let label = if bucket == 6 {
                                        "90%+".to_string()
                                    } else {
                                        format!("{low}-{}%", low + 15)
                                    };
                                    let swatch = rgba_css(home_zipcode_color(f64::from(low) + 7.5));
                                    view! { <LegendRow swatch label /> }
                                })
                                .collect_view()}
                            <div style=NOTE_STYLE>
                                "Share of customers originating from each zipcode"
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
        </Show>
    }
}
