use std::collections::HashMap;

use futures::future::{Either, select};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use serde::Deserialize;

use arealens_shared::{
    Competitor, Datasets, Geometry, HomeZipcodes, Place, TradeArea, Zipcode, ZipcodeShare,
};

const DATA_BASE: &str = "/data";

/// Timeout applied individually to each of the three large payloads.
const LARGE_FETCH_TIMEOUT_MS: u32 = 30_000;

/// Load progress surfaced while the datasets stream in. A `Failed` load is
/// fatal: the app shows the message and renders no partial data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Pending(&'static str),
    Ready,
    Failed(String),
}

/// Raw trade-area record; the polygon arrives as a serialized geometry
/// string.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTradeArea {
    pub pid: String,
    pub polygon: String,
    pub trade_area: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawZipcode {
    pub id: String,
    pub polygon: String,
}

/// Raw home-zipcode record: each location is a single-entry map from a
/// zipcode id to a percentage that may be a string or a number.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHomeZipcodes {
    pub pid: String,
    pub locations: Vec<HashMap<String, serde_json::Value>>,
}

fn warn(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    let _ = message;
}

/// Parse a record's serialized polygon, substituting an empty geometry on
/// failure so one malformed record cannot abort the batch.
fn parse_polygon_or_empty(owner: &str, raw: &str) -> Geometry {
    match Geometry::parse(raw) {
        Ok(geometry) => geometry,
        Err(err) => {
            warn(&format!("Failed to parse polygon for {owner}: {err}"));
            Geometry::empty()
        }
    }
}

pub fn assemble_trade_areas(raw: Vec<RawTradeArea>) -> Vec<TradeArea> {
    raw.into_iter()
        .map(|record| TradeArea {
            polygon: parse_polygon_or_empty(&record.pid, &record.polygon),
            pid: record.pid,
            band: record.trade_area,
        })
        .collect()
}

pub fn assemble_zipcodes(raw: Vec<RawZipcode>) -> Vec<Zipcode> {
    raw.into_iter()
        .map(|record| Zipcode {
            polygon: parse_polygon_or_empty(&record.id, &record.polygon),
            id: record.id,
        })
        .collect()
}

fn percentage_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Normalize single-entry location maps into (zipcode, percentage) shares.
/// Entries whose percentage fits neither a number nor a numeric string are
/// dropped with a warning.
pub fn assemble_home_zipcodes(raw: Vec<RawHomeZipcodes>) -> Vec<HomeZipcodes> {
    raw.into_iter()
        .map(|record| {
            let shares = record
                .locations
                .iter()
                .filter_map(|location| {
                    let (zipcode, value) = location.iter().next()?;
                    match percentage_value(value) {
                        Some(percentage) => Some(ZipcodeShare {
                            zipcode: zipcode.clone(),
                            percentage,
                        }),
                        None => {
                            warn(&format!(
                                "Dropping unparseable percentage for zipcode {zipcode} of {}",
                                record.pid
                            ));
                            None
                        }
                    }
                })
                .collect();
            HomeZipcodes {
                pid: record.pid,
                shares,
            }
        })
        .collect()
}

async fn fetch_json<T>(url: &str) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error for {url}: {e}"))?;
    if !resp.ok() {
        return Err(format!("HTTP {} loading {url}", resp.status()));
    }
    resp.json::<T>()
        .await
        .map_err(|e| format!("parse error for {url}: {e}"))
}

/// Race a fetch against the large-payload timeout. First of
/// {response, timeout} wins; a timeout is fatal to the load, not retried.
async fn fetch_json_with_timeout<T>(url: &str) -> Result<T, String>
where
    T: serde::de::DeserializeOwned,
{
    let fetch = Box::pin(fetch_json::<T>(url));
    let timeout = Box::pin(TimeoutFuture::new(LARGE_FETCH_TIMEOUT_MS));
    match select(fetch, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => Err(format!("Timed out loading {url}")),
    }
}

/// Fetch and assemble the five datasets: the two small payloads first, then
/// the three large ones concurrently with individual timeouts. Any failure
/// aborts the whole load.
pub async fn load_datasets(status: RwSignal<LoadStatus>) -> Result<Datasets, String> {
    status.set(LoadStatus::Pending("Loading business data"));
    let my_place: Place = fetch_json(&format!("{DATA_BASE}/my_place.json")).await?;
    let competitors: Vec<Competitor> = fetch_json(&format!("{DATA_BASE}/competitors.json")).await?;

    status.set(LoadStatus::Pending("Loading geographic data"));
    let trade_areas_url = format!("{DATA_BASE}/trade_areas.json");
    let home_zipcodes_url = format!("{DATA_BASE}/home_zipcodes.json");
    let zipcodes_url = format!("{DATA_BASE}/zipcodes.json");
    let (trade_areas, home_zipcodes, zipcodes) = futures::join!(
        fetch_json_with_timeout::<Vec<RawTradeArea>>(&trade_areas_url),
        fetch_json_with_timeout::<Vec<RawHomeZipcodes>>(&home_zipcodes_url),
        fetch_json_with_timeout::<Vec<RawZipcode>>(&zipcodes_url),
    );

    status.set(LoadStatus::Pending("Processing polygon data"));
    Ok(Datasets::new(
        my_place,
        competitors,
        assemble_trade_areas(trade_areas?),
        assemble_home_zipcodes(home_zipcodes?),
        assemble_zipcodes(zipcodes?),
    ))
}

#[cfg(test)]
mod tests {
    use super::{
        RawHomeZipcodes, RawTradeArea, RawZipcode, assemble_home_zipcodes, assemble_trade_areas,
        assemble_zipcodes,
    };
    use std::collections::HashMap;

    const TRIANGLE: &str = r#"{"type":"Polygon","coordinates":[[[0.0,0.0],[1.0,0.0],[0.0,1.0]]]}"#;

    fn location(zipcode: &str, value: serde_json::Value) -> HashMap<String, serde_json::Value> {
        HashMap::from([(zipcode.to_string(), value)])
    }

    #[test]
    fn malformed_polygons_keep_their_record_with_empty_geometry() {
        let assembled = assemble_trade_areas(vec![
            RawTradeArea {
                pid: "a".into(),
                polygon: TRIANGLE.into(),
                trade_area: 30,
            },
            RawTradeArea {
                pid: "b".into(),
                polygon: "{broken".into(),
                trade_area: 50,
            },
        ]);

        assert_eq!(assembled.len(), 2);
        assert!(assembled[0].polygon.has_valid_coordinates());
        assert!(!assembled[1].polygon.has_valid_coordinates());
        assert_eq!(assembled[1].pid, "b");
        assert_eq!(assembled[1].band, 50);
    }

    #[test]
    fn zipcode_assembly_tolerates_unknown_discriminants() {
        let assembled = assemble_zipcodes(vec![RawZipcode {
            id: "80903".into(),
            polygon: r#"{"type":"Point","coordinates":[0,0]}"#.into(),
        }]);
        assert_eq!(assembled.len(), 1);
        assert!(!assembled[0].polygon.has_valid_coordinates());
    }

    #[test]
    fn percentages_normalize_from_strings_and_numbers() {
        let assembled = assemble_home_zipcodes(vec![RawHomeZipcodes {
            pid: "a".into(),
            locations: vec![
                location("80903", serde_json::json!("12.5")),
                location("80904", serde_json::json!(7)),
                location("80905", serde_json::json!(" 3.25 ")),
            ],
        }]);

        let shares = &assembled[0].shares;
        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].percentage, 12.5);
        assert_eq!(shares[1].percentage, 7.0);
        assert_eq!(shares[2].percentage, 3.25);
    }

    #[test]
    fn unparseable_percentages_are_dropped() {
        let assembled = assemble_home_zipcodes(vec![RawHomeZipcodes {
            pid: "a".into(),
            locations: vec![
                location("80903", serde_json::json!("n/a")),
                location("80904", serde_json::json!(null)),
                location("80905", serde_json::json!("9.75")),
            ],
        }]);

        let shares = &assembled[0].shares;
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].zipcode, "80905");
    }
}
