use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::filters::FilterState;
use crate::geometry::Geometry;
use crate::place::{Competitor, Place};

/// A customer-draw contour for one place at one band. Multiple records may
/// share a `pid`, one per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeArea {
    pub pid: String,
    pub polygon: Geometry,
    #[serde(rename = "trade_area")]
    pub band: u8,
}

/// Share of a place's customers originating from one zipcode.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipcodeShare {
    pub zipcode: String,
    pub percentage: f64,
}

/// Customer-residence distribution for one place, normalized at load time
/// from the raw single-entry-map JSON shape. At most one record per `pid`.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeZipcodes {
    pub pid: String,
    pub shares: Vec<ZipcodeShare>,
}

/// A zipcode boundary, resolvable from a [`ZipcodeShare`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zipcode {
    pub id: String,
    pub polygon: Geometry,
}

/// A home-zipcode share joined with its boundary, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipcodeShape<'a> {
    pub zipcode: &'a str,
    pub percentage: f64,
    pub polygon: &'a Geometry,
}

/// All loaded collections, immutable after construction. The rest of the
/// system reads them through the derived views below.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub my_place: Place,
    pub competitors: Vec<Competitor>,
    pub trade_areas: Vec<TradeArea>,
    pub home_zipcodes: Vec<HomeZipcodes>,
    pub zipcodes: Vec<Zipcode>,
    zipcode_index: HashMap<String, usize>,
}

impl Datasets {
    pub fn new(
        my_place: Place,
        competitors: Vec<Competitor>,
        trade_areas: Vec<TradeArea>,
        home_zipcodes: Vec<HomeZipcodes>,
        zipcodes: Vec<Zipcode>,
    ) -> Self {
        let zipcode_index = zipcodes
            .iter()
            .enumerate()
            .map(|(index, zipcode)| (zipcode.id.clone(), index))
            .collect();
        Self {
            my_place,
            competitors,
            trade_areas,
            home_zipcodes,
            zipcodes,
            zipcode_index,
        }
    }

    /// Sorted, deduplicated competitor sub-categories. Empty labels are
    /// excluded.
    pub fn available_industries(&self) -> Vec<String> {
        let mut industries: Vec<String> = self
            .competitors
            .iter()
            .filter(|competitor| !competitor.sub_category.is_empty())
            .map(|competitor| competitor.sub_category.clone())
            .collect();
        industries.sort();
        industries.dedup();
        industries
    }

    /// Competitors passing the current filter configuration (§ filter
    /// predicate on [`FilterState`]).
    pub fn filtered_competitors(&self, filters: &FilterState) -> Vec<&Competitor> {
        self.competitors
            .iter()
            .filter(|competitor| filters.matches(competitor))
            .collect()
    }

    /// One place's trade areas, restricted to the selected bands.
    pub fn trade_areas_for(&self, place_id: &str, bands: &[u8]) -> Vec<&TradeArea> {
        self.trade_areas
            .iter()
            .filter(|area| area.pid == place_id && bands.contains(&area.band))
            .collect()
    }

    /// Join one place's home-zipcode shares against the boundary index.
    /// Shares referencing unknown zipcode ids are silently skipped.
    pub fn home_zipcode_shapes(&self, place_id: &str) -> Vec<ZipcodeShape<'_>> {
        let Some(record) = self
            .home_zipcodes
            .iter()
            .find(|record| record.pid == place_id)
        else {
            return Vec::new();
        };

        record
            .shares
            .iter()
            .filter_map(|share| {
                let index = *self.zipcode_index.get(&share.zipcode)?;
                Some(ZipcodeShape {
                    zipcode: &share.zipcode,
                    percentage: share.percentage,
                    polygon: &self.zipcodes[index].polygon,
                })
            })
            .collect()
    }

    /// Whether any trade-area record exists for this place. Drives the info
    /// card's button enablement (dataset presence, not the entity's
    /// availability flag).
    pub fn has_trade_area_data(&self, place_id: &str) -> bool {
        self.trade_areas.iter().any(|area| area.pid == place_id)
    }

    pub fn has_home_zipcode_data(&self, place_id: &str) -> bool {
        self.home_zipcodes.iter().any(|record| record.pid == place_id)
    }
}
