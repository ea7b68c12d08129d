use serde::{Deserialize, Serialize};

use crate::place::Competitor;

/// Which customer-geography overlay kind is currently selectable. The two
/// modes are mutually exclusive: at most one mode's overlay is ever shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    TradeArea,
    HomeZipcodes,
}

/// Trade-area bands carried by the dataset, most concentrated first.
pub const TRADE_AREA_BANDS: [u8; 3] = [30, 50, 70];

/// The session's filter configuration. Owned by [`crate::MapSession`];
/// mutated only through its transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Kilometers; 0 means "no limit".
    pub radius_km: f64,
    /// Selected competitor sub-categories. Empty means "not yet
    /// initialized" and filters nothing until back-filled.
    pub industries: Vec<String>,
    /// Case-insensitive name search; empty matches everything.
    pub search_query: String,
    pub show_competitors: bool,
    pub data_type: DataType,
    /// Subset of [`TRADE_AREA_BANDS`] rendered for a visible trade area.
    pub selected_bands: Vec<u8>,
    /// Master switch for customer-geography overlays.
    pub show_customer_data: bool,
}

impl FilterState {
    /// Session defaults: every available industry selected, all bands on,
    /// overlays enabled, no radius limit, empty search.
    pub fn initial(available_industries: Vec<String>) -> Self {
        Self {
            radius_km: 0.0,
            industries: available_industries,
            search_query: String::new(),
            show_competitors: true,
            data_type: DataType::TradeArea,
            selected_bands: TRADE_AREA_BANDS.to_vec(),
            show_customer_data: true,
        }
    }

    /// AND of three independently optional predicates: name search, radius,
    /// industry membership. Each passes everything while unset.
    pub fn matches(&self, competitor: &Competitor) -> bool {
        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            if !competitor.name.to_lowercase().contains(&query) {
                return false;
            }
        }
        if self.radius_km > 0.0 && competitor.distance > self.radius_km {
            return false;
        }
        if !self.industries.is_empty() && !self.industries.contains(&competitor.sub_category) {
            return false;
        }
        true
    }
}

/// Partial update merged by [`crate::MapSession::apply_filters`]. `None`
/// fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct FilterUpdate {
    pub radius_km: Option<f64>,
    pub industries: Option<Vec<String>>,
    pub search_query: Option<String>,
    pub show_competitors: Option<bool>,
    pub data_type: Option<DataType>,
    pub selected_bands: Option<Vec<u8>>,
    pub show_customer_data: Option<bool>,
}
