use serde::{Deserialize, Serialize};

/// The business under analysis. Loaded once from `my_place.json`; at most
/// one exists per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub longitude: f64,
    pub latitude: f64,
    pub industry: String,
    #[serde(rename = "isTradeAreaAvailable", default)]
    pub trade_area_available: bool,
    #[serde(rename = "isHomeZipcodesAvailable", default)]
    pub home_zipcodes_available: bool,
}

/// A nearby business. `distance` is precomputed kilometers from the
/// analyzed place; `pid` is unique within the loaded collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub pid: String,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub region: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub sub_category: String,
    #[serde(default)]
    pub trade_area_activity: bool,
    #[serde(default)]
    pub home_locations_activity: bool,
    pub distance: f64,
}

/// A marker on the map: the analyzed business or one of its competitors.
/// The variant tag is the sole discriminator; no logic relies on which
/// JSON fields an entity happens to carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Place(Place),
    Competitor(Competitor),
}

impl Entity {
    pub fn id(&self) -> &str {
        match self {
            Entity::Place(place) => &place.id,
            Entity::Competitor(competitor) => &competitor.pid,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Place(place) => &place.name,
            Entity::Competitor(competitor) => &competitor.name,
        }
    }

    pub fn longitude(&self) -> f64 {
        match self {
            Entity::Place(place) => place.longitude,
            Entity::Competitor(competitor) => competitor.longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        match self {
            Entity::Place(place) => place.latitude,
            Entity::Competitor(competitor) => competitor.latitude,
        }
    }

    pub fn is_my_place(&self) -> bool {
        matches!(self, Entity::Place(_))
    }

    /// The analyzed business is always shown; competitors obey the toggle.
    pub fn visible_under(&self, show_competitors: bool) -> bool {
        self.is_my_place() || show_competitors
    }
}
