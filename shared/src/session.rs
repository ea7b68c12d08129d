use std::collections::HashSet;

use crate::filters::{DataType, FilterState, FilterUpdate};
use crate::place::Entity;

/// The session's mutable view state: filter configuration, which overlays
/// are showing, and the clicked/hovered entities. All mutation goes through
/// the transition methods below; rendering reads it immutably.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSession {
    pub filters: FilterState,
    /// Places currently showing a trade-area overlay. The click/action
    /// transitions keep this at a single member; the set shape matches the
    /// toggle contract and leaves room for multi-overlay display.
    pub visible_trade_areas: HashSet<String>,
    /// Place currently showing home-zipcode shading. Single slot, mutually
    /// exclusive with trade-area mode.
    pub visible_home_zipcodes: Option<String>,
    pub clicked: Option<Entity>,
    pub hovered: Option<Entity>,
}

impl MapSession {
    pub fn new(available_industries: Vec<String>) -> Self {
        Self {
            filters: FilterState::initial(available_industries),
            visible_trade_areas: HashSet::new(),
            visible_home_zipcodes: None,
            clicked: None,
            hovered: None,
        }
    }

    /// One-shot back-fill for an industries list that arrives after
    /// construction. Assigns the field directly so the overlay-clearing
    /// rules of [`MapSession::apply_filters`] cannot fire from
    /// initialization.
    pub fn backfill_industries(&mut self, available: &[String]) {
        if self.filters.industries.is_empty() && !available.is_empty() {
            self.filters.industries = available.to_vec();
        }
    }

    /// Merge a partial filter update. Switching overlay mode clears the
    /// departing mode's visibility (both, if customer data ends up off);
    /// explicitly disabling customer data clears both unconditionally.
    pub fn apply_filters(&mut self, update: FilterUpdate) {
        let previous_data_type = self.filters.data_type;

        if let Some(radius) = update.radius_km {
            self.filters.radius_km = radius.max(0.0);
        }
        if let Some(industries) = update.industries {
            self.filters.industries = industries;
        }
        if let Some(query) = update.search_query {
            self.filters.search_query = query;
        }
        if let Some(show) = update.show_competitors {
            self.filters.show_competitors = show;
        }
        if let Some(data_type) = update.data_type {
            self.filters.data_type = data_type;
        }
        if let Some(bands) = update.selected_bands {
            self.filters.selected_bands = bands;
        }
        if let Some(show) = update.show_customer_data {
            self.filters.show_customer_data = show;
        }

        if update.data_type.is_some() && self.filters.data_type != previous_data_type {
            if !self.filters.show_customer_data {
                self.visible_trade_areas.clear();
                self.visible_home_zipcodes = None;
            } else {
                match self.filters.data_type {
                    DataType::HomeZipcodes => self.visible_trade_areas.clear(),
                    DataType::TradeArea => self.visible_home_zipcodes = None,
                }
            }
        }

        if update.show_customer_data == Some(false) {
            self.visible_trade_areas.clear();
            self.visible_home_zipcodes = None;
        }
    }

    pub fn toggle_trade_area(&mut self, place_id: &str, show: bool) {
        if show {
            self.visible_trade_areas.insert(place_id.to_string());
        } else {
            self.visible_trade_areas.remove(place_id);
        }
    }

    pub fn toggle_home_zipcodes(&mut self, place_id: &str, show: bool) {
        self.visible_home_zipcodes = show.then(|| place_id.to_string());
    }

    /// Marker click: remember the entity and, when overlays are enabled,
    /// move the active overlay of the current mode onto it. In trade-area
    /// mode every other visible trade area is hidden first; in
    /// home-zipcodes mode the slot is only retargeted if already occupied.
    pub fn on_place_click(&mut self, entity: &Entity) {
        self.clicked = Some(entity.clone());

        if !self.filters.show_customer_data {
            return;
        }
        let place_id = entity.id().to_string();
        match self.filters.data_type {
            DataType::TradeArea => {
                self.visible_trade_areas.clear();
                self.visible_trade_areas.insert(place_id);
            }
            DataType::HomeZipcodes => {
                if self.visible_home_zipcodes.is_some() {
                    self.visible_home_zipcodes = Some(place_id);
                }
            }
        }
    }

    /// Plain replacement; hover never touches overlays or click state.
    pub fn on_place_hover(&mut self, entity: Option<Entity>) {
        self.hovered = entity;
    }

    /// Background click: dismiss the current mode's overlays. The clicked
    /// entity (and its info card) stays.
    pub fn on_map_click(&mut self) {
        match self.filters.data_type {
            DataType::TradeArea => self.visible_trade_areas.clear(),
            DataType::HomeZipcodes => self.visible_home_zipcodes = None,
        }
    }

    /// Closing the info card hides the clicked entity's trade-area overlay
    /// (home-zipcode shading deliberately stays up), then forgets the
    /// entity.
    pub fn on_tooltip_close(&mut self) {
        if let Some(clicked) = &self.clicked {
            let place_id = clicked.id().to_string();
            if self.visible_trade_areas.contains(&place_id) {
                self.toggle_trade_area(&place_id, false);
            }
        }
        self.clicked = None;
    }

    /// Explicit show/hide from an info-card button. Showing a trade area
    /// hides all others first; home zipcodes pass straight to the slot.
    pub fn on_place_action(&mut self, entity: &Entity, kind: DataType, show: bool) {
        let place_id = entity.id().to_string();
        match kind {
            DataType::TradeArea => {
                if show {
                    self.visible_trade_areas.clear();
                }
                self.toggle_trade_area(&place_id, show);
            }
            DataType::HomeZipcodes => self.toggle_home_zipcodes(&place_id, show),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MapSession;
    use crate::filters::{DataType, FilterUpdate};
    use crate::place::{Competitor, Entity};

    fn competitor_entity(pid: &str) -> Entity {
        Entity::Competitor(Competitor {
            pid: pid.into(),
            name: format!("Competitor {pid}"),
            street_address: String::new(),
            city: String::new(),
            region: String::new(),
            logo: None,
            latitude: 38.9,
            longitude: -104.7,
            sub_category: "Fitness".into(),
            trade_area_activity: true,
            home_locations_activity: true,
            distance: 2.0,
        })
    }

    fn session() -> MapSession {
        MapSession::new(vec!["Fitness".into()])
    }

    #[test]
    fn trade_area_visibility_stays_single_after_repeated_actions() {
        let mut session = session();
        for pid in ["a", "b", "c", "b"] {
            session.on_place_action(&competitor_entity(pid), DataType::TradeArea, true);
        }
        assert_eq!(session.visible_trade_areas.len(), 1);
        assert!(session.visible_trade_areas.contains("b"));
    }

    #[test]
    fn clicking_with_nothing_visible_shows_the_clicked_trade_area() {
        let mut session = session();
        session.on_place_click(&competitor_entity("a"));
        assert_eq!(session.visible_trade_areas.len(), 1);
        assert!(session.visible_trade_areas.contains("a"));

        session.on_map_click();
        assert!(session.visible_trade_areas.is_empty());
        // Background clicks never dismiss the info card.
        assert!(session.clicked.is_some());
    }

    #[test]
    fn clicking_moves_the_overlay_off_the_previous_place() {
        let mut session = session();
        session.on_place_click(&competitor_entity("a"));
        session.on_place_click(&competitor_entity("b"));
        assert_eq!(session.visible_trade_areas.len(), 1);
        assert!(session.visible_trade_areas.contains("b"));
    }

    #[test]
    fn click_does_nothing_to_overlays_when_customer_data_is_off() {
        let mut session = session();
        session.apply_filters(FilterUpdate {
            show_customer_data: Some(false),
            ..FilterUpdate::default()
        });
        session.on_place_click(&competitor_entity("a"));
        assert!(session.visible_trade_areas.is_empty());
        assert_eq!(session.clicked.as_ref().map(Entity::id), Some("a"));
    }

    #[test]
    fn home_zipcodes_click_only_retargets_an_occupied_slot() {
        let mut session = session();
        session.apply_filters(FilterUpdate {
            data_type: Some(DataType::HomeZipcodes),
            ..FilterUpdate::default()
        });

        session.on_place_click(&competitor_entity("a"));
        assert_eq!(session.visible_home_zipcodes, None);

        session.toggle_home_zipcodes("a", true);
        session.on_place_click(&competitor_entity("b"));
        assert_eq!(session.visible_home_zipcodes.as_deref(), Some("b"));
    }

    #[test]
    fn switching_mode_clears_the_departing_overlay() {
        let mut session = session();
        session.toggle_trade_area("a", true);
        session.apply_filters(FilterUpdate {
            data_type: Some(DataType::HomeZipcodes),
            ..FilterUpdate::default()
        });
        assert!(session.visible_trade_areas.is_empty());

        session.toggle_home_zipcodes("a", true);
        session.apply_filters(FilterUpdate {
            data_type: Some(DataType::TradeArea),
            ..FilterUpdate::default()
        });
        assert_eq!(session.visible_home_zipcodes, None);
    }

    #[test]
    fn switching_mode_with_customer_data_off_clears_both() {
        let mut session = session();
        session.toggle_trade_area("a", true);
        session.toggle_home_zipcodes("b", true);
        session.apply_filters(FilterUpdate {
            data_type: Some(DataType::HomeZipcodes),
            show_customer_data: Some(false),
            ..FilterUpdate::default()
        });
        assert!(session.visible_trade_areas.is_empty());
        assert_eq!(session.visible_home_zipcodes, None);
    }

    #[test]
    fn repeating_the_same_mode_is_not_a_switch() {
        let mut session = session();
        session.toggle_trade_area("a", true);
        session.apply_filters(FilterUpdate {
            data_type: Some(DataType::TradeArea),
            ..FilterUpdate::default()
        });
        assert!(session.visible_trade_areas.contains("a"));
    }

    #[test]
    fn disabling_customer_data_clears_both_overlays() {
        let mut session = session();
        session.toggle_trade_area("a", true);
        session.toggle_home_zipcodes("b", true);
        session.apply_filters(FilterUpdate {
            show_customer_data: Some(false),
            ..FilterUpdate::default()
        });
        assert!(session.visible_trade_areas.is_empty());
        assert_eq!(session.visible_home_zipcodes, None);
    }

    #[test]
    fn negative_radius_clamps_to_zero() {
        let mut session = session();
        session.apply_filters(FilterUpdate {
            radius_km: Some(-3.5),
            ..FilterUpdate::default()
        });
        assert_eq!(session.filters.radius_km, 0.0);
    }

    #[test]
    fn tooltip_close_hides_the_clicked_trade_area_only() {
        let mut session = session();
        session.on_place_click(&competitor_entity("a"));
        session.visible_home_zipcodes = Some("z".into());

        session.on_tooltip_close();
        assert!(session.visible_trade_areas.is_empty());
        assert!(session.clicked.is_none());
        // The asymmetry is deliberate: home-zipcode shading survives.
        assert_eq!(session.visible_home_zipcodes.as_deref(), Some("z"));
    }

    #[test]
    fn tooltip_close_leaves_other_places_overlays_alone() {
        let mut session = session();
        session.clicked = Some(competitor_entity("a"));
        session.toggle_trade_area("b", true);

        session.on_tooltip_close();
        assert!(session.visible_trade_areas.contains("b"));
        assert!(session.clicked.is_none());
    }

    #[test]
    fn hover_is_pure_replacement() {
        let mut session = session();
        session.on_place_click(&competitor_entity("a"));
        session.on_place_hover(Some(competitor_entity("b")));
        assert_eq!(session.hovered.as_ref().map(Entity::id), Some("b"));
        assert_eq!(session.clicked.as_ref().map(Entity::id), Some("a"));

        session.on_place_hover(None);
        assert!(session.hovered.is_none());
        assert!(session.visible_trade_areas.contains("a"));
    }

    #[test]
    fn action_hide_removes_without_touching_others() {
        let mut session = session();
        session.toggle_home_zipcodes("z", true);
        session.on_place_action(&competitor_entity("a"), DataType::TradeArea, true);
        session.on_place_action(&competitor_entity("a"), DataType::TradeArea, false);
        assert!(session.visible_trade_areas.is_empty());
        assert_eq!(session.visible_home_zipcodes.as_deref(), Some("z"));

        session.on_place_action(&competitor_entity("a"), DataType::HomeZipcodes, false);
        assert_eq!(session.visible_home_zipcodes, None);
    }

    #[test]
    fn backfill_fills_an_empty_filter_exactly_once() {
        let mut session = MapSession::new(Vec::new());
        let available = vec!["Fitness".into(), "Coffee".into()];

        session.backfill_industries(&available);
        assert_eq!(session.filters.industries, available);

        // A later user deselection must not be overridden.
        session.apply_filters(FilterUpdate {
            industries: Some(vec!["Coffee".into()]),
            ..FilterUpdate::default()
        });
        session.backfill_industries(&available);
        assert_eq!(session.filters.industries, vec!["Coffee".to_string()]);
    }

    #[test]
    fn backfill_never_clears_overlays() {
        let mut session = MapSession::new(Vec::new());
        session.toggle_trade_area("a", true);
        session.backfill_industries(&["Fitness".to_string()]);
        assert!(session.visible_trade_areas.contains("a"));
    }
}
