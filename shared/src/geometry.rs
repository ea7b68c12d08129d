use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A [longitude, latitude] pair.
pub type Coordinate = [f64; 2];

/// A linear ring: an ordered sequence of coordinate pairs.
pub type Ring = Vec<Coordinate>;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("malformed geometry: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Normalized boundary shape. The serialized form carries the discriminant
/// in a `type` field (`"Polygon"` / `"MultiPolygon"`); anything else fails
/// to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
}

impl Geometry {
    /// Strictly decode a serialized geometry string. Coordinates are copied
    /// as-is; ring winding, bounds, and antimeridian crossing are not
    /// validated. Callers assembling whole datasets substitute
    /// [`Geometry::empty`] on error so one bad record cannot abort a batch.
    pub fn parse(raw: &str) -> Result<Self, GeometryError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// A polygon with no coordinates. Renders as nothing, never as an error.
    pub fn empty() -> Self {
        Geometry::Polygon {
            coordinates: Vec::new(),
        }
    }

    /// The first ring of the first polygon, or an empty slice for an
    /// empty/invalid geometry. The rendering layer draws a single outer
    /// ring per shape; holes and further disjoint polygons of a
    /// MultiPolygon are deliberately dropped.
    pub fn outer_ring(&self) -> &[Coordinate] {
        match self {
            Geometry::Polygon { coordinates } => {
                coordinates.first().map_or(&[][..], Vec::as_slice)
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .first()
                .and_then(|polygon| polygon.first())
                .map_or(&[][..], Vec::as_slice),
        }
    }

    /// True iff the coordinate collection is non-empty and its first outer
    /// ring is non-empty. Check before trusting [`Geometry::outer_ring`].
    pub fn has_valid_coordinates(&self) -> bool {
        !self.outer_ring().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Geometry;

    #[test]
    fn parse_polygon_preserves_coordinates() {
        let raw = r#"{"type":"Polygon","coordinates":[[[-104.7,38.9],[-104.6,38.9],[-104.7,38.8]]]}"#;
        let geometry = Geometry::parse(raw).expect("valid polygon");
        assert_eq!(
            geometry,
            Geometry::Polygon {
                coordinates: vec![vec![[-104.7, 38.9], [-104.6, 38.9], [-104.7, 38.8]]],
            }
        );
    }

    #[test]
    fn parse_multi_polygon_preserves_discriminant() {
        let raw = r#"{"type":"MultiPolygon","coordinates":[[[[0.0,0.0],[1.0,0.0],[0.0,1.0]]]]}"#;
        let geometry = Geometry::parse(raw).expect("valid multipolygon");
        assert!(matches!(geometry, Geometry::MultiPolygon { .. }));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Geometry::parse("not json at all").is_err());
        assert!(Geometry::parse("[1,2,3]").is_err());
        assert!(Geometry::parse("null").is_err());
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(Geometry::parse(r#"{"coordinates":[]}"#).is_err());
        assert!(Geometry::parse(r#"{"type":"Polygon"}"#).is_err());
    }

    #[test]
    fn parse_rejects_unknown_discriminant() {
        assert!(Geometry::parse(r#"{"type":"Point","coordinates":[0.0,0.0]}"#).is_err());
    }

    #[test]
    fn outer_ring_of_polygon_is_first_ring() {
        let geometry = Geometry::Polygon {
            coordinates: vec![
                vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
                vec![[0.2, 0.2], [0.4, 0.2], [0.4, 0.4]],
            ],
        };
        assert_eq!(geometry.outer_ring(), &[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]);
    }

    #[test]
    fn outer_ring_of_multi_polygon_is_first_ring_of_first_polygon() {
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![
                vec![vec![[5.0, 5.0], [6.0, 5.0], [6.0, 6.0]]],
                vec![vec![[9.0, 9.0], [9.5, 9.0], [9.5, 9.5]]],
            ],
        };
        assert_eq!(geometry.outer_ring(), &[[5.0, 5.0], [6.0, 5.0], [6.0, 6.0]]);
    }

    #[test]
    fn outer_ring_of_empty_geometry_is_empty() {
        assert!(Geometry::empty().outer_ring().is_empty());
        let hollow = Geometry::MultiPolygon {
            coordinates: vec![Vec::new()],
        };
        assert!(hollow.outer_ring().is_empty());
    }

    #[test]
    fn validity_requires_a_non_empty_first_ring() {
        assert!(!Geometry::empty().has_valid_coordinates());

        let empty_first_ring = Geometry::Polygon {
            coordinates: vec![Vec::new(), vec![[1.0, 1.0]]],
        };
        assert!(!empty_first_ring.has_valid_coordinates());

        let valid = Geometry::Polygon {
            coordinates: vec![vec![[1.0, 1.0]]],
        };
        assert!(valid.has_valid_coordinates());
    }
}
