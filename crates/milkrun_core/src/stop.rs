use geo_types::Point;
use serde::{Deserialize, Serialize};

/// A single geographic location requested to be visited.
///
/// Identity is an opaque string, unique within one request. A stop is
/// never mutated by the planner, only reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    id: String,
    label: String,
    point: Point,
}

impl Stop {
    pub fn new(id: String, label: String, lat: f64, lon: f64) -> Self {
        Self {
            id,
            label,
            point: Point::new(lon, lat),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    /// Finite coordinates with latitude in [-90, 90] and longitude in
    /// [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat().is_finite()
            && self.lon().is_finite()
            && (-90.0..=90.0).contains(&self.lat())
            && (-180.0..=180.0).contains(&self.lon())
    }
}

impl From<&Stop> for Point {
    fn from(stop: &Stop) -> Self {
        stop.point
    }
}
