use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::stop::Stop;

/// Travel between two consecutive stops in a realized route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub from_stop_id: String,
    pub to_stop_id: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A planned route over one stop set.
///
/// Totals are summed from the legs rather than taken from the provider:
/// a route assembled from several provider calls has no single provider
/// total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub ordered_stops: Vec<Stop>,

    pub legs: Vec<Leg>,

    pub total_distance_meters: f64,

    pub total_duration_seconds: f64,

    /// Raw provider documents, one per segment, passed through untouched
    /// for rendering.
    pub provider_payload: Vec<Value>,
}

impl RouteResult {
    pub fn from_legs(ordered_stops: Vec<Stop>, legs: Vec<Leg>, provider_payload: Vec<Value>) -> Self {
        let total_distance_meters = legs.iter().map(|leg| leg.distance_meters).sum();
        let total_duration_seconds = legs.iter().map(|leg| leg.duration_seconds).sum();

        Self {
            ordered_stops,
            legs,
            total_distance_meters,
            total_duration_seconds,
            provider_payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(from: &str, to: &str, distance: f64, duration: f64) -> Leg {
        Leg {
            from_stop_id: from.to_owned(),
            to_stop_id: to.to_owned(),
            distance_meters: distance,
            duration_seconds: duration,
        }
    }

    #[test]
    fn test_totals_are_summed_from_legs() {
        let stops = vec![
            Stop::new("a".to_owned(), "a".to_owned(), 0.0, 0.0),
            Stop::new("b".to_owned(), "b".to_owned(), 1.0, 0.0),
            Stop::new("c".to_owned(), "c".to_owned(), 2.0, 0.0),
        ];
        let legs = vec![leg("a", "b", 1200.0, 90.0), leg("b", "c", 800.0, 60.0)];

        let result = RouteResult::from_legs(stops, legs, Vec::new());

        assert_eq!(result.total_distance_meters, 2000.0);
        assert_eq!(result.total_duration_seconds, 150.0);
        assert_eq!(result.legs.len(), result.ordered_stops.len() - 1);
    }

    #[test]
    fn test_empty_legs_sum_to_zero() {
        let result = RouteResult::from_legs(Vec::new(), Vec::new(), Vec::new());

        assert_eq!(result.total_distance_meters, 0.0);
        assert_eq!(result.total_duration_seconds, 0.0);
    }
}
