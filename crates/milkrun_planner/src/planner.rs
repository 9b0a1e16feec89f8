use fxhash::FxHashSet;
use milkrun_core::{
    batch::split_into_segments,
    route::{Leg, RouteResult},
    sequencer::seed_order,
    stop::Stop,
};
use milkrun_providers::{
    directions::{
        DEFAULT_MAX_INTERMEDIATE_WAYPOINTS, DirectionsProvider, DirectionsRequest,
        DirectionsResponse,
    },
    travel_mode::TravelMode,
};
use tracing::debug;

use crate::{
    cache::{CacheKey, RouteCache},
    error::PlanError,
};

pub struct RoutePlannerConfig {
    /// Provider ceiling on intermediate waypoints per call.
    pub max_intermediate_waypoints: usize,

    pub travel_mode: TravelMode,
}

impl Default for RoutePlannerConfig {
    fn default() -> Self {
        Self {
            max_intermediate_waypoints: DEFAULT_MAX_INTERMEDIATE_WAYPOINTS,
            travel_mode: TravelMode::Driving,
        }
    }
}

/// Facade over the whole planning pipeline: validation, cache lookup,
/// local seeding, batching, sequential provider calls, reordering
/// reconciliation, and aggregation.
pub struct RoutePlanner<P> {
    provider: P,
    cache: RouteCache,
    config: RoutePlannerConfig,
}

impl<P: DirectionsProvider> RoutePlanner<P> {
    pub fn new(provider: P, cache: RouteCache, config: RoutePlannerConfig) -> Self {
        Self {
            provider,
            cache,
            config,
        }
    }

    /// Plan a visiting order and travel legs over `stops`.
    ///
    /// Provider calls are issued strictly sequentially: each segment's
    /// origin is the previous segment's arrival stop, so no segment can
    /// be requested before the one ahead of it resolved. Any segment
    /// failure aborts the whole call without touching the cache.
    /// Dropping the returned future between segment awaits abandons the
    /// plan; an abandoned call never writes the cache either.
    pub async fn plan_route(&self, stops: &[Stop]) -> Result<RouteResult, PlanError> {
        let valid = validate_stops(stops)?;

        let key = CacheKey::from_stop_ids(valid.iter().map(Stop::id));
        if let Some(result) = self.cache.get(&key) {
            debug!("RoutePlanner: cache hit for {} stops", valid.len());
            return Ok(result);
        }

        let seeded = seed_order(&valid);
        let segments = split_into_segments(&seeded, self.config.max_intermediate_waypoints);

        debug!(
            "RoutePlanner: planning {} stops across {} segment(s)",
            seeded.len(),
            segments.len()
        );

        let mut ordered_stops: Vec<Stop> = Vec::with_capacity(seeded.len());
        let mut legs: Vec<Leg> = Vec::with_capacity(seeded.len().saturating_sub(1));
        let mut payloads = Vec::with_capacity(segments.len());

        for (index, segment) in segments.iter().enumerate() {
            let request = segment_request(segment, self.config.travel_mode);

            let response = self
                .provider
                .fetch_directions(&request)
                .await
                .map_err(|error| PlanError::from_directions(error, index))?;

            let segment_order = reconcile_segment_order(segment, &response, index)?;

            if response.legs.len() != segment_order.len() - 1 {
                return Err(PlanError::ProviderUnavailable {
                    message: format!(
                        "segment {index}: expected {} legs, provider returned {}",
                        segment_order.len() - 1,
                        response.legs.len()
                    ),
                });
            }

            for (pair, leg) in segment_order.windows(2).zip(&response.legs) {
                legs.push(Leg {
                    from_stop_id: pair[0].id().to_owned(),
                    to_stop_id: pair[1].id().to_owned(),
                    distance_meters: leg.distance_meters,
                    duration_seconds: leg.duration_seconds,
                });
            }

            // the shared boundary stop already ends the previous segment
            let skip = if index == 0 { 0 } else { 1 };
            ordered_stops.extend(segment_order.into_iter().skip(skip));

            payloads.push(response.raw_payload);
        }

        let result = RouteResult::from_legs(ordered_stops, legs, payloads);

        self.cache.put(key, result.clone());

        Ok(result)
    }

    /// Drop every cached route. Maintenance surface for testing and
    /// debugging.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// Drop stops with invalid coordinates and later occurrences of a
/// duplicated id; fail when fewer than 2 stops survive.
fn validate_stops(stops: &[Stop]) -> Result<Vec<Stop>, PlanError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut valid = Vec::with_capacity(stops.len());
    let mut dropped = Vec::new();

    for stop in stops {
        if stop.is_valid() && seen.insert(stop.id()) {
            valid.push(stop.clone());
        } else {
            dropped.push(stop.id().to_owned());
        }
    }

    if valid.len() < 2 {
        return Err(PlanError::InsufficientStops {
            valid: valid.len(),
            dropped,
        });
    }

    Ok(valid)
}

fn segment_request(segment: &[Stop], mode: TravelMode) -> DirectionsRequest {
    DirectionsRequest {
        origin: (&segment[0]).into(),
        destination: (&segment[segment.len() - 1]).into(),
        waypoints: segment[1..segment.len() - 1].iter().map(Into::into).collect(),
        optimize_order: true,
        mode,
    }
}

/// Translate a provider's intermediate-waypoint permutation back into
/// global stop identity.
///
/// The permutation indexes positions within this segment's submitted
/// waypoint list; the fixed origin and destination are re-attached
/// around the permuted intermediates. Absent order means the provider
/// kept the submitted order.
fn reconcile_segment_order(
    segment: &[Stop],
    response: &DirectionsResponse,
    index: usize,
) -> Result<Vec<Stop>, PlanError> {
    let Some(order) = response.optimized_order.as_deref() else {
        return Ok(segment.to_vec());
    };

    let intermediates = &segment[1..segment.len() - 1];

    if !is_permutation(order, intermediates.len()) {
        return Err(PlanError::ProviderUnavailable {
            message: format!(
                "segment {index}: waypoint order {order:?} is not a permutation of 0..{}",
                intermediates.len()
            ),
        });
    }

    let mut ordered = Vec::with_capacity(segment.len());
    ordered.push(segment[0].clone());
    for &position in order {
        ordered.push(intermediates[position].clone());
    }
    ordered.push(segment[segment.len() - 1].clone());

    Ok(ordered)
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }

    let mut seen = vec![false; len];
    for &position in order {
        if position >= len || seen[position] {
            return false;
        }
        seen[position] = true;
    }

    true
}
