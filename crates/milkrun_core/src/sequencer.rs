use geo_types::Point;

use crate::{distance::haversine_km, stop::Stop};

/// Greedy nearest-neighbor visiting order, anchored at the first stop.
///
/// Seed quality only: this gives the provider a sane initial waypoint
/// list and gives the caller instant feedback before the network call
/// resolves. The provider's own reordering supersedes it whenever
/// present. Ties resolve to the first stop encountered in input order,
/// so two runs over the same input produce the same permutation.
pub fn seed_order(stops: &[Stop]) -> Vec<Stop> {
    if stops.len() <= 1 {
        return stops.to_vec();
    }

    let mut ordered = Vec::with_capacity(stops.len());
    let mut visited = vec![false; stops.len()];

    ordered.push(stops[0].clone());
    visited[0] = true;
    let mut current: Point = (&stops[0]).into();

    for _ in 1..stops.len() {
        let mut nearest: Option<(usize, f64)> = None;

        for (index, stop) in stops.iter().enumerate() {
            if visited[index] {
                continue;
            }

            let distance = haversine_km(current, stop.into());
            // strict `<` keeps the first encountered stop on a tie
            if nearest.is_none_or(|(_, nearest_distance)| distance < nearest_distance) {
                nearest = Some((index, distance));
            }
        }

        if let Some((index, _)) = nearest {
            visited[index] = true;
            current = (&stops[index]).into();
            ordered.push(stops[index].clone());
        }
    }

    ordered
}
