use geo_types::Point;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers, haversine
/// formula.
///
/// Used only for local ordering, never for billed distances. Inputs must
/// be finite; invalid stops are filtered out before any estimate runs.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat_from = from.y().to_radians();
    let lat_to = to.y().to_radians();
    let delta_lat = (to.y() - from.y()).to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
