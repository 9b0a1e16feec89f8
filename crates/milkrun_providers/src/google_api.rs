use geo_types::Point;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::directions::{
    DirectionsError, DirectionsLeg, DirectionsProvider, DirectionsRequest, DirectionsResponse,
    DirectionsStatus,
};

pub const DIRECTIONS_API_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

const API_KEY_ENV_VAR: &str = "MILKRUN_DIRECTIONS_API_KEY";

pub struct GoogleDirectionsClientParams {
    pub api_key: String,
}

pub struct GoogleDirectionsClient {
    params: GoogleDirectionsClientParams,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct ApiResponse {
    status: String,

    #[serde(default)]
    routes: Vec<ApiRoute>,

    error_message: Option<String>,
}

#[derive(Deserialize)]
struct ApiRoute {
    legs: Vec<ApiLeg>,

    #[serde(default)]
    waypoint_order: Vec<usize>,
}

#[derive(Deserialize)]
struct ApiLeg {
    distance: ApiScalar,
    duration: ApiScalar,

    #[serde(default)]
    start_address: String,

    #[serde(default)]
    end_address: String,
}

#[derive(Deserialize)]
struct ApiScalar {
    value: f64,
}

fn parse_status(status: &str) -> DirectionsStatus {
    match status {
        "INVALID_REQUEST" => DirectionsStatus::InvalidRequest,
        "MAX_WAYPOINTS_EXCEEDED" => DirectionsStatus::MaxWaypointsExceeded,
        "NOT_FOUND" => DirectionsStatus::NotFound,
        "ZERO_RESULTS" => DirectionsStatus::ZeroResults,
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => DirectionsStatus::OverQueryLimit,
        "REQUEST_DENIED" => DirectionsStatus::RequestDenied,
        _ => DirectionsStatus::Unknown,
    }
}

/// `lat,lon` wire form.
fn format_point(point: Point) -> String {
    format!("{},{}", point.y(), point.x())
}

/// `optimize:true|lat,lon|lat,lon|...` wire form.
fn waypoints_param(request: &DirectionsRequest) -> String {
    let mut param = String::new();

    if request.optimize_order {
        param.push_str("optimize:true");
    }

    for point in &request.waypoints {
        if !param.is_empty() {
            param.push('|');
        }
        param.push_str(&format_point(*point));
    }

    param
}

/// Parse a raw directions document into the provider-neutral response,
/// keeping the document itself for rendering.
pub fn parse_response(raw: Value) -> Result<DirectionsResponse, DirectionsError> {
    let parsed: ApiResponse = serde_json::from_value(raw.clone())?;

    if parsed.status != "OK" {
        let status = parse_status(&parsed.status);
        let message = parsed.error_message.unwrap_or(parsed.status);
        return Err(DirectionsError::Status { status, message });
    }

    let Some(route) = parsed.routes.into_iter().next() else {
        return Err(DirectionsError::EmptyResponse);
    };

    let legs = route
        .legs
        .into_iter()
        .map(|leg| DirectionsLeg {
            distance_meters: leg.distance.value,
            duration_seconds: leg.duration.value,
            start_address: leg.start_address,
            end_address: leg.end_address,
        })
        .collect();

    // an empty order means the provider had no intermediates to permute
    let optimized_order = if route.waypoint_order.is_empty() {
        None
    } else {
        Some(route.waypoint_order)
    };

    Ok(DirectionsResponse {
        legs,
        optimized_order,
        raw_payload: raw,
    })
}

impl GoogleDirectionsClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let api_key = std::env::var(API_KEY_ENV_VAR)?;

        Ok(Self::new(GoogleDirectionsClientParams { api_key }))
    }

    async fn fetch(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        debug!(
            "GoogleDirectionsApi: Requesting directions with {} intermediate waypoints",
            request.waypoints.len()
        );

        let mut query = vec![
            ("origin", format_point(request.origin)),
            ("destination", format_point(request.destination)),
            ("mode", request.mode.to_string()),
            ("key", self.params.api_key.clone()),
        ];

        if !request.waypoints.is_empty() {
            query.push(("waypoints", waypoints_param(request)));
        }

        let response = self
            .client
            .get(DIRECTIONS_API_URL)
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api { status, message });
        }

        let raw: Value = response.json().await?;

        parse_response(raw)
    }
}

impl DirectionsProvider for GoogleDirectionsClient {
    async fn fetch_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::travel_mode::TravelMode;

    fn request(waypoints: Vec<Point>, optimize_order: bool) -> DirectionsRequest {
        DirectionsRequest {
            origin: Point::new(4.35, 50.85),
            destination: Point::new(4.40, 51.22),
            waypoints,
            optimize_order,
            mode: TravelMode::Driving,
        }
    }

    #[test]
    fn test_format_point_is_lat_comma_lon() {
        assert_eq!(format_point(Point::new(4.35, 50.85)), "50.85,4.35");
    }

    #[test]
    fn test_waypoints_param_with_optimization() {
        let request = request(vec![Point::new(5.57, 50.63), Point::new(3.72, 51.05)], true);

        assert_eq!(
            waypoints_param(&request),
            "optimize:true|50.63,5.57|51.05,3.72"
        );
    }

    #[test]
    fn test_waypoints_param_without_optimization() {
        let request = request(vec![Point::new(5.57, 50.63)], false);

        assert_eq!(waypoints_param(&request), "50.63,5.57");
    }

    #[test]
    fn test_parse_ok_response_with_waypoint_order() {
        let raw = json!({
            "status": "OK",
            "routes": [{
                "legs": [
                    {
                        "distance": { "value": 1200.0 },
                        "duration": { "value": 90.0 },
                        "start_address": "Rue A 1",
                        "end_address": "Rue B 2"
                    },
                    {
                        "distance": { "value": 800.0 },
                        "duration": { "value": 60.0 },
                        "start_address": "Rue B 2",
                        "end_address": "Rue C 3"
                    }
                ],
                "waypoint_order": [1, 0]
            }]
        });

        let response = parse_response(raw.clone()).unwrap();

        assert_eq!(response.legs.len(), 2);
        assert_eq!(response.legs[0].distance_meters, 1200.0);
        assert_eq!(response.legs[1].duration_seconds, 60.0);
        assert_eq!(response.optimized_order, Some(vec![1, 0]));
        assert_eq!(response.raw_payload, raw);
    }

    #[test]
    fn test_parse_response_without_waypoint_order() {
        let raw = json!({
            "status": "OK",
            "routes": [{
                "legs": [{
                    "distance": { "value": 500.0 },
                    "duration": { "value": 45.0 }
                }]
            }]
        });

        let response = parse_response(raw).unwrap();

        assert_eq!(response.optimized_order, None);
        assert_eq!(response.legs[0].start_address, "");
    }

    #[test]
    fn test_parse_failure_status() {
        let raw = json!({
            "status": "ZERO_RESULTS",
            "routes": []
        });

        let error = parse_response(raw).unwrap_err();

        match error {
            DirectionsError::Status { status, .. } => {
                assert_eq!(status, DirectionsStatus::ZeroResults);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_failure_keeps_error_message() {
        let raw = json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        });

        let error = parse_response(raw).unwrap_err();

        match error {
            DirectionsError::Status { status, message } => {
                assert_eq!(status, DirectionsStatus::RequestDenied);
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_ok_without_routes_is_empty_response() {
        let raw = json!({
            "status": "OK",
            "routes": []
        });

        let error = parse_response(raw).unwrap_err();

        assert!(matches!(error, DirectionsError::EmptyResponse));
    }

    #[test]
    fn test_status_token_mapping() {
        assert_eq!(
            parse_status("INVALID_REQUEST"),
            DirectionsStatus::InvalidRequest
        );
        assert_eq!(
            parse_status("MAX_WAYPOINTS_EXCEEDED"),
            DirectionsStatus::MaxWaypointsExceeded
        );
        assert_eq!(parse_status("NOT_FOUND"), DirectionsStatus::NotFound);
        assert_eq!(
            parse_status("OVER_DAILY_LIMIT"),
            DirectionsStatus::OverQueryLimit
        );
        assert_eq!(parse_status("SOMETHING_ELSE"), DirectionsStatus::Unknown);
    }
}
