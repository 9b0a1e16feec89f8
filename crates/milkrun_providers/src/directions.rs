use geo_types::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::travel_mode::TravelMode;

/// Ceiling on intermediate waypoints per provider call.
pub const DEFAULT_MAX_INTERMEDIATE_WAYPOINTS: usize = 25;

/// One provider call: a fixed origin and destination plus the
/// intermediate waypoints between them, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub origin: Point,
    pub destination: Point,
    pub waypoints: Vec<Point>,
    pub optimize_order: bool,
    pub mode: TravelMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub start_address: String,
    pub end_address: String,
}

/// Successful provider answer for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsResponse {
    /// One leg per consecutive pair in the realized order, origin first.
    pub legs: Vec<DirectionsLeg>,

    /// Permutation of indices `0..request.waypoints.len()`, present when
    /// the provider reordered the intermediates. Indices refer to
    /// positions within that single request's waypoint list, never to
    /// any global order.
    pub optimized_order: Option<Vec<usize>>,

    /// The provider document as received, for rendering downstream.
    pub raw_payload: Value,
}

/// Failure statuses a provider can signal in an otherwise well-formed
/// response body.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectionsStatus {
    InvalidRequest,
    MaxWaypointsExceeded,
    NotFound,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    Unknown,
}

#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("provider status {status:?}: {message}")]
    Status {
        status: DirectionsStatus,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("response did not contain a route")]
    EmptyResponse,
}

/// Awaited request/response boundary to the external routing provider.
///
/// Implementations must honour the per-call waypoint ceiling; callers
/// split larger stop sequences before requesting.
#[allow(async_fn_in_trait)]
pub trait DirectionsProvider {
    async fn fetch_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError>;
}

impl<P: DirectionsProvider> DirectionsProvider for &P {
    async fn fetch_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        (**self).fetch_directions(request).await
    }
}
