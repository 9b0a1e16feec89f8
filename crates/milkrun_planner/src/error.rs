use milkrun_providers::directions::{DirectionsError, DirectionsStatus};
use thiserror::Error;

/// Everything `plan_route` can fail with.
///
/// None of these are retried by the planner itself; retry policy, if
/// any, belongs to the caller or the transport. No failure is swallowed:
/// each one aborts the in-progress call, discards partial aggregation,
/// and leaves the cache untouched.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Fewer than 2 valid stops survived validation. `dropped` lists the
    /// identities that were filtered out.
    #[error("{valid} valid stop(s) after filtering, need at least 2 ({} dropped)", .dropped.len())]
    InsufficientStops { valid: usize, dropped: Vec<String> },

    #[error("provider rejected segment {segment}: {message}")]
    InvalidRequest { segment: usize, message: String },

    /// Signalled when the provider's waypoint limit differs from the
    /// configured one; unreachable while the two agree.
    #[error("segment {segment} exceeded the provider waypoint limit")]
    TooManyWaypoints { segment: usize },

    #[error("no route found for segment {segment}")]
    NoRouteFound { segment: usize },

    #[error("provider quota exhausted, retry later")]
    QuotaExceeded,

    /// Credential or configuration problem, fatal for the whole session.
    #[error("provider denied access: {message}")]
    ProviderAccessDenied { message: String },

    #[error("provider unavailable: {message}")]
    ProviderUnavailable { message: String },
}

impl PlanError {
    /// Map a provider failure on `segment` into the planner taxonomy.
    pub(crate) fn from_directions(error: DirectionsError, segment: usize) -> Self {
        match error {
            DirectionsError::Status { status, message } => match status {
                DirectionsStatus::InvalidRequest => PlanError::InvalidRequest { segment, message },
                DirectionsStatus::MaxWaypointsExceeded => PlanError::TooManyWaypoints { segment },
                DirectionsStatus::NotFound | DirectionsStatus::ZeroResults => {
                    PlanError::NoRouteFound { segment }
                }
                DirectionsStatus::OverQueryLimit => PlanError::QuotaExceeded,
                DirectionsStatus::RequestDenied => PlanError::ProviderAccessDenied { message },
                DirectionsStatus::Unknown => PlanError::ProviderUnavailable { message },
            },
            other => PlanError::ProviderUnavailable {
                message: other.to_string(),
            },
        }
    }
}
