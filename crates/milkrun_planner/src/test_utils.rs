use std::collections::VecDeque;

use milkrun_core::stop::Stop;
use milkrun_providers::directions::{
    DirectionsError, DirectionsLeg, DirectionsProvider, DirectionsRequest, DirectionsResponse,
    DirectionsStatus,
};
use parking_lot::Mutex;

pub fn stop(id: &str, lat: f64, lon: f64) -> Stop {
    Stop::new(id.to_owned(), id.to_owned(), lat, lon)
}

/// Provider double that answers from a prepared script, one entry per
/// call, and records every request it sees.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<DirectionsResponse, DirectionsError>>>,
    requests: Mutex<Vec<DirectionsRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<DirectionsResponse, DirectionsError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, entry: Result<DirectionsResponse, DirectionsError>) {
        self.script.lock().push_back(entry);
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<DirectionsRequest> {
        self.requests.lock().clone()
    }
}

impl DirectionsProvider for ScriptedProvider {
    async fn fetch_directions(
        &self,
        request: &DirectionsRequest,
    ) -> Result<DirectionsResponse, DirectionsError> {
        self.requests.lock().push(request.clone());

        match self.script.lock().pop_front() {
            Some(entry) => entry,
            None => panic!("provider called past the end of its script"),
        }
    }
}

/// Response for a segment of `stop_count` stops: one synthetic leg per
/// consecutive pair, plus an optional intermediate reordering.
pub fn response_for(stop_count: usize, optimized_order: Option<Vec<usize>>) -> DirectionsResponse {
    let legs = (0..stop_count - 1)
        .map(|index| DirectionsLeg {
            distance_meters: 1000.0 + index as f64,
            duration_seconds: 60.0 + index as f64,
            start_address: String::new(),
            end_address: String::new(),
        })
        .collect();

    DirectionsResponse {
        legs,
        optimized_order,
        raw_payload: serde_json::json!({ "status": "OK" }),
    }
}

pub fn status_error(status: DirectionsStatus) -> DirectionsError {
    DirectionsError::Status {
        status,
        message: format!("{status:?}"),
    }
}
