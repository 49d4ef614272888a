use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness along with the number of running games.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.games().len())
}
