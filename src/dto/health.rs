use serde::{Deserialize, Serialize};

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Number of channels with a running game.
    pub active_games: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(active_games: usize) -> Self {
        Self {
            status: "ok".to_string(),
            active_games,
        }
    }
}
