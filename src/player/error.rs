//! Error types raised while querying the music player.

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for player queries.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Every way the player can turn out to be unusable.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// Required environment variable is missing.
    #[error("missing player environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build player client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The now-playing endpoint could not be reached.
    #[error("player unreachable at `{url}`")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The player answered with an unexpected status code.
    #[error("unexpected player response status {status} for `{url}`")]
    Status { url: String, status: StatusCode },
    /// The now-playing payload could not be decoded.
    #[error("failed to decode now-playing payload from `{url}`")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The player is reachable but not playing anything.
    #[error("player reports no current track")]
    NothingPlaying,
}
