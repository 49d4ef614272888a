//! Query interface towards the external music player.

pub mod error;
pub mod http;

use std::time::Duration;

use futures::future::BoxFuture;
use serde::Deserialize;

pub use self::error::{PlayerError, PlayerResult};

/// Metadata reported by the player for the recording it is currently playing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NowPlaying {
    /// Stable identifier of the underlying recording.
    pub id: String,
    /// Credited artist.
    pub artist: String,
    /// Track title.
    #[serde(alias = "name")]
    pub title: String,
    /// Album the track belongs to, when the player knows it.
    #[serde(default)]
    pub album: Option<String>,
    /// Track length in whole seconds.
    #[serde(alias = "duration")]
    pub duration_secs: u64,
}

impl NowPlaying {
    /// Track length as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

/// Abstraction over whatever is able to tell us what is playing right now.
pub trait PlayerClient: Send + Sync {
    /// Ask the player for the current track, failing when it is unreachable or idle.
    fn now_playing(&self) -> BoxFuture<'static, PlayerResult<NowPlaying>>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_spotify_style_payload() {
        let payload = r#"{
            "id": "spotify:track:3AhXZa8sUQht0UEdBJgpGc",
            "artist": "Bob Dylan",
            "name": "Like A Rolling Stone",
            "album": "Highway 61 Revisited",
            "duration": 370
        }"#;

        let track: NowPlaying = serde_json::from_str(payload).unwrap();
        assert_eq!(track.title, "Like A Rolling Stone");
        assert_eq!(track.album.as_deref(), Some("Highway 61 Revisited"));
        assert_eq!(track.duration(), Duration::from_secs(370));
    }

    #[test]
    fn null_payload_means_nothing_playing() {
        let track: Option<NowPlaying> = serde_json::from_str("null").unwrap();
        assert!(track.is_none());
    }
}
