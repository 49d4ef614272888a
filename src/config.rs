//! Application-level configuration loading: guessing, caching and clue timings.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::services::{
    clue_scheduler::{CLUE_DELAY, CLUE_MIN_TRACK_DURATION, ClueTiming},
    track_resolver::{CURRENT_SONG_CACHE_LIFETIME, RECENT_TRACKS_CAPACITY},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TUNE_TRIVIA_CONFIG_PATH";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    clue_timing: ClueTiming,
    track_cache_lifetime: Duration,
    recent_tracks: usize,
    now_playing_poll_interval: Duration,
    event_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), config = ?app_config, "loaded config");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// When clues are revealed.
    pub fn clue_timing(&self) -> ClueTiming {
        self.clue_timing
    }

    /// How long a resolved current track is served from cache.
    pub fn track_cache_lifetime(&self) -> Duration {
        self.track_cache_lifetime
    }

    /// How many recent tracks keep their guess progress.
    pub fn recent_tracks(&self) -> usize {
        self.recent_tracks
    }

    /// How often the background watcher asks for the current track.
    pub fn now_playing_poll_interval(&self) -> Duration {
        self.now_playing_poll_interval
    }

    /// Capacity of the outbound event channel.
    pub fn event_capacity(&self) -> usize {
        self.event_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    clue_delay_secs: Option<u64>,
    clue_min_track_secs: Option<u64>,
    track_cache_ms: Option<u64>,
    recent_tracks: Option<usize>,
    now_playing_poll_secs: Option<u64>,
    event_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            clue_timing: ClueTiming {
                delay: value
                    .clue_delay_secs
                    .map(Duration::from_secs)
                    .unwrap_or(CLUE_DELAY),
                min_track_duration: value
                    .clue_min_track_secs
                    .map(Duration::from_secs)
                    .unwrap_or(CLUE_MIN_TRACK_DURATION),
            },
            track_cache_lifetime: value
                .track_cache_ms
                .map(Duration::from_millis)
                .unwrap_or(CURRENT_SONG_CACHE_LIFETIME),
            recent_tracks: value
                .recent_tracks
                .filter(|count| *count > 0)
                .unwrap_or(RECENT_TRACKS_CAPACITY),
            now_playing_poll_interval: value
                .now_playing_poll_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            event_capacity: value
                .event_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(DEFAULT_EVENT_CAPACITY),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game_rules() {
        let config = AppConfig::default();
        assert_eq!(config.clue_timing().delay, Duration::from_secs(30));
        assert_eq!(config.clue_timing().min_track_duration, Duration::from_secs(30));
        assert_eq!(config.track_cache_lifetime(), Duration::from_millis(5_000));
        assert_eq!(config.recent_tracks(), 3);
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let raw: RawConfig =
            serde_json::from_str(r#"{ "clue_delay_secs": 45, "recent_tracks": 0 }"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.clue_timing().delay, Duration::from_secs(45));
        assert_eq!(config.clue_timing().min_track_duration, Duration::from_secs(30));
        assert_eq!(config.recent_tracks(), 3);
        assert_eq!(config.now_playing_poll_interval(), Duration::from_secs(5));
    }
}
