//! Resolves "what is playing right now" into a shared [`Track`].
//!
//! The last answer is cached for a short lifetime so rapid-fire guessing does
//! not hammer the player, and the last few tracks are remembered so a track
//! that briefly stops being current keeps the guesses already earned on it.
//! Resolution runs under a single lock: concurrent callers wait for the
//! in-flight query and then read its cached answer.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, broadcast},
    time::Instant,
};
use tracing::{debug, info};

use crate::{
    player::{PlayerClient, PlayerResult},
    state::track::Track,
};

/// How long a resolved track is served without asking the player again.
pub const CURRENT_SONG_CACHE_LIFETIME: Duration = Duration::from_millis(5_000);
/// How many recently seen tracks keep their guess progress.
pub const RECENT_TRACKS_CAPACITY: usize = 3;
const NEW_TRACK_CHANNEL_CAPACITY: usize = 16;

struct CachedTrack {
    track: Arc<Track>,
    resolved_at: Instant,
}

#[derive(Default)]
struct ResolverState {
    current: Option<CachedTrack>,
    /// Most recent first.
    recent: VecDeque<Arc<Track>>,
}

/// Process-wide resolver shared by every game.
pub struct TrackResolver {
    player: Arc<dyn PlayerClient>,
    cache_lifetime: Duration,
    recent_capacity: usize,
    state: Mutex<ResolverState>,
    new_tracks: broadcast::Sender<Arc<Track>>,
}

impl TrackResolver {
    /// Resolver with the default cache lifetime and recency capacity.
    pub fn new(player: Arc<dyn PlayerClient>) -> Self {
        Self::with_settings(player, CURRENT_SONG_CACHE_LIFETIME, RECENT_TRACKS_CAPACITY)
    }

    /// Resolver with explicit cache lifetime and recency capacity.
    pub fn with_settings(
        player: Arc<dyn PlayerClient>,
        cache_lifetime: Duration,
        recent_capacity: usize,
    ) -> Self {
        let (new_tracks, _receiver) = broadcast::channel(NEW_TRACK_CHANNEL_CAPACITY);
        Self {
            player,
            cache_lifetime,
            recent_capacity: recent_capacity.max(1),
            state: Mutex::new(ResolverState::default()),
            new_tracks,
        }
    }

    /// Receive every track the resolver sees for the first time.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Track>> {
        self.new_tracks.subscribe()
    }

    /// Forget the cached and recent tracks along with their guess progress.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.current = None;
        state.recent.clear();
        info!("track history cleared");
    }

    /// Return the track currently playing, from cache while it is fresh.
    pub async fn current_track(&self) -> PlayerResult<Arc<Track>> {
        let mut state = self.state.lock().await;

        if let Some(cached) = &state.current {
            if cached.resolved_at.elapsed() < self.cache_lifetime {
                debug!(id = %cached.track.id, "current track served from cache");
                return Ok(cached.track.clone());
            }
        }

        let now_playing = self.player.now_playing().await?;

        let existing = state
            .recent
            .iter()
            .find(|track| track.id == now_playing.id)
            .cloned();

        let track = match existing {
            Some(track) => {
                debug!(id = %track.id, "current track is a recent one");
                track
            }
            None => {
                let track = Arc::new(Track::new(now_playing));
                state.recent.push_front(track.clone());
                state.recent.truncate(self.recent_capacity);
                info!(id = %track.id, artist = %track.artist, title = %track.title, "new track detected");
                let _ = self.new_tracks.send(track.clone());
                track
            }
        };

        state.current = Some(CachedTrack {
            track: track.clone(),
            resolved_at: Instant::now(),
        });

        Ok(track)
    }
}
