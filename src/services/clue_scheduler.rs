//! Delayed, partially redacted reveal of the current track.

use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time::sleep};
use tracing::{debug, info, warn};

use crate::{
    services::{notifier::Notifier, track_resolver::TrackResolver},
    state::track::{GuessProgress, Track},
};

/// Delay between a new track starting and its clue being revealed.
pub const CLUE_DELAY: Duration = Duration::from_secs(30);
/// Tracks this short or shorter never get a clue.
pub const CLUE_MIN_TRACK_DURATION: Duration = Duration::from_secs(30);

/// When clues fire, and for which tracks.
#[derive(Debug, Clone, Copy)]
pub struct ClueTiming {
    /// Delay before the clue is revealed.
    pub delay: Duration,
    /// Minimum track length (exclusive) for a clue to be scheduled.
    pub min_track_duration: Duration,
}

impl Default for ClueTiming {
    fn default() -> Self {
        Self {
            delay: CLUE_DELAY,
            min_track_duration: CLUE_MIN_TRACK_DURATION,
        }
    }
}

struct PendingClue {
    track_id: String,
    handle: JoinHandle<()>,
}

/// Owns the single clue timer of one game.
pub struct ClueScheduler {
    channel: String,
    timing: ClueTiming,
    notifier: Arc<dyn Notifier>,
    resolver: Arc<TrackResolver>,
    pending: Mutex<Option<PendingClue>>,
}

impl ClueScheduler {
    /// Scheduler posting clues to `channel`.
    pub fn new(
        channel: String,
        timing: ClueTiming,
        notifier: Arc<dyn Notifier>,
        resolver: Arc<TrackResolver>,
    ) -> Self {
        Self {
            channel,
            timing,
            notifier,
            resolver,
            pending: Mutex::new(None),
        }
    }

    /// Start the clue timer for `track`, replacing any timer still pending.
    ///
    /// Returns `false` when the track is too short for a clue; the previous
    /// timer is dropped either way.
    pub async fn schedule(&self, track: Arc<Track>) -> bool {
        if track.duration <= self.timing.min_track_duration {
            debug!(channel = %self.channel, id = %track.id, "track too short for a clue");
            self.cancel().await;
            return false;
        }

        let track_id = track.id.clone();
        let channel = self.channel.clone();
        let notifier = self.notifier.clone();
        let resolver = self.resolver.clone();
        let delay = self.timing.delay;
        let handle = tokio::spawn(async move {
            sleep(delay).await;
            reveal_clue(&channel, &track, &resolver, notifier.as_ref()).await;
        });

        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.replace(PendingClue { track_id, handle }) {
            previous.handle.abort();
        }
        true
    }

    /// Cancel the pending clue if it belongs to `track_id`. No-op otherwise.
    pub async fn cancel_for(&self, track_id: &str) {
        let mut pending = self.pending.lock().await;
        if pending
            .as_ref()
            .is_some_and(|clue| clue.track_id == track_id)
        {
            if let Some(clue) = pending.take() {
                debug!(channel = %self.channel, id = %track_id, "clue cancelled");
                clue.handle.abort();
            }
        }
    }

    /// Cancel whatever clue is pending.
    pub async fn cancel(&self) {
        if let Some(clue) = self.pending.lock().await.take() {
            clue.handle.abort();
        }
    }
}

impl Drop for ClueScheduler {
    fn drop(&mut self) {
        if let Some(clue) = self.pending.get_mut().take() {
            clue.handle.abort();
        }
    }
}

async fn reveal_clue(
    channel: &str,
    track: &Track,
    resolver: &TrackResolver,
    notifier: &dyn Notifier,
) {
    match resolver.current_track().await {
        Ok(current) if current.id == track.id => {}
        Ok(current) => {
            debug!(%channel, id = %track.id, current = %current.id, "track no longer playing; clue dropped");
            return;
        }
        Err(err) => {
            warn!(%channel, id = %track.id, error = %err, "could not confirm current track; clue dropped");
            return;
        }
    }

    let progress = track.progress().await;
    if progress.is_complete() {
        debug!(%channel, id = %track.id, "track identified before its clue");
        return;
    }

    let text = clue_text(track, progress);
    info!(%channel, id = %track.id, clue = %text, "revealing clue");
    notifier.announce(channel, &text);
}

/// `"<artist> - <title>"` with every field not yet guessed redacted.
pub fn clue_text(track: &Track, progress: GuessProgress) -> String {
    let artist = if progress.artist_guessed {
        track.artist.clone()
    } else {
        redact(&track.artist)
    };
    let title = if progress.title_guessed {
        track.title.clone()
    } else {
        redact(&track.title)
    };
    format!("{artist} - {title}")
}

/// Keep the first character of each whitespace-separated word, blank out the rest.
pub fn redact(text: &str) -> String {
    let mut word_start = true;
    text.chars()
        .map(|c| {
            if c.is_whitespace() {
                word_start = true;
                c
            } else if word_start {
                word_start = false;
                c
            } else {
                '_'
            }
        })
        .collect()
}
