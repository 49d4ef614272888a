//! Background loop keeping the current track fresh while games are running.
//!
//! Without it a song change only surfaces when somebody guesses, so clue
//! timers for quiet channels would never start.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::{player::error::PlayerError, state::SharedState};

/// Poll the player every configured interval while at least one game is active.
pub async fn run(state: SharedState) {
    let period = state.config().now_playing_poll_interval();
    info!(?period, "now-playing watcher started");
    watch(state, period).await;
}

async fn watch(state: SharedState, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut failing = false;

    loop {
        ticker.tick().await;
        if state.games().is_empty() {
            continue;
        }

        match state.resolver().current_track().await {
            Ok(track) => {
                if failing {
                    info!(track = %track.id, "player reachable again");
                    failing = false;
                }
            }
            Err(PlayerError::NothingPlaying) => debug!("nothing playing"),
            Err(err) => {
                // Log the first failure of a streak at warn, the rest at debug.
                if failing {
                    debug!(error = %err, "player still unavailable");
                } else {
                    warn!(error = %err, "now-playing poll failed; retrying next tick");
                    failing = true;
                }
            }
        }
    }
}
