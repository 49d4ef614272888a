use std::sync::Arc;

use tokio::{
    sync::{Mutex, broadcast, broadcast::error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    error::ServiceError,
    services::{
        clue_scheduler::{ClueScheduler, ClueTiming},
        guess_queue::{Guess, GuessQueue},
        notifier::Notifier,
        scoring::Scoreboard,
        track_resolver::TrackResolver,
    },
    state::track::Track,
};

/// Everything the guess worker and the clue listener of one game share.
pub struct GameContext {
    channel: String,
    scores: Mutex<Scoreboard>,
    clues: ClueScheduler,
    resolver: Arc<TrackResolver>,
    notifier: Arc<dyn Notifier>,
}

impl GameContext {
    /// Fresh context with an empty scoreboard and no clue pending.
    pub fn new(
        channel: String,
        resolver: Arc<TrackResolver>,
        notifier: Arc<dyn Notifier>,
        timing: ClueTiming,
    ) -> Self {
        Self {
            clues: ClueScheduler::new(channel.clone(), timing, notifier.clone(), resolver.clone()),
            channel,
            scores: Mutex::new(Scoreboard::default()),
            resolver,
            notifier,
        }
    }

    /// Channel the game runs in.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Running totals. Only the guess worker writes to it.
    pub fn scores(&self) -> &Mutex<Scoreboard> {
        &self.scores
    }

    /// The game's clue timer.
    pub fn clues(&self) -> &ClueScheduler {
        &self.clues
    }

    /// Shared current-track resolver.
    pub fn resolver(&self) -> &TrackResolver {
        &self.resolver
    }

    /// Outbound notification sink.
    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }
}

/// A running game in one channel.
pub struct Game {
    context: Arc<GameContext>,
    queue: GuessQueue,
    clue_listener: JoinHandle<()>,
}

impl Game {
    /// Start a game: spawn its guess worker and subscribe it to new-track signals.
    pub fn start(
        channel: String,
        resolver: Arc<TrackResolver>,
        notifier: Arc<dyn Notifier>,
        timing: ClueTiming,
    ) -> Self {
        let new_tracks = resolver.subscribe();
        let context = Arc::new(GameContext::new(channel, resolver, notifier, timing));
        let queue = GuessQueue::spawn(context.clone());
        let clue_listener = tokio::spawn(listen_for_new_tracks(context.clone(), new_tracks));

        Self {
            context,
            queue,
            clue_listener,
        }
    }

    /// Channel the game runs in.
    pub fn channel(&self) -> &str {
        self.context.channel()
    }

    /// Shared handle on the game's context.
    pub fn context(&self) -> Arc<GameContext> {
        self.context.clone()
    }

    /// Queue a guess for evaluation.
    pub fn submit(&self, guess: Guess) -> Result<(), ServiceError> {
        self.queue.enqueue(guess)
    }

    /// Copy of the current scoreboard.
    pub async fn scoreboard(&self) -> Scoreboard {
        self.context.scores().lock().await.clone()
    }

    /// Stop the worker and listener and drop any pending clue.
    pub async fn close(&self) {
        self.queue.shutdown();
        self.clue_listener.abort();
        self.context.clues().cancel().await;
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.clue_listener.abort();
    }
}

async fn listen_for_new_tracks(
    context: Arc<GameContext>,
    mut new_tracks: broadcast::Receiver<Arc<Track>>,
) {
    loop {
        match new_tracks.recv().await {
            Ok(track) => {
                context.clues().schedule(track).await;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(channel = %context.channel(), skipped, "missed new-track signals");
            }
            Err(RecvError::Closed) => break,
        }
    }
    debug!(channel = %context.channel(), "new-track listener stopped");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        player::testing::{ScriptedPlayer, hey_jude, track},
        services::notifier::{MessageRef, testing::RecordingNotifier},
    };

    fn guess(player: &str, text: &str) -> Guess {
        Guess {
            player: player.into(),
            text: text.into(),
            message: MessageRef {
                channel: "general".into(),
                id: format!("{player}-{text}"),
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn new_track_seen_through_a_guess_schedules_a_clue() {
        let player = Arc::new(ScriptedPlayer::playing(track("jude", "The Beatles", "Hey Jude", 200)));
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = Arc::new(TrackResolver::new(player.clone()));
        let game = Game::start(
            "general".into(),
            resolver,
            notifier.clone(),
            ClueTiming::default(),
        );

        game.submit(guess("ana", ">beatles")).unwrap();
        tokio::time::sleep(Duration::from_secs(31)).await;

        assert_eq!(
            notifier.announcements(),
            vec![("general".to_string(), "The Beatles - H__ J___".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_identification_cancels_the_clue() {
        let player = Arc::new(ScriptedPlayer::playing(hey_jude()));
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = Arc::new(TrackResolver::new(player.clone()));
        let game = Game::start(
            "general".into(),
            resolver,
            notifier.clone(),
            ClueTiming::default(),
        );

        game.submit(guess("ana", ">the beatles - hey jude")).unwrap();
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(notifier.announcements().is_empty());
        assert_eq!(game.scoreboard().await.score_of("ana"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn closed_game_stops_its_clue() {
        let player = Arc::new(ScriptedPlayer::playing(hey_jude()));
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = Arc::new(TrackResolver::new(player.clone()));
        let game = Game::start(
            "general".into(),
            resolver.clone(),
            notifier.clone(),
            ClueTiming::default(),
        );

        resolver.current_track().await.unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        game.close().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert!(notifier.announcements().is_empty());
    }
}
