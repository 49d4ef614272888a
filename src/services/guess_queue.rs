//! Strictly ordered, one-at-a-time evaluation of the guesses of one game.
//!
//! Submissions are pushed onto an unbounded channel and return at once. A
//! single worker task drains it head first; it resolves the current track,
//! runs the guess state machine and updates the scoreboard before taking the
//! next guess, so two near-simultaneous correct guesses can never both be
//! credited for the same field.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::ServiceError,
    services::{
        notifier::{MessageRef, OutcomeTag},
        scoring,
    },
    state::game::GameContext,
};

/// A guess waiting to be evaluated.
#[derive(Debug, Clone)]
pub struct Guess {
    /// Player who sent the guess.
    pub player: String,
    /// Message text as typed, marker included.
    pub text: String,
    /// Message the outcome marker is attached to.
    pub message: MessageRef,
}

/// Handle on the backlog and worker of one game.
pub struct GuessQueue {
    tx: mpsc::UnboundedSender<Guess>,
    worker: JoinHandle<()>,
}

impl GuessQueue {
    /// Spawn the worker for `context`.
    pub fn spawn(context: Arc<GameContext>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(context, rx));
        Self { tx, worker }
    }

    /// Append a guess to the backlog without waiting for it to be evaluated.
    pub fn enqueue(&self, guess: Guess) -> Result<(), ServiceError> {
        self.tx.send(guess).map_err(|_| ServiceError::QueueClosed)
    }

    /// Stop the worker, discarding anything still queued.
    pub fn shutdown(&self) {
        self.worker.abort();
    }
}

impl Drop for GuessQueue {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn run_worker(context: Arc<GameContext>, mut rx: mpsc::UnboundedReceiver<Guess>) {
    while let Some(guess) = rx.recv().await {
        process_guess(&context, guess).await;
    }
    debug!(channel = %context.channel(), "guess queue closed");
}

/// Evaluate one guess end to end. Player failures drop the guess.
async fn process_guess(context: &GameContext, guess: Guess) {
    let track = match context.resolver().current_track().await {
        Ok(track) => track,
        Err(err) => {
            warn!(
                channel = %context.channel(),
                player = %guess.player,
                error = %err,
                "could not detect current track; dropping guess"
            );
            return;
        }
    };

    // Held across verification so the fields a guess takes and the points it
    // earns land together, even if the worker is aborted mid-guess.
    let mut scores = context.scores().lock().await;
    let result = track.verify_guess(&guess.text).await;
    let points = scoring::points_for(&result);
    let total = scores.record(&guess.player, points);
    drop(scores);

    info!(
        channel = %context.channel(),
        player = %guess.player,
        track = %track.id,
        ?result,
        points,
        total,
        "guess evaluated"
    );

    if track.is_fully_guessed().await {
        context.clues().cancel_for(&track.id).await;
    }

    if let Some(outcome) = OutcomeTag::from_result(&result) {
        context.notifier().mark_outcome(&guess.message, outcome);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        player::testing::{ScriptedPlayer, hey_jude},
        services::{
            clue_scheduler::ClueTiming, notifier::testing::RecordingNotifier,
            track_resolver::TrackResolver,
        },
    };

    struct Fixture {
        player: Arc<ScriptedPlayer>,
        notifier: Arc<RecordingNotifier>,
        context: Arc<GameContext>,
        queue: GuessQueue,
    }

    fn fixture(player: ScriptedPlayer) -> Fixture {
        let player = Arc::new(player);
        let notifier = Arc::new(RecordingNotifier::default());
        let resolver = Arc::new(TrackResolver::new(player.clone()));
        let context = Arc::new(GameContext::new(
            "general".into(),
            resolver,
            notifier.clone(),
            ClueTiming::default(),
        ));
        let queue = GuessQueue::spawn(context.clone());
        Fixture {
            player,
            notifier,
            context,
            queue,
        }
    }

    fn guess(player: &str, text: &str, id: &str) -> Guess {
        Guess {
            player: player.into(),
            text: text.into(),
            message: MessageRef {
                channel: "general".into(),
                id: id.into(),
            },
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn first_correct_guess_wins_the_field() {
        let f = fixture(ScriptedPlayer::playing(hey_jude()));

        f.queue.enqueue(guess("ana", ">beatles", "m1")).unwrap();
        f.queue.enqueue(guess("bo", ">the beatles", "m2")).unwrap();
        settle().await;

        let scores = f.context.scores().lock().await.clone();
        assert_eq!(scores.score_of("ana"), Some(1));
        assert_eq!(scores.score_of("bo"), Some(0));
        assert_eq!(
            f.notifier.outcomes(),
            vec![
                ("m1".to_string(), OutcomeTag::ArtistCorrect),
                ("m2".to_string(), OutcomeTag::Incorrect),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn full_answer_earns_three_points_once() {
        let f = fixture(ScriptedPlayer::playing(hey_jude()));

        f.queue
            .enqueue(guess("ana", ">the beatles - hey jude", "m1"))
            .unwrap();
        f.queue
            .enqueue(guess("ana", ">the beatles - hey jude", "m2"))
            .unwrap();
        settle().await;

        assert_eq!(f.context.scores().lock().await.score_of("ana"), Some(3));
        // the repeat is already guessed on both fields, so it gets no marker
        assert_eq!(
            f.notifier.outcomes(),
            vec![("m1".to_string(), OutcomeTag::BothCorrect)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unavailable_player_drops_guess_and_keeps_going() {
        let f = fixture(ScriptedPlayer::default());

        f.queue.enqueue(guess("ana", ">beatles", "m1")).unwrap();
        settle().await;
        assert!(f.context.scores().lock().await.is_empty());

        f.player.set(hey_jude());
        f.queue.enqueue(guess("bo", ">hey jude", "m2")).unwrap();
        settle().await;

        let scores = f.context.scores().lock().await.clone();
        assert_eq!(scores.score_of("ana"), None);
        assert_eq!(scores.score_of("bo"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn guesses_wait_for_a_slow_player_in_order() {
        let f = fixture(
            ScriptedPlayer::playing(hey_jude()).with_latency(Duration::from_secs(2)),
        );

        for (player, id) in [("ana", "m1"), ("bo", "m2"), ("cy", "m3")] {
            f.queue.enqueue(guess(player, ">hey jude", id)).unwrap();
        }
        tokio::time::sleep(Duration::from_secs(3)).await;

        let scores = f.context.scores().lock().await.clone();
        assert_eq!(scores.score_of("ana"), Some(1));
        assert_eq!(scores.score_of("bo"), Some(0));
        assert_eq!(scores.score_of("cy"), Some(0));
        assert_eq!(f.player.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_during_a_busy_scoreboard_leaves_the_track_open() {
        let f = fixture(ScriptedPlayer::playing(hey_jude()));
        let busy = f.context.scores().lock().await;

        f.queue
            .enqueue(guess("ana", ">the beatles - hey jude", "m1"))
            .unwrap();
        settle().await;
        f.queue.shutdown();
        drop(busy);
        settle().await;

        let track = f.context.resolver().current_track().await.unwrap();
        assert!(!track.is_fully_guessed().await);
        assert_eq!(f.context.scores().lock().await.score_of("ana"), None);
        assert!(f.notifier.outcomes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shut_down_queue_rejects_guesses() {
        let f = fixture(ScriptedPlayer::playing(hey_jude()));
        f.queue.shutdown();
        settle().await;

        assert!(matches!(
            f.queue.enqueue(guess("ana", ">beatles", "m1")),
            Err(ServiceError::QueueClosed)
        ));
    }
}
