use dashmap::mapref::entry::Entry;
use tracing::info;
use uuid::Uuid;

use crate::{
    dto::game::{GuessReceipt, SubmitGuessRequest},
    error::ServiceError,
    services::{
        guess_queue::Guess,
        notifier::MessageRef,
        scoring::{Scoreboard, format_standings, join_names},
        sse_events,
    },
    state::{SharedState, game::Game},
};

/// How to play, in chat-ready form.
pub const HELP_TEXT: &str = "*_Can you name the track that is playing faster than your mates?_*
Every song has points up for grabs: 1 for being first to name the *_artist_*, 1 for the *_title_*, and 3 if you get both in a single guess.
Start a message with \">\" to make a guess. Guess the artist or the title on its own, or both separated by a \"-\", e.g. _>queen - bohemian rhapsody_.
Stuck? Half a minute into a song I'll drop a clue.

Your guesses get marked:
 - artist_correct: you named the *_artist_*
 - title_correct: you named the *_title_*
 - both_correct: you nailed both at once
 - incorrect: it was all wrong
 - no mark: someone else got there first

Say *_start game_* to begin, *_scores_* to see how everyone is doing and *_end game_* to crown the winner.
Have fun!";

const GAME_STARTED: &str = "A new game has begun! May the most musically-knowledgeable win!";
const GAME_ALREADY_RUNNING: &str = "There is already a game in progress on this channel!\nEnd the other game before starting a new one by saying \"end game\".";
const NO_GAME_YET: &str = "You haven't started a game yet!\nUse \"start game\" or something along those lines to begin.";
const NO_SCORES_YET: &str = "Noone has scored anything yet!";
const NOBODY_SCORED: &str = "Well that was the most boring game ever, noone scored anything!";

/// Start a game in `channel` unless one is already running there.
pub fn start_game(state: &SharedState, channel: &str) -> Result<String, ServiceError> {
    let channel = normalize_channel(channel)?;
    match state.games().entry(channel.clone()) {
        Entry::Occupied(_) => {
            info!(%channel, "start refused; game already running");
            Ok(GAME_ALREADY_RUNNING.to_string())
        }
        Entry::Vacant(slot) => {
            slot.insert(Game::start(
                channel.clone(),
                state.resolver().clone(),
                state.notifier().clone(),
                state.config().clue_timing(),
            ));
            info!(%channel, "game started");
            sse_events::broadcast_game_started(state.events(), &channel);
            Ok(GAME_STARTED.to_string())
        }
    }
}

/// End the game in `channel`, returning the closing announcement.
///
/// Returns `Ok(None)` when no game was running: ending nothing warrants no reply.
pub async fn end_game(state: &SharedState, channel: &str) -> Result<Option<String>, ServiceError> {
    let channel = normalize_channel(channel)?;
    let Some((_, game)) = state.games().remove(&channel) else {
        return Ok(None);
    };

    game.close().await;
    if state.games().is_empty() {
        // Tracks belong to the games that saw them.
        state.resolver().reset().await;
    }
    let scoreboard = game.scoreboard().await;
    let standings = scoreboard.standings();
    info!(%channel, players = standings.len(), "game ended");
    sse_events::broadcast_game_ended(state.events(), &channel, &standings);

    Ok(Some(closing_text(&scoreboard)))
}

/// Current standings of the game in `channel`, or guidance when none is running.
pub async fn check_scores(state: &SharedState, channel: &str) -> Result<String, ServiceError> {
    let channel = normalize_channel(channel)?;
    let Some(context) = state.games().get(&channel).map(|game| game.context()) else {
        return Ok(NO_GAME_YET.to_string());
    };

    let scoreboard = context.scores().lock().await.clone();
    if scoreboard.is_empty() {
        return Ok(NO_SCORES_YET.to_string());
    }
    Ok(format_standings(&scoreboard.standings()))
}

/// Queue a guess for the game in `channel`.
///
/// Guesses sent while no game is running are acknowledged but not queued.
pub fn submit_guess(
    state: &SharedState,
    channel: &str,
    request: SubmitGuessRequest,
) -> Result<GuessReceipt, ServiceError> {
    let channel = normalize_channel(channel)?;
    let SubmitGuessRequest {
        player,
        text,
        message_id,
    } = request;

    let player = player.trim().to_string();
    if player.is_empty() {
        return Err(ServiceError::InvalidInput(
            "player must not be empty".into(),
        ));
    }

    let message_id = message_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let Some(game) = state.games().get(&channel) else {
        return Ok(GuessReceipt {
            queued: false,
            message_id,
        });
    };

    game.submit(Guess {
        player,
        text,
        message: MessageRef {
            channel,
            id: message_id.clone(),
        },
    })?;

    Ok(GuessReceipt {
        queued: true,
        message_id,
    })
}

fn closing_text(scoreboard: &Scoreboard) -> String {
    if scoreboard.is_empty() {
        return NOBODY_SCORED.to_string();
    }

    let winners = scoreboard.winners();
    let tie = if winners.len() > 1 { "It's a tie!! " } else { "" };
    let plural = if winners.len() > 1 { "s" } else { "" };
    format!(
        "The game is over! {tie}:tada:\nCongratulations to our winner{plural}: {} :trophy:\n\n{}",
        join_names(&winners),
        format_standings(&scoreboard.standings())
    )
}

fn normalize_channel(channel: &str) -> Result<String, ServiceError> {
    let channel = channel.trim();
    if channel.is_empty() {
        return Err(ServiceError::InvalidInput(
            "channel must not be empty".into(),
        ));
    }
    Ok(channel.to_string())
}
