use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::StandingDto,
        sse::{
            AnnouncementEvent, GameEndedEvent, GameStartedEvent, GuessOutcomeEvent, ServerEvent,
        },
    },
    services::{notifier::OutcomeTag, scoring::Standing},
    state::EventHub,
};

const EVENT_ANNOUNCEMENT: &str = "announcement";
const EVENT_GUESS_OUTCOME: &str = "guess.outcome";
const EVENT_GAME_STARTED: &str = "game.started";
const EVENT_GAME_ENDED: &str = "game.ended";

/// Broadcast free text addressed to a channel.
pub fn broadcast_announcement(hub: &EventHub, channel: &str, text: &str) {
    let payload = AnnouncementEvent {
        channel: channel.to_string(),
        text: text.to_string(),
    };
    send_event(hub, EVENT_ANNOUNCEMENT, &payload);
}

/// Broadcast the outcome of a processed guess.
pub fn broadcast_guess_outcome(hub: &EventHub, channel: &str, message_id: &str, outcome: OutcomeTag) {
    let payload = GuessOutcomeEvent {
        channel: channel.to_string(),
        message_id: message_id.to_string(),
        outcome,
    };
    send_event(hub, EVENT_GUESS_OUTCOME, &payload);
}

/// Broadcast that a game started in `channel`.
pub fn broadcast_game_started(hub: &EventHub, channel: &str) {
    let payload = GameStartedEvent {
        channel: channel.to_string(),
    };
    send_event(hub, EVENT_GAME_STARTED, &payload);
}

/// Broadcast the final standings of a game that just ended.
pub fn broadcast_game_ended(hub: &EventHub, channel: &str, standings: &[Standing]) {
    let payload = GameEndedEvent {
        channel: channel.to_string(),
        standings: standings.iter().cloned().map(StandingDto::from).collect(),
    };
    send_event(hub, EVENT_GAME_ENDED, &payload);
}

fn send_event(hub: &EventHub, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
