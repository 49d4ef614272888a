use serde::Serialize;

use crate::{dto::game::StandingDto, services::notifier::OutcomeTag};

#[derive(Clone, Debug)]
/// Dispatched payload carried across the SSE channel.
pub struct ServerEvent {
    /// SSE `event:` name, if any.
    pub event: Option<String>,
    /// Encoded `data:` field.
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already-encoded data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize)]
/// Text addressed to everyone in a channel (clues, notices).
pub struct AnnouncementEvent {
    pub channel: String,
    pub text: String,
}

#[derive(Debug, Serialize)]
/// Marks how a single guess message fared.
pub struct GuessOutcomeEvent {
    pub channel: String,
    pub message_id: String,
    pub outcome: OutcomeTag,
}

#[derive(Debug, Serialize)]
/// Emitted when a game starts in a channel.
pub struct GameStartedEvent {
    pub channel: String,
}

#[derive(Debug, Serialize)]
/// Emitted when a game ends, carrying the final standings.
pub struct GameEndedEvent {
    pub channel: String,
    pub standings: Vec<StandingDto>,
}
