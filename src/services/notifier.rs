//! Outbound notifications towards the chat side.

use serde::Serialize;
use tracing::info;

use crate::{
    services::sse_events,
    state::{
        EventHub,
        track::{Verdict, VerificationResult},
    },
};

/// Identifies the message a guess was submitted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Channel the message was posted in.
    pub channel: String,
    /// Platform identifier of the message.
    pub id: String,
}

/// Per-guess marker shown next to the guess message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    /// The guess identified the artist.
    ArtistCorrect,
    /// The guess identified the title.
    TitleCorrect,
    /// The guess identified both at once.
    BothCorrect,
    /// The guess identified nothing that was still open.
    Incorrect,
}

impl OutcomeTag {
    /// Tag to show for `result`, or `None` when every field was already guessed.
    pub fn from_result(result: &VerificationResult) -> Option<Self> {
        match (result.artist, result.title) {
            (Verdict::Correct, Verdict::Correct) => Some(Self::BothCorrect),
            (Verdict::Correct, _) => Some(Self::ArtistCorrect),
            (_, Verdict::Correct) => Some(Self::TitleCorrect),
            (Verdict::Incorrect, _) | (_, Verdict::Incorrect) => Some(Self::Incorrect),
            _ => None,
        }
    }
}

/// Sink for everything the engine wants to tell players. Calls never block.
pub trait Notifier: Send + Sync {
    /// Post `text` to everyone in `channel`.
    fn announce(&self, channel: &str, text: &str);
    /// Attach an outcome marker to the guess message `message`.
    fn mark_outcome(&self, message: &MessageRef, outcome: OutcomeTag);
}

/// [`Notifier`] publishing onto the SSE event hub.
pub struct HubNotifier {
    hub: EventHub,
}

impl HubNotifier {
    /// Publish through `hub`.
    pub fn new(hub: EventHub) -> Self {
        Self { hub }
    }
}

impl Notifier for HubNotifier {
    fn announce(&self, channel: &str, text: &str) {
        info!(%channel, %text, "announcing");
        sse_events::broadcast_announcement(&self.hub, channel, text);
    }

    fn mark_outcome(&self, message: &MessageRef, outcome: OutcomeTag) {
        info!(channel = %message.channel, message = %message.id, ?outcome, "marking guess outcome");
        sse_events::broadcast_guess_outcome(&self.hub, &message.channel, &message.id, outcome);
    }
}
