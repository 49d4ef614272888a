use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{dto::validation::validate_not_blank, services::scoring::Standing};

/// Guess posted by a player in a channel.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitGuessRequest {
    /// Player who sent the guess.
    #[validate(custom(function = "validate_not_blank"))]
    pub player: String,
    /// Raw message text, prefix marker included.
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    /// Platform identifier of the message; generated when omitted.
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Acknowledgement for a submitted guess.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessReceipt {
    /// Whether the guess joined a running game's queue.
    pub queued: bool,
    /// Identifier the outcome event will refer to.
    pub message_id: String,
}

/// Text a chat front-end should post back to the channel, if any.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandReply {
    /// Reply text; absent when the command warrants no answer.
    pub reply: Option<String>,
}

impl CommandReply {
    /// Reply with `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
        }
    }
}

impl From<Option<String>> for CommandReply {
    fn from(reply: Option<String>) -> Self {
        Self { reply }
    }
}

/// Public view of one standings line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandingDto {
    /// 1-based rank; tied players share it.
    pub rank: usize,
    /// Total points.
    pub score: u32,
    /// Player identifier.
    pub player: String,
}

impl From<Standing> for StandingDto {
    fn from(standing: Standing) -> Self {
        Self {
            rank: standing.rank,
            score: standing.score,
            player: standing.player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_player_is_rejected() {
        let request: SubmitGuessRequest =
            serde_json::from_str(r#"{ "player": "  ", "text": ">queen" }"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn message_id_is_optional() {
        let request: SubmitGuessRequest =
            serde_json::from_str(r#"{ "player": "ana", "text": ">queen" }"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.message_id, None);
    }

    #[test]
    fn missing_reply_serializes_as_null() {
        let json = serde_json::to_value(CommandReply::from(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "reply": null }));
    }
}
