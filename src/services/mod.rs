/// Timed clues revealed while a track stays unidentified.
pub mod clue_scheduler;
/// Similarity scoring between guesses and canonical forms.
pub mod fuzzy;
/// Game lifecycle commands: start, end, scores, guesses.
pub mod game_service;
/// Per-game ordered evaluation of guesses.
pub mod guess_queue;
/// Health check service.
pub mod health_service;
/// Canonical comparable forms of artists and titles.
pub mod normalize;
/// Outbound notifications towards the chat side.
pub mod notifier;
/// Background polling of the player while games run.
pub mod now_playing_watcher;
/// Points and standings.
pub mod scoring;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
/// Cached resolution of the currently playing track.
pub mod track_resolver;
