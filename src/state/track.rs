use std::time::Duration;

use indexmap::IndexSet;
use tokio::sync::Mutex;

use crate::{
    player::NowPlaying,
    services::{fuzzy, normalize},
};

/// Escaped and plain forms of the marker that introduces a guess message.
const GUESS_MARKERS: [&str; 2] = ["&gt;", ">"];
/// A guess is "artist - title" or a single field, never more.
const MAX_FRAGMENTS: usize = 2;

/// Outcome of matching one field of one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// This guess identified the field.
    Correct,
    /// The field is still open and this guess did not identify it.
    Incorrect,
    /// The field had been identified before this guess.
    AlreadyGuessed,
}

/// Per-field verdicts for a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    /// Verdict on the artist.
    pub artist: Verdict,
    /// Verdict on the title.
    pub title: Verdict,
}

impl VerificationResult {
    /// Result returned for every guess once the track is fully identified.
    pub const ALREADY_GUESSED: Self = Self {
        artist: Verdict::AlreadyGuessed,
        title: Verdict::AlreadyGuessed,
    };
}

/// Which fields of a track have been identified so far.
///
/// Flags only ever move from `false` to `true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuessProgress {
    /// The artist has been identified.
    pub artist_guessed: bool,
    /// The title has been identified.
    pub title_guessed: bool,
}

impl GuessProgress {
    /// Both fields identified: every further guess is a no-op.
    pub fn is_complete(&self) -> bool {
        self.artist_guessed && self.title_guessed
    }

    /// Evaluate `raw_guess` against the comparable forms, recording newly identified fields.
    ///
    /// The artist is checked first; a fragment that identifies the artist is
    /// no longer available for the title.
    pub fn apply_guess(
        &mut self,
        artists: &IndexSet<String>,
        titles: &IndexSet<String>,
        raw_guess: &str,
    ) -> VerificationResult {
        if self.is_complete() {
            return VerificationResult::ALREADY_GUESSED;
        }

        let mut fragments = guess_fragments(raw_guess);
        let artist = check_field(&mut self.artist_guessed, artists, &mut fragments);
        let title = check_field(&mut self.title_guessed, titles, &mut fragments);

        VerificationResult { artist, title }
    }
}

fn check_field(
    guessed: &mut bool,
    forms: &IndexSet<String>,
    fragments: &mut Vec<String>,
) -> Verdict {
    if *guessed {
        return Verdict::AlreadyGuessed;
    }

    match fragments
        .iter()
        .position(|fragment| fuzzy::matches_any(forms, fragment))
    {
        Some(index) => {
            fragments.remove(index);
            *guessed = true;
            Verdict::Correct
        }
        None => Verdict::Incorrect,
    }
}

/// Split a raw guess into at most two normalized, non-empty fragments.
pub fn guess_fragments(raw_guess: &str) -> Vec<String> {
    let trimmed = raw_guess.trim_start();
    let text = GUESS_MARKERS
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
        .unwrap_or(trimmed);

    text.split('-')
        .map(normalize::comparable)
        .filter(|fragment| !fragment.is_empty())
        .take(MAX_FRAGMENTS)
        .collect()
}

/// One identified recording, shared by every game while it stays recent.
#[derive(Debug)]
pub struct Track {
    /// Stable identifier reported by the player.
    pub id: String,
    /// Artist as displayed by the player.
    pub artist: String,
    /// Title as displayed by the player.
    pub title: String,
    /// Album, when known.
    pub album: Option<String>,
    /// Track length.
    pub duration: Duration,
    comparable_artists: IndexSet<String>,
    comparable_titles: IndexSet<String>,
    progress: Mutex<GuessProgress>,
}

impl Track {
    /// Build a fresh, unguessed track from the player's payload.
    pub fn new(now_playing: NowPlaying) -> Self {
        let duration = now_playing.duration();
        let NowPlaying {
            id,
            artist,
            title,
            album,
            ..
        } = now_playing;

        Self {
            comparable_artists: normalize::comparable_artists(&artist),
            comparable_titles: normalize::comparable_titles(&title),
            id,
            artist,
            title,
            album,
            duration,
            progress: Mutex::new(GuessProgress::default()),
        }
    }

    /// Canonical forms accepted for the artist.
    pub fn comparable_artists(&self) -> &IndexSet<String> {
        &self.comparable_artists
    }

    /// Canonical forms accepted for the title.
    pub fn comparable_titles(&self) -> &IndexSet<String> {
        &self.comparable_titles
    }

    /// Snapshot of the guessed flags.
    pub async fn progress(&self) -> GuessProgress {
        *self.progress.lock().await
    }

    /// Whether both artist and title have been identified.
    pub async fn is_fully_guessed(&self) -> bool {
        self.progress().await.is_complete()
    }

    /// Evaluate a guess and record whatever it identified.
    pub async fn verify_guess(&self, raw_guess: &str) -> VerificationResult {
        let mut progress = self.progress.lock().await;
        progress.apply_guess(&self.comparable_artists, &self.comparable_titles, raw_guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::testing::{hey_jude, track};

    use Verdict::*;

    #[test]
    fn fragments_strip_marker_split_and_cap() {
        assert_eq!(
            guess_fragments(">The Beatles - Hey Jude"),
            vec!["the beatles", "hey jude"]
        );
        assert_eq!(guess_fragments("&gt;beatles"), vec!["beatles"]);
        assert_eq!(guess_fragments(" > a - b - c"), vec!["a", "b"]);
        assert_eq!(guess_fragments("> - -  - hey jude"), vec!["hey jude"]);
        assert!(guess_fragments(">").is_empty());
    }

    #[tokio::test]
    async fn both_fields_in_one_guess() {
        let track = Track::new(hey_jude());
        let result = track.verify_guess(">the beatles - hey jude").await;
        assert_eq!(result, VerificationResult { artist: Correct, title: Correct });
        assert!(track.is_fully_guessed().await);
    }

    #[tokio::test]
    async fn title_first_order_is_accepted() {
        let track = Track::new(hey_jude());
        let result = track.verify_guess(">Hey Jude - Beatles").await;
        assert_eq!(result, VerificationResult { artist: Correct, title: Correct });
    }

    #[tokio::test]
    async fn fully_guessed_track_ignores_any_text() {
        let track = Track::new(hey_jude());
        track.verify_guess(">beatles - hey jude").await;

        for text in [">beatles - hey jude", "", ">zzz", "the beatles"] {
            assert_eq!(track.verify_guess(text).await, VerificationResult::ALREADY_GUESSED);
        }
    }

    #[tokio::test]
    async fn wrong_single_fragment_with_title_known() {
        let track = Track::new(hey_jude());
        assert_eq!(
            track.verify_guess(">hey jude").await,
            VerificationResult { artist: Incorrect, title: Correct }
        );
        assert_eq!(
            track.verify_guess(">rolling stones").await,
            VerificationResult { artist: Incorrect, title: AlreadyGuessed }
        );
    }

    #[tokio::test]
    async fn wrong_single_fragment_on_fresh_track() {
        let track = Track::new(hey_jude());
        assert_eq!(
            track.verify_guess(">rolling stones").await,
            VerificationResult { artist: Incorrect, title: Incorrect }
        );
        assert_eq!(track.progress().await, GuessProgress::default());
    }

    #[tokio::test]
    async fn one_fragment_cannot_satisfy_both_fields() {
        // artist and title are the same string
        let track = Track::new(track("t1", "Weezer", "Weezer", 200));
        assert_eq!(
            track.verify_guess(">weezer").await,
            VerificationResult { artist: Correct, title: Incorrect }
        );
        assert_eq!(
            track.verify_guess(">weezer").await,
            VerificationResult { artist: AlreadyGuessed, title: Correct }
        );
    }

    #[tokio::test]
    async fn flags_never_revert() {
        let track = Track::new(hey_jude());
        track.verify_guess(">beatles").await;
        for text in [">nope", ">", ">abc - def", ">hey jude"] {
            track.verify_guess(text).await;
            assert!(track.progress().await.artist_guessed);
        }
        assert!(track.is_fully_guessed().await);
    }

    #[tokio::test]
    async fn third_fragment_is_ignored() {
        let track = Track::new(hey_jude());
        assert_eq!(
            track.verify_guess(">abba - queen - hey jude").await,
            VerificationResult { artist: Incorrect, title: Incorrect }
        );
    }

    #[test]
    fn progress_state_machine_is_terminal_when_complete() {
        let mut progress = GuessProgress {
            artist_guessed: true,
            title_guessed: true,
        };
        let track = Track::new(hey_jude());
        let result = progress.apply_guess(
            track.comparable_artists(),
            track.comparable_titles(),
            ">the beatles - hey jude",
        );
        assert_eq!(result, VerificationResult::ALREADY_GUESSED);
    }
}
