//! Points awarded per guess and the per-game scoreboard.

use indexmap::IndexMap;

use crate::state::track::{Verdict, VerificationResult};

/// Points for being first to identify a single field.
pub const FIELD_POINTS: u32 = 1;
/// Points for identifying both fields in the same guess.
pub const BOTH_FIELDS_POINTS: u32 = 3;

/// Point delta earned by a single guess.
pub fn points_for(result: &VerificationResult) -> u32 {
    match (result.artist, result.title) {
        (Verdict::Correct, Verdict::Correct) => BOTH_FIELDS_POINTS,
        (Verdict::Correct, _) | (_, Verdict::Correct) => FIELD_POINTS,
        _ => 0,
    }
}

/// One line of the standings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// 1-based rank; tied players share it.
    pub rank: usize,
    /// Total points.
    pub score: u32,
    /// Player identifier.
    pub player: String,
}

/// Running totals for one game, in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    scores: IndexMap<String, u32>,
}

impl Scoreboard {
    /// Add `points` to the player's total, registering the player if needed.
    pub fn record(&mut self, player: &str, points: u32) -> u32 {
        let total = self.scores.entry(player.to_string()).or_insert(0);
        *total += points;
        *total
    }

    /// Current total of `player`, if they have guessed at all.
    pub fn score_of(&self, player: &str) -> Option<u32> {
        self.scores.get(player).copied()
    }

    /// Whether nobody has guessed yet.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Players ranked by descending score; equal scores share a rank and the
    /// next distinct score resumes at its position (5, 5, 3 rank as 1, 1, 3).
    pub fn standings(&self) -> Vec<Standing> {
        let mut sorted: Vec<(&String, &u32)> = self.scores.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1));

        let mut standings: Vec<Standing> = Vec::with_capacity(sorted.len());
        for (index, (player, score)) in sorted.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(previous) if previous.score == *score => previous.rank,
                _ => index + 1,
            };
            standings.push(Standing {
                rank,
                score: *score,
                player: player.clone(),
            });
        }
        standings
    }

    /// Every player holding the top score.
    pub fn winners(&self) -> Vec<String> {
        self.standings()
            .into_iter()
            .take_while(|standing| standing.rank == 1)
            .map(|standing| standing.player)
            .collect()
    }
}

/// Render standings one line per player: `"<rank>. <score>pt(s) - <player>"`.
pub fn format_standings(standings: &[Standing]) -> String {
    standings
        .iter()
        .map(|standing| {
            let unit = if standing.score == 1 { "pt" } else { "pts" };
            format!(
                "{}. {}{} - {}",
                standing.rank, standing.score, unit, standing.player
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Join names as English prose: "a", "a and b", "a, b and c".
pub fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Verdict::*;

    fn result(artist: Verdict, title: Verdict) -> VerificationResult {
        VerificationResult { artist, title }
    }

    #[test]
    fn single_field_is_worth_one_point() {
        assert_eq!(points_for(&result(Correct, Incorrect)), 1);
        assert_eq!(points_for(&result(AlreadyGuessed, Correct)), 1);
        assert_eq!(points_for(&result(Correct, AlreadyGuessed)), 1);
    }

    #[test]
    fn both_fields_at_once_earn_the_bonus() {
        assert_eq!(points_for(&result(Correct, Correct)), 3);
    }

    #[test]
    fn nothing_new_is_worth_nothing() {
        assert_eq!(points_for(&result(Incorrect, Incorrect)), 0);
        assert_eq!(points_for(&result(AlreadyGuessed, Incorrect)), 0);
        assert_eq!(points_for(&VerificationResult::ALREADY_GUESSED), 0);
    }

    #[test]
    fn record_accumulates_and_registers_zero_scores() {
        let mut board = Scoreboard::default();
        assert_eq!(board.record("ana", 1), 1);
        assert_eq!(board.record("ana", 3), 4);
        assert_eq!(board.record("bo", 0), 0);
        assert_eq!(board.score_of("bo"), Some(0));
        assert_eq!(board.score_of("cy"), None);
    }

    #[test]
    fn tied_scores_share_a_rank() {
        let mut board = Scoreboard::default();
        board.record("cy", 3);
        board.record("ana", 5);
        board.record("bo", 5);
        board.record("di", 1);

        let standings = board.standings();
        let ranks: Vec<(usize, u32, &str)> = standings
            .iter()
            .map(|s| (s.rank, s.score, s.player.as_str()))
            .collect();
        assert_eq!(
            ranks,
            vec![(1, 5, "ana"), (1, 5, "bo"), (3, 3, "cy"), (4, 1, "di")]
        );
        assert_eq!(board.winners(), vec!["ana", "bo"]);
    }

    #[test]
    fn standings_text_uses_singular_for_one_point() {
        let mut board = Scoreboard::default();
        board.record("ana", 2);
        board.record("bo", 1);
        board.record("cy", 0);
        assert_eq!(
            format_standings(&board.standings()),
            "1. 2pts - ana\n2. 1pt - bo\n3. 0pts - cy"
        );
    }

    #[test]
    fn names_are_joined_as_prose() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(join_names(&names(&[])), "");
        assert_eq!(join_names(&names(&["a"])), "a");
        assert_eq!(join_names(&names(&["a", "b"])), "a and b");
        assert_eq!(join_names(&names(&["a", "b", "c"])), "a, b and c");
    }
}
