//! Fuzzy comparison of guess fragments against comparable forms.

use strsim::jaro_winkler;
use tracing::debug;

/// Minimum Jaro-Winkler similarity for a fragment to count as a match.
pub const MIN_GUESS_ACCURACY: f64 = 0.9;

/// Similarity in `[0, 1]` between a canonical form and a guess fragment.
pub fn similarity(candidate: &str, fragment: &str) -> f64 {
    jaro_winkler(candidate, fragment)
}

/// Whether `fragment` is close enough to at least one of `candidates`.
///
/// Candidates are tried in order and the search stops at the first match.
pub fn matches_any<'a>(candidates: impl IntoIterator<Item = &'a String>, fragment: &str) -> bool {
    candidates.into_iter().any(|candidate| {
        let score = similarity(candidate, fragment);
        debug!(%fragment, %candidate, score, "compared guess fragment");
        score >= MIN_GUESS_ACCURACY
    })
}
