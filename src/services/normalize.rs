//! Canonical comparison forms for artist names and track titles.
//!
//! Every form is diacritic-free, lower-cased and has its whitespace collapsed.
//! Artists and titles additionally get a lenient variant so that common
//! decorations ("The ...", "(Remastered)", "- Live", "feat. ...") do not have
//! to be typed by players.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Runs of whitespace, collapsed into one space.
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Leading article on artist names: "the beatles" → "beatles".
static LEADING_THE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^the ").unwrap());

/// Title decorations removed for the lenient title form, applied in order.
static TITLE_DECORATIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Anything in brackets: "(Remastered 2015)"
        Regex::new(r"\(.*\)").unwrap(),
        // Anything after a " -": "Song - Live at Wembley"
        Regex::new(r" -.*$").unwrap(),
        // Featured artists and everything after them
        Regex::new(r"\b(ft\.?|feat\.?)\b.*").unwrap(),
    ]
});

/// Check if a character is a Unicode combining mark (diacritical mark).
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Base comparable form: NFKD with combining marks dropped, whitespace collapsed, lower-cased.
///
/// Guess fragments go through the same folding so that matching is
/// insensitive to case and accents on both sides.
pub fn comparable(raw: &str) -> String {
    let stripped: String = raw.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    WHITESPACE
        .replace_all(stripped.trim(), " ")
        .to_lowercase()
}

/// Comparable forms for an artist: the base form, then the form without a leading "the ".
pub fn comparable_artists(artist: &str) -> IndexSet<String> {
    let base = comparable(artist);
    let without_article = LEADING_THE.replace(&base, "").into_owned();
    collect_forms([base, without_article])
}

/// Comparable forms for a title: the base form, then the form stripped of decorations.
pub fn comparable_titles(title: &str) -> IndexSet<String> {
    let base = comparable(title);
    let mut bare = base.clone();
    for pattern in TITLE_DECORATIONS.iter() {
        bare = pattern.replace_all(&bare, "").into_owned();
    }
    let bare = bare.trim().to_string();
    collect_forms([base, bare])
}

fn collect_forms(forms: impl IntoIterator<Item = String>) -> IndexSet<String> {
    forms.into_iter().filter(|form| !form.is_empty()).collect()
}
