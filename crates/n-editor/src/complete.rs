//! Word completion.
//!
//! A [`Completer`] looks at the line and returns the word being completed
//! (the text before the cursor back to the nearest whitespace) together with
//! every full replacement it knows for that word. The Tab action then:
//!
//! 1. computes the [`common_extension`] of all candidates beyond the word,
//! 2. inserts it inline if it is non-empty,
//! 3. otherwise prints the candidates as a list ([`format_candidates`]),
//!    without touching the line.
//!
//! With zero candidates nothing happens.

use std::fmt::Write as _;

use n_term::ansi::{BOLD, RESET};

use crate::buffer::LineBuffer;

/// The result of one completion request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// The word before the cursor that the candidates extend.
    pub word: String,
    /// Full replacements for `word`, each starting with it.
    pub candidates: Vec<String>,
}

/// Source of completion candidates.
pub trait Completer {
    /// Candidates for the word before the cursor in `line`.
    fn complete(&self, line: &LineBuffer) -> Completion;
}

impl<F> Completer for F
where
    F: Fn(&LineBuffer) -> Completion,
{
    fn complete(&self, line: &LineBuffer) -> Completion {
        self(line)
    }
}

/// Completes from a fixed list of words.
///
/// Every entry starting with the previous word is a candidate, with a space
/// appended so an unambiguous completion also ends the word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListCompleter {
    words: Vec<String>,
}

impl ListCompleter {
    /// Create a completer over `words`.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// The word list.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }
}

impl Completer for ListCompleter {
    fn complete(&self, line: &LineBuffer) -> Completion {
        let word = line.previous_word();
        let candidates = self
            .words
            .iter()
            .filter(|w| w.starts_with(word.as_str()))
            .map(|w| format!("{w} "))
            .collect();
        Completion { word, candidates }
    }
}

/// The longest text every candidate shares beyond `word`.
///
/// Compared char by char; stops at the first divergence or as soon as any
/// candidate runs out. Candidates that do not start with `word` are ignored.
#[must_use]
pub fn common_extension(word: &str, candidates: &[String]) -> String {
    let mut rests = candidates.iter().filter_map(|c| c.strip_prefix(word));
    let Some(mut common) = rests.next() else {
        return String::new();
    };

    for rest in rests {
        let shared = common
            .char_indices()
            .zip(rest.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| common.len().min(rest.len()), |((i, _), _)| i);
        common = &common[..shared];
    }

    common.to_owned()
}

/// Render candidates as a suggestion list, one per line.
///
/// Each line shows `word`, then the next char of the candidate in bold
/// (the key to type to narrow the choice), then the rest.
#[must_use]
pub fn format_candidates(word: &str, candidates: &[String]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        let Some(rest) = candidate.strip_prefix(word) else {
            let _ = writeln!(out, "{candidate}");
            continue;
        };
        let mut chars = rest.chars();
        match chars.next() {
            Some(hint) => {
                let _ = writeln!(out, "{word}{BOLD}{hint}{RESET}{}", chars.as_str());
            }
            None => {
                let _ = writeln!(out, "{word}");
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    // -- common_extension --------------------------------------------------

    #[test]
    fn extension_stops_at_divergence() {
        let cands = strings(&["foo", "food", "fool"]);
        assert_eq!(common_extension("fo", &cands), "o");
    }

    #[test]
    fn extension_empty_when_word_complete() {
        let cands = strings(&["foo", "food", "fool"]);
        assert_eq!(common_extension("foo", &cands), "");
    }

    #[test]
    fn extension_stops_when_a_candidate_runs_out() {
        let cands = strings(&["food", "foo"]);
        assert_eq!(common_extension("f", &cands), "oo");
    }

    #[test]
    fn extension_of_single_candidate_is_its_rest() {
        let cands = strings(&["commit "]);
        assert_eq!(common_extension("com", &cands), "mit ");
    }

    #[test]
    fn extension_of_nothing_is_empty() {
        assert_eq!(common_extension("x", &[]), "");
    }

    #[test]
    fn extension_multibyte() {
        let cands = strings(&["håll", "hålla", "hållbar"]);
        assert_eq!(common_extension("h", &cands), "åll");
    }

    #[test]
    fn extension_ignores_non_matching_candidates() {
        let cands = strings(&["bar", "foobar", "foobaz"]);
        assert_eq!(common_extension("foo", &cands), "ba");
    }

    // -- ListCompleter -----------------------------------------------------

    #[test]
    fn list_completer_filters_by_previous_word() {
        let completer = ListCompleter::new(["foo", "food", "bar"]);
        let line = LineBuffer::from_text("eat fo");
        let completion = completer.complete(&line);
        assert_eq!(completion.word, "fo");
        assert_eq!(completion.candidates, strings(&["foo ", "food "]));
    }

    #[test]
    fn list_completer_empty_word_matches_all() {
        let completer = ListCompleter::new(["a", "b"]);
        let completion = completer.complete(&LineBuffer::new());
        assert_eq!(completion.word, "");
        assert_eq!(completion.candidates.len(), 2);
        assert_eq!(completer.words().len(), 2);
    }

    #[test]
    fn list_completer_with_trailing_space_still_extends() {
        let completer = ListCompleter::new(["foo", "food", "fool"]);
        let completion = completer.complete(&LineBuffer::from_text("fo"));
        assert_eq!(common_extension(&completion.word, &completion.candidates), "o");

        let completion = completer.complete(&LineBuffer::from_text("foo"));
        assert_eq!(common_extension(&completion.word, &completion.candidates), "");
        assert_eq!(completion.candidates.len(), 3);
    }

    #[test]
    fn closure_is_a_completer() {
        let completer = |line: &LineBuffer| Completion {
            word: line.previous_word(),
            candidates: vec!["xyz".into()],
        };
        let completion = completer.complete(&LineBuffer::from_text("x"));
        assert_eq!(completion.candidates, strings(&["xyz"]));
    }

    // -- format_candidates -------------------------------------------------

    #[test]
    fn format_bolds_next_char() {
        let out = format_candidates("foo", &strings(&["foo ", "food ", "fool "]));
        assert_eq!(
            out,
            "foo\x1b[1m \x1b[0m\nfoo\x1b[1md\x1b[0m \nfoo\x1b[1ml\x1b[0m \n"
        );
    }

    #[test]
    fn format_exact_match_has_no_hint() {
        assert_eq!(format_candidates("foo", &strings(&["foo"])), "foo\n");
    }

    #[test]
    fn format_multibyte_hint() {
        let out = format_candidates("h", &strings(&["hål"]));
        assert_eq!(out, "h\x1b[1må\x1b[0ml\n");
    }

    #[test]
    fn format_non_matching_candidate_verbatim() {
        assert_eq!(format_candidates("x", &strings(&["abc"])), "abc\n");
    }
}
