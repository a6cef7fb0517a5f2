//! Output sanitization.
//!
//! Models sometimes narrate a search they never ran ("[SEARCHING THE WEB...]").
//! Those bracketed markers are stripped from every reply before it is stored.

use regex_lite::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static SEARCH_NARRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[(SEARCHING|SEARCHING THE WEB|RE-INITIATING WEB SEARCH|SEARCHING DATABASES).*?\]",
    )
    .expect("search narration pattern compiles")
});

/// Remove search-narration markers.
///
/// Removal repeats until no marker is left, so the result is always clean
/// and a second pass changes nothing. Text without markers is returned
/// unchanged; otherwise the remainder is trimmed.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    let mut changed = false;

    loop {
        let next = match SEARCH_NARRATION.replace_all(&current, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => next,
        };
        current = next;
        changed = true;
    }

    if changed {
        current.trim().to_string()
    } else {
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markers_case_insensitively() {
        let raw = "[SEARCHING THE WEB...]\n\nKabinet cantum sendiri sedang popular. [searching databases for prices]";
        assert_eq!(sanitize(raw), "Kabinet cantum sendiri sedang popular.");
    }

    #[test]
    fn strips_reinitiated_search() {
        assert_eq!(
            sanitize("Baik. [RE-INITIATING WEB SEARCH: trims] Ini cadangan saya."),
            "Baik.  Ini cadangan saya."
        );
    }

    #[test]
    fn clean_text_is_untouched() {
        let clean = "  Here are three marketing ideas [1] for Raya.\n";
        assert_eq!(sanitize(clean), clean);
    }

    #[test]
    fn idempotent() {
        let inputs = [
            "plain reply",
            "[SEARCHING] answer",
            "[SEAR[SEARCHING]CHING...] nested",
            "[Searching the web] [searching]",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn nested_markers_are_fully_removed() {
        assert_eq!(sanitize("[SEAR[SEARCHING]CHING...] nested"), "nested");
    }

    #[test]
    fn unrelated_brackets_survive() {
        assert_eq!(sanitize("[NOTE] harga naik"), "[NOTE] harga naik");
    }
}
