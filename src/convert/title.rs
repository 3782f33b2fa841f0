//! Note titles derived from the first paragraph of a document.

use regex::Regex;
use std::sync::OnceLock;

use crate::timestamp::UNTITLED;

/// Titles of this many characters or more are shortened.
pub const MAX_TITLE_CHARS: usize = 80;

fn terminator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\n!?]|\. ").unwrap())
}

/// Derive a note title from paragraph text.
///
/// The text is cut before the first line break, `!`, `?` or `". "`, one
/// trailing period is dropped and every `/` becomes `" or "`. Titles of
/// [`MAX_TITLE_CHARS`] characters or more are cut at the last space within
/// the first 80 characters, or hard-cut at 80 when there is none.
///
/// Blank input yields `"Untitled"`. The result may be empty, e.g. for `"!"`.
///
/// # Example
///
/// ```
/// use enexport::convert::derive_title;
///
/// assert_eq!(derive_title("Hello world. More text"), "Hello world");
/// assert_eq!(derive_title("Lunch/dinner plans"), "Lunch or dinner plans");
/// ```
pub fn derive_title(text: &str) -> String {
    if text.trim().is_empty() {
        return UNTITLED.to_string();
    }

    let head = match terminator_regex().find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    let head = head.strip_suffix('.').unwrap_or(head);

    shorten(head.replace('/', " or "))
}

fn shorten(title: String) -> String {
    if title.chars().count() < MAX_TITLE_CHARS {
        return title;
    }

    let cut = title
        .char_indices()
        .nth(MAX_TITLE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(title.len());
    let window = &title[..cut];

    match window.rfind(' ') {
        Some(space) => window[..space].to_string(),
        None => window.to_string(),
    }
}
