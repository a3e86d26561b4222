//! Text preparation shared by every message before markdown rendering.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("static pattern is valid"));

/// Collapse every run of three or more newlines into exactly two.
///
/// Keeps paragraph breaks intact while dropping the extra vertical space
/// models like to emit. Borrows when nothing needs collapsing.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    BLANK_RUN.replace_all(text, "\n\n")
}
