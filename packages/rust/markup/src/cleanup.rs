//! Text cleanup passes for extracted definition spans.
//!
//! Each pass is a function `&str -> String` applied in sequence.

use std::sync::LazyLock;

use regex::Regex;

use dictbuilder_shared::single_line;

/// Run the span pipeline: strip markup, collapse whitespace, trim.
pub(crate) fn clean_span(raw: &str) -> String {
    single_line(&strip_tags(raw))
}

// ---------------------------------------------------------------------------
// Pass 1: Strip tags
// ---------------------------------------------------------------------------

/// Remove every `<...>` tag, keeping the text between them.
pub(crate) fn strip_tags(text: &str) -> String {
    static TAG_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

    TAG_RE.replace_all(text, "").into_owned()
}
