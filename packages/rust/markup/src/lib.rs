//! GCIDE markup extraction.
//!
//! Splits a letter file into entry blocks, then pulls a headword and its
//! definition spans out of each block. Blocks that do not yield both are
//! dropped without error: the corpus is noisy and best-effort is the policy.

mod cleanup;
pub mod entities;

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use dictbuilder_shared::{DEFINITION_SEPARATOR, Entry};

pub use entities::{CUSTOM_ENTITIES, decode_entities};

const DEF_OPEN: &str = "<def>";
const DEF_CLOSE: &str = "</def>";
const HW_OPEN: &str = "<hw>";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Entries pulled from one letter file, in file order.
#[derive(Debug, Clone, Default)]
pub struct FileExtract {
    /// Extracted entries. Headwords may repeat; consolidation is the caller's job.
    pub entries: Vec<Entry>,
    /// Number of candidate blocks the file was split into.
    pub blocks: usize,
    /// Blocks that produced no entry.
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Decode raw file bytes as UTF-8, replacing invalid sequences with U+FFFD.
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Extract every usable entry from the text of one letter file.
pub fn extract_entries(text: &str) -> FileExtract {
    let mut extract = FileExtract::default();

    for block in split_blocks(text) {
        extract.blocks += 1;

        // Cheap pre-filter before any real parsing.
        if !block.contains(HW_OPEN) || !block.contains(DEF_OPEN) {
            extract.skipped += 1;
            continue;
        }

        match extract_entry(block) {
            Some(entry) => extract.entries.push(entry),
            None => {
                trace!(block_len = block.len(), "block yielded no entry");
                extract.skipped += 1;
            }
        }
    }

    debug!(
        blocks = extract.blocks,
        entries = extract.entries.len(),
        skipped = extract.skipped,
        "letter file extracted"
    );

    extract
}

/// Split file content on the `<p><ent>` marker that opens each entry.
pub fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    static ENTRY_START_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<p>\s*<ent>").expect("valid regex"));

    ENTRY_START_RE.split(text)
}

/// Extract a `(headword, definition)` pair from a single entry block.
///
/// Returns `None` when the block has no headword or no non-empty definition.
pub fn extract_entry(block: &str) -> Option<Entry> {
    let headword = decode_entities(find_headword(block)?);
    if headword.trim().is_empty() {
        return None;
    }

    let definitions: Vec<String> = definition_spans(block)
        .into_iter()
        .map(cleanup::clean_span)
        .filter(|span| !span.is_empty())
        .collect();

    if definitions.is_empty() {
        return None;
    }

    let definition = decode_entities(&definitions.join(DEFINITION_SEPARATOR));
    Some(Entry::new(&headword, &definition))
}

/// First `<hw>...</hw>` span with no nested markup, trimmed.
fn find_headword(block: &str) -> Option<&str> {
    static HW_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"<hw>([^<]*)</hw>").expect("valid regex"));

    HW_RE
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Raw inner content of every well-formed `<def>...</def>` span, outermost
/// spans only, in block order.
///
/// An unterminated span is skipped and scanning resumes just past its open
/// marker, so spans nested inside it can still be recovered.
pub fn definition_spans(block: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = block[pos..].find(DEF_OPEN) {
        let open = pos + offset;
        match match_definition(block, open) {
            Some((content, end)) => {
                spans.push(&block[content.0..content.1]);
                pos = end;
            }
            None => {
                trace!(open, "unterminated definition span");
                pos = open + DEF_OPEN.len();
            }
        }
    }

    spans
}

/// Match the `<def>` at `open` to its closing tag by tracking nesting depth.
///
/// Returns the content byte range and the index just past the closing tag.
fn match_definition(text: &str, open: usize) -> Option<((usize, usize), usize)> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut begin = open + DEF_OPEN.len();
    let mut i = open;

    while i < bytes.len() {
        let rest = &bytes[i..];
        if rest.starts_with(DEF_OPEN.as_bytes()) {
            if depth == 0 {
                begin = i + DEF_OPEN.len();
            }
            depth += 1;
            i += DEF_OPEN.len();
            continue;
        }
        if rest.starts_with(DEF_CLOSE.as_bytes()) {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(((begin, i), i + DEF_CLOSE.len()));
            }
            i += DEF_CLOSE.len();
            continue;
        }
        i += 1;
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/gcide")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    #[test]
    fn nested_definitions_resolve_to_outer_span() {
        let block = "<hw>acme</hw> <def>outer <def>inner</def> text</def>";
        let spans = definition_spans(block);
        assert_eq!(spans, vec!["outer <def>inner</def> text"]);

        let entry = extract_entry(block).unwrap();
        assert_eq!(entry.definition, "outer inner text");
    }

    #[test]
    fn multiple_definitions_join_with_separator() {
        let block = "<hw>bark</hw> <def>tree skin</def> <sn>2.</sn> <def>dog noise</def>";
        let entry = extract_entry(block).unwrap();
        assert_eq!(entry.headword, "bark");
        assert_eq!(entry.definition, "tree skin; dog noise");
    }

    #[test]
    fn empty_definitions_are_discarded() {
        let block = "<hw>bark</hw> <def> <br/> </def><def>tree skin</def>";
        let entry = extract_entry(block).unwrap();
        assert_eq!(entry.definition, "tree skin");
    }

    #[test]
    fn headword_without_definition_yields_nothing() {
        assert!(extract_entry("<hw>lonely</hw> <pos>n.</pos>").is_none());
        assert!(extract_entry("<hw>lonely</hw> <def>  </def>").is_none());
    }

    #[test]
    fn definition_without_headword_yields_nothing() {
        assert!(extract_entry("<ent>x</ent> <def>orphan</def>").is_none());
    }

    #[test]
    fn headword_with_nested_markup_is_not_matched() {
        assert!(extract_entry("<hw>ab<sup>1</sup></hw> <def>first</def>").is_none());
    }

    #[test]
    fn first_headword_wins_and_is_trimmed() {
        let block = "<hw>  first </hw> <hw>second</hw> <def>text</def>";
        assert_eq!(extract_entry(block).unwrap().headword, "first");
    }

    #[test]
    fn unterminated_span_does_not_hide_later_spans() {
        let block = "<hw>x</hw> <def>never closed <def>closed</def>";
        assert_eq!(definition_spans(block), vec!["closed"]);
        assert_eq!(extract_entry(block).unwrap().definition, "closed");
    }

    #[test]
    fn entities_are_decoded_in_both_fields() {
        let block = "<hw>m&ebreve_;n</hw> <def>salt &amp; pepper; see &eitalic_;tude</def>";
        let entry = extract_entry(block).unwrap();
        assert_eq!(entry.headword, "m\u{115}n");
        assert_eq!(entry.definition, "salt & pepper; see \u{e9}tude");
    }

    #[test]
    fn decoded_tabs_and_newlines_are_collapsed() {
        let block = "<hw>tab</hw> <def>one&#9;two&#10;three\r\nfour</def>";
        let entry = extract_entry(block).unwrap();
        assert_eq!(entry.definition, "one two three four");
    }

    #[test]
    fn split_blocks_tolerates_whitespace_between_markers() {
        let text = "preamble<p>\n  <ent>A</ent> one<p><ent>B</ent> two";
        let blocks: Vec<&str> = split_blocks(text).collect();
        assert_eq!(blocks, vec!["preamble", "A</ent> one", "B</ent> two"]);
    }

    #[test]
    fn decode_lossy_replaces_invalid_bytes() {
        let text = decode_lossy(b"<hw>caf\xff</hw>");
        assert_eq!(text, "<hw>caf\u{fffd}</hw>");
    }

    #[test]
    fn extract_fixture_letter_a() {
        let extract = extract_entries(&fixture("gcide_a.xml"));
        let headwords: Vec<&str> = extract.entries.iter().map(|e| e.headword.as_str()).collect();
        assert_eq!(headwords, vec!["Apple", "Abet", "Acme", "Apple"]);
        assert_eq!(
            extract.entries[0].definition,
            "The fleshy pome or fruit of a rosaceous tree.; Any tree of the genus Malus; an apple tree."
        );
        assert_eq!(extract.entries[2].definition, "The top or highest point; the crisis of a disease.");
        // preamble, the headword-only block, and the headword-less block
        assert_eq!(extract.skipped, 3);
        assert_eq!(extract.blocks, 7);
    }

    #[test]
    fn extracted_definitions_are_single_line() {
        let extract = extract_entries(&fixture("gcide_a.xml"));
        for entry in &extract.entries {
            assert!(!entry.definition.contains(['\t', '\n', '\r']), "{entry:?}");
            assert!(!entry.headword.contains(['\t', '\n', '\r']), "{entry:?}");
        }
    }
}
