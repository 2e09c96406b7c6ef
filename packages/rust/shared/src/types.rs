//! Core domain types: entries, tagged entries, and the lexicon.

use std::collections::BTreeMap;

/// Separator between definitions consolidated under one headword.
pub const DEFINITION_SEPARATOR: &str = "; ";

/// Provenance prefix for supplementary (character list) entries.
pub const DEFAULT_PROVENANCE_TAG: &str = "[Character] ";

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A single `headword -> definition` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Lookup term.
    pub headword: String,
    /// Definition text.
    pub definition: String,
}

impl Entry {
    /// Build an entry with both fields reduced to a single line.
    ///
    /// The headword has tabs and line breaks replaced and is trimmed; the
    /// definition additionally has whitespace runs collapsed.
    pub fn new(headword: &str, definition: &str) -> Self {
        Self {
            headword: sanitize_headword(headword),
            definition: single_line(definition),
        }
    }

    /// Split a tab-delimited line on its first tab, leaving both sides untouched.
    ///
    /// Returns `None` when the line has no tab.
    pub fn parse_line(line: &str) -> Option<Self> {
        let (headword, definition) = line.split_once('\t')?;
        Some(Self {
            headword: headword.to_string(),
            definition: definition.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// TaggedEntry
// ---------------------------------------------------------------------------

/// An entry from the supplementary list, rendered with a provenance prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedEntry {
    pub entry: Entry,
    pub tag: String,
}

impl TaggedEntry {
    pub fn new(entry: Entry, tag: impl Into<String>) -> Self {
        Self {
            entry,
            tag: tag.into(),
        }
    }

    /// Render as `headword<TAB><tag>definition`.
    pub fn to_line(&self) -> String {
        format!("{}\t{}{}", self.entry.headword, self.tag, self.entry.definition)
    }
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

/// Headword-ordered mapping from headword to consolidated definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    entries: BTreeMap<String, String>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an entry in. A repeated headword gets `"; " + definition` appended.
    ///
    /// Returns `true` when the headword was new.
    pub fn insert(&mut self, entry: Entry) -> bool {
        match self.entries.get_mut(&entry.headword) {
            Some(existing) => {
                existing.push_str(DEFINITION_SEPARATOR);
                existing.push_str(&entry.definition);
                false
            }
            None => {
                self.entries.insert(entry.headword, entry.definition);
                true
            }
        }
    }

    pub fn get(&self, headword: &str) -> Option<&str> {
        self.entries.get(headword).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(headword, definition)` in headword order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(h, d)| (h.as_str(), d.as_str()))
    }

    /// Serialize to the tab-delimited lexicon format, one `\n`-terminated line
    /// per headword.
    pub fn to_tab_text(&self) -> String {
        let mut out = String::new();
        for (headword, definition) in self.iter() {
            out.push_str(headword);
            out.push('\t');
            out.push_str(definition);
            out.push('\n');
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Normalization helpers
// ---------------------------------------------------------------------------

/// Collapse every whitespace run (tabs and line breaks included) to one space
/// and trim both ends.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Replace tabs and line breaks with spaces and trim.
pub fn sanitize_headword(text: &str) -> String {
    text.replace(['\t', '\r', '\n'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_new_normalizes_fields() {
        let entry = Entry::new("  apple\t", "a\tround\n\n  fruit ");
        assert_eq!(entry.headword, "apple");
        assert_eq!(entry.definition, "a round fruit");
    }

    #[test]
    fn parse_line_splits_on_first_tab_only() {
        let entry = Entry::parse_line("Ender\tthe boy\twho won").unwrap();
        assert_eq!(entry.headword, "Ender");
        assert_eq!(entry.definition, "the boy\twho won");
        assert!(Entry::parse_line("no separator here").is_none());
    }

    #[test]
    fn tagged_entry_prefixes_definition() {
        let entry = Entry::parse_line("dog\tloyal companion of the hero").unwrap();
        let tagged = TaggedEntry::new(entry, DEFAULT_PROVENANCE_TAG);
        assert_eq!(tagged.to_line(), "dog\t[Character] loyal companion of the hero");
    }

    #[test]
    fn lexicon_appends_duplicate_headwords_in_order() {
        let mut lex = Lexicon::new();
        assert!(lex.insert(Entry::new("apple", "a fruit")));
        assert!(!lex.insert(Entry::new("apple", "to polish")));
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.get("apple"), Some("a fruit; to polish"));
    }

    #[test]
    fn lexicon_serializes_sorted() {
        let mut lex = Lexicon::new();
        lex.insert(Entry::new("pear", "another fruit"));
        lex.insert(Entry::new("apple", "a fruit"));
        lex.insert(Entry::new("Zebra", "striped"));
        assert_eq!(
            lex.to_tab_text(),
            "Zebra\tstriped\napple\ta fruit\npear\tanother fruit\n"
        );
    }

    #[test]
    fn empty_lexicon_serializes_to_empty_string() {
        assert_eq!(Lexicon::new().to_tab_text(), "");
    }
}
