//! Merge pipeline: base lexicon + supplementary word list → combined file.
//!
//! A pure concatenation with annotation. Nothing is re-sorted or
//! de-duplicated: a headword present in both sources appears twice.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, instrument};

use dictbuilder_shared::{BookEntry, DictError, DictPaths, Entry, Result, TaggedEntry};

use crate::writer::{WrittenFile, write_atomic};

/// Configuration for [`merge_lexicons`].
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Tab-delimited lexicon produced by the extractor.
    pub lexicon_path: PathBuf,
    /// Supplementary tab-delimited word list.
    pub supplement_path: PathBuf,
    /// Combined output file.
    pub output_path: PathBuf,
    /// Provenance prefix for supplementary definitions.
    pub tag: String,
}

impl MergeConfig {
    /// Paths for a registered book.
    pub fn for_book(paths: &DictPaths, book: &BookEntry, tag: &str) -> Self {
        Self {
            lexicon_path: paths.lexicon.clone(),
            supplement_path: paths.characters_path(book),
            output_path: paths.combined_path(book),
            tag: tag.to_string(),
        }
    }
}

/// Line counts from [`merge_text`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeCounts {
    /// Base lexicon lines copied through.
    pub base_lines: usize,
    /// Supplementary lines written with the provenance tag.
    pub tagged: usize,
    /// Supplementary lines with no tab, written unchanged.
    pub untagged: usize,
    /// Blank supplementary lines dropped.
    pub blank_skipped: usize,
}

/// Result of [`merge_lexicons`].
#[derive(Debug)]
pub struct MergeResult {
    /// The combined file that was written.
    pub output: WrittenFile,
    /// Line counts.
    pub counts: MergeCounts,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Concatenate base lines, then tagged supplementary lines.
pub fn merge_text(base: &str, supplement: &str, tag: &str) -> (String, MergeCounts) {
    let mut out = String::with_capacity(base.len() + supplement.len());
    let mut counts = MergeCounts::default();

    for line in base.lines() {
        out.push_str(line);
        out.push('\n');
        counts.base_lines += 1;
    }

    for line in supplement.lines() {
        if line.trim().is_empty() {
            counts.blank_skipped += 1;
            continue;
        }
        match Entry::parse_line(line) {
            Some(entry) => {
                out.push_str(&TaggedEntry::new(entry, tag).to_line());
                counts.tagged += 1;
            }
            None => {
                out.push_str(line);
                counts.untagged += 1;
            }
        }
        out.push('\n');
    }

    (out, counts)
}

/// Run the merger end to end.
///
/// Both inputs must exist; otherwise nothing is written.
#[instrument(skip_all, fields(output = %config.output_path.display()))]
pub fn merge_lexicons(config: &MergeConfig) -> Result<MergeResult> {
    let start = Instant::now();

    if !config.lexicon_path.is_file() {
        return Err(DictError::input_not_found(
            &config.lexicon_path,
            "GCIDE dictionary not found; run `dictbuilder extract` first",
        ));
    }
    if !config.supplement_path.is_file() {
        return Err(DictError::input_not_found(
            &config.supplement_path,
            "character dictionary not found",
        ));
    }

    let base = read_lossy(&config.lexicon_path)?;
    let supplement = read_lossy(&config.supplement_path)?;

    let (combined, counts) = merge_text(&base, &supplement, &config.tag);

    info!(
        base_lines = counts.base_lines,
        tagged = counts.tagged,
        untagged = counts.untagged,
        blank_skipped = counts.blank_skipped,
        "merged word lists"
    );

    let output = write_atomic(&config.output_path, &combined)?;

    Ok(MergeResult {
        output,
        counts,
        elapsed: start.elapsed(),
    })
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DictError::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
