//! Extract pipeline: letter files → lexicon → tab-delimited file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, instrument};

use dictbuilder_markup::{decode_lossy, extract_entries};
use dictbuilder_shared::{DictError, DictPaths, Lexicon, Result};

use crate::writer::{WrittenFile, write_atomic};

/// Letters with a per-letter markup file, in processing order.
const LETTERS: std::ops::RangeInclusive<char> = 'a'..='z';

/// Configuration for [`extract_dictionary`].
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Directory holding `gcide_<letter>.xml` files.
    pub input_dir: PathBuf,
    /// Destination for the tab-delimited lexicon.
    pub output_path: PathBuf,
}

impl ExtractConfig {
    /// Use explicit paths where given, otherwise the configured defaults.
    pub fn from_paths(paths: &DictPaths, input: Option<&Path>, output: Option<&Path>) -> Self {
        Self {
            input_dir: input.map_or_else(|| paths.gcide_dir.clone(), Path::to_path_buf),
            output_path: output.map_or_else(|| paths.lexicon.clone(), Path::to_path_buf),
        }
    }
}

/// Result of [`extract_dictionary`].
#[derive(Debug)]
pub struct ExtractResult {
    /// The lexicon file that was written.
    pub output: WrittenFile,
    /// Unique headwords written.
    pub entry_count: usize,
    /// Letter files processed, in order.
    pub files: Vec<PathBuf>,
    /// Candidate blocks seen across all files.
    pub blocks: usize,
    /// Blocks dropped for lacking a headword or definition.
    pub skipped: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each input file has been folded in.
    fn file_processed(&self, path: &Path, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _path: &Path, _current: usize, _total: usize) {}
    fn done(&self) {}
}

/// Existing `gcide_<letter>.xml` files in `dir`, in alphabetical letter order.
pub fn letter_files(dir: &Path) -> Vec<PathBuf> {
    LETTERS
        .map(|c| dir.join(format!("gcide_{c}.xml")))
        .filter(|path| path.is_file())
        .collect()
}

/// Fold letter files, in the given order, into one lexicon.
///
/// Returns the lexicon plus `(blocks, skipped)` totals.
pub fn build_lexicon(
    files: &[PathBuf],
    progress: &dyn ProgressReporter,
) -> Result<(Lexicon, usize, usize)> {
    let mut lexicon = Lexicon::new();
    let mut blocks = 0;
    let mut skipped = 0;

    for (i, path) in files.iter().enumerate() {
        let bytes = std::fs::read(path).map_err(|e| DictError::io(path, e))?;
        let text = decode_lossy(&bytes);
        let extract = extract_entries(&text);

        let before = lexicon.len();
        let extracted = extract.entries.len();
        for entry in extract.entries {
            lexicon.insert(entry);
        }

        blocks += extract.blocks;
        skipped += extract.skipped;

        debug!(
            file = %path.display(),
            extracted,
            new_headwords = lexicon.len() - before,
            "processed letter file"
        );
        progress.file_processed(path, i + 1, files.len());
    }

    Ok((lexicon, blocks, skipped))
}

/// Run the extractor end to end.
///
/// 1. Validate the input directory and find letter files
/// 2. Fold every file into the lexicon
/// 3. Serialize sorted by headword and write atomically
///
/// Fails before touching the destination if the directory is missing or
/// holds no letter files.
#[instrument(skip_all, fields(input = %config.input_dir.display(), output = %config.output_path.display()))]
pub fn extract_dictionary(
    config: &ExtractConfig,
    progress: &dyn ProgressReporter,
) -> Result<ExtractResult> {
    let start = Instant::now();

    if !config.input_dir.is_dir() {
        return Err(DictError::input_not_found(
            &config.input_dir,
            "GCIDE XML directory not found",
        ));
    }

    progress.phase("Scanning letter files");
    let files = letter_files(&config.input_dir);
    if files.is_empty() {
        return Err(DictError::input_not_found(
            &config.input_dir,
            "no gcide_[a-z].xml files found",
        ));
    }

    info!(file_count = files.len(), "extracting dictionary");

    progress.phase("Extracting entries");
    let (lexicon, blocks, skipped) = build_lexicon(&files, progress)?;

    info!(entries = lexicon.len(), blocks, skipped, "extraction complete");

    progress.phase("Writing lexicon");
    let output = write_atomic(&config.output_path, &lexicon.to_tab_text())?;

    progress.done();

    Ok(ExtractResult {
        output,
        entry_count: lexicon.len(),
        files,
        blocks,
        skipped,
        elapsed: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
