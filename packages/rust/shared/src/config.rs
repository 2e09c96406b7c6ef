//! Application configuration and the book registry.
//!
//! User config lives at `~/.dictbuilder/dictbuilder.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DictError, Result};
use crate::types::DEFAULT_PROVENANCE_TAG;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "dictbuilder.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".dictbuilder";

/// Books known without any config file: `(id, characters file, output basename)`.
const BUILTIN_BOOKS: &[(&str, &str, &str)] = &[(
    "speaker-for-the-dead",
    "speaker-characters.txt",
    "speaker-characters-and-gcide",
)];

// ---------------------------------------------------------------------------
// Config structs (matching dictbuilder.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Input/output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Merge settings.
    #[serde(default)]
    pub merge: MergeSettings,

    /// Extra books, added to (or overriding) the built-in registry.
    #[serde(default)]
    pub books: Vec<BookEntry>,
}

/// `[paths]` section. Relative sub-paths resolve against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Dictionaries root directory.
    #[serde(default = "default_root")]
    pub root: String,

    /// Directory holding `gcide_<letter>.xml` files.
    #[serde(default = "default_gcide_dir")]
    pub gcide_dir: String,

    /// Tab-delimited lexicon written by `extract` and read by `merge`.
    #[serde(default = "default_lexicon")]
    pub lexicon: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            gcide_dir: default_gcide_dir(),
            lexicon: default_lexicon(),
        }
    }
}

fn default_root() -> String {
    "dictionaries".into()
}
fn default_gcide_dir() -> String {
    "gcide_xml-0.53/gcide_xml-0.53".into()
}
fn default_lexicon() -> String {
    "gcide/gcide.txt".into()
}

/// `[merge]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Prefix put in front of every supplementary definition.
    #[serde(default = "default_tag")]
    pub tag: String,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self { tag: default_tag() }
    }
}

fn default_tag() -> String {
    DEFAULT_PROVENANCE_TAG.into()
}

/// `[[books]]` entry: a supplementary word list and the combined output name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEntry {
    /// Identifier, also the book's folder name under the root.
    pub id: String,
    /// Supplementary word list file name inside the book folder.
    pub characters: String,
    /// Combined output basename (`.txt` is appended).
    pub output: String,
}

// ---------------------------------------------------------------------------
// Book registry
// ---------------------------------------------------------------------------

/// Built-in books plus any configured in `[[books]]`, ordered by id.
pub fn book_registry(config: &AppConfig) -> Vec<BookEntry> {
    let mut books: Vec<BookEntry> = BUILTIN_BOOKS
        .iter()
        .map(|(id, characters, output)| BookEntry {
            id: (*id).into(),
            characters: (*characters).into(),
            output: (*output).into(),
        })
        .collect();

    for book in &config.books {
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book.clone(),
            None => books.push(book.clone()),
        }
    }

    books.sort_by(|a, b| a.id.cmp(&b.id));
    books
}

/// Look up a book by id, listing the known ids when it is missing.
pub fn lookup_book(config: &AppConfig, id: &str) -> Result<BookEntry> {
    let books = book_registry(config);
    if let Some(book) = books.iter().find(|b| b.id == id) {
        return Ok(book.clone());
    }
    let known = books
        .iter()
        .map(|b| b.id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(DictError::config(format!(
        "unknown book folder '{id}' (known: {known})"
    )))
}

// ---------------------------------------------------------------------------
// Resolved paths (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Concrete filesystem locations for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictPaths {
    /// Dictionaries root.
    pub root: PathBuf,
    /// Default extractor input directory.
    pub gcide_dir: PathBuf,
    /// Base lexicon path.
    pub lexicon: PathBuf,
}

impl DictPaths {
    /// Resolve paths from config, with an optional root override from the CLI.
    pub fn resolve(config: &AppConfig, root_override: Option<&Path>) -> Self {
        let root = root_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&config.paths.root));
        Self {
            gcide_dir: root.join(&config.paths.gcide_dir),
            lexicon: root.join(&config.paths.lexicon),
            root,
        }
    }

    /// Folder for a book's inputs and combined output.
    pub fn book_dir(&self, book: &BookEntry) -> PathBuf {
        self.root.join(&book.id)
    }

    /// Supplementary word list for a book.
    pub fn characters_path(&self, book: &BookEntry) -> PathBuf {
        self.book_dir(book).join(&book.characters)
    }

    /// Combined output file for a book.
    pub fn combined_path(&self, book: &BookEntry) -> PathBuf {
        self.book_dir(book).join(format!("{}.txt", book.output))
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.dictbuilder/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| DictError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.dictbuilder/dictbuilder.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = match config_file_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(error = %e, "no home directory, using default config");
            return Ok(AppConfig::default());
        }
    };

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(DictError::input_not_found(path, "config file does not exist"));
    }

    let content = std::fs::read_to_string(path).map_err(|e| DictError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DictError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Serialize a config to pretty TOML.
pub fn config_to_toml(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config).map_err(|e| DictError::config(e.to_string()))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DictError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let content = config_to_toml(&AppConfig::default())?;

    std::fs::write(&path, content).map_err(|e| DictError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
