//! Shared types, error model, and configuration for dictbuilder.
//!
//! This crate is the foundation depended on by all other dictbuilder crates.
//! It provides:
//! - [`DictError`] — the unified error type
//! - Domain types ([`Entry`], [`TaggedEntry`], [`Lexicon`])
//! - Configuration ([`AppConfig`], [`DictPaths`], the book registry)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, BookEntry, DictPaths, MergeSettings, PathsConfig, book_registry, config_dir,
    config_file_path, config_to_toml, init_config, load_config, load_config_from, lookup_book,
};
pub use error::{DictError, Result};
pub use types::{
    DEFAULT_PROVENANCE_TAG, DEFINITION_SEPARATOR, Entry, Lexicon, TaggedEntry, sanitize_headword,
    single_line,
};
