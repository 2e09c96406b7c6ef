//! Pipeline orchestration for dictbuilder.
//!
//! Ties markup extraction and lexicon merging into end-to-end batch runs
//! (`extract_dictionary`, `merge_lexicons`), each ending in one atomic write.

pub mod merge;
pub mod pipeline;
pub mod writer;
