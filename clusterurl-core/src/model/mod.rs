//! Statistical side of the clusterer.
//!
//! This module provides the "does this look like a real word" machinery:
//! - The immutable character-transition model (`KnowledgeBase`)
//! - The token scorer built on top of it (`WordClassifier`)

/// Character-transition table, alphabet index and gibberish threshold.
///
/// Loaded once (bundled, JSON or `postcard` binary) and validated on load.
pub mod knowledge_base;

/// Average-transition-probability scoring of a single token.
///
/// Tokens the model cannot score are treated as real words.
pub mod classifier;
