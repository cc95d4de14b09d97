//! Request-path clustering library.
//!
//! Replaces the high-cardinality segments of request paths, log lines or span
//! names (numeric IDs, hashes, random tokens) with a single wildcard, so that
//! `/users/42/orders/9f2c` and `/users/7/orders/a81b` both become
//! `/users/*/orders/*`.
//!
//! This crate provides:
//! - A single-pass, panic-free segment scanner
//! - A character-transition "looks like a real word" classifier
//! - A bounded, striped LRU memo of confirmed words
//!
//! ```no_run
//! use clusterurl_core::Clusterer;
//!
//! let clusterer = Clusterer::with_default_config()?;
//! assert_eq!(clusterer.cluster("/users/fdklsd/j4elk/23993/job/2"), "/users/*/j4elk/*/job/*");
//! # Ok::<(), clusterurl_core::ClusterError>(())
//! ```

/// Path scanning and the `Clusterer` entry point.
pub mod cluster;

/// Knowledge base and word classifier.
pub mod model;

/// Memo of tokens confirmed to be real words.
pub mod cache;

/// Clustering configuration and its validation.
pub mod config;

/// Error and result types.
pub mod error;

/// File helpers (format detection, reading, output paths).
pub mod io;

pub use cache::{CacheStats, ClassificationCache};
pub use cluster::clusterer::Clusterer;
pub use config::Config;
pub use error::{ClusterError, ErrorKind, Result};
pub use model::classifier::{Verdict, WordClassifier};
pub use model::knowledge_base::KnowledgeBase;
