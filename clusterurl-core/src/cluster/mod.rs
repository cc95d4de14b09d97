//! Path scanning and segment substitution.
//!
//! - Byte classification table derived from the configuration (`byte_class`)
//! - Single-pass segment scanner (`scanner`)
//! - The public entry point tying scanner, cache and classifier together
//!   (`clusterer`)

mod byte_class;

/// Single left-to-right pass over a path.
///
/// Delimits segments, applies the structural rules (terminators, segment
/// limit, character classes, leniency) and asks a callback for word verdicts.
mod scanner;

/// `Clusterer`: configuration, model, cache and the checked/unchecked
/// clustering entry points.
pub mod clusterer;
