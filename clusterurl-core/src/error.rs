use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building a clusterer or clustering a path.
///
/// Configuration and model errors surface at construction time only.
/// Length and segment-count errors are produced by
/// [`Clusterer::cluster_checked`](crate::Clusterer::cluster_checked);
/// the unchecked entry point never returns them.
#[derive(Error, Debug)]
pub enum ClusterError {
	#[error("invalid configuration: {0}")]
	ConfigInvalid(String),

	#[error("path too long: {length} characters (max: {max})")]
	PathTooLong { length: usize, max: usize },

	#[error("too many segments: {count} (max: {max})")]
	TooManySegments { count: usize, max: usize },

	#[error("unable to read knowledge base {}: {source}", .path.display())]
	ModelLoadFailed {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("unable to write knowledge base {}: {source}", .path.display())]
	ModelSaveFailed {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("unable to parse knowledge base: {0}")]
	ModelParseFailed(String),

	#[error("internal scan error: {0}")]
	Internal(String),
}

/// Payload-free discriminant of a [`ClusterError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	ConfigInvalid,
	PathTooLong,
	TooManySegments,
	ModelLoadFailed,
	ModelSaveFailed,
	ModelParseFailed,
	Internal,
}

impl ClusterError {
	/// Returns the kind of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			ClusterError::ConfigInvalid(_) => ErrorKind::ConfigInvalid,
			ClusterError::PathTooLong { .. } => ErrorKind::PathTooLong,
			ClusterError::TooManySegments { .. } => ErrorKind::TooManySegments,
			ClusterError::ModelLoadFailed { .. } => ErrorKind::ModelLoadFailed,
			ClusterError::ModelSaveFailed { .. } => ErrorKind::ModelSaveFailed,
			ClusterError::ModelParseFailed(_) => ErrorKind::ModelParseFailed,
			ClusterError::Internal(_) => ErrorKind::Internal,
		}
	}

	pub(crate) fn config(message: impl Into<String>) -> Self {
		ClusterError::ConfigInvalid(message.into())
	}
}

impl From<serde_json::Error> for ClusterError {
	fn from(error: serde_json::Error) -> Self {
		ClusterError::ModelParseFailed(error.to_string())
	}
}

impl From<postcard::Error> for ClusterError {
	fn from(error: postcard::Error) -> Self {
		ClusterError::ModelParseFailed(error.to_string())
	}
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
