use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Largest accepted `max_segments`.
pub const MAX_SEGMENTS_LIMIT: usize = 100;

/// Largest accepted number of `extra_word_chars`.
pub const MAX_EXTRA_WORD_CHARS: usize = 100;

/// Clustering configuration.
///
/// Character sets are written as plain strings (`"/"`, `"?&#"`) so a JSON
/// configuration stays readable. Every character must be a non-NUL ASCII
/// character: the scanner works on bytes and only ever cuts the input at
/// ASCII boundaries, which keeps the output valid UTF-8.
///
/// # Invariants (after `validate`)
/// - `separators` is non-empty and disjoint from `terminators`
/// - `replacement` is neither a separator nor a terminator
/// - `max_segments` is in `1..=100`, `cache_capacity` is positive
/// - `max_processing_length <= max_input_length` when both are set
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
	/// Characters that delimit segments.
	pub separators: String,

	/// Characters that end scanning (query string and fragment markers).
	pub terminators: String,

	/// Character written in place of a wildcarded segment.
	pub replacement: char,

	/// Maximum number of separators scanned before the rest is dropped.
	pub max_segments: usize,

	/// Characters, beyond ASCII letters, that do not disqualify a segment.
	pub extra_word_chars: String,

	/// Number of confirmed words kept in the classification cache.
	pub cache_capacity: usize,

	/// Number of cache shards. `None` uses the number of CPUs.
	pub cache_shards: Option<usize>,

	/// Enables NUL stripping and the length/segment limits of `cluster_checked`.
	pub enable_sanitization: bool,

	/// Hard cap on the raw input length (sanitization only).
	pub max_input_length: Option<usize>,

	/// Hard cap on the sanitized length. Defaults to half of `max_input_length`.
	pub max_processing_length: Option<usize>,

	/// Knowledge base file. The bundled model is used when `None`.
	pub model_path: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			separators: "/".to_owned(),
			terminators: "?&#".to_owned(),
			replacement: '*',
			max_segments: 10,
			extra_word_chars: "-_. ".to_owned(),
			cache_capacity: 8192,
			cache_shards: None,
			enable_sanitization: true,
			max_input_length: Some(8192),
			max_processing_length: None,
			model_path: None,
		}
	}
}

impl Config {
	/// Parses a JSON configuration. Missing fields take their default value.
	///
	/// # Errors
	/// Returns `ConfigInvalid` if the JSON is malformed or fails validation.
	pub fn from_json_str(json: &str) -> Result<Self> {
		let config: Config = serde_json::from_str(json)
			.map_err(|e| ClusterError::config(format!("malformed configuration: {e}")))?;
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a JSON configuration file.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let json = fs::read_to_string(path).map_err(|e| {
			ClusterError::config(format!("unable to read {}: {e}", path.display()))
		})?;
		Self::from_json_str(&json)
	}

	pub fn with_separators(mut self, separators: &str) -> Self {
		self.separators = separators.to_owned();
		self
	}

	pub fn with_terminators(mut self, terminators: &str) -> Self {
		self.terminators = terminators.to_owned();
		self
	}

	pub fn with_replacement(mut self, replacement: char) -> Self {
		self.replacement = replacement;
		self
	}

	pub fn with_max_segments(mut self, max_segments: usize) -> Self {
		self.max_segments = max_segments;
		self
	}

	pub fn with_extra_word_chars(mut self, chars: &str) -> Self {
		self.extra_word_chars = chars.to_owned();
		self
	}

	pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
		self.cache_capacity = capacity;
		self
	}

	pub fn with_cache_shards(mut self, shards: usize) -> Self {
		self.cache_shards = Some(shards);
		self
	}

	pub fn with_sanitization(mut self, enabled: bool) -> Self {
		self.enable_sanitization = enabled;
		self
	}

	pub fn with_max_input_length(mut self, max: Option<usize>) -> Self {
		self.max_input_length = max;
		self
	}

	pub fn with_max_processing_length(mut self, max: Option<usize>) -> Self {
		self.max_processing_length = max;
		self
	}

	pub fn with_model_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
		self.model_path = Some(path.into());
		self
	}

	/// Effective processing cap: explicit value, or half of the input cap.
	pub fn processing_limit(&self) -> Option<usize> {
		self.max_processing_length.or(self.max_input_length.map(|max| max / 2))
	}

	/// Checks every field.
	///
	/// # Errors
	/// Returns `ConfigInvalid` naming the first offending field.
	pub fn validate(&self) -> Result<()> {
		if self.max_segments == 0 {
			return Err(ClusterError::config("max_segments must be greater than 0"));
		}
		if self.max_segments > MAX_SEGMENTS_LIMIT {
			return Err(ClusterError::config(format!(
				"max_segments cannot be greater than {MAX_SEGMENTS_LIMIT}"
			)));
		}
		if self.cache_capacity == 0 {
			return Err(ClusterError::config("cache_capacity must be greater than 0"));
		}
		if self.cache_shards == Some(0) {
			return Err(ClusterError::config("cache_shards must be greater than 0"));
		}
		if self.separators.is_empty() {
			return Err(ClusterError::config("separators cannot be empty"));
		}

		check_ascii("separators", &self.separators)?;
		check_ascii("terminators", &self.terminators)?;
		check_ascii("extra_word_chars", &self.extra_word_chars)?;
		if !is_plain_ascii(self.replacement) {
			return Err(ClusterError::config("replacement must be a non-NUL ASCII character"));
		}

		if self.extra_word_chars.len() > MAX_EXTRA_WORD_CHARS {
			return Err(ClusterError::config(format!(
				"extra_word_chars cannot have more than {MAX_EXTRA_WORD_CHARS} characters"
			)));
		}
		if let Some(c) = self.separators.chars().find(|c| self.terminators.contains(*c)) {
			return Err(ClusterError::config(format!(
				"{c:?} cannot be both a separator and a terminator"
			)));
		}
		if self.separators.contains(self.replacement)
			|| self.terminators.contains(self.replacement)
		{
			return Err(ClusterError::config(
				"replacement cannot be a separator or a terminator",
			));
		}

		if self.max_input_length == Some(0) || self.max_processing_length == Some(0) {
			return Err(ClusterError::config("length limits must be greater than 0"));
		}
		if let (Some(input), Some(processing)) =
			(self.max_input_length, self.max_processing_length)
		{
			if processing > input {
				return Err(ClusterError::config(
					"max_processing_length cannot exceed max_input_length",
				));
			}
		}

		Ok(())
	}
}

fn is_plain_ascii(c: char) -> bool {
	c.is_ascii() && c != '\0'
}

fn check_ascii(field: &str, chars: &str) -> Result<()> {
	match chars.chars().find(|c| !is_plain_ascii(*c)) {
		Some(c) => Err(ClusterError::config(format!(
			"{field} contains {c:?}, only non-NUL ASCII characters are allowed"
		))),
		None => Ok(()),
	}
}
