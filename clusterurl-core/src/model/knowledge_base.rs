use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{ClusterError, Result};
use crate::io::{read_file, write_file, FileFormat};

/// Model shipped with the crate, used when no model path is configured.
const BUNDLED_MODEL: &str = include_str!("../../assets/model.json");

/// Serialized shape of a knowledge base.
///
/// Accepts both this crate's field names and the go-gibberish ones
/// (`Occurrences`, `Positions`, `Threshold`). Alphabet keys are either the
/// character itself or its decimal code point, which is how go-gibberish
/// writes its `map[rune]int`.
#[derive(Serialize, Deserialize, Clone, Debug)]
struct KnowledgeBaseFile {
	#[serde(alias = "Occurrences")]
	transition_score: Vec<Vec<f64>>,
	#[serde(alias = "Positions")]
	alphabet_index: HashMap<String, usize>,
	#[serde(alias = "Threshold")]
	threshold: f64,
}

/// Immutable character-transition model.
///
/// Holds a square table of log-probabilities where entry `(i, j)` scores
/// "character `i` followed by character `j`", the alphabet mapping characters
/// to table positions, and the gibberish threshold.
///
/// # Invariants
/// - `scores.len() == dimension * dimension`, `dimension > 0`
/// - every alphabet position is `< dimension` and positions are unique
/// - every score and the threshold are finite
///
/// Both serialization formats go through the same validation, so a
/// `KnowledgeBase` value always satisfies the invariants above.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(try_from = "KnowledgeBaseFile", into = "KnowledgeBaseFile")]
pub struct KnowledgeBase {
	dimension: usize,
	scores: Vec<f64>,
	alphabet: HashMap<char, usize>,
	threshold: f64,
}

impl KnowledgeBase {
	/// Builds a knowledge base from its parts.
	///
	/// # Errors
	/// Returns `ModelParseFailed` if any invariant is violated.
	pub fn new(
		transition_score: Vec<Vec<f64>>,
		alphabet_index: HashMap<char, usize>,
		threshold: f64,
	) -> Result<Self> {
		Self::build(transition_score, alphabet_index, threshold)
			.map_err(|InvalidModel(message)| ClusterError::ModelParseFailed(message))
	}

	fn build(
		transition_score: Vec<Vec<f64>>,
		alphabet_index: HashMap<char, usize>,
		threshold: f64,
	) -> std::result::Result<Self, InvalidModel> {
		let dimension = transition_score.len();
		if dimension == 0 {
			return Err(invalid("transition table is empty"));
		}
		if !threshold.is_finite() {
			return Err(invalid("threshold must be a finite number"));
		}

		// Every row is checked before anything is allocated from `dimension`
		for (i, row) in transition_score.iter().enumerate() {
			if row.len() != dimension {
				return Err(invalid(format!(
					"transition table must be square: row {i} has {} entries, expected {dimension}",
					row.len()
				)));
			}
			if let Some(value) = row.iter().find(|v| !v.is_finite()) {
				return Err(invalid(format!("row {i} contains a non-finite score ({value})")));
			}
		}
		let size = dimension.checked_mul(dimension).ok_or_else(|| {
			invalid(format!("transition table dimension {dimension} is too large"))
		})?;

		let mut seen = HashSet::with_capacity(alphabet_index.len());
		for (c, position) in &alphabet_index {
			if *position >= dimension {
				return Err(invalid(format!(
					"character {c:?} maps to position {position}, table dimension is {dimension}"
				)));
			}
			if !seen.insert(*position) {
				return Err(invalid(format!("position {position} is used more than once")));
			}
		}

		let mut scores = Vec::with_capacity(size);
		for row in transition_score {
			scores.extend(row);
		}

		Ok(Self { dimension, scores, alphabet: alphabet_index, threshold })
	}

	/// Returns the model bundled with the crate.
	pub fn bundled() -> Result<Self> {
		Self::from_json_str(BUNDLED_MODEL)
	}

	/// Parses a JSON model.
	pub fn from_json_str(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Decodes a `postcard` binary model.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Loads a model from disk.
	///
	/// - `.bin` files are decoded with `postcard`
	/// - anything else is parsed as JSON
	///
	/// # Errors
	/// - `ModelLoadFailed` if the file cannot be read
	/// - `ModelParseFailed` if the content is malformed or inconsistent
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = read_file(path)?;
		let model = match FileFormat::from_path(path) {
			FileFormat::Binary => Self::from_bytes(&bytes)?,
			FileFormat::Json => {
				let json = std::str::from_utf8(&bytes).map_err(|e| {
					ClusterError::ModelParseFailed(format!("model is not UTF-8: {e}"))
				})?;
				Self::from_json_str(json)?
			}
		};
		debug!(
			"loaded knowledge base from {} ({} characters, threshold {})",
			path.display(),
			model.alphabet.len(),
			model.threshold
		);
		Ok(model)
	}

	/// Writes the model to disk in the format implied by the extension.
	///
	/// Useful to precompile a JSON model into the faster binary form.
	/// Encoding and write failures are both reported as `ModelSaveFailed`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let encoded = match FileFormat::from_path(path) {
			FileFormat::Binary => postcard::to_stdvec(self).map_err(io::Error::other),
			FileFormat::Json => serde_json::to_vec(self).map_err(io::Error::other),
		};
		encoded
			.and_then(|bytes| write_file(path, &bytes))
			.map_err(|source| ClusterError::ModelSaveFailed { path: path.to_path_buf(), source })
	}

	/// Table position of `c`, or `None` if `c` is out of the alphabet.
	#[inline]
	pub fn position(&self, c: char) -> Option<usize> {
		self.alphabet.get(&c).copied()
	}

	/// Log-probability of `to` following `from`.
	///
	/// Returns `None` for positions outside the table.
	#[inline]
	pub fn transition(&self, from: usize, to: usize) -> Option<f64> {
		if from >= self.dimension || to >= self.dimension {
			return None;
		}
		self.scores.get(from * self.dimension + to).copied()
	}

	/// Probability at or below which a token is gibberish.
	pub fn threshold(&self) -> f64 {
		self.threshold
	}

	/// Number of characters in the alphabet.
	pub fn alphabet_len(&self) -> usize {
		self.alphabet.len()
	}
}

impl TryFrom<KnowledgeBaseFile> for KnowledgeBase {
	type Error = InvalidModel;

	fn try_from(file: KnowledgeBaseFile) -> std::result::Result<Self, InvalidModel> {
		let mut alphabet = HashMap::with_capacity(file.alphabet_index.len());
		for (key, position) in file.alphabet_index {
			alphabet.insert(decode_alphabet_key(&key)?, position);
		}
		Self::build(file.transition_score, alphabet, file.threshold)
	}
}

impl From<KnowledgeBase> for KnowledgeBaseFile {
	fn from(model: KnowledgeBase) -> Self {
		let dimension = model.dimension.max(1);
		Self {
			transition_score: model.scores.chunks(dimension).map(<[f64]>::to_vec).collect(),
			alphabet_index: model
				.alphabet
				.into_iter()
				.map(|(c, position)| (c.to_string(), position))
				.collect(),
			threshold: model.threshold,
		}
	}
}

/// Decodes an alphabet key: a single character, or a decimal code point.
fn decode_alphabet_key(key: &str) -> std::result::Result<char, InvalidModel> {
	let mut chars = key.chars();
	if let (Some(c), None) = (chars.next(), chars.next()) {
		return Ok(c);
	}
	key.parse::<u32>()
		.ok()
		.and_then(char::from_u32)
		.ok_or_else(|| invalid(format!("alphabet key {key:?} is not a single character")))
}

/// Invariant violation found while building a knowledge base.
///
/// Displays the bare message: serde stringifies it into its own error, and
/// the `ModelParseFailed` prefix is added once, on conversion.
#[derive(Error, Debug)]
#[error("{0}")]
pub(crate) struct InvalidModel(String);

fn invalid(message: impl Into<String>) -> InvalidModel {
	InvalidModel(message.into())
}
