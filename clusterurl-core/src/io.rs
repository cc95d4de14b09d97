use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ClusterError, Result};

/// On-disk encoding of a model or configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
	/// Human-readable JSON.
	Json,
	/// Compact `postcard` binary.
	Binary,
}

impl FileFormat {
	/// Picks the format from the file extension.
	///
	/// - `.bin` → `Binary`
	/// - anything else (including no extension) → `Json`
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match path.as_ref().extension().and_then(|e| e.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("bin") => FileFormat::Binary,
			_ => FileFormat::Json,
		}
	}

	/// Canonical file extension of the format.
	pub fn extension(self) -> &'static str {
		match self {
			FileFormat::Json => "json",
			FileFormat::Binary => "bin",
		}
	}
}

/// Reads a whole file into memory.
///
/// I/O failures are reported as `ModelLoadFailed` carrying the path.
pub(crate) fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
	let path = path.as_ref();
	fs::read(path).map_err(|source| ClusterError::ModelLoadFailed {
		path: path.to_path_buf(),
		source,
	})
}

/// Writes `bytes` to `path`, replacing any existing file.
pub(crate) fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	fs::write(path, bytes)
}

/// Path of the `format` counterpart of a model file, next to it.
///
/// `data/model.json` with `Binary` gives `data/model.bin`.
///
/// # Errors
/// `InvalidInput` if `input` has no file name, or already has the target
/// format (the model would be overwritten by its own conversion).
pub fn converted_model_path<P: AsRef<Path>>(input: P, format: FileFormat) -> io::Result<PathBuf> {
	let input = input.as_ref();
	if input.file_stem().is_none() {
		return Err(io::Error::new(io::ErrorKind::InvalidInput, "model path has no file name"));
	}
	if FileFormat::from_path(input) == format && input.extension().is_some() {
		return Err(io::Error::new(
			io::ErrorKind::InvalidInput,
			format!("{} is already a {} model", input.display(), format.extension()),
		));
	}
	Ok(input.with_extension(format.extension()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_from_extension() {
		assert_eq!(FileFormat::from_path("model.bin"), FileFormat::Binary);
		assert_eq!(FileFormat::from_path("model.BIN"), FileFormat::Binary);
		assert_eq!(FileFormat::from_path("model.json"), FileFormat::Json);
		assert_eq!(FileFormat::from_path("model"), FileFormat::Json);
	}

	#[test]
	fn test_converted_model_path() {
		let output = converted_model_path("data/model.json", FileFormat::Binary).unwrap();
		assert_eq!(output, PathBuf::from("data/model.bin"));

		let output = converted_model_path("model", FileFormat::Binary).unwrap();
		assert_eq!(output, PathBuf::from("model.bin"));

		let output = converted_model_path("data/model.bin", FileFormat::Json).unwrap();
		assert_eq!(output, PathBuf::from("data/model.json"));
	}

	#[test]
	fn test_converted_model_path_rejects_same_format() {
		assert!(converted_model_path("", FileFormat::Binary).is_err());
		assert!(converted_model_path("data/model.bin", FileFormat::Binary).is_err());
		assert!(converted_model_path("data/model.json", FileFormat::Json).is_err());
	}

	#[test]
	fn test_read_missing_file() {
		let error = read_file("/nonexistent/clusterurl/model.json").unwrap_err();
		assert_eq!(error.kind(), crate::ErrorKind::ModelLoadFailed);
	}
}
