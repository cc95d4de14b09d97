use super::byte_class::{ByteClass, ByteClasses};
use crate::config::Config;
use crate::error::{ClusterError, Result};

/// Immutable rules of a scan, compiled from a validated `Config`.
#[derive(Clone, Debug)]
pub(crate) struct ScanRules {
	pub(crate) classes: ByteClasses,
	pub(crate) replacement: u8,
	pub(crate) max_segments: usize,
}

impl ScanRules {
	pub(crate) fn from_config(config: &Config) -> Result<Self> {
		let replacement = u8::try_from(config.replacement)
			.map_err(|_| ClusterError::config("replacement must be an ASCII character"))?;
		Ok(Self {
			classes: ByteClasses::from_config(config),
			replacement,
			max_segments: config.max_segments,
		})
	}
}

/// State of the segment being scanned.
///
/// The pending token is always the contiguous input range
/// `start..current`: bytes are never copied until the segment is closed.
struct Segment {
	/// Input offset of the first byte of the token.
	start: usize,
	/// The segment is already known to be wildcarded.
	skip: bool,
	/// One early disqualifying byte may still be tolerated.
	leniency: bool,
}

impl Segment {
	fn starting_at(start: usize) -> Self {
		Self { start, skip: false, leniency: true }
	}
}

/// Scans `input` once, left to right, and returns the clustered bytes.
///
/// `is_word` is only consulted for non-empty tokens that survived the
/// structural rules. The output buffer is sized to the input and never grows
/// past it: every segment is either copied verbatim or shrunk to a single
/// replacement byte.
///
/// # Notes
/// - A terminator ends the scan; the pending token is closed as at end of input.
/// - Reaching `max_segments` separators drops the rest of the input, the
///   separator that reached the limit included.
/// - A token range that cannot be sliced stops the scan with what has been
///   produced so far.
pub(crate) fn scan<F>(input: &[u8], rules: &ScanRules, mut is_word: F) -> Vec<u8>
where
	F: FnMut(&[u8]) -> bool,
{
	let mut output = Vec::with_capacity(input.len());
	let mut segment = Segment::starting_at(0);
	let mut segments = 0usize;
	let mut end = input.len();

	for (index, &byte) in input.iter().enumerate() {
		match rules.classes.of(byte) {
			ByteClass::Terminator => {
				end = index;
				break;
			}
			ByteClass::Separator => {
				if !close(&mut output, input, &segment, index, rules.replacement, &mut is_word) {
					return output;
				}
				segments += 1;
				if segments >= rules.max_segments {
					return output;
				}
				output.push(byte);
				segment = Segment::starting_at(index + 1);
			}
			ByteClass::Word => {}
			ByteClass::Other => {
				if !segment.skip {
					let length = (index + 1).saturating_sub(segment.start);
					if segment.leniency && length == 2 {
						segment.leniency = false;
					} else {
						segment.skip = true;
					}
				}
			}
		}
	}

	close(&mut output, input, &segment, end, rules.replacement, &mut is_word);
	debug_assert!(output.len() <= input.len());
	output
}

/// Writes the closed segment `segment.start..end` to `output`.
///
/// Returns `false` if the range is not a valid slice of `input`.
fn close<F>(
	output: &mut Vec<u8>,
	input: &[u8],
	segment: &Segment,
	end: usize,
	replacement: u8,
	is_word: &mut F,
) -> bool
where
	F: FnMut(&[u8]) -> bool,
{
	if segment.skip {
		output.push(replacement);
		return true;
	}

	let Some(token) = input.get(segment.start..end) else {
		return false;
	};
	if token.is_empty() {
		return true;
	}

	if is_word(token) {
		output.extend_from_slice(token);
	} else {
		output.push(replacement);
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rules(config: &Config) -> ScanRules {
		ScanRules::from_config(config).unwrap()
	}

	/// Scans with a stub classifier: everything is a word except "zzz" tokens.
	fn run(config: &Config, input: &str) -> String {
		let output = scan(input.as_bytes(), &rules(config), |token| !token.starts_with(b"zzz"));
		String::from_utf8(output).unwrap()
	}

	#[test]
	fn test_structural_rules() {
		let config = Config::default();
		assert_eq!(run(&config, ""), "");
		assert_eq!(run(&config, "/users/42"), "/users/*");
		assert_eq!(run(&config, "123/"), "*/");
		assert_eq!(run(&config, "/**"), "/*");
		assert_eq!(run(&config, "/v1/products/22j"), "/v1/products/*");
		assert_eq!(run(&config, "/products//org/3"), "/products//org/*");
		assert_eq!(run(&config, "/zzzabc/x"), "/*/x");
	}

	#[test]
	fn test_leniency_is_single_use() {
		let config = Config::default();
		// second byte disqualifying: tolerated
		assert_eq!(run(&config, "/j4elk"), "/j4elk");
		// a second disqualifying byte in the same segment: wildcarded
		assert_eq!(run(&config, "/j4el5"), "/*");
		// first byte disqualifying: never tolerated
		assert_eq!(run(&config, "/4jelk"), "/*");
		// third byte disqualifying: too late
		assert_eq!(run(&config, "/jk4lm"), "/*");
		// leniency resets on every segment
		assert_eq!(run(&config, "/j4/k5"), "/j4/k5");
	}

	#[test]
	fn test_terminator_closes_pending_token() {
		let config = Config::default();
		assert_eq!(run(&config, "?"), "");
		assert_eq!(run(&config, "/attach?session_id=1&x=2"), "/attach");
		assert_eq!(run(&config, "attach12?"), "*");
		assert_eq!(run(&config, "*&"), "*");
		assert_eq!(run(&config, "/1#"), "/*");
		assert_eq!(run(&config, "a#"), "a");
		assert_eq!(run(&config, "/a/#b/c"), "/a/");
	}

	#[test]
	fn test_segment_limit_truncates() {
		let config = Config::default();
		assert_eq!(run(&config, "/a/b/c/d/e/f/g/h/i/j"), "/a/b/c/d/e/f/g/h/i");
		assert_eq!(run(&config, "/a/b/c/d/e/f/g/h/i/1/x"), "/a/b/c/d/e/f/g/h/i");
		assert_eq!(run(&config, "/a/b/c/d/e/f/g/h/1/j/x"), "/a/b/c/d/e/f/g/h/*");

		let config = Config::default().with_max_segments(1);
		assert_eq!(run(&config, "users/42"), "users");
		assert_eq!(run(&config, "/users"), "");
	}

	#[test]
	fn test_classifier_only_sees_surviving_tokens() {
		let config = Config::default();
		let mut seen = Vec::new();
		scan(b"/users/42/j4elk/22j/", &rules(&config), |token| {
			seen.push(String::from_utf8_lossy(token).into_owned());
			true
		});
		assert_eq!(seen, vec!["users", "j4elk"]);
	}

	#[test]
	fn test_custom_separators_and_replacement() {
		let config = Config::default()
			.with_separators("/&")
			.with_terminators("?#")
			.with_replacement('_')
			.with_extra_word_chars("-");
		assert_eq!(run(&config, "/cart?x=1"), "/cart");
		assert_eq!(run(&config, "a=1&b=2"), "_&_");
		assert_eq!(run(&config, "/user space/"), "/_/");
	}

	#[test]
	fn test_non_ascii_segments_are_wildcarded_whole() {
		let config = Config::default();
		assert_eq!(run(&config, "/é/users"), "/*/users");
		assert_eq!(run(&config, "/aé/users"), "/*/users");
		assert_eq!(run(&config, "/straße"), "/*");
	}

	#[test]
	fn test_output_never_longer_than_input() {
		let config = Config::default();
		for input in ["/1/2/3", "a/b/c", "////", "/?/", "x1y2z3", "/ab!/cd"] {
			assert!(run(&config, input).len() <= input.len());
		}
	}
}
