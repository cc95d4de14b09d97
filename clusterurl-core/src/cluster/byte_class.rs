use crate::config::Config;

/// Role of a byte during a scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ByteClass {
	/// Disqualifying: digits, punctuation, non-ASCII bytes...
	Other,
	/// ASCII letter or configured extra word character.
	Word,
	/// Closes the current segment.
	Separator,
	/// Ends the scan (query string, fragment).
	Terminator,
}

/// Byte → class lookup table, derived once from a validated `Config`.
#[derive(Clone, Debug)]
pub(crate) struct ByteClasses {
	table: [ByteClass; 256],
}

impl ByteClasses {
	/// Builds the table.
	///
	/// Later rules win: separators and terminators override word characters
	/// (`validate` guarantees the two are disjoint).
	pub(crate) fn from_config(config: &Config) -> Self {
		let mut table = [ByteClass::Other; 256];
		for byte in (b'a'..=b'z').chain(b'A'..=b'Z').chain(config.extra_word_chars.bytes()) {
			table[usize::from(byte)] = ByteClass::Word;
		}
		for byte in config.separators.bytes() {
			table[usize::from(byte)] = ByteClass::Separator;
		}
		for byte in config.terminators.bytes() {
			table[usize::from(byte)] = ByteClass::Terminator;
		}
		Self { table }
	}

	#[inline]
	pub(crate) fn of(&self, byte: u8) -> ByteClass {
		self.table[usize::from(byte)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_classes() {
		let classes = ByteClasses::from_config(&Config::default());
		assert_eq!(classes.of(b'a'), ByteClass::Word);
		assert_eq!(classes.of(b'Z'), ByteClass::Word);
		assert_eq!(classes.of(b'-'), ByteClass::Word);
		assert_eq!(classes.of(b' '), ByteClass::Word);
		assert_eq!(classes.of(b'/'), ByteClass::Separator);
		assert_eq!(classes.of(b'?'), ByteClass::Terminator);
		assert_eq!(classes.of(b'&'), ByteClass::Terminator);
		assert_eq!(classes.of(b'#'), ByteClass::Terminator);
		assert_eq!(classes.of(b'4'), ByteClass::Other);
		assert_eq!(classes.of(b'*'), ByteClass::Other);
		assert_eq!(classes.of(0xc3), ByteClass::Other);
		assert_eq!(classes.of(0), ByteClass::Other);
	}

	#[test]
	fn test_separator_overrides_word_char() {
		let config = Config::default().with_separators("/.").with_extra_word_chars("._");
		let classes = ByteClasses::from_config(&config);
		assert_eq!(classes.of(b'.'), ByteClass::Separator);
		assert_eq!(classes.of(b'_'), ByteClass::Word);
	}
}
