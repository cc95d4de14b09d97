use std::borrow::Cow;
use std::sync::Arc;

use log::debug;

use super::byte_class::ByteClass;
use super::scanner::{scan, ScanRules};
use crate::cache::ClassificationCache;
use crate::config::Config;
use crate::error::{ClusterError, Result};
use crate::model::classifier::WordClassifier;
use crate::model::knowledge_base::KnowledgeBase;

/// Replaces the variable segments of request paths with a wildcard.
///
/// `/users/fdklsd/j4elk/23993/job/2` becomes `/users/*/j4elk/*/job/*`, so
/// millions of distinct paths collapse into a few templates.
///
/// # Responsibilities
/// - Scan a path once and decide, per segment, to keep or wildcard it
/// - Ask the cache, then the classifier, whether a token is a real word
/// - Enforce the sanitization limits in `cluster_checked`
///
/// # Concurrency
/// `Clusterer` is `Send + Sync`. Share one instance (e.g. behind an `Arc`)
/// between all the threads normalizing paths; only the cache is mutated.
#[derive(Debug)]
pub struct Clusterer {
	config: Config,
	rules: ScanRules,
	classifier: WordClassifier,
	cache: ClassificationCache,
}

impl Clusterer {
	/// Creates a clusterer, loading the model from `config.model_path` or
	/// falling back to the bundled one.
	///
	/// # Errors
	/// - `ConfigInvalid` if the configuration does not validate
	/// - `ModelLoadFailed` / `ModelParseFailed` if the model cannot be loaded
	pub fn new(config: Config) -> Result<Self> {
		config.validate()?;
		let knowledge_base = match &config.model_path {
			Some(path) => KnowledgeBase::load(path)?,
			None => KnowledgeBase::bundled()?,
		};
		Self::with_knowledge_base(config, Arc::new(knowledge_base))
	}

	/// Creates a clusterer with the default configuration and bundled model.
	pub fn with_default_config() -> Result<Self> {
		Self::new(Config::default())
	}

	/// Creates a clusterer around an already loaded model.
	///
	/// Lets several clusterers (e.g. with different separators) share one
	/// knowledge base. `config.model_path` is ignored.
	pub fn with_knowledge_base(config: Config, knowledge_base: Arc<KnowledgeBase>) -> Result<Self> {
		config.validate()?;

		let shards = config.cache_shards.unwrap_or_else(num_cpus::get);
		let cache = ClassificationCache::new(config.cache_capacity, shards)?;
		let rules = ScanRules::from_config(&config)?;

		debug!(
			"clusterer ready: max_segments={}, cache_capacity={}, cache_shards={}, sanitization={}",
			config.max_segments,
			config.cache_capacity,
			cache.shard_count(),
			config.enable_sanitization
		);

		Ok(Self {
			config,
			rules,
			classifier: WordClassifier::new(knowledge_base),
			cache,
		})
	}

	/// Clusters `path`, never failing.
	///
	/// Any condition `cluster_checked` would report makes this return `path`
	/// unchanged.
	pub fn cluster(&self, path: &str) -> String {
		match self.cluster_checked(path) {
			Ok(clustered) => clustered,
			Err(error) => {
				debug!("returning path unchanged: {error}");
				path.to_owned()
			}
		}
	}

	/// Clusters `path`, reporting why it could not be processed.
	///
	/// With sanitization enabled, in order:
	/// 1. the raw length is checked against `max_input_length`
	/// 2. NUL bytes are stripped
	/// 3. the separators before the first terminator are counted against
	///    `max_segments`
	/// 4. the sanitized length is checked against the processing limit
	///
	/// # Errors
	/// - `PathTooLong` / `TooManySegments` when a limit is exceeded
	/// - `Internal` if the scan produced invalid UTF-8 (never expected)
	///
	/// On error the caller's `path` is the value to fall back to.
	pub fn cluster_checked(&self, path: &str) -> Result<String> {
		if path.is_empty() {
			return Ok(String::new());
		}

		let sanitized = self.sanitize(path)?;
		self.validate(&sanitized)?;
		self.process(&sanitized)
	}

	/// Returns `true` if `token` is a real word, memoizing positive verdicts.
	pub fn is_word(&self, token: &str) -> bool {
		if self.cache.lookup(token) {
			return true;
		}
		if !self.classifier.is_word(token) {
			return false;
		}
		self.cache.record(token);
		true
	}

	pub fn is_sanitization_enabled(&self) -> bool {
		self.config.enable_sanitization
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn cache(&self) -> &ClassificationCache {
		&self.cache
	}

	pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
		self.classifier.knowledge_base()
	}

	fn sanitize<'a>(&self, path: &'a str) -> Result<Cow<'a, str>> {
		if !self.config.enable_sanitization {
			return Ok(Cow::Borrowed(path));
		}

		if let Some(max) = self.config.max_input_length {
			if path.len() > max {
				return Err(ClusterError::PathTooLong { length: path.len(), max });
			}
		}

		if path.contains('\0') {
			Ok(Cow::Owned(path.replace('\0', "")))
		} else {
			Ok(Cow::Borrowed(path))
		}
	}

	fn validate(&self, path: &str) -> Result<()> {
		if !self.config.enable_sanitization || path.is_empty() {
			return Ok(());
		}

		// Bytes past the first terminator are never scanned
		let count = path
			.bytes()
			.map(|byte| self.rules.classes.of(byte))
			.take_while(|class| *class != ByteClass::Terminator)
			.filter(|class| *class == ByteClass::Separator)
			.count();
		if count > self.config.max_segments {
			return Err(ClusterError::TooManySegments { count, max: self.config.max_segments });
		}

		if let Some(max) = self.config.processing_limit() {
			if path.len() > max {
				return Err(ClusterError::PathTooLong { length: path.len(), max });
			}
		}

		Ok(())
	}

	fn process(&self, path: &str) -> Result<String> {
		let output = scan(path.as_bytes(), &self.rules, |token| self.is_word_bytes(token));
		String::from_utf8(output).map_err(|e| ClusterError::Internal(e.to_string()))
	}

	/// Tokens are cut at ASCII boundaries, so they are valid UTF-8. Should
	/// one not be, it is out of the alphabet and therefore a word.
	fn is_word_bytes(&self, token: &[u8]) -> bool {
		match std::str::from_utf8(token) {
			Ok(token) => self.is_word(token),
			Err(_) => true,
		}
	}
}
