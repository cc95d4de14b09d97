use std::hash::Hasher;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use fnv::FnvHasher;
use lru::LruCache;
use parking_lot::Mutex;

use crate::error::{ClusterError, Result};

/// Hit/miss counters of a [`ClassificationCache`].
///
/// Relaxed atomics: the numbers are for monitoring, not synchronization.
#[derive(Debug, Default)]
pub struct CacheStats {
	hits: AtomicU64,
	misses: AtomicU64,
	insertions: AtomicU64,
	evictions: AtomicU64,
}

impl CacheStats {
	pub fn hits(&self) -> u64 {
		self.hits.load(Ordering::Relaxed)
	}

	pub fn misses(&self) -> u64 {
		self.misses.load(Ordering::Relaxed)
	}

	pub fn insertions(&self) -> u64 {
		self.insertions.load(Ordering::Relaxed)
	}

	pub fn evictions(&self) -> u64 {
		self.evictions.load(Ordering::Relaxed)
	}

	/// Fraction of lookups that hit, `0.0` before the first lookup.
	pub fn hit_rate(&self) -> f64 {
		let hits = self.hits();
		let total = hits + self.misses();
		if total == 0 { 0.0 } else { hits as f64 / total as f64 }
	}

	fn reset(&self) {
		self.hits.store(0, Ordering::Relaxed);
		self.misses.store(0, Ordering::Relaxed);
		self.insertions.store(0, Ordering::Relaxed);
		self.evictions.store(0, Ordering::Relaxed);
	}
}

/// Bounded memo of tokens confirmed to be real words.
///
/// Only positive verdicts are ever recorded: gibberish tokens are the
/// high-cardinality ones, caching them would evict the recurring path
/// literals this cache exists for.
///
/// # Concurrency
/// The cache is striped: each shard is an LRU behind its own mutex, picked by
/// an FNV hash of the token. A lookup racing a record for the same token
/// serializes on that shard's lock, and eviction happens under the same lock
/// as the insertion that triggers it.
///
/// # Invariants
/// - `1 <= shards.len() <= capacity`
/// - the shard capacities sum to `capacity`
/// - absence of a token means "never scored, or scored as gibberish"
#[derive(Debug)]
pub struct ClassificationCache {
	shards: Vec<Mutex<LruCache<String, ()>>>,
	capacity: usize,
	stats: CacheStats,
}

impl ClassificationCache {
	/// Creates a cache holding at most `capacity` tokens spread over `shards`
	/// stripes. The shard count is clamped to the capacity.
	///
	/// # Errors
	/// Returns `ConfigInvalid` if `capacity` or `shards` is zero.
	pub fn new(capacity: usize, shards: usize) -> Result<Self> {
		if capacity == 0 || shards == 0 {
			return Err(ClusterError::config(
				"cache capacity and shard count must be greater than 0",
			));
		}

		let shard_count = shards.min(capacity);
		let base = capacity / shard_count;
		let remainder = capacity % shard_count;

		let mut stripes = Vec::with_capacity(shard_count);
		for i in 0..shard_count {
			let size = base + usize::from(i < remainder);
			let size = NonZeroUsize::new(size).ok_or_else(|| {
				ClusterError::config("cache shard capacity must be greater than 0")
			})?;
			stripes.push(Mutex::new(LruCache::new(size)));
		}

		Ok(Self { shards: stripes, capacity, stats: CacheStats::default() })
	}

	fn shard(&self, token: &str) -> &Mutex<LruCache<String, ()>> {
		let mut hasher = FnvHasher::default();
		hasher.write(token.as_bytes());
		let index = (hasher.finish() % self.shards.len() as u64) as usize;
		&self.shards[index]
	}

	/// Returns `true` if `token` is a confirmed word, refreshing its recency.
	pub fn lookup(&self, token: &str) -> bool {
		let found = self.shard(token).lock().get(token).is_some();
		if found {
			self.stats.hits.fetch_add(1, Ordering::Relaxed);
		} else {
			self.stats.misses.fetch_add(1, Ordering::Relaxed);
		}
		found
	}

	/// Marks `token` as a confirmed word, evicting the least recently used
	/// token of its shard if the shard is full.
	pub fn record(&self, token: &str) {
		let evicted = self.shard(token).lock().push(token.to_owned(), ());
		match evicted {
			// Key already present, value replaced
			Some((key, _)) if key == token => {}
			Some(_) => {
				self.stats.insertions.fetch_add(1, Ordering::Relaxed);
				self.stats.evictions.fetch_add(1, Ordering::Relaxed);
			}
			None => {
				self.stats.insertions.fetch_add(1, Ordering::Relaxed);
			}
		}
	}

	/// Returns `true` if `token` is cached, without touching recency or stats.
	pub fn contains(&self, token: &str) -> bool {
		self.shard(token).lock().contains(token)
	}

	/// Number of cached tokens.
	pub fn len(&self) -> usize {
		self.shards.iter().map(|shard| shard.lock().len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Maximum number of cached tokens.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn shard_count(&self) -> usize {
		self.shards.len()
	}

	pub fn stats(&self) -> &CacheStats {
		&self.stats
	}

	/// Drops every cached token and resets the counters.
	pub fn clear(&self) {
		for shard in &self.shards {
			shard.lock().clear();
		}
		self.stats.reset();
	}
}
