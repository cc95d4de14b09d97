//! Property-based tests: the clusterer never panics, never grows its input
//! and is idempotent.

use clusterurl_core::{Clusterer, Config};
use proptest::prelude::*;

fn unchecked() -> Clusterer {
	Clusterer::new(Config::default().with_sanitization(false)).unwrap()
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(256))]

	#[test]
	fn prop_never_longer_than_input(path in any::<String>()) {
		let csf = unchecked();
		prop_assert!(csf.cluster(&path).len() <= path.len());
	}

	#[test]
	fn prop_idempotent(path in "[a-zA-Z0-9/?&#*._ -]{0,64}") {
		let csf = unchecked();
		let once = csf.cluster(&path);
		prop_assert_eq!(csf.cluster(&once), once);
	}

	#[test]
	fn prop_numeric_segments_are_wildcarded(prefix in "[a-z]?", id in 0u64..u64::MAX) {
		let csf = unchecked();
		let path = format!("/{prefix}/{id}");
		let expected = if prefix.is_empty() { "//*".to_owned() } else { format!("/{prefix}/*") };
		prop_assert_eq!(csf.cluster(&path), expected);
	}

	#[test]
	fn prop_checked_never_panics(path in any::<String>()) {
		let csf = Clusterer::with_default_config().unwrap();
		match csf.cluster_checked(&path) {
			Ok(clustered) => prop_assert!(clustered.len() <= path.len()),
			Err(_) => prop_assert_eq!(csf.cluster(&path), path),
		}
	}

	#[test]
	fn prop_output_respects_segment_limit(
		segments in prop::collection::vec("[a-z0-9]{1,6}", 0..40),
	) {
		let csf = unchecked();
		let path = format!("/{}", segments.join("/"));
		let clustered = csf.cluster(&path);
		prop_assert!(clustered.matches('/').count() < 10);
	}
}
