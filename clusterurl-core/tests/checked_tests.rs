//! `cluster_checked` limits and the never-failing fallback of `cluster`.

use clusterurl_core::{ClusterError, Clusterer, Config, ErrorKind};

#[test]
fn test_checked_matches_unchecked_on_valid_paths() {
	let csf = Clusterer::with_default_config().unwrap();
	for path in ["", "/users/fdklsd/j4elk/23993/job/2", "/attach#section-1", "GET /user_space/"] {
		assert_eq!(csf.cluster_checked(path).unwrap(), csf.cluster(path));
	}
}

#[test]
fn test_too_many_segments_is_reported() {
	let csf = Clusterer::with_default_config().unwrap();
	let path = "/segment-with-special-chars!@$%^*()".repeat(22) + "?param=value";

	let error = csf.cluster_checked(&path).unwrap_err();
	assert_eq!(error.kind(), ErrorKind::TooManySegments);
	assert_eq!(error.to_string(), "too many segments: 22 (max: 10)");

	// The unchecked variant hands the input back
	assert_eq!(csf.cluster(&path), path);
}

#[test]
fn test_pathological_input_stops_at_first_terminator() {
	let path = "/segment-with-special-chars!@#$%^&*()".repeat(22) + "?param=value";

	let csf = Clusterer::with_default_config().unwrap();
	assert_eq!(csf.cluster_checked(&path).unwrap(), "/*");

	let csf = Clusterer::new(Config::default().with_sanitization(false)).unwrap();
	assert_eq!(csf.cluster_checked(&path).unwrap(), "/*");
}

#[test]
fn test_separators_after_terminator_are_not_segments() {
	let csf = Clusterer::with_default_config().unwrap();
	let path = "/login?next=/a/b/c/d/e/f/g/h/i/j";
	assert_eq!(csf.cluster_checked(path).unwrap(), "/login");
	assert_eq!(csf.cluster(path), "/login");
	assert_eq!(csf.cluster("/login#/a/b/c/d/e/f/g/h/i/j/k/l"), "/login");
}

#[test]
fn test_path_too_long_is_reported() {
	let csf = Clusterer::new(Config::default().with_max_input_length(Some(64))).unwrap();
	let path = format!("/users/{}", "a".repeat(100));

	match csf.cluster_checked(&path) {
		Err(ClusterError::PathTooLong { length, max }) => {
			assert_eq!(length, 107);
			assert_eq!(max, 64);
		}
		other => panic!("unexpected result {other:?}"),
	}
	assert_eq!(csf.cluster(&path), path);
}

#[test]
fn test_no_length_limits() {
	let config = Config::default()
		.with_max_input_length(None)
		.with_max_processing_length(None);
	let csf = Clusterer::new(config).unwrap();
	let path = format!("/users/{}", "1".repeat(100_000));
	assert_eq!(csf.cluster_checked(&path).unwrap(), "/users/*");
}

#[test]
fn test_ampersand_as_separator_variant() {
	let config = Config::default().with_separators("/&").with_terminators("?#");
	let csf = Clusterer::new(config).unwrap();
	assert_eq!(csf.cluster("/cart&42&items"), "/cart&*&items");
	assert_eq!(csf.cluster("/cart?x=1&y=2"), "/cart");
}
