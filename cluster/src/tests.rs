//! Codec scenarios: reading, filtering, error recovery and round trips.

use std::collections::HashSet;
use std::io::{self, BufRead, Cursor, Read};
use std::sync::Arc;

use wsi_index::{IdentityIndex, Index, StringIndex};

use super::*;
use crate::logger::CapturingLogger;

fn capturing_reader() -> (ClusterReader, Arc<CapturingLogger>) {
    let logger = Arc::new(CapturingLogger::new());
    let reader = ClusterReader::default().with_logger(logger.clone());
    (reader, logger)
}

fn read_identity(input: &str) -> Result<ClusterCollection<String>> {
    read_clusters(Cursor::new(input), &mut IdentityIndex, None)
}

fn key(s: &str) -> String {
    s.to_string()
}

// ============================================================================
// Nodes
// ============================================================================

#[test]
fn test_trailing_empty_segment() {
    let clusters = read_identity("bank\t1\tfinancial\tmoney  loan  \t").unwrap();
    let bank = &clusters.get(&key("bank")).unwrap()[0];

    assert_eq!(bank.name, "bank");
    assert_eq!(bank.cluster_id, 1);
    assert_eq!(bank.label, "financial");
    assert_eq!(bank.nodes, HashSet::from([key("money"), key("loan")]));
    assert!(bank.feature_scores.is_empty());
}

#[test]
fn test_duplicate_nodes_collapse() {
    let clusters = read_identity("bank\t0\tx\tmoney  money  loan\n").unwrap();
    assert_eq!(clusters.get(&key("bank")).unwrap()[0].nodes.len(), 2);
}

#[test]
fn test_empty_node_field() {
    let clusters = read_identity("bank\t0\tx\t\n").unwrap();
    assert!(clusters.get(&key("bank")).unwrap()[0].nodes.is_empty());
}

#[test]
fn test_nodes_survive_round_trip() {
    let input = "bank\t0\tfinancial\tmoney  loan  credit  cash\n\
                 bank\t1\triver\tshore  water\tbed:0.5:0.5\n";
    let mut index = StringIndex::new();
    let clusters = read_clusters(Cursor::new(input), &mut index, None).unwrap();

    let mut out = Vec::new();
    write_clusters(&mut out, &clusters, &index).unwrap();
    let again = read_clusters(Cursor::new(out), &mut index, None).unwrap();

    assert_eq!(again.cluster_count(), 2);
    for (original, reread) in clusters.clusters().zip(again.clusters()) {
        assert_eq!(original.key(), reread.key());
        assert_eq!(original.label, reread.label);
        assert_eq!(original.nodes, reread.nodes);
    }
}

#[test]
fn test_line_endings() {
    let clusters = read_identity("a\t0\tx\tn1\r\nb\t0\ty\tn2").unwrap();
    assert_eq!(clusters.len(), 2);
    assert!(clusters.get(&key("a")).unwrap()[0].nodes.contains("n1"));
    assert!(clusters.get(&key("b")).unwrap()[0].nodes.contains("n2"));
}

#[test]
fn test_blank_lines_skipped() {
    let clusters = read_identity("\na\t0\tx\tn1\n\n").unwrap();
    assert_eq!(clusters.cluster_count(), 1);
}

// ============================================================================
// Grouping and filtering
// ============================================================================

#[test]
fn test_same_name_keeps_file_order() {
    let input = "bank\t3\triver\tshore\n\
                 bass\t0\tfish\ttrout\n\
                 bank\t1\tfinancial\tmoney\n";
    let clusters = read_identity(input).unwrap();

    let ids: Vec<i32> = clusters
        .get(&key("bank"))
        .unwrap()
        .iter()
        .map(|c| c.cluster_id)
        .collect();
    assert_eq!(ids, vec![3, 1]);

    let names: Vec<&String> = clusters.names().collect();
    assert_eq!(names, vec!["bank", "bass"]);
}

#[test]
fn test_whitelist() {
    let input = "alpha\t0\ta\tx\nbeta\t0\tb\ty\nalpha\t1\ta\tz\n";
    let whitelist = HashSet::from([key("alpha")]);
    let clusters = read_clusters(Cursor::new(input), &mut IdentityIndex, Some(&whitelist)).unwrap();

    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters.get(&key("alpha")).unwrap().len(), 2);
    assert!(!clusters.contains(&key("beta")));
}

#[test]
fn test_whitelist_skips_malformed_lines() {
    // Excluded lines are not parsed at all.
    let input = "beta\tnot-a-number\nalpha\t0\ta\tx\n";
    let whitelist = HashSet::from([key("alpha")]);
    let clusters = read_clusters(Cursor::new(input), &mut IdentityIndex, Some(&whitelist)).unwrap();
    assert_eq!(clusters.cluster_count(), 1);
}

#[test]
fn test_whitelist_does_not_touch_index() {
    let input = "alpha\t0\ta\tx\nbeta\t0\tb\ty\n";
    let whitelist = HashSet::from([key("alpha")]);
    let mut index = StringIndex::new();
    read_clusters(Cursor::new(input), &mut index, Some(&whitelist)).unwrap();

    assert!(index.get("alpha").is_some());
    assert!(index.get("beta").is_none());
    assert!(index.get("y").is_none());
}

// ============================================================================
// Features
// ============================================================================

#[test]
fn test_features_keep_prob() {
    let clusters = read_identity("bank\t0\tx\tmoney\tdeposit:0.5:0.2  loan:0.25:1.0\n").unwrap();
    let bank = &clusters.get(&key("bank")).unwrap()[0];

    assert_eq!(bank.feature_scores.len(), 2);
    assert_eq!(bank.feature_scores["deposit"], 0.5);
    assert_eq!(bank.feature_scores["loan"], 0.25);
}

#[test]
fn test_non_numeric_prob_dropped() {
    let (reader, logger) = capturing_reader();
    let clusters = reader
        .read(Cursor::new("bank\t0\tx\tmoney\tf:abc:1.0  g:0.5:0.5\n"), &mut IdentityIndex, None)
        .unwrap();
    let bank = &clusters.get(&key("bank")).unwrap()[0];

    assert!(!bank.feature_scores.contains_key("f"));
    assert_eq!(bank.feature_scores["g"], 0.5);
    assert_eq!(bank.nodes.len(), 1);

    let warnings = logger.at("warn");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("malformed feature-count pair"));
    assert!(warnings[0].contains("f:abc:1.0"));
}

#[test]
fn test_two_part_feature_dropped() {
    let (reader, logger) = capturing_reader();
    let clusters = reader
        .read(Cursor::new("bank\t0\tx\tmoney\tf:0.5\nbass\t0\ty\tfish\n"), &mut IdentityIndex, None)
        .unwrap();

    assert_eq!(clusters.cluster_count(), 2);
    assert!(clusters.get(&key("bank")).unwrap()[0].feature_scores.is_empty());

    let warnings = logger.at("warn");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("malformed feature-count pair"));
    assert!(warnings[0].contains("line 1"));
    assert!(warnings[0].contains("f:0.5"));
}

#[test]
fn test_trailing_colons_still_three_parts() {
    let (reader, logger) = capturing_reader();
    let clusters = reader
        .read(Cursor::new("bank\t0\tx\tmoney\tf:0.5:0.5:  g:0.25:1.0::\n"), &mut IdentityIndex, None)
        .unwrap();
    let scores = &clusters.get(&key("bank")).unwrap()[0].feature_scores;

    assert_eq!(scores.len(), 2);
    assert_eq!(scores["f"], 0.5);
    assert_eq!(scores["g"], 0.25);
    assert!(logger.at("warn").is_empty());
}

#[test]
fn test_inner_empty_part_is_malformed() {
    let (reader, logger) = capturing_reader();
    let clusters = reader
        .read(Cursor::new("bank\t0\tx\tmoney\tf::0.5:0.5\n"), &mut IdentityIndex, None)
        .unwrap();

    assert!(clusters.get(&key("bank")).unwrap()[0].feature_scores.is_empty());
    assert_eq!(logger.at("warn").len(), 1);
}

#[test]
fn test_info_on_start() {
    let (reader, logger) = capturing_reader();
    reader.read(Cursor::new(""), &mut IdentityIndex, None).unwrap();
    assert_eq!(logger.at("info"), vec!["reading clusters".to_string()]);
    assert!(logger.at("warn").is_empty());
}

fn many_features(n: usize) -> String {
    // Coverage grows with i, so feature i scores higher than feature i - 1.
    let features: Vec<String> = (0..n)
        .map(|i| format!("f{i}:0.5:{}", (i + 1) as f32))
        .collect();
    format!("bank\t0\tx\tmoney\t{}\n", features.join(LIST_SEPARATOR))
}

#[test]
fn test_top_600_features() {
    let clusters = read_identity(&many_features(750)).unwrap();
    let scores = &clusters.get(&key("bank")).unwrap()[0].feature_scores;

    assert_eq!(scores.len(), DEFAULT_MAX_FEATURES);
    for i in 0..150 {
        assert!(!scores.contains_key(&format!("f{i}")), "f{i} should be cut");
    }
    for i in 150..750 {
        assert_eq!(scores[&format!("f{i}")], 0.5);
    }
}

#[test]
fn test_fewer_than_600_features() {
    let clusters = read_identity(&many_features(42)).unwrap();
    assert_eq!(clusters.get(&key("bank")).unwrap()[0].feature_scores.len(), 42);
}

#[test]
fn test_configured_feature_limit() {
    let reader = ClusterReader::new(ReaderConfig { max_features: 3 }).with_logger(Arc::new(NopLogger));
    let clusters = reader
        .read(Cursor::new(many_features(10)), &mut IdentityIndex, None)
        .unwrap();
    let scores = &clusters.get(&key("bank")).unwrap()[0].feature_scores;

    let mut kept: Vec<&String> = scores.keys().collect();
    kept.sort();
    assert_eq!(kept, vec!["f7", "f8", "f9"]);
}

// ============================================================================
// Fatal errors
// ============================================================================

#[test]
fn test_non_numeric_cluster_id_is_fatal() {
    let input = "bank\t0\tx\tmoney\nbank\tx\tfinancial\tloan\n";
    let err = read_identity(input).unwrap_err();
    match err {
        ClusterError::InvalidClusterId { line, value, .. } => {
            assert_eq!(line, 2);
            assert_eq!(value, "x");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_missing_node_field_is_fatal() {
    let err = read_identity("bank\t0\tfinancial\n").unwrap_err();
    assert!(matches!(err, ClusterError::MissingField { line: 1, field: "nodes" }));
}

struct FailingReader;

impl Read for FailingReader {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk gone"))
    }
}

#[test]
fn test_stream_error_is_fatal() {
    let input = Cursor::new("bank\t0\tx\tmoney\n").chain(FailingReader);
    let err = read_clusters(io::BufReader::new(input), &mut IdentityIndex, None).unwrap_err();
    assert!(matches!(err, ClusterError::Io(_)));
}

#[test]
fn test_reader_left_usable() {
    let mut input = Cursor::new("a\t0\tx\tn\n");
    read_clusters(&mut input, &mut IdentityIndex, None).unwrap();
    // Still ours: at end of stream, not consumed or closed.
    assert!(input.fill_buf().unwrap().is_empty());
}

// ============================================================================
// Writer / reader asymmetry
// ============================================================================

#[test]
fn test_written_features_do_not_read_back() {
    let clusters = read_identity("bank\t0\tx\tmoney\tdeposit:0.5:0.5\n").unwrap();
    let mut out = Vec::new();
    write_clusters(&mut out, &clusters, &IdentityIndex).unwrap();
    assert_eq!(String::from_utf8(out.clone()).unwrap(), "bank\t0\tx\tmoney\tdeposit:0.5\n");

    let (reader, logger) = capturing_reader();
    let again = reader.read(Cursor::new(out), &mut IdentityIndex, None).unwrap();
    assert!(again.get(&key("bank")).unwrap()[0].feature_scores.is_empty());
    assert_eq!(logger.at("warn").len(), 1);
}

// ============================================================================
// Files and indexes
// ============================================================================

#[test]
fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clusters.tsv");

    let mut index = StringIndex::new();
    let clusters = read_clusters(
        Cursor::new("bank\t0\tfinancial\tmoney  loan\nbass\t2\tfish\ttrout\n"),
        &mut index,
        None,
    )
    .unwrap();
    write_clusters_file(&path, &clusters, &index).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "bank\t0\tfinancial\tloan  money\nbass\t2\tfish\ttrout\n");

    let again = read_clusters_file(&path, &mut index, None).unwrap();
    let bass = index.get_index("bass");
    assert_eq!(again.find(&bass, 2).unwrap().label, index.get_index("fish"));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_clusters_file(dir.path().join("nope.tsv"), &mut IdentityIndex, None).unwrap_err();
    assert!(matches!(err, ClusterError::Io(_)));
}

#[test]
fn test_shared_index_across_reads() {
    let mut index = StringIndex::new();
    let first = read_clusters(Cursor::new("bank\t0\tx\tmoney\n"), &mut index, None).unwrap();
    let second = read_clusters(Cursor::new("bank\t1\ty\tmoney\n"), &mut index, None).unwrap();

    let bank = index.get_index("bank");
    let money = index.get_index("money");
    assert!(first.get(&bank).unwrap()[0].nodes.contains(&money));
    assert!(second.get(&bank).unwrap()[0].nodes.contains(&money));
    assert_eq!(index.token(&money), Some("money"));
}

#[test]
fn test_default_logger() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let clusters = read_identity("bank\t0\tx\tmoney\tbroken\n").unwrap();
    assert_eq!(clusters.cluster_count(), 1);
}
