//! Reader and writer for word-sense cluster files.
//!
//! A cluster file holds one induced cluster per line:
//!
//! ```text
//! name \t clusterId \t label \t node1  node2 ... [\t feat:prob:cov  feat:prob:cov ...]
//! ```
//!
//! Tokens are turned into identifiers through a caller-supplied
//! [`wsi_index::Index`], so the same code loads clusters keyed by raw strings
//! or by compact ids.
//!
//! # Example
//!
//! ```rust
//! use std::io::Cursor;
//! use wsi_cluster::{read_clusters, write_clusters};
//! use wsi_index::IdentityIndex;
//!
//! let input = "bank\t0\tfinancial\tmoney  loan\tdeposit:0.5:0.8\n";
//! let clusters = read_clusters(Cursor::new(input), &mut IdentityIndex, None).unwrap();
//!
//! let bank = &clusters.get(&"bank".to_string()).unwrap()[0];
//! assert_eq!(bank.cluster_id, 0);
//! assert_eq!(bank.feature_scores["deposit"], 0.5);
//!
//! let mut out = Vec::new();
//! write_clusters(&mut out, &clusters, &IdentityIndex).unwrap();
//! assert_eq!(out, b"bank\t0\tfinancial\tloan  money\tdeposit:0.5\n");
//! ```
//!
//! # Format caveat
//!
//! The writer emits `feature:value` pairs, but the reader only accepts
//! `feature:prob:coverage` triples. Written features are dropped, with a
//! warning, when read back.
//!
//! # Errors
//!
//! A missing required field or a non-numeric cluster id aborts the whole
//! read. A malformed feature entry only drops that entry and is reported
//! through the [`Logger`].

mod logger;
mod cluster;
mod error;
mod features;
mod format;
mod mapping;
mod reader;
mod writer;

pub use cluster::{Cluster, ClusterCollection, ClusterKey};
pub use error::{ClusterError, Result};
pub use features::{DEFAULT_MAX_FEATURES, FeatureEntry, FeatureTable};
pub use format::{FEATURE_SEPARATOR, FIELD_SEPARATOR, LIST_SEPARATOR};
pub use logger::{Logger, NopLogger, default_logger};
pub use mapping::{ClusterMapping, MappingReader, read_baseline_mapping, read_cluster_mapping};
pub use reader::{ClusterReader, ReaderConfig, read_clusters, read_clusters_file};
pub use writer::{write_cluster, write_clusters, write_clusters_file};

#[cfg(test)]
mod tests;
