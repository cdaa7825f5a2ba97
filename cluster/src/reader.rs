use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use wsi_index::{Index, map_set};

use crate::cluster::{Cluster, ClusterCollection};
use crate::error::Result;
use crate::features::{DEFAULT_MAX_FEATURES, FeatureTable};
use crate::format::{self, FEATURE_SEPARATOR};
use crate::logger::{Logger, default_logger};

/// Controls how cluster files are loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Features kept per cluster, ranked by `prob * coverage`.
    /// Default: 600 (also used when set to 0).
    #[serde(default)]
    pub max_features: usize,
}

impl ReaderConfig {
    fn with_defaults(mut self) -> Self {
        if self.max_features == 0 {
            self.max_features = DEFAULT_MAX_FEATURES;
        }
        self
    }
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

/// Parses cluster files into a [`ClusterCollection`].
///
/// Malformed feature entries are reported through the [`Logger`] and skipped.
/// A missing required field or a non-numeric cluster id aborts the read.
/// Blank lines are skipped without a diagnostic rather than treated as
/// malformed.
pub struct ClusterReader {
    cfg: ReaderConfig,
    logger: Arc<dyn Logger>,
}

impl Default for ClusterReader {
    fn default() -> Self {
        Self::new(ReaderConfig::default())
    }
}

impl ClusterReader {
    pub fn new(cfg: ReaderConfig) -> Self {
        Self {
            cfg: cfg.with_defaults(),
            logger: default_logger(),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.cfg
    }

    /// Reads every line of `input`.
    ///
    /// Lines whose name is not in `whitelist` (when given) are skipped.
    /// The input is not closed; pass `&mut reader` to keep using it.
    pub fn read<R, I>(
        &self,
        input: R,
        index: &mut I,
        whitelist: Option<&HashSet<String>>,
    ) -> Result<ClusterCollection<I::Id>>
    where
        R: BufRead,
        I: Index,
    {
        crate::log_info!(self.logger, "reading clusters");
        let mut clusters = ClusterCollection::new();

        for (i, line) in input.lines().enumerate() {
            let line = line?;
            if let Some(cluster) = self.parse_line(&line, i + 1, index, whitelist)? {
                clusters.push(cluster);
            }
        }

        crate::log_debug!(
            self.logger,
            "read {} clusters for {} names",
            clusters.cluster_count(),
            clusters.len()
        );
        Ok(clusters)
    }

    /// Opens `path` and reads it with [`read`](Self::read).
    pub fn read_file<P, I>(
        &self,
        path: P,
        index: &mut I,
        whitelist: Option<&HashSet<String>>,
    ) -> Result<ClusterCollection<I::Id>>
    where
        P: AsRef<Path>,
        I: Index,
    {
        let file = File::open(path)?;
        self.read(BufReader::new(file), index, whitelist)
    }

    fn parse_line<I: Index>(
        &self,
        line: &str,
        line_no: usize,
        index: &mut I,
        whitelist: Option<&HashSet<String>>,
    ) -> Result<Option<Cluster<I::Id>>> {
        if line.is_empty() {
            return Ok(None);
        }

        let fields = format::fields(line);
        let raw_name = fields[0];
        if let Some(whitelist) = whitelist {
            if !whitelist.contains(raw_name) {
                crate::log_debug!(self.logger, "line {}: {:?} not whitelisted", line_no, raw_name);
                return Ok(None);
            }
        }

        let cluster_id = format::parse_cluster_id(
            format::required(&fields, 1, "cluster id", line_no)?,
            line_no,
        )?;
        let raw_label = format::required(&fields, 2, "label", line_no)?;
        let raw_nodes = format::required(&fields, 3, "nodes", line_no)?;

        let name = index.get_index(raw_name);
        let label = index.get_index(raw_label);
        let nodes = map_set(format::list_items(raw_nodes), index);

        let mut features = FeatureTable::new();
        if let Some(raw_features) = fields.get(4) {
            for entry in format::list_items(raw_features) {
                self.parse_feature(entry, line_no, index, &mut features);
            }
        }

        Ok(Some(Cluster::new(
            name,
            cluster_id,
            label,
            nodes,
            features.top_k(self.cfg.max_features),
        )))
    }

    fn parse_feature<I: Index>(
        &self,
        entry: &str,
        line_no: usize,
        index: &mut I,
        features: &mut FeatureTable<I::Id>,
    ) {
        let mut parts: Vec<&str> = entry.split(FEATURE_SEPARATOR).collect();
        // `f:0.5:0.5:` still counts as three parts.
        while parts.len() > 1 && parts.last() == Some(&"") {
            parts.pop();
        }
        let [feature, prob, coverage] = parts.as_slice() else {
            crate::log_warn!(
                self.logger,
                "line {}: malformed feature-count pair (expected feature:prob:coverage): {}",
                line_no,
                entry
            );
            return;
        };

        match (prob.trim().parse::<f32>(), coverage.trim().parse::<f32>()) {
            (Ok(prob), Ok(coverage)) => {
                features.insert(index.get_index(feature), prob, coverage);
            }
            _ => {
                crate::log_warn!(
                    self.logger,
                    "line {}: malformed feature-count pair (invalid number): {}",
                    line_no,
                    entry
                );
            }
        }
    }
}

/// Reads clusters with the default configuration and logger.
pub fn read_clusters<R, I>(
    input: R,
    index: &mut I,
    whitelist: Option<&HashSet<String>>,
) -> Result<ClusterCollection<I::Id>>
where
    R: BufRead,
    I: Index,
{
    ClusterReader::default().read(input, index, whitelist)
}

/// Reads a cluster file with the default configuration and logger.
pub fn read_clusters_file<P, I>(
    path: P,
    index: &mut I,
    whitelist: Option<&HashSet<String>>,
) -> Result<ClusterCollection<I::Id>>
where
    P: AsRef<Path>,
    I: Index,
{
    ClusterReader::default().read_file(path, index, whitelist)
}
