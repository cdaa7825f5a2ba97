//! Readers that attach an external resource label to names or clusters.
//!
//! Mapping files share the cluster file layout: tab-separated columns, the
//! name first, and a double-space separated resource list whose first entry
//! (up to its first `:`) is the label.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::io::BufRead;
use std::sync::Arc;

use wsi_index::Index;

use crate::cluster::{Cluster, ClusterCollection, ClusterKey};
use crate::error::Result;
use crate::format;
use crate::logger::{Logger, default_logger};

/// Parses mapping files, reporting skipped and unmatched lines through a
/// [`Logger`].
pub struct MappingReader {
    logger: Arc<dyn Logger>,
}

impl Default for MappingReader {
    fn default() -> Self {
        Self::new()
    }
}

impl MappingReader {
    pub fn new() -> Self {
        Self {
            logger: default_logger(),
        }
    }

    /// Replaces the diagnostics sink.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Reads `name \t resources` lines into `name -> resource label`.
    ///
    /// Unlike [`read_cluster`](Self::read_cluster) this takes no cluster
    /// collection: labels are keyed by name alone, so no cluster is consulted.
    /// A later line for the same name overwrites the earlier one.
    pub fn read_baseline<R, I>(
        &self,
        input: R,
        index: &mut I,
        whitelist: Option<&HashSet<String>>,
    ) -> Result<HashMap<I::Id, String>>
    where
        R: BufRead,
        I: Index,
    {
        let mut mapping = HashMap::new();

        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let Some(fields) = self.fields(&line, line_no, whitelist) else {
                continue;
            };

            let resources = format::required(&fields, 1, "resource", line_no)?;
            let name = index.get_index(fields[0]);
            mapping.insert(name, format::resource_label(resources).to_string());
        }

        Ok(mapping)
    }

    /// Reads `name \t clusterId \t resources` lines and resolves each against
    /// `clusters`.
    ///
    /// A non-numeric cluster id or a missing column aborts the read.
    pub fn read_cluster<R, I>(
        &self,
        input: R,
        index: &mut I,
        whitelist: Option<&HashSet<String>>,
        clusters: &ClusterCollection<I::Id>,
    ) -> Result<ClusterMapping<I::Id>>
    where
        R: BufRead,
        I: Index,
    {
        let mut mapping = ClusterMapping::default();

        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = i + 1;
            let Some(fields) = self.fields(&line, line_no, whitelist) else {
                continue;
            };

            let cluster_id = format::parse_cluster_id(
                format::required(&fields, 1, "cluster id", line_no)?,
                line_no,
            )?;
            let resources = format::required(&fields, 2, "resource", line_no)?;
            let label = format::resource_label(resources).to_string();

            let name = index.get_index(fields[0]);
            match clusters.find(&name, cluster_id) {
                Some(cluster) => {
                    mapping.matched.insert(cluster.key(), label);
                }
                None => {
                    crate::log_debug!(
                        self.logger,
                        "line {}: no cluster {} for {:?}",
                        line_no,
                        cluster_id,
                        fields[0]
                    );
                    mapping.unmatched = Some(label);
                }
            }
        }

        Ok(mapping)
    }

    /// Splits a mapping line, or returns `None` if it is blank or filtered out.
    fn fields<'a>(
        &self,
        line: &'a str,
        line_no: usize,
        whitelist: Option<&HashSet<String>>,
    ) -> Option<Vec<&'a str>> {
        if line.is_empty() {
            return None;
        }
        let fields = format::fields(line);
        if let Some(whitelist) = whitelist {
            if !whitelist.contains(fields[0]) {
                crate::log_debug!(self.logger, "line {}: {:?} not whitelisted", line_no, fields[0]);
                return None;
            }
        }
        Some(fields)
    }
}

/// Reads a baseline mapping with the default logger.
///
/// Takes no cluster collection; see [`MappingReader::read_baseline`].
pub fn read_baseline_mapping<R, I>(
    input: R,
    index: &mut I,
    whitelist: Option<&HashSet<String>>,
) -> Result<HashMap<I::Id, String>>
where
    R: BufRead,
    I: Index,
{
    MappingReader::new().read_baseline(input, index, whitelist)
}

/// Reads a cluster mapping with the default logger.
pub fn read_cluster_mapping<R, I>(
    input: R,
    index: &mut I,
    whitelist: Option<&HashSet<String>>,
    clusters: &ClusterCollection<I::Id>,
) -> Result<ClusterMapping<I::Id>>
where
    R: BufRead,
    I: Index,
{
    MappingReader::new().read_cluster(input, index, whitelist, clusters)
}

/// Resource labels keyed by cluster.
///
/// Lines naming a cluster that is not in the collection share a single
/// unmatched slot; the last such line wins.
#[derive(Debug, Clone)]
pub struct ClusterMapping<N> {
    matched: HashMap<ClusterKey<N>, String>,
    unmatched: Option<String>,
}

impl<N> Default for ClusterMapping<N> {
    fn default() -> Self {
        Self {
            matched: HashMap::new(),
            unmatched: None,
        }
    }
}

impl<N: Clone + Eq + Hash> ClusterMapping<N> {
    pub fn get(&self, key: &ClusterKey<N>) -> Option<&str> {
        self.matched.get(key).map(String::as_str)
    }

    /// Returns the label mapped to `cluster`.
    pub fn get_cluster(&self, cluster: &Cluster<N>) -> Option<&str> {
        self.get(&cluster.key())
    }

    /// Returns the label of the last line that matched no cluster.
    pub fn unmatched(&self) -> Option<&str> {
        self.unmatched.as_deref()
    }

    /// Returns the number of matched clusters.
    pub fn len(&self) -> usize {
        self.matched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matched.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ClusterKey<N>, &str)> + '_ {
        self.matched.iter().map(|(k, v)| (k, v.as_str()))
    }
}
