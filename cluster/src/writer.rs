//! Cluster file writer.
//!
//! The writer emits features as two-part `feature:value` pairs, while the
//! reader only accepts three-part `feature:prob:coverage` entries. Features
//! written here are therefore dropped (with a warning) when the file is read
//! back. Nodes survive a round trip.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use wsi_index::{Index, resolve_all};

use crate::cluster::{Cluster, ClusterCollection};
use crate::error::{ClusterError, Result};
use crate::format::{FEATURE_SEPARATOR, FIELD_SEPARATOR, LIST_SEPARATOR};

/// Writes one cluster as a single newline-terminated line.
///
/// Nodes are sorted by token; features are sorted by value, highest first,
/// with ties broken by token.
pub fn write_cluster<W, I>(out: &mut W, cluster: &Cluster<I::Id>, index: &I) -> Result<()>
where
    W: Write + ?Sized,
    I: Index,
{
    out.write_all(format_cluster(cluster, index)?.as_bytes())?;
    Ok(())
}

/// Writes every cluster in collection order.
pub fn write_clusters<W, I>(out: &mut W, clusters: &ClusterCollection<I::Id>, index: &I) -> Result<()>
where
    W: Write + ?Sized,
    I: Index,
{
    for cluster in clusters.clusters() {
        write_cluster(out, cluster, index)?;
    }
    Ok(())
}

/// Creates (or truncates) `path` and writes every cluster to it.
pub fn write_clusters_file<P, I>(path: P, clusters: &ClusterCollection<I::Id>, index: &I) -> Result<()>
where
    P: AsRef<Path>,
    I: Index,
{
    let mut out = BufWriter::new(File::create(path)?);
    write_clusters(&mut out, clusters, index)?;
    out.flush()?;
    Ok(())
}

fn format_cluster<I: Index>(cluster: &Cluster<I::Id>, index: &I) -> Result<String> {
    let name = index
        .token(&cluster.name)
        .ok_or(ClusterError::UnknownId { field: "name" })?;
    let label = index
        .token(&cluster.label)
        .ok_or(ClusterError::UnknownId { field: "label" })?;
    let mut nodes = resolve_all(&cluster.nodes, index).ok_or(ClusterError::UnknownId { field: "node" })?;
    nodes.sort_unstable();

    let mut line = format!(
        "{name}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{label}{FIELD_SEPARATOR}{}",
        cluster.cluster_id,
        nodes.join(LIST_SEPARATOR)
    );

    if !cluster.feature_scores.is_empty() {
        let mut features = Vec::with_capacity(cluster.feature_scores.len());
        for (feature, &value) in &cluster.feature_scores {
            let feature = index
                .token(feature)
                .ok_or(ClusterError::UnknownId { field: "feature" })?;
            features.push((feature, value));
        }
        features.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let pairs: Vec<String> = features
            .iter()
            .map(|(feature, value)| format!("{feature}{FEATURE_SEPARATOR}{value:?}"))
            .collect();
        line.push(FIELD_SEPARATOR);
        line.push_str(&pairs.join(LIST_SEPARATOR));
    }

    line.push('\n');
    Ok(line)
}
