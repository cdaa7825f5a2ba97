use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// One induced cluster (e.g. one sense of an ambiguous word).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster<N: Eq + Hash> {
    /// Clustering subject, e.g. the ambiguous word.
    pub name: N,

    /// Distinguishes clusters sharing the same `name`.
    #[serde(rename = "id")]
    pub cluster_id: i32,

    pub label: N,

    /// Cluster members.
    pub nodes: HashSet<N>,

    /// Ranked feature profile, `feature -> prob`. May be empty.
    #[serde(rename = "features", default)]
    pub feature_scores: HashMap<N, f32>,
}

impl<N: Eq + Hash> Cluster<N> {
    pub fn new(
        name: N,
        cluster_id: i32,
        label: N,
        nodes: HashSet<N>,
        feature_scores: HashMap<N, f32>,
    ) -> Self {
        Self {
            name,
            cluster_id,
            label,
            nodes,
            feature_scores,
        }
    }

    /// Returns the `(name, cluster_id)` pair identifying this cluster.
    pub fn key(&self) -> ClusterKey<N>
    where
        N: Clone,
    {
        ClusterKey {
            name: self.name.clone(),
            cluster_id: self.cluster_id,
        }
    }
}

/// Identity of a cluster within a [`ClusterCollection`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterKey<N> {
    pub name: N,
    pub cluster_id: i32,
}

/// Clusters grouped by name, in insertion order.
///
/// Both the names and the clusters under each name keep the order in which
/// they were pushed, so writing a collection back out is reproducible.
#[derive(Debug, Clone)]
pub struct ClusterCollection<N: Eq + Hash> {
    groups: Vec<(N, Vec<Cluster<N>>)>,
    positions: HashMap<N, usize>,
}

impl<N: Eq + Hash> Default for ClusterCollection<N> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<N: Clone + Eq + Hash> ClusterCollection<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cluster to the list for its name, creating the list on
    /// first occurrence.
    pub fn push(&mut self, cluster: Cluster<N>) {
        match self.positions.get(&cluster.name) {
            Some(&pos) => self.groups[pos].1.push(cluster),
            None => {
                self.positions.insert(cluster.name.clone(), self.groups.len());
                self.groups.push((cluster.name.clone(), vec![cluster]));
            }
        }
    }

    /// Returns the clusters for `name` in insertion order.
    pub fn get(&self, name: &N) -> Option<&[Cluster<N>]> {
        self.positions
            .get(name)
            .map(|&pos| self.groups[pos].1.as_slice())
    }

    /// Returns the first cluster under `name` with the given id.
    pub fn find(&self, name: &N, cluster_id: i32) -> Option<&Cluster<N>> {
        self.get(name)?
            .iter()
            .find(|c| c.cluster_id == cluster_id)
    }

    pub fn contains(&self, name: &N) -> bool {
        self.positions.contains_key(name)
    }

    /// Iterates `(name, clusters)` groups in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&N, &[Cluster<N>])> + '_ {
        self.groups.iter().map(|(n, cs)| (n, cs.as_slice()))
    }

    /// Iterates names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &N> + '_ {
        self.groups.iter().map(|(n, _)| n)
    }

    /// Iterates every cluster, group by group.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster<N>> + '_ {
        self.groups.iter().flat_map(|(_, cs)| cs.iter())
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the total number of clusters across all names.
    pub fn cluster_count(&self) -> usize {
        self.groups.iter().map(|(_, cs)| cs.len()).sum()
    }
}

impl<N: Clone + Eq + Hash> FromIterator<Cluster<N>> for ClusterCollection<N> {
    fn from_iter<T: IntoIterator<Item = Cluster<N>>>(iter: T) -> Self {
        let mut collection = Self::new();
        for cluster in iter {
            collection.push(cluster);
        }
        collection
    }
}

impl<N: Eq + Hash> IntoIterator for ClusterCollection<N> {
    type Item = (N, Vec<Cluster<N>>);
    type IntoIter = std::vec::IntoIter<(N, Vec<Cluster<N>>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
