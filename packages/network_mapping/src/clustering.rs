// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::ops::Index;

use crate::errors::CoreError;
use crate::safe_vectors::SafeVectors;

pub struct ClusterItem {
    pub node: usize,
    pub cluster: usize,
}

/// A node-to-cluster assignment. `n_clusters` is one more than the largest
/// assigned cluster id; it only equals the number of non-empty clusters once
/// `remove_empty_clusters` has run, and the moving algorithms purposefully
/// leave gaps while they work.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    n_clusters: usize,
    clusters: Vec<usize>,
}

impl Clustering {
    /// Every node in its own cluster, `clusters[i] = i`.
    pub fn new_singleton(n_nodes: usize) -> Clustering {
        let clusters: Vec<usize> = (0..n_nodes).collect();
        return Clustering {
            n_clusters: n_nodes,
            clusters,
        };
    }

    /// Adopts an explicit assignment without sanity checking; `n_clusters`
    /// must be larger than every value in `clusters`.
    pub fn from_assignments(
        clusters: Vec<usize>,
        n_clusters: usize,
    ) -> Clustering {
        return Clustering {
            n_clusters,
            clusters,
        };
    }

    pub fn num_nodes(&self) -> usize {
        return self.clusters.len();
    }

    pub fn n_clusters(&self) -> usize {
        return self.n_clusters;
    }

    pub fn assignments(&self) -> &[usize] {
        return &self.clusters;
    }

    pub fn cluster_of(
        &self,
        node: usize,
    ) -> Result<usize, CoreError> {
        return self
            .clusters
            .get_or_err(node, CoreError::ClusterIndexingError);
    }

    /// Moves a node to a cluster, widening `n_clusters` when the cluster id
    /// has not been used before.
    pub fn set_cluster(
        &mut self,
        node: usize,
        cluster: usize,
    ) -> Result<(), CoreError> {
        return if self.clusters.is_safe_access(node) {
            self.clusters[node] = cluster;
            self.n_clusters = self.n_clusters.max(cluster + 1);
            Ok(())
        } else {
            Err(CoreError::ClusterIndexingError)
        };
    }

    pub fn num_nodes_per_cluster(&self) -> Vec<u64> {
        let mut nodes_per_cluster: Vec<u64> = vec![0_u64; self.n_clusters];
        for cluster in &self.clusters {
            nodes_per_cluster[*cluster] += 1;
        }
        return nodes_per_cluster;
    }

    /// The node ids of every cluster, outer index being the cluster id.
    pub fn nodes_per_cluster(&self) -> Vec<Vec<usize>> {
        let counts: Vec<u64> = self.num_nodes_per_cluster();
        let mut nodes_per_cluster: Vec<Vec<usize>> = Vec::with_capacity(self.n_clusters);
        for cluster in 0..self.n_clusters {
            nodes_per_cluster.push(Vec::with_capacity(counts[cluster] as usize));
        }
        for (node, cluster) in self.clusters.iter().enumerate() {
            nodes_per_cluster[*cluster].push(node);
        }
        return nodes_per_cluster;
    }

    /// Compacts the cluster ids so that they are exactly `0..n_clusters` with
    /// no empty clusters, preserving the relative order of the surviving ids.
    pub fn remove_empty_clusters(&mut self) {
        let mut non_empty_clusters: Vec<bool> = vec![false; self.n_clusters];
        for cluster in &self.clusters {
            non_empty_clusters[*cluster] = true;
        }

        let mut new_id: usize = 0;
        let mut relabeling: Vec<usize> = vec![0; self.n_clusters];
        for cluster in 0..self.n_clusters {
            if non_empty_clusters[cluster] {
                relabeling[cluster] = new_id;
                new_id += 1;
            }
        }

        self.n_clusters = new_id;
        for cluster in self.clusters.iter_mut() {
            *cluster = relabeling[*cluster];
        }
    }

    /// Relabels the clusters by decreasing node count; equal-sized clusters
    /// keep their relative order. Empty clusters fall off the end of the id
    /// range.
    pub fn order_clusters_by_n_nodes(&mut self) {
        let keys: Vec<f64> = self
            .num_nodes_per_cluster()
            .into_iter()
            .map(|count| count as f64)
            .collect();
        self.order_clusters(keys);
    }

    /// Relabels the clusters by decreasing total node weight; equal-weight
    /// clusters keep their relative order. Clusters with zero weight fall off
    /// the end of the id range.
    pub fn order_clusters_by_weight(
        &mut self,
        node_weights: &[f64],
    ) {
        let mut keys: Vec<f64> = vec![0_f64; self.n_clusters];
        for (node, cluster) in self.clusters.iter().enumerate() {
            keys[*cluster] += node_weights[node];
        }
        self.order_clusters(keys);
    }

    fn order_clusters(
        &mut self,
        keys: Vec<f64>,
    ) {
        let mut order: Vec<usize> = (0..self.n_clusters).collect();
        order.sort_by(|a, b| keys[*b].partial_cmp(&keys[*a]).unwrap());
        let mut relabeling: Vec<usize> = vec![0; self.n_clusters];
        let mut n_positive_keys: usize = 0;
        for (new_id, old_id) in order.iter().enumerate() {
            relabeling[*old_id] = new_id;
            if keys[*old_id] > 0_f64 {
                n_positive_keys = new_id + 1;
            }
        }
        for cluster in self.clusters.iter_mut() {
            *cluster = relabeling[*cluster];
        }
        self.n_clusters = n_positive_keys;
    }

    /// Composes another clustering over this one's *clusters*: `other` maps
    /// this clustering's cluster ids onto new cluster ids, so `other` has one
    /// entry per cluster of `self`.
    pub fn merge_clusters(
        &mut self,
        other: &Clustering,
    ) {
        for cluster in self.clusters.iter_mut() {
            *cluster = other.clusters[*cluster];
        }
        self.n_clusters = other.n_clusters;
    }
}

pub struct ClusterIterator<'a> {
    clustering: &'a Clustering,
    next_node: usize,
}

impl<'a> Iterator for ClusterIterator<'a> {
    type Item = ClusterItem;

    fn next(&mut self) -> Option<Self::Item> {
        return if self.next_node == self.clustering.clusters.len() {
            None
        } else {
            let item = ClusterItem {
                node: self.next_node,
                cluster: self.clustering.clusters[self.next_node],
            };
            self.next_node += 1;
            Some(item)
        };
    }
}

impl<'a> IntoIterator for &'a Clustering {
    type Item = ClusterItem;
    type IntoIter = ClusterIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        return ClusterIterator {
            clustering: &self,
            next_node: 0,
        };
    }
}

impl Index<usize> for Clustering {
    type Output = usize;

    fn index(
        &self,
        index: usize,
    ) -> &Self::Output {
        &self.clusters[index]
    }
}

#[cfg(test)]
mod tests {
    use super::Clustering;

    #[test]
    pub fn test_remove_empty_clusters() {
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![3, 3, 5, 1, 2, 2, 9, 0], 10);
        let expected: Clustering = Clustering::from_assignments(vec![3, 3, 4, 1, 2, 2, 5, 0], 6);
        clustering.remove_empty_clusters();
        assert_eq!(clustering, expected);

        let mut clustering: Clustering = Clustering::from_assignments(Vec::new(), 0);
        let expected: Clustering = Clustering::from_assignments(Vec::new(), 0);
        clustering.remove_empty_clusters();
        assert_eq!(clustering, expected);
    }

    #[test]
    pub fn test_merge_clusters() {
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![1, 1, 4, 3, 0, 0, 5, 2], 6);
        let other: Clustering = Clustering::from_assignments(vec![0, 2, 2, 3, 4, 4], 5);
        let expected: Clustering = Clustering::from_assignments(vec![2, 2, 4, 3, 0, 0, 4, 2], 5);
        clustering.merge_clusters(&other);
        assert_eq!(clustering, expected);
    }

    #[test]
    fn test_num_nodes_per_cluster() {
        let clustering: Clustering = Clustering::from_assignments(vec![1, 1, 4, 3, 0, 0, 5, 2], 6);
        let expected: Vec<u64> = vec![2, 2, 1, 1, 1, 1];
        assert_eq!(expected, clustering.num_nodes_per_cluster());
    }

    #[test]
    fn test_nodes_per_cluster() {
        let clustering: Clustering = Clustering::from_assignments(vec![1, 1, 4, 3, 0, 0, 5, 2], 6);
        let expected: Vec<Vec<usize>> =
            vec![vec![4, 5], vec![0, 1], vec![7], vec![3], vec![2], vec![6]];
        assert_eq!(expected, clustering.nodes_per_cluster());
    }

    #[test]
    fn test_order_clusters_by_n_nodes() {
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![2, 2, 2, 0, 0, 1, 1, 1], 3);
        clustering.order_clusters_by_n_nodes();
        // two clusters of three nodes tie; the one with cluster id 1 came first
        assert_eq!(clustering.assignments(), &[1, 1, 1, 2, 2, 0, 0, 0]);
        assert_eq!(clustering.n_clusters(), 3);
    }

    #[test]
    fn test_order_clusters_drops_empty_clusters() {
        let mut clustering: Clustering = Clustering::from_assignments(vec![0, 3, 3], 5);
        clustering.order_clusters_by_n_nodes();
        assert_eq!(clustering.assignments(), &[1, 0, 0]);
        assert_eq!(clustering.n_clusters(), 2);
    }

    #[test]
    fn test_order_clusters_by_weight() {
        let mut clustering: Clustering = Clustering::from_assignments(vec![0, 0, 1, 1], 2);
        let node_weights: Vec<f64> = vec![1.0, 1.0, 5.0, 1.0];
        clustering.order_clusters_by_weight(&node_weights);
        assert_eq!(clustering.assignments(), &[1, 1, 0, 0]);
    }

    #[test]
    fn test_order_then_compact_is_idempotent() {
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![4, 4, 1, 1, 1, 7], 9);
        clustering.order_clusters_by_n_nodes();
        clustering.remove_empty_clusters();
        let once: Clustering = clustering.clone();
        clustering.order_clusters_by_n_nodes();
        clustering.remove_empty_clusters();
        assert_eq!(clustering, once);
    }
}
