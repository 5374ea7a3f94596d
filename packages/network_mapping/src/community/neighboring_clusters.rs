// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::slice::Iter;

/// The distinct clusters adjacent to the node currently being moved, together
/// with the summed edge weight from the node into each of them. Entries are
/// NaN-marked when untouched, so resetting between nodes only walks the
/// clusters that were actually seen.
pub struct NeighboringClusters {
    neighboring_clusters: Vec<usize>,
    edge_weight_per_cluster: Vec<f64>,
    current_cluster: Option<usize>,
}

impl NeighboringClusters {
    pub fn with_capacity(length: usize) -> NeighboringClusters {
        return NeighboringClusters {
            neighboring_clusters: Vec::with_capacity(length + 1),
            edge_weight_per_cluster: vec![f64::NAN; length + 1],
            current_cluster: None,
        };
    }

    pub fn reset_for_current_cluster(
        &mut self,
        current_cluster: usize,
    ) {
        if let Some(previous_cluster) = self.current_cluster {
            self.edge_weight_per_cluster[previous_cluster] = f64::NAN;
            for cluster in &self.neighboring_clusters {
                self.edge_weight_per_cluster[*cluster] = f64::NAN;
            }
            self.neighboring_clusters.clear();
        }
        self.current_cluster = Some(current_cluster);
    }

    pub fn increase_cluster_weight(
        &mut self,
        cluster: usize,
        edge_weight: f64,
    ) {
        if self.edge_weight_per_cluster[cluster].is_nan() {
            self.neighboring_clusters.push(cluster);
            self.edge_weight_per_cluster[cluster] = 0_f64;
        }
        self.edge_weight_per_cluster[cluster] += edge_weight;
    }

    /// Gives the current cluster a zero entry if no neighbor belongs to it,
    /// so its weight can always be read.
    pub fn freeze(&mut self) {
        if let Some(current_cluster) = self.current_cluster {
            if self.edge_weight_per_cluster[current_cluster].is_nan() {
                self.edge_weight_per_cluster[current_cluster] = 0_f64;
            }
        }
    }

    pub fn cluster_weight(
        &self,
        cluster: usize,
    ) -> f64 {
        return self.edge_weight_per_cluster[cluster];
    }

    pub fn iter(&self) -> Iter<usize> {
        return self.neighboring_clusters.iter();
    }
}
