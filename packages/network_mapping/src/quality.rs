// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::network::Network;
use crate::resolution::adjust_resolution;

/// The Constant Potts Model quality of a clustering,
///
/// ```text
/// ( within-cluster edge weight + self-link weight
///   - resolution * sum of squared cluster weights ) / (2 * total edge weight + self-link weight)
/// ```
///
/// where the within-cluster edge weight counts both directions of every edge.
/// With `use_modularity` the resolution is rescaled so that, on a network
/// whose node weights are the per-node total edge weights, this value is the
/// modularity of the clustering.
pub fn cpm_quality(
    network: &Network,
    clustering: &Clustering,
    resolution: Option<f64>,
    use_modularity: bool,
) -> Result<f64, CoreError> {
    let adjusted_resolution: f64 = adjust_resolution(resolution, network, use_modularity);

    let mut quality: f64 = 0_f64;

    for node in 0..network.num_nodes() {
        let node_cluster: usize = clustering.cluster_of(node)?;
        let (neighbors, weights) = network.edges_for(node)?;
        for i in 0..neighbors.len() {
            if clustering.cluster_of(neighbors[i])? == node_cluster {
                quality += weights[i];
            }
        }
    }
    quality += network.total_edge_weight_self_links();

    let mut cluster_weights: Vec<f64> = vec![0_f64; clustering.n_clusters()];
    for node in 0..network.num_nodes() {
        cluster_weights[clustering.cluster_of(node)?] += network.node_weight_at(node)?;
    }
    for cluster_weight in cluster_weights {
        quality -= cluster_weight * cluster_weight * adjusted_resolution;
    }

    quality /=
        2_f64 * network.total_edge_weight() + network.total_edge_weight_self_links();

    return Ok(quality);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn single_edge() -> Network {
        return NetworkBuilder::new()
            .build_from_edge_list(2, vec![(0, 1, 1.0)])
            .unwrap();
    }

    #[test]
    fn test_singleton_quality_is_zero_at_zero_resolution() {
        let network: Network = single_edge();
        let clustering: Clustering = Clustering::new_singleton(2);
        let quality: f64 = cpm_quality(&network, &clustering, Some(0.0), false).unwrap();
        assert_eq!(quality, 0.0);
    }

    #[test]
    fn test_merging_a_single_edge_improves_quality() {
        let network: Network = single_edge();
        let singleton: Clustering = Clustering::new_singleton(2);
        let merged: Clustering = Clustering::from_assignments(vec![0, 0], 1);
        let singleton_quality: f64 =
            cpm_quality(&network, &singleton, Some(0.5), false).unwrap();
        let merged_quality: f64 = cpm_quality(&network, &merged, Some(0.5), false).unwrap();
        assert_eq!(singleton_quality, -0.5);
        assert_eq!(merged_quality, 0.0);
    }

    #[test]
    fn test_modularity_rescales_resolution() {
        let network: Network = NetworkBuilder::new()
            .node_weights_from_edges()
            .build_from_edge_list(3, vec![(0, 1, 1.0), (1, 2, 1.0)])
            .unwrap();
        let clustering: Clustering = Clustering::from_assignments(vec![0, 0, 1], 2);
        let modularity: f64 = cpm_quality(&network, &clustering, Some(1.0), true).unwrap();
        let rescaled: f64 =
            cpm_quality(&network, &clustering, Some(1.0 / 4.0), false).unwrap();
        assert!((modularity - rescaled).abs() < 1e-12);
    }
}
