// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::quality_increment;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::network::Network;
use crate::random_vector::random_permutation;

/// The greedy single-pass-at-a-time local moving of the Louvain algorithm.
///
/// Nodes are visited cyclically in a random permutation. Each visited node is
/// first taken out of its cluster; it then considers every cluster its
/// neighbors belong to, plus one empty cluster, and joins whichever offers
/// the largest quality increment. Staying put wins ties, so a full cycle
/// without any move is a fixed point and ends the sweep.
///
/// Returns whether any node moved. Empty clusters left behind by the moves
/// are compacted away before returning.
pub fn improve_clustering<T>(
    network: &Network,
    clustering: &mut Clustering,
    adjusted_resolution: f64,
    rng: &mut T,
) -> Result<bool, CoreError>
where
    T: Rng,
{
    let n_nodes: usize = network.num_nodes();
    if n_nodes <= 1 {
        return Ok(false);
    }
    let mut improved: bool = false;

    let mut cluster_weights: Vec<f64> = vec![0_f64; n_nodes];
    let mut n_nodes_per_cluster: Vec<usize> = vec![0; n_nodes];
    for node in 0..n_nodes {
        let cluster: usize = clustering.cluster_of(node)?;
        cluster_weights[cluster] += network.node_weight(node);
        n_nodes_per_cluster[cluster] += 1;
    }

    // stack of empty cluster ids with the smallest id on top; a node can
    // always move into the top one to found a new cluster
    let mut unused_clusters: Vec<usize> = Vec::with_capacity(n_nodes);
    for cluster in (0..n_nodes).rev() {
        if n_nodes_per_cluster[cluster] == 0 {
            unused_clusters.push(cluster);
        }
    }

    let node_order: Vec<usize> = random_permutation(n_nodes, rng);
    let mut edge_weight_per_cluster: Vec<f64> = vec![0_f64; n_nodes];
    let mut neighboring_clusters: Vec<usize> = Vec::with_capacity(n_nodes);

    let mut n_unstable_nodes: usize = n_nodes;
    let mut i: usize = 0;
    loop {
        let node: usize = node_order[i];
        let current_cluster: usize = clustering.cluster_of(node)?;
        let node_weight: f64 = network.node_weight(node);

        // the node leaves its cluster before the candidates are enumerated,
        // so a cluster emptied by the departure is itself a candidate
        cluster_weights[current_cluster] -= node_weight;
        n_nodes_per_cluster[current_cluster] -= 1;
        if n_nodes_per_cluster[current_cluster] == 0 {
            unused_clusters.push(current_cluster);
        }

        let top_unused_cluster: usize = *unused_clusters.last().ok_or(CoreError::QueueError)?;
        neighboring_clusters.clear();
        neighboring_clusters.push(top_unused_cluster);
        let (neighbors, weights) = network.neighbor_slice(node);
        for k in 0..neighbors.len() {
            let neighbor_cluster: usize = clustering.cluster_of(neighbors[k])?;
            if edge_weight_per_cluster[neighbor_cluster] == 0_f64 {
                neighboring_clusters.push(neighbor_cluster);
            }
            edge_weight_per_cluster[neighbor_cluster] += weights[k];
        }

        let mut best_cluster: usize = current_cluster;
        let mut max_quality_increment: f64 = quality_increment::calculate(
            edge_weight_per_cluster[current_cluster],
            node_weight,
            cluster_weights[current_cluster],
            adjusted_resolution,
        );
        for candidate in &neighboring_clusters {
            let candidate: usize = *candidate;
            let increment: f64 = quality_increment::calculate(
                edge_weight_per_cluster[candidate],
                node_weight,
                cluster_weights[candidate],
                adjusted_resolution,
            );
            if increment > max_quality_increment {
                best_cluster = candidate;
                max_quality_increment = increment;
            }
            edge_weight_per_cluster[candidate] = 0_f64;
        }
        edge_weight_per_cluster[current_cluster] = 0_f64;

        cluster_weights[best_cluster] += node_weight;
        n_nodes_per_cluster[best_cluster] += 1;
        if best_cluster == top_unused_cluster {
            unused_clusters.pop();
        }

        n_unstable_nodes -= 1;
        if best_cluster != current_cluster {
            clustering.set_cluster(node, best_cluster)?;
            n_unstable_nodes = n_nodes;
            improved = true;
        }
        if n_unstable_nodes == 0 {
            break;
        }
        i = if i < n_nodes - 1 { i + 1 } else { 0 };
    }

    if improved {
        clustering.remove_empty_clusters();
    }
    return Ok(improved);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use crate::quality::cpm_quality;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn two_cliques_with_bridge() -> Network {
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 1.0),
            (0, 2, 1.0),
            (1, 2, 1.0),
            (2, 3, 1.0),
            (3, 4, 1.0),
            (3, 5, 1.0),
            (4, 5, 1.0),
        ];
        return NetworkBuilder::new()
            .build_from_edge_list(6, edges)
            .unwrap();
    }

    #[test]
    fn test_moves_do_not_decrease_quality() {
        let network: Network = two_cliques_with_bridge();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(8);
        let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        let quality_before: f64 = cpm_quality(&network, &clustering, Some(0.4), false).unwrap();
        let improved: bool =
            improve_clustering(&network, &mut clustering, 0.4, &mut rng).unwrap();
        let quality_after: f64 = cpm_quality(&network, &clustering, Some(0.4), false).unwrap();
        assert!(improved);
        assert!(quality_after >= quality_before);
    }

    #[test]
    fn test_triangles_end_up_together() {
        let network: Network = two_cliques_with_bridge();
        for seed in 0..5 {
            let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(seed);
            let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
            improve_clustering(&network, &mut clustering, 0.4, &mut rng).unwrap();
            assert_eq!(clustering[0], clustering[1]);
            assert_eq!(clustering[0], clustering[2]);
            assert_eq!(clustering[3], clustering[4]);
            assert_eq!(clustering[3], clustering[5]);
            assert_ne!(clustering[0], clustering[3]);
        }
    }

    #[test]
    fn test_stable_clustering_reports_no_improvement() {
        let network: Network = two_cliques_with_bridge();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(8);
        let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        improve_clustering(&network, &mut clustering, 0.4, &mut rng).unwrap();
        let improved_again: bool =
            improve_clustering(&network, &mut clustering, 0.4, &mut rng).unwrap();
        assert!(!improved_again);
    }
}
