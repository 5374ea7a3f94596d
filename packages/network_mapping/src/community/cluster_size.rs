// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::network::Network;

/// Merges away the clusters holding fewer than `min_n_nodes` nodes.
///
/// The smallest cluster below the threshold goes first; it is absorbed by the
/// neighboring cluster with the strongest connection relative to that
/// neighbor's total node weight. A small cluster with no neighbors, or whose
/// best relative connection is shared by several neighbors, is left alone.
/// The merging happens on the aggregated network, so every round costs time
/// proportional to the number of clusters rather than the number of nodes.
///
/// Returns whether any cluster was merged away; cluster ids are compacted on
/// return.
pub fn remove_small_clusters_by_n_nodes(
    network: &Network,
    clustering: &mut Clustering,
    min_n_nodes: u64,
) -> Result<bool, CoreError> {
    clustering.remove_empty_clusters();
    let sizes: Vec<f64> = clustering
        .num_nodes_per_cluster()
        .into_iter()
        .map(|count| count as f64)
        .collect();
    return remove_small_clusters(network, clustering, &sizes, min_n_nodes as f64);
}

/// Like [`remove_small_clusters_by_n_nodes`], with cluster size measured as
/// total node weight instead of node count.
pub fn remove_small_clusters_by_weight(
    network: &Network,
    clustering: &mut Clustering,
    min_weight: f64,
) -> Result<bool, CoreError> {
    clustering.remove_empty_clusters();
    let mut weights: Vec<f64> = vec![0_f64; clustering.n_clusters()];
    for node in 0..clustering.num_nodes() {
        weights[clustering.cluster_of(node)?] += network.node_weight(node);
    }
    return remove_small_clusters(network, clustering, &weights, min_weight);
}

fn remove_small_clusters(
    network: &Network,
    clustering: &mut Clustering,
    initial_sizes: &[f64],
    min_size: f64,
) -> Result<bool, CoreError> {
    let reduced_network: Network = network.create_reduced_network(clustering)?;
    let n_clusters: usize = reduced_network.num_nodes();

    // `merged` relabels the original clusters as merging proceeds; its ids
    // stay within 0..n_clusters and get compacted only at the end
    let mut merged: Clustering = Clustering::new_singleton(n_clusters);
    let mut kept_small: Vec<bool> = vec![false; n_clusters];
    let mut improved: bool = false;

    let mut connection_weight: Vec<f64> = vec![0_f64; n_clusters];
    let mut touched: Vec<usize> = Vec::with_capacity(n_clusters);

    loop {
        let mut sizes: Vec<f64> = vec![0_f64; n_clusters];
        let mut cluster_weights: Vec<f64> = vec![0_f64; n_clusters];
        for original_cluster in 0..n_clusters {
            let target: usize = merged.cluster_of(original_cluster)?;
            sizes[target] += initial_sizes[original_cluster];
            cluster_weights[target] += reduced_network.node_weight(original_cluster);
        }

        let mut smallest: Option<usize> = None;
        for cluster in 0..n_clusters {
            if sizes[cluster] == 0_f64 || sizes[cluster] >= min_size || kept_small[cluster] {
                continue;
            }
            if smallest.map_or(true, |current| sizes[cluster] < sizes[current]) {
                smallest = Some(cluster);
            }
        }
        let small_cluster: usize = match smallest {
            Some(cluster) => cluster,
            None => break,
        };

        // summed connection from the small cluster to each neighboring one
        let members: Vec<Vec<usize>> = merged.nodes_per_cluster();
        for original_cluster in &members[small_cluster] {
            let (neighbors, weights) = reduced_network.edges_for(*original_cluster)?;
            for k in 0..neighbors.len() {
                let neighbor_cluster: usize = merged.cluster_of(neighbors[k])?;
                if neighbor_cluster == small_cluster {
                    continue;
                }
                if connection_weight[neighbor_cluster] == 0_f64 {
                    touched.push(neighbor_cluster);
                }
                connection_weight[neighbor_cluster] += weights[k];
            }
        }

        let mut best_cluster: Option<usize> = None;
        let mut best_relative_connection: f64 = 0_f64;
        let mut n_best: usize = 0;
        for neighbor_cluster in touched.drain(..) {
            let relative_connection: f64 =
                connection_weight[neighbor_cluster] / cluster_weights[neighbor_cluster];
            connection_weight[neighbor_cluster] = 0_f64;
            if relative_connection > best_relative_connection {
                best_cluster = Some(neighbor_cluster);
                best_relative_connection = relative_connection;
                n_best = 1;
            } else if relative_connection == best_relative_connection {
                n_best += 1;
            }
        }

        match best_cluster {
            Some(target) if n_best == 1 => {
                for original_cluster in &members[small_cluster] {
                    merged.set_cluster(*original_cluster, target)?;
                }
                improved = true;
            }
            _ => {
                kept_small[small_cluster] = true;
            }
        }
    }

    if improved {
        clustering.merge_clusters(&merged);
        clustering.remove_empty_clusters();
    }
    return Ok(improved);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn network_with_a_straggler() -> Network {
        // a triangle, a pair, and a straggler hanging off the pair
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            (3, 4, 1.0),
            (4, 5, 3.0),
        ];
        return NetworkBuilder::new()
            .node_weights_from_edges()
            .build_from_edge_list(6, edges)
            .unwrap();
    }

    #[test]
    fn test_small_cluster_merges_into_best_connected_neighbor() {
        let network: Network = network_with_a_straggler();
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![0, 0, 0, 1, 1, 2], 3);
        let improved: bool =
            remove_small_clusters_by_n_nodes(&network, &mut clustering, 2).unwrap();
        assert!(improved);
        assert_eq!(clustering.n_clusters(), 2);
        assert_eq!(clustering[5], clustering[3]);
        assert_eq!(clustering[0], clustering[1]);
    }

    #[test]
    fn test_isolated_small_cluster_is_left_alone() {
        let edges: Vec<(usize, usize, f64)> = vec![(0, 1, 1.0), (1, 2, 1.0)];
        let network: Network = NetworkBuilder::new()
            .build_from_edge_list(4, edges)
            .unwrap();
        let mut clustering: Clustering = Clustering::from_assignments(vec![0, 0, 0, 1], 2);
        let improved: bool =
            remove_small_clusters_by_n_nodes(&network, &mut clustering, 2).unwrap();
        assert!(!improved);
        assert_eq!(clustering.n_clusters(), 2);
    }

    #[test]
    fn test_nothing_below_the_threshold() {
        let network: Network = network_with_a_straggler();
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![0, 0, 0, 1, 1, 1], 2);
        let improved: bool =
            remove_small_clusters_by_n_nodes(&network, &mut clustering, 2).unwrap();
        assert!(!improved);
    }

    #[test]
    fn test_removal_by_weight() {
        let network: Network = network_with_a_straggler();
        let mut clustering: Clustering =
            Clustering::from_assignments(vec![0, 0, 0, 1, 1, 2], 3);
        let improved: bool =
            remove_small_clusters_by_weight(&network, &mut clustering, 4.0).unwrap();
        assert!(improved);
        assert_eq!(clustering[5], clustering[3]);
    }
}
