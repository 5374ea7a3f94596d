// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::neighboring_clusters::NeighboringClusters;
use super::quality_increment;
use super::work_queue::WorkQueue;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::log;
use crate::network::Network;
use crate::progress_meter;

/// The queue-driven local moving of the Leiden algorithm.
///
/// All nodes start on a randomly ordered work queue. Whenever a dequeued node
/// moves to a better cluster, its neighbors in other clusters are put back on
/// the queue, so only nodes whose surroundings changed get revisited. The
/// sweep ends when the queue drains.
pub fn improve_clustering<T>(
    network: &Network,
    clustering: &mut Clustering,
    adjusted_resolution: f64,
    rng: &mut T,
) -> Result<bool, CoreError>
where
    T: Rng,
{
    log!(
        "Local moving starting for a network with {} nodes and {} edges and an initial clustering with {} clusters",
        network.num_nodes(),
        network.num_edges(),
        clustering.n_clusters()
    );

    if network.num_nodes() <= 1 {
        return Ok(false);
    }
    let mut improved: bool = false;
    let (mut cluster_weights, mut n_nodes_per_cluster) =
        weights_and_counts_per_cluster(network, clustering)?;

    let (mut unused_clusters, mut n_unused_clusters) =
        unused_clusters(network, &n_nodes_per_cluster);

    let mut work_queue: WorkQueue = WorkQueue::items_in_random_order(network.num_nodes(), rng);

    let mut neighboring_clusters: NeighboringClusters =
        NeighboringClusters::with_capacity(network.num_nodes());

    while !work_queue.is_empty() {
        progress_meter!(
            "{}% complete (may repeat as nodes are marked unstable)",
            network.num_nodes() - work_queue.len(),
            network.num_nodes()
        );

        let current_node: usize = work_queue.pop_front()?;
        let current_cluster: usize = clustering.cluster_of(current_node)?;
        let current_node_weight: f64 = network.node_weight(current_node);

        // take the node out of its cluster before enumerating candidates; a
        // cluster emptied by the departure becomes a candidate itself
        n_unused_clusters = leave_current_cluster(
            current_cluster,
            current_node_weight,
            &mut cluster_weights,
            &mut n_nodes_per_cluster,
            &mut unused_clusters,
            n_unused_clusters,
        );

        // the clusters of the node's neighbors plus one empty cluster, so the
        // node can always found a new cluster when that increases the quality
        identify_neighboring_clusters(
            network,
            clustering,
            current_node,
            current_cluster,
            &mut neighboring_clusters,
            &unused_clusters,
            n_unused_clusters,
        )?;

        let best_cluster: usize = best_cluster_for(
            current_cluster,
            current_node_weight,
            adjusted_resolution,
            &neighboring_clusters,
            &cluster_weights,
        );

        let last_unused_cluster: usize = unused_clusters[n_unused_clusters - 1];
        join_cluster(
            best_cluster,
            current_node_weight,
            &mut cluster_weights,
            &mut n_nodes_per_cluster,
            &mut n_unused_clusters,
            last_unused_cluster,
        );

        if best_cluster != current_cluster {
            improved = true;
            clustering.set_cluster(current_node, best_cluster)?;

            // the new cluster may also be a better home for the stable
            // neighbors left behind in other clusters, so put them back on
            // the queue for another look
            trigger_cluster_change(
                network,
                clustering,
                &mut work_queue,
                current_node,
                best_cluster,
            )?;
        }
    }

    if improved {
        clustering.remove_empty_clusters();
    }
    return Ok(improved);
}

fn weights_and_counts_per_cluster(
    network: &Network,
    clustering: &Clustering,
) -> Result<(Vec<f64>, Vec<usize>), CoreError> {
    let mut cluster_weights: Vec<f64> = vec![0_f64; network.num_nodes()];
    let mut n_nodes_per_cluster: Vec<usize> = vec![0; network.num_nodes()];

    for node in 0..network.num_nodes() {
        let cluster: usize = clustering.cluster_of(node)?;
        cluster_weights[cluster] += network.node_weight(node);
        n_nodes_per_cluster[cluster] += 1;
    }
    return Ok((cluster_weights, n_nodes_per_cluster));
}

fn unused_clusters(
    network: &Network,
    n_nodes_per_cluster: &Vec<usize>,
) -> (Vec<usize>, usize) {
    let n_nodes: usize = network.num_nodes();
    let mut unused_clusters: Vec<usize> = vec![0; n_nodes];
    let mut n_unused_clusters: usize = 0;
    for cluster in (0..n_nodes).rev() {
        if n_nodes_per_cluster[cluster] == 0 {
            unused_clusters[n_unused_clusters] = cluster;
            n_unused_clusters += 1;
        }
    }
    return (unused_clusters, n_unused_clusters);
}

fn leave_current_cluster(
    cluster: usize,
    node_weight: f64,
    cluster_weights: &mut Vec<f64>,
    n_nodes_per_cluster: &mut Vec<usize>,
    unused_clusters: &mut Vec<usize>,
    n_unused_clusters: usize,
) -> usize {
    cluster_weights[cluster] -= node_weight;
    n_nodes_per_cluster[cluster] -= 1;

    return if n_nodes_per_cluster[cluster] == 0 {
        unused_clusters[n_unused_clusters] = cluster;
        n_unused_clusters + 1
    } else {
        n_unused_clusters
    };
}

fn identify_neighboring_clusters(
    network: &Network,
    clustering: &Clustering,
    current_node: usize,
    current_cluster: usize,
    neighboring_clusters: &mut NeighboringClusters,
    unused_clusters: &Vec<usize>,
    n_unused_clusters: usize,
) -> Result<(), CoreError> {
    neighboring_clusters.reset_for_current_cluster(current_cluster);
    let next_unused_cluster: usize = unused_clusters[n_unused_clusters - 1];
    neighboring_clusters.increase_cluster_weight(next_unused_cluster, 0_f64);

    let (neighbors, weights) = network.neighbor_slice(current_node);
    for k in 0..neighbors.len() {
        let neighbor_cluster: usize = clustering.cluster_of(neighbors[k])?;
        neighboring_clusters.increase_cluster_weight(neighbor_cluster, weights[k]);
    }
    neighboring_clusters.freeze();
    return Ok(());
}

fn best_cluster_for(
    current_cluster: usize,
    current_node_weight: f64,
    adjusted_resolution: f64,
    neighboring_clusters: &NeighboringClusters,
    cluster_weights: &Vec<f64>,
) -> usize {
    let mut best_cluster: usize = current_cluster;
    let mut max_quality_increment: f64 = quality_increment::calculate(
        neighboring_clusters.cluster_weight(current_cluster),
        current_node_weight,
        cluster_weights[current_cluster],
        adjusted_resolution,
    );

    for test_cluster in neighboring_clusters.iter() {
        let test_cluster: usize = *test_cluster;
        let quality_increment: f64 = quality_increment::calculate(
            neighboring_clusters.cluster_weight(test_cluster),
            current_node_weight,
            cluster_weights[test_cluster],
            adjusted_resolution,
        );
        if quality_increment > max_quality_increment {
            best_cluster = test_cluster;
            max_quality_increment = quality_increment;
        }
    }
    return best_cluster;
}

fn join_cluster(
    cluster: usize,
    node_weight: f64,
    cluster_weights: &mut Vec<f64>,
    n_nodes_per_cluster: &mut Vec<usize>,
    n_unused_clusters: &mut usize,
    last_unused_cluster: usize,
) {
    cluster_weights[cluster] += node_weight;
    n_nodes_per_cluster[cluster] += 1;

    if cluster == last_unused_cluster {
        *n_unused_clusters -= 1
    }
}

fn trigger_cluster_change(
    network: &Network,
    clustering: &Clustering,
    work_queue: &mut WorkQueue,
    node: usize,
    best_cluster: usize,
) -> Result<(), CoreError> {
    for neighbor in network.neighbors_for(node)? {
        if clustering.cluster_of(*neighbor)? != best_cluster {
            work_queue.push_back(*neighbor);
        }
    }
    return Ok(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use crate::quality::cpm_quality;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn three_groups() -> Network {
        // two connected communities plus an isolated pair
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 15.0),
            (1, 2, 15.0),
            (2, 3, 15.0),
            (1, 3, 15.0),
            (0, 2, 15.0),
            (3, 4, 15.0),
            (4, 5, 15.0),
            (4, 6, 15.0),
            (6, 5, 15.0),
            (7, 8, 15.0),
        ];
        return NetworkBuilder::new()
            .node_weights_from_edges()
            .build_from_edge_list(9, edges)
            .unwrap();
    }

    #[test]
    fn test_improve_initial_clustering() {
        let network: Network = three_groups();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(1234);
        let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        let adjusted_resolution: f64 =
            crate::resolution::adjust_resolution(None, &network, true);

        let improved: bool =
            improve_clustering(&network, &mut clustering, adjusted_resolution, &mut rng)
                .unwrap();

        assert!(improved);
        assert_eq!(clustering[0], clustering[1]);
        assert_eq!(clustering[0], clustering[2]);
        assert_eq!(clustering[0], clustering[3]);
        assert_eq!(clustering[4], clustering[5]);
        assert_eq!(clustering[4], clustering[6]);
        assert_eq!(clustering[7], clustering[8]);
        assert_ne!(clustering[0], clustering[4]);
        assert_ne!(clustering[0], clustering[7]);
        assert_ne!(clustering[4], clustering[7]);
    }

    #[test]
    fn test_moves_do_not_decrease_quality() {
        let network: Network = three_groups();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(77);
        let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        let quality_before: f64 = cpm_quality(&network, &clustering, None, true).unwrap();
        let adjusted_resolution: f64 =
            crate::resolution::adjust_resolution(None, &network, true);
        improve_clustering(&network, &mut clustering, adjusted_resolution, &mut rng).unwrap();
        let quality_after: f64 = cpm_quality(&network, &clustering, None, true).unwrap();
        assert!(quality_after >= quality_before);
    }
}
