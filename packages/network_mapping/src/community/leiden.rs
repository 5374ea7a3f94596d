// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::iter;

use rand::Rng;

use super::fast_local_moving;
use super::local_merging;
use super::local_merging::LocalMerging;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::log;
use crate::network::{Network, SubnetworkExtractor};
use crate::resolution::adjust_resolution;

pub const DEFAULT_ITERATIONS: usize = 1;

/// Improves a clustering with the Leiden algorithm, which runs in three
/// phases per cycle:
/// - queue-driven local moving of nodes between clusters
/// - refinement: every cluster is re-clustered from singletons by stochastic
///   local merging, which may split it but never joins nodes across clusters
/// - aggregation of the network over the refined clusters, with the
///   non-refined clusters providing the initial clustering for the
///   aggregated network
///
/// The cycle recurses into the aggregated network until every node sits in
/// its own cluster. A positive `iterations` runs the cycle a fixed number of
/// times; 0 keeps going until a cycle makes no further improvement.
///
/// `randomness` steers the refinement phase: the higher it is, the more of
/// the partition space gets explored. This is the main departure from the
/// purely greedy Louvain algorithm.
///
/// `use_modularity` selects the maximisation function; the network must have
/// been built with the node weighting matching it (total incident edge
/// weights for modularity, typically unit weights for CPM).
pub fn leiden<T>(
    network: &Network,
    clustering: Option<Clustering>,
    iterations: Option<usize>,
    resolution: Option<f64>,
    randomness: Option<f64>,
    rng: &mut T,
    use_modularity: bool,
) -> Result<(bool, Clustering), CoreError>
where
    T: Rng,
{
    let iterations: usize = iterations.unwrap_or(DEFAULT_ITERATIONS);
    let randomness: f64 = randomness.unwrap_or(local_merging::DEFAULT_RANDOMNESS);
    let adjusted_resolution: f64 = adjust_resolution(resolution, network, use_modularity);

    if randomness <= 0_f64 {
        return Err(CoreError::ParameterRangeError("randomness"));
    } else if adjusted_resolution <= 0_f64 {
        return Err(CoreError::ParameterRangeError("resolution"));
    } else if network.num_nodes() == 0 {
        return Err(CoreError::EmptyNetworkError);
    }

    let mut clustering: Clustering =
        clustering.unwrap_or_else(|| Clustering::new_singleton(network.num_nodes()));

    log!(
        "Running Leiden with the {} maximization function for {} iterations over a network with {} nodes and {} edges",
        if use_modularity { "modularity" } else { "cpm" },
        iterations,
        network.num_nodes(),
        network.num_edges(),
    );

    let mut merger: LocalMerging = LocalMerging::with_capacity(network.num_nodes());
    let mut improved: bool = false;
    if iterations > 0 {
        for _ in 0..iterations {
            improved |= improve_clustering(
                network,
                &mut clustering,
                adjusted_resolution,
                randomness,
                &mut merger,
                rng,
            )?;
        }
    } else {
        loop {
            let update: bool = improve_clustering(
                network,
                &mut clustering,
                adjusted_resolution,
                randomness,
                &mut merger,
                rng,
            )?;
            improved |= update;
            if !update {
                break;
            }
        }
    }
    return Ok((improved, clustering));
}

/// One three-phase Leiden cycle, recursing into the aggregated network.
fn improve_clustering<T>(
    network: &Network,
    clustering: &mut Clustering,
    adjusted_resolution: f64,
    randomness: f64,
    merger: &mut LocalMerging,
    rng: &mut T,
) -> Result<bool, CoreError>
where
    T: Rng,
{
    let mut improved: bool =
        fast_local_moving::improve_clustering(network, clustering, adjusted_resolution, rng)?;

    if clustering.n_clusters() == network.num_nodes() {
        return Ok(improved);
    }

    // refinement: re-cluster every cluster's subnetwork from singletons,
    // giving the refined clusters of cluster i the contiguous id range
    // starting at the summed cluster counts of the clusters before it
    let nodes_per_cluster: Vec<Vec<usize>> = clustering.nodes_per_cluster();
    let n_clusters: usize = clustering.n_clusters();
    let mut extractor: SubnetworkExtractor = SubnetworkExtractor::new(network.num_nodes());

    let mut refined_clusters: Vec<usize> = vec![0; network.num_nodes()];
    let mut n_refined_per_cluster: Vec<usize> = Vec::with_capacity(n_clusters);
    let mut n_refined_clusters: usize = 0;
    for cluster in 0..n_clusters {
        let nodes: &Vec<usize> = &nodes_per_cluster[cluster];
        let subnetwork: Network = extractor.subnetwork(network, clustering, cluster, nodes)?;
        let subnetwork_clustering: Clustering =
            merger.merge_clustering(&subnetwork, adjusted_resolution, randomness, rng)?;
        for (local_node, node) in nodes.iter().enumerate() {
            refined_clusters[*node] =
                n_refined_clusters + subnetwork_clustering.cluster_of(local_node)?;
        }
        n_refined_per_cluster.push(subnetwork_clustering.n_clusters());
        n_refined_clusters += subnetwork_clustering.n_clusters();
    }
    let refinement: Clustering =
        Clustering::from_assignments(refined_clusters, n_refined_clusters);

    log!(
        "Refined {} clusters into {} well-connected clusters",
        n_clusters,
        n_refined_clusters
    );

    if refinement.n_clusters() < network.num_nodes() {
        // aggregate over the refinement; every aggregated node inherits the
        // non-refined cluster of its members, which is well defined because
        // refinement never joins nodes across non-refined clusters
        let reduced_network: Network = network.create_reduced_network(&refinement)?;
        let mut initial_clusters: Vec<usize> = Vec::with_capacity(reduced_network.num_nodes());
        for (cluster, n_refined) in n_refined_per_cluster.iter().enumerate() {
            initial_clusters.extend(iter::repeat(cluster).take(*n_refined));
        }
        let mut reduced_clustering: Clustering =
            Clustering::from_assignments(initial_clusters, n_clusters);
        *clustering = refinement;
        improved |= improve_clustering(
            &reduced_network,
            &mut reduced_clustering,
            adjusted_resolution,
            randomness,
            merger,
            rng,
        )?;
        clustering.merge_clusters(&reduced_clustering);
    } else {
        // the refinement kept every node apart; aggregate over the
        // non-refined clusters directly
        let reduced_network: Network = network.create_reduced_network(clustering)?;
        let mut reduced_clustering: Clustering =
            Clustering::new_singleton(reduced_network.num_nodes());
        improved |= improve_clustering(
            &reduced_network,
            &mut reduced_clustering,
            adjusted_resolution,
            randomness,
            merger,
            rng,
        )?;
        clustering.merge_clusters(&reduced_clustering);
    }
    return Ok(improved);
}
