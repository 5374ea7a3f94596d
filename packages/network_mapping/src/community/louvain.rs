// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::standard_local_moving;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::log;
use crate::network::Network;
use crate::resolution::adjust_resolution;

pub const DEFAULT_ITERATIONS: usize = 1;

/// Improves a clustering with the Louvain algorithm: greedy local moving
/// followed by aggregation of the network over the clusters found, applied
/// recursively to the aggregated network until every node sits in its own
/// cluster.
///
/// A positive `iterations` runs that two-phase cycle a fixed number of times;
/// `iterations` of 0 keeps going until a cycle makes no further improvement.
/// When no initial clustering is given each node starts in its own cluster.
///
/// `use_modularity` selects the maximisation function; the network must have
/// been built with the node weighting matching it (total incident edge
/// weights for modularity, typically unit weights for CPM).
pub fn louvain<T>(
    network: &Network,
    clustering: Option<Clustering>,
    iterations: Option<usize>,
    resolution: Option<f64>,
    rng: &mut T,
    use_modularity: bool,
) -> Result<(bool, Clustering), CoreError>
where
    T: Rng,
{
    let iterations: usize = iterations.unwrap_or(DEFAULT_ITERATIONS);
    let adjusted_resolution: f64 = adjust_resolution(resolution, network, use_modularity);

    if adjusted_resolution <= 0_f64 {
        return Err(CoreError::ParameterRangeError("resolution"));
    } else if network.num_nodes() == 0 {
        return Err(CoreError::EmptyNetworkError);
    }

    let mut clustering: Clustering =
        clustering.unwrap_or_else(|| Clustering::new_singleton(network.num_nodes()));

    log!(
        "Running Louvain with the {} maximization function over a network with {} nodes and {} edges",
        if use_modularity { "modularity" } else { "cpm" },
        network.num_nodes(),
        network.num_edges(),
    );

    let mut improved: bool = false;
    if iterations > 0 {
        for _ in 0..iterations {
            improved |= improve_clustering(network, &mut clustering, adjusted_resolution, rng)?;
        }
    } else {
        loop {
            let update: bool =
                improve_clustering(network, &mut clustering, adjusted_resolution, rng)?;
            improved |= update;
            if !update {
                break;
            }
        }
    }
    return Ok((improved, clustering));
}

/// One two-phase Louvain cycle, recursing into the aggregated network.
fn improve_clustering<T>(
    network: &Network,
    clustering: &mut Clustering,
    adjusted_resolution: f64,
    rng: &mut T,
) -> Result<bool, CoreError>
where
    T: Rng,
{
    let mut improved: bool =
        standard_local_moving::improve_clustering(network, clustering, adjusted_resolution, rng)?;

    if clustering.n_clusters() < network.num_nodes() {
        let reduced_network: Network = network.create_reduced_network(clustering)?;
        let mut reduced_clustering: Clustering =
            Clustering::new_singleton(reduced_network.num_nodes());
        improved |= improve_clustering(
            &reduced_network,
            &mut reduced_clustering,
            adjusted_resolution,
            rng,
        )?;
        clustering.merge_clusters(&reduced_clustering);
    }
    return Ok(improved);
}
