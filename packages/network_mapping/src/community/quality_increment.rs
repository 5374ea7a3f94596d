// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

/// The change in the quality value when a node joins a candidate cluster,
/// with the node already taken out of its own cluster:
/// the edge weight between the node and the cluster, minus the resolution
/// times the node weight times the cluster's weight without the node.
/// Every moving and merging algorithm measures candidate moves with exactly
/// this expression.
pub fn calculate(
    cluster_edge_weight: f64,
    node_weight: f64,
    cluster_weight: f64,
    adjusted_resolution: f64,
) -> f64 {
    return cluster_edge_weight - node_weight * cluster_weight * adjusted_resolution;
}
