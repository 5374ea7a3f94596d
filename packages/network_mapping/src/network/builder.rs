// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use super::network::Network;
use crate::errors::CoreError;
use crate::log;

/// Builds a [`Network`] from an edge list or from pre-assembled adjacency
/// arrays.
///
/// Edge lists name each undirected edge once with arbitrary endpoint order,
/// unless [`edges_sorted`](NetworkBuilder::edges_sorted) promises that the
/// caller already supplies the full symmetrised list in lexicographic
/// `(source, target)` order. Duplicate entries for the same pair accumulate
/// their weights; self-links accumulate into the network's self-link total
/// and never enter the adjacency.
#[derive(Clone, Debug, Default)]
pub struct NetworkBuilder {
    node_weights: Option<Vec<f64>>,
    node_weights_from_edges: bool,
    edges_sorted: bool,
    check_integrity: bool,
}

impl NetworkBuilder {
    pub fn new() -> NetworkBuilder {
        return NetworkBuilder::default();
    }

    /// Use the provided node weights instead of the default weight of 1.
    pub fn node_weights(
        mut self,
        node_weights: Vec<f64>,
    ) -> NetworkBuilder {
        self.node_weights = Some(node_weights);
        return self;
    }

    /// Set each node's weight to the summed weight of its incident edges,
    /// self-links excluded. This is the node weighting under which the CPM
    /// maximisation becomes modularity maximisation.
    pub fn node_weights_from_edges(mut self) -> NetworkBuilder {
        self.node_weights_from_edges = true;
        return self;
    }

    /// Promise that the edge list is already symmetrised and sorted
    /// lexicographically by `(source, target)`, skipping the sort.
    pub fn edges_sorted(mut self) -> NetworkBuilder {
        self.edges_sorted = true;
        return self;
    }

    /// Verify the structural invariants of the finished network, failing the
    /// build with the violated invariant instead of handing out a broken
    /// network.
    pub fn check_integrity(mut self) -> NetworkBuilder {
        self.check_integrity = true;
        return self;
    }

    pub fn build_from_edge_list(
        self,
        n_nodes: usize,
        edges: Vec<(usize, usize, f64)>,
    ) -> Result<Network, CoreError> {
        let mut total_edge_weight_self_links: f64 = 0_f64;
        let mut directed: Vec<(usize, usize, f64)> = Vec::with_capacity(edges.len() * 2);
        for (source, target, weight) in edges {
            if source >= n_nodes || target >= n_nodes {
                return Err(CoreError::InvalidNetworkError("edge endpoint out of range"));
            }
            if source == target {
                total_edge_weight_self_links += weight;
            } else if self.edges_sorted {
                directed.push((source, target, weight));
            } else {
                directed.push((source, target, weight));
                directed.push((target, source, weight));
            }
        }
        if !self.edges_sorted {
            directed.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        }
        log!(
            "Building a network with {} nodes from {} directed edges",
            n_nodes,
            directed.len()
        );

        let mut first_neighbor_indices: Vec<usize> = vec![0; n_nodes + 1];
        let mut neighbors: Vec<usize> = Vec::with_capacity(directed.len());
        let mut edge_weights: Vec<f64> = Vec::with_capacity(directed.len());
        let mut current_node: usize = 0;
        for (source, target, weight) in directed {
            if source < current_node {
                return Err(CoreError::InvalidNetworkError(
                    "edge list promised as sorted is out of order",
                ));
            }
            while current_node < source {
                current_node += 1;
                first_neighbor_indices[current_node] = neighbors.len();
            }
            if neighbors.len() > first_neighbor_indices[source]
                && *neighbors.last().unwrap() == target
            {
                // duplicate of the previous pair; weights accumulate
                *edge_weights.last_mut().unwrap() += weight;
            } else {
                neighbors.push(target);
                edge_weights.push(weight);
            }
        }
        while current_node < n_nodes {
            current_node += 1;
            first_neighbor_indices[current_node] = neighbors.len();
        }

        return self.finish(
            n_nodes,
            first_neighbor_indices,
            neighbors,
            edge_weights,
            total_edge_weight_self_links,
        );
    }

    pub fn build_from_adjacency(
        self,
        n_nodes: usize,
        first_neighbor_indices: Vec<usize>,
        neighbors: Vec<usize>,
        edge_weights: Option<Vec<f64>>,
    ) -> Result<Network, CoreError> {
        let edge_weights: Vec<f64> = match edge_weights {
            Some(weights) => {
                if weights.len() != neighbors.len() {
                    return Err(CoreError::InvalidNetworkError(
                        "neighbor and edge weight arrays must have equal length",
                    ));
                }
                weights
            }
            None => vec![1_f64; neighbors.len()],
        };
        if first_neighbor_indices.len() != n_nodes + 1 {
            return Err(CoreError::InvalidNetworkError(
                "first neighbor index array must have one entry per node plus a trailing sentinel",
            ));
        }
        return self.finish(n_nodes, first_neighbor_indices, neighbors, edge_weights, 0_f64);
    }

    fn finish(
        self,
        n_nodes: usize,
        first_neighbor_indices: Vec<usize>,
        neighbors: Vec<usize>,
        edge_weights: Vec<f64>,
        total_edge_weight_self_links: f64,
    ) -> Result<Network, CoreError> {
        let node_weights: Vec<f64> = if let Some(weights) = self.node_weights {
            if weights.len() != n_nodes {
                return Err(CoreError::InvalidNetworkError(
                    "node weight array must have one entry per node",
                ));
            }
            weights
        } else {
            vec![1_f64; n_nodes]
        };
        let mut network: Network = Network::new(
            node_weights,
            first_neighbor_indices,
            neighbors,
            edge_weights,
            total_edge_weight_self_links,
        );
        if self.node_weights_from_edges {
            network.node_weights = network.total_edge_weight_per_node();
        }
        if self.check_integrity {
            network.check_integrity()?;
        }
        return Ok(network);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> Vec<(usize, usize, f64)> {
        return vec![
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            (2, 3, 1.0),
            (3, 5, 1.0),
            (5, 4, 1.0),
            (4, 3, 1.0),
        ];
    }

    #[test]
    fn test_build_from_edge_list() {
        let network: Network = NetworkBuilder::new()
            .check_integrity()
            .build_from_edge_list(6, two_triangles())
            .unwrap();
        assert_eq!(network.num_nodes(), 6);
        assert_eq!(network.num_edges(), 7);
        assert_eq!(network.total_edge_weight(), 7.0);
        assert_eq!(network.total_edge_weight_self_links(), 0.0);
        assert_eq!(network.neighbors_for(2).unwrap(), &[0, 1, 3]);
        assert_eq!(network.neighbors_for(3).unwrap(), &[2, 4, 5]);
        assert_eq!(network.node_weight(0), 1.0);
    }

    #[test]
    fn test_node_weights_from_edges() {
        let network: Network = NetworkBuilder::new()
            .node_weights_from_edges()
            .build_from_edge_list(6, two_triangles())
            .unwrap();
        assert_eq!(network.node_weights(), vec![2.0, 2.0, 3.0, 3.0, 2.0, 2.0]);
        assert_eq!(network.total_node_weight(), 14.0);
    }

    #[test]
    fn test_duplicates_accumulate_and_self_links_fold() {
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 1.0),
            (1, 0, 2.0),
            (1, 1, 4.0),
            (1, 2, 1.0),
        ];
        let network: Network = NetworkBuilder::new()
            .check_integrity()
            .build_from_edge_list(3, edges)
            .unwrap();
        assert_eq!(network.num_edges(), 2);
        assert_eq!(network.weights_for(0).unwrap(), &[3.0]);
        assert_eq!(network.total_edge_weight_self_links(), 4.0);
    }

    #[test]
    fn test_integrity_failure_names_the_invariant() {
        // edge 0->1 present, 1->0 missing
        let result = NetworkBuilder::new().check_integrity().build_from_adjacency(
            2,
            vec![0, 1, 1],
            vec![1],
            Some(vec![1.0]),
        );
        match result {
            Err(CoreError::InvalidNetworkError(reason)) => {
                assert!(reason.contains("both directions"))
            }
            other => panic!("expected an invalid network error, got {:?}", other),
        }
    }

    #[test]
    fn test_asymmetric_weight_is_rejected() {
        let result = NetworkBuilder::new().check_integrity().build_from_adjacency(
            2,
            vec![0, 1, 2],
            vec![1, 0],
            Some(vec![1.0, 2.0]),
        );
        match result {
            Err(CoreError::InvalidNetworkError(reason)) => assert!(reason.contains("equal")),
            other => panic!("expected an invalid network error, got {:?}", other),
        }
    }
}
