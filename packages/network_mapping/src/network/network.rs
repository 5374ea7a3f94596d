// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::errors::CoreError;
use crate::safe_vectors::SafeVectors;

/// An undirected weighted network in compressed sparse row form, immutable
/// after construction.
///
/// The adjacency is described by two related collections:
///  - `first_neighbor_indices`, whose indices are node ids and whose values
///    are offsets into the second collection; it carries one trailing entry
///    equal to the total directed edge count, so the neighbors of node `x`
///    are always `neighbors[first_neighbor_indices[x]..first_neighbor_indices[x + 1]]`.
///  - `neighbors`/`edge_weights`, whose indices are directed edge ids.
///
/// Every undirected edge is stored twice, once per direction, with the same
/// weight in both directions, and the neighbors within a node's slice are
/// sorted in ascending order with no duplicates. Self-links are not stored in
/// the adjacency at all; their total weight is folded into
/// `total_edge_weight_self_links`.
#[derive(Clone, Debug, PartialEq)]
pub struct Network {
    pub(crate) node_weights: Vec<f64>,
    pub(crate) first_neighbor_indices: Vec<usize>,
    pub(crate) neighbors: Vec<usize>,
    pub(crate) edge_weights: Vec<f64>,
    pub(crate) total_edge_weight_self_links: f64,
}

impl Network {
    pub(crate) fn new(
        node_weights: Vec<f64>,
        first_neighbor_indices: Vec<usize>,
        neighbors: Vec<usize>,
        edge_weights: Vec<f64>,
        total_edge_weight_self_links: f64,
    ) -> Network {
        return Network {
            node_weights,
            first_neighbor_indices,
            neighbors,
            edge_weights,
            total_edge_weight_self_links,
        };
    }

    pub fn num_nodes(&self) -> usize {
        return self.node_weights.len();
    }

    /// The number of undirected edges; each is stored in both directions.
    pub fn num_edges(&self) -> usize {
        return self.neighbors.len() / 2;
    }

    pub fn node_weight(
        &self,
        node: usize,
    ) -> f64 {
        return self.node_weights[node];
    }

    pub fn node_weight_at(
        &self,
        node: usize,
    ) -> Result<f64, CoreError> {
        return self
            .node_weights
            .get_or_err(node, CoreError::InternalNetworkIndexingError);
    }

    pub fn neighbor_range(
        &self,
        node: usize,
    ) -> Result<(usize, usize), CoreError> {
        if node >= self.num_nodes() {
            return Err(CoreError::InternalNetworkIndexingError);
        }
        return Ok((
            self.first_neighbor_indices[node],
            self.first_neighbor_indices[node + 1],
        ));
    }

    pub fn edges_for(
        &self,
        node: usize,
    ) -> Result<(&[usize], &[f64]), CoreError> {
        let (start, end) = self.neighbor_range(node)?;
        return Ok((&self.neighbors[start..end], &self.edge_weights[start..end]));
    }

    pub fn neighbors_for(
        &self,
        node: usize,
    ) -> Result<&[usize], CoreError> {
        let (start, end) = self.neighbor_range(node)?;
        return Ok(&self.neighbors[start..end]);
    }

    pub fn weights_for(
        &self,
        node: usize,
    ) -> Result<&[f64], CoreError> {
        let (start, end) = self.neighbor_range(node)?;
        return Ok(&self.edge_weights[start..end]);
    }

    pub(crate) fn neighbor_slice(
        &self,
        node: usize,
    ) -> (&[usize], &[f64]) {
        let start: usize = self.first_neighbor_indices[node];
        let end: usize = self.first_neighbor_indices[node + 1];
        return (&self.neighbors[start..end], &self.edge_weights[start..end]);
    }

    /// The total weight of the undirected edges, counting each edge once.
    pub fn total_edge_weight(&self) -> f64 {
        return self.edge_weights.iter().sum::<f64>() / 2_f64;
    }

    pub fn total_edge_weight_self_links(&self) -> f64 {
        return self.total_edge_weight_self_links;
    }

    pub fn total_node_weight(&self) -> f64 {
        return self.node_weights.iter().sum::<f64>();
    }

    pub fn node_weights(&self) -> Vec<f64> {
        return self.node_weights.clone();
    }

    /// For each node, the summed weight of its incident edges, self-links
    /// excluded.
    pub fn total_edge_weight_per_node(&self) -> Vec<f64> {
        let mut per_node: Vec<f64> = Vec::with_capacity(self.num_nodes());
        for node in 0..self.num_nodes() {
            let (_, weights) = self.neighbor_slice(node);
            per_node.push(weights.iter().sum::<f64>());
        }
        return per_node;
    }

    /// Verifies the structural invariants of the representation, returning an
    /// error naming the first violated one. Construction is all-or-nothing:
    /// builders call this before handing the network out.
    pub fn check_integrity(&self) -> Result<(), CoreError> {
        let n_nodes: usize = self.num_nodes();
        if self.first_neighbor_indices.len() != n_nodes + 1 {
            return Err(CoreError::InvalidNetworkError(
                "first neighbor index array must have one entry per node plus a trailing sentinel",
            ));
        }
        if self.first_neighbor_indices[0] != 0
            || self.first_neighbor_indices[n_nodes] != self.neighbors.len()
        {
            return Err(CoreError::InvalidNetworkError(
                "first neighbor indices must start at 0 and end at the directed edge count",
            ));
        }
        if self.neighbors.len() != self.edge_weights.len() {
            return Err(CoreError::InvalidNetworkError(
                "neighbor and edge weight arrays must have equal length",
            ));
        }
        for node in 0..n_nodes {
            if self.first_neighbor_indices[node] > self.first_neighbor_indices[node + 1] {
                return Err(CoreError::InvalidNetworkError(
                    "first neighbor indices must be non-decreasing",
                ));
            }
        }
        for node in 0..n_nodes {
            let (neighbors, weights) = self.neighbor_slice(node);
            for i in 0..neighbors.len() {
                let neighbor: usize = neighbors[i];
                if neighbor >= n_nodes {
                    return Err(CoreError::InvalidNetworkError("neighbor id out of range"));
                }
                if neighbor == node {
                    return Err(CoreError::InvalidNetworkError(
                        "self-links must not appear in the adjacency",
                    ));
                }
                if i > 0 && neighbors[i - 1] >= neighbor {
                    return Err(CoreError::InvalidNetworkError(
                        "neighbors must be sorted in strictly ascending order",
                    ));
                }
                let (reverse_neighbors, reverse_weights) = self.neighbor_slice(neighbor);
                match reverse_neighbors.binary_search(&node) {
                    Ok(position) => {
                        if reverse_weights[position] != weights[i] {
                            return Err(CoreError::InvalidNetworkError(
                                "edge weights must be equal in both directions",
                            ));
                        }
                    }
                    Err(_) => {
                        return Err(CoreError::InvalidNetworkError(
                            "every edge must be present in both directions",
                        ));
                    }
                }
            }
        }
        return Ok(());
    }
}
