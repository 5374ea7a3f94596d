// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::network::Network;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::log;

impl Network {
    /// Divides each edge weight by the weight expected under a configuration
    /// model, `n_i * n_j / total_node_weight`. The result shares this
    /// network's topology with unit node weights and no self-links.
    pub fn create_normalized_network_using_association_strength(&self) -> Network {
        let total_node_weight: f64 = self.total_node_weight();
        let mut edge_weights: Vec<f64> = Vec::with_capacity(self.edge_weights.len());
        for node in 0..self.num_nodes() {
            let (neighbors, weights) = self.neighbor_slice(node);
            for i in 0..neighbors.len() {
                let expected: f64 =
                    self.node_weights[node] * self.node_weights[neighbors[i]] / total_node_weight;
                edge_weights.push(weights[i] / expected);
            }
        }
        return Network::new(
            vec![1_f64; self.num_nodes()],
            self.first_neighbor_indices.clone(),
            self.neighbors.clone(),
            edge_weights,
            0_f64,
        );
    }

    /// Multiplies each edge weight by the average of `n / n_i` and `n / n_j`,
    /// spreading each node's unit of weight over its incident edges. The
    /// result shares this network's topology with unit node weights and no
    /// self-links.
    pub fn create_normalized_network_using_fractionalization(&self) -> Network {
        let n_nodes: f64 = self.num_nodes() as f64;
        let mut edge_weights: Vec<f64> = Vec::with_capacity(self.edge_weights.len());
        for node in 0..self.num_nodes() {
            let (neighbors, weights) = self.neighbor_slice(node);
            for i in 0..neighbors.len() {
                let scale: f64 = (n_nodes / self.node_weights[node]
                    + n_nodes / self.node_weights[neighbors[i]])
                    / 2_f64;
                edge_weights.push(weights[i] * scale);
            }
        }
        return Network::new(
            vec![1_f64; self.num_nodes()],
            self.first_neighbor_indices.clone(),
            self.neighbors.clone(),
            edge_weights,
            0_f64,
        );
    }

    /// Resets all node weights to 1, leaving edge weights untouched.
    pub fn create_network_without_normalization(&self) -> Network {
        return Network::new(
            vec![1_f64; self.num_nodes()],
            self.first_neighbor_indices.clone(),
            self.neighbors.clone(),
            self.edge_weights.clone(),
            self.total_edge_weight_self_links,
        );
    }

    /// Keeps only the `max_n_edges` undirected edges with the largest
    /// weights. Ties at the threshold weight are broken by a per-pair
    /// pseudorandom draw that is symmetric in the endpoints, so the pruned
    /// network stays symmetric and a seeded generator reproduces the choice.
    ///
    /// The tie-breaking table is quadratic in the node count; this transform
    /// is meant for the small networks that get visualised, not for bulk
    /// graphs.
    pub fn create_pruned_network<T>(
        &self,
        max_n_edges: usize,
        rng: &mut T,
    ) -> Network
    where
        T: Rng,
    {
        let n_undirected: usize = self.num_edges();
        if max_n_edges >= n_undirected {
            return self.clone();
        }
        let n_nodes: usize = self.num_nodes();

        let mut undirected_weights: Vec<f64> = Vec::with_capacity(n_undirected);
        for node in 0..n_nodes {
            let (neighbors, weights) = self.neighbor_slice(node);
            for i in 0..neighbors.len() {
                if node < neighbors[i] {
                    undirected_weights.push(weights[i]);
                }
            }
        }
        undirected_weights.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
        let weight_threshold: f64 = undirected_weights[n_undirected - max_n_edges - 1];
        let n_above_threshold: usize = undirected_weights
            .iter()
            .filter(|weight| **weight > weight_threshold)
            .count();

        let mut random_numbers: Vec<f64> = Vec::with_capacity(n_nodes * n_nodes);
        for _ in 0..n_nodes * n_nodes {
            random_numbers.push(rng.gen::<f64>());
        }
        let pair_random = |node: usize, neighbor: usize| -> f64 {
            return random_numbers[node.min(neighbor) * n_nodes + node.max(neighbor)];
        };

        // the remaining slots are filled from the edges tied at the threshold
        let n_at_threshold_to_keep: usize = max_n_edges - n_above_threshold;
        let random_threshold: f64 = if n_at_threshold_to_keep == 0 {
            f64::INFINITY
        } else {
            let mut tie_randoms: Vec<f64> = Vec::new();
            for node in 0..n_nodes {
                let (neighbors, weights) = self.neighbor_slice(node);
                for i in 0..neighbors.len() {
                    if node < neighbors[i] && weights[i] == weight_threshold {
                        tie_randoms.push(pair_random(node, neighbors[i]));
                    }
                }
            }
            tie_randoms.sort_unstable_by(|a, b| b.partial_cmp(a).unwrap());
            tie_randoms[n_at_threshold_to_keep - 1]
        };

        let keep = |node: usize, neighbor: usize, weight: f64| -> bool {
            return weight > weight_threshold
                || (weight == weight_threshold
                    && pair_random(node, neighbor) >= random_threshold);
        };

        let mut first_neighbor_indices: Vec<usize> = Vec::with_capacity(n_nodes + 1);
        let mut neighbors_out: Vec<usize> = Vec::new();
        let mut edge_weights_out: Vec<f64> = Vec::new();
        first_neighbor_indices.push(0);
        for node in 0..n_nodes {
            let (neighbors, weights) = self.neighbor_slice(node);
            for i in 0..neighbors.len() {
                if keep(node, neighbors[i], weights[i]) {
                    neighbors_out.push(neighbors[i]);
                    edge_weights_out.push(weights[i]);
                }
            }
            first_neighbor_indices.push(neighbors_out.len());
        }
        log!(
            "Pruned the network from {} to {} undirected edges",
            n_undirected,
            neighbors_out.len() / 2
        );
        return Network::new(
            self.node_weights.clone(),
            first_neighbor_indices,
            neighbors_out,
            edge_weights_out,
            self.total_edge_weight_self_links,
        );
    }

    /// Builds the quotient network of a clustering: one node per cluster,
    /// node weights summed over members, inter-cluster edge weights summed
    /// over both directions, and intra-cluster edge weights folded into the
    /// self-link total. Runs in O(edges) with a dense per-cluster accumulator
    /// that is reset incrementally.
    pub fn create_reduced_network(
        &self,
        clustering: &Clustering,
    ) -> Result<Network, CoreError> {
        let n_clusters: usize = clustering.n_clusters();
        let nodes_per_cluster: Vec<Vec<usize>> = clustering.nodes_per_cluster();

        let mut node_weights: Vec<f64> = vec![0_f64; n_clusters];
        let mut first_neighbor_indices: Vec<usize> = Vec::with_capacity(n_clusters + 1);
        let mut neighbors: Vec<usize> = Vec::new();
        let mut edge_weights: Vec<f64> = Vec::new();
        let mut total_edge_weight_self_links: f64 = self.total_edge_weight_self_links;

        let mut accumulated_weight: Vec<f64> = vec![0_f64; n_clusters];
        let mut touched_clusters: Vec<usize> = Vec::with_capacity(n_clusters);

        first_neighbor_indices.push(0);
        for cluster in 0..n_clusters {
            for node in &nodes_per_cluster[cluster] {
                node_weights[cluster] += self.node_weights[*node];
                let (node_neighbors, node_weights_slice) = self.neighbor_slice(*node);
                for i in 0..node_neighbors.len() {
                    let neighbor_cluster: usize = clustering.cluster_of(node_neighbors[i])?;
                    if neighbor_cluster == cluster {
                        total_edge_weight_self_links += node_weights_slice[i];
                    } else {
                        if accumulated_weight[neighbor_cluster] == 0_f64 {
                            touched_clusters.push(neighbor_cluster);
                        }
                        accumulated_weight[neighbor_cluster] += node_weights_slice[i];
                    }
                }
            }
            touched_clusters.sort_unstable();
            for neighbor_cluster in touched_clusters.drain(..) {
                neighbors.push(neighbor_cluster);
                edge_weights.push(accumulated_weight[neighbor_cluster]);
                accumulated_weight[neighbor_cluster] = 0_f64;
            }
            first_neighbor_indices.push(neighbors.len());
        }
        return Ok(Network::new(
            node_weights,
            first_neighbor_indices,
            neighbors,
            edge_weights,
            total_edge_weight_self_links,
        ));
    }

    /// Extracts the induced subgraph of one cluster through a fresh
    /// extractor. When subnetworks are needed for every cluster, create one
    /// [`SubnetworkExtractor`] and reuse it instead.
    pub fn create_subnetwork(
        &self,
        clustering: &Clustering,
        cluster: usize,
    ) -> Result<Network, CoreError> {
        let mut extractor: SubnetworkExtractor = SubnetworkExtractor::new(self.num_nodes());
        let nodes: Vec<usize> = clustering
            .nodes_per_cluster()
            .swap_remove(cluster);
        return extractor.subnetwork(self, clustering, cluster, &nodes);
    }
}

/// Extracts induced subgraphs for the clusters of a network while reusing the
/// node relabelling scratch between calls, so clustering a large number of
/// small clusters does not churn the allocator.
#[derive(Debug)]
pub struct SubnetworkExtractor {
    local_ids: Vec<usize>,
}

impl SubnetworkExtractor {
    pub fn new(n_nodes: usize) -> SubnetworkExtractor {
        return SubnetworkExtractor {
            local_ids: vec![0; n_nodes],
        };
    }

    /// The induced subgraph on `nodes`, which must be exactly the members of
    /// `cluster`, with ids relabelled to `0..nodes.len()` in the order given.
    /// A single-node cluster produces a subnetwork with an empty adjacency.
    pub fn subnetwork(
        &mut self,
        network: &Network,
        clustering: &Clustering,
        cluster: usize,
        nodes: &[usize],
    ) -> Result<Network, CoreError> {
        for (local_id, node) in nodes.iter().enumerate() {
            self.local_ids[*node] = local_id;
        }
        let mut node_weights: Vec<f64> = Vec::with_capacity(nodes.len());
        let mut first_neighbor_indices: Vec<usize> = Vec::with_capacity(nodes.len() + 1);
        let mut neighbors: Vec<usize> = Vec::new();
        let mut edge_weights: Vec<f64> = Vec::new();
        first_neighbor_indices.push(0);
        for node in nodes {
            node_weights.push(network.node_weights[*node]);
            let (node_neighbors, node_weight_slice) = network.neighbor_slice(*node);
            for i in 0..node_neighbors.len() {
                let neighbor: usize = node_neighbors[i];
                if clustering.cluster_of(neighbor)? == cluster {
                    neighbors.push(self.local_ids[neighbor]);
                    edge_weights.push(node_weight_slice[i]);
                }
            }
            first_neighbor_indices.push(neighbors.len());
        }
        return Ok(Network::new(
            node_weights,
            first_neighbor_indices,
            neighbors,
            edge_weights,
            0_f64,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn weighted_network() -> Network {
        // two dense groups bridged by a light edge, plus an isolated pair
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 10.0),
            (1, 2, 2.0),
            (1, 3, 5.0),
            (3, 4, 1.0),
            (4, 5, 4.0),
            (5, 6, 8.0),
            (5, 7, 12.0),
        ];
        return NetworkBuilder::new()
            .node_weights_from_edges()
            .check_integrity()
            .build_from_edge_list(8, edges)
            .unwrap();
    }

    #[test]
    fn test_association_strength_resets_node_weights() {
        let network: Network = weighted_network();
        let normalized: Network = network.create_normalized_network_using_association_strength();
        assert_eq!(normalized.total_node_weight(), 8.0);
        assert_eq!(normalized.total_edge_weight_self_links(), 0.0);
        normalized.check_integrity().unwrap();
    }

    #[test]
    fn test_association_strength_weights() {
        let network: Network = weighted_network();
        let normalized: Network = network.create_normalized_network_using_association_strength();
        let total_node_weight: f64 = network.total_node_weight();
        let (neighbors, weights) = (
            normalized.neighbors_for(1).unwrap(),
            normalized.weights_for(1).unwrap(),
        );
        for i in 0..neighbors.len() {
            let expected: f64 = network.weights_for(1).unwrap()[i]
                / (network.node_weight(1) * network.node_weight(neighbors[i]) / total_node_weight);
            assert!((weights[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fractionalization_is_symmetric() {
        let network: Network = weighted_network();
        let normalized: Network = network.create_normalized_network_using_fractionalization();
        normalized.check_integrity().unwrap();
    }

    #[test]
    fn test_reduce_by_singleton_is_identity() {
        let network: Network = weighted_network();
        let clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        let reduced: Network = network.create_reduced_network(&clustering).unwrap();
        assert_eq!(reduced, network);
    }

    #[test]
    fn test_reduced_network() {
        let network: Network = weighted_network();
        let clustering: Clustering =
            Clustering::from_assignments(vec![0, 0, 0, 0, 1, 1, 1, 1], 2);
        let reduced: Network = network.create_reduced_network(&clustering).unwrap();
        assert_eq!(reduced.num_nodes(), 2);
        assert_eq!(reduced.num_edges(), 1);
        assert_eq!(reduced.weights_for(0).unwrap(), &[1.0]);
        assert_eq!(reduced.weights_for(1).unwrap(), &[1.0]);
        // intra-cluster weights fold into self-links, both directions counted
        assert_eq!(reduced.total_edge_weight_self_links(), 2.0 * (17.0 + 24.0));
        assert_eq!(reduced.node_weights(), vec![35.0, 49.0]);
        reduced.check_integrity().unwrap();
    }

    #[test]
    fn test_subnetworks() {
        let network: Network = weighted_network();
        let clustering: Clustering =
            Clustering::from_assignments(vec![0, 0, 0, 0, 1, 1, 1, 1], 2);
        let nodes_per_cluster: Vec<Vec<usize>> = clustering.nodes_per_cluster();
        let mut extractor: SubnetworkExtractor = SubnetworkExtractor::new(network.num_nodes());
        let first: Network = extractor
            .subnetwork(&network, &clustering, 0, &nodes_per_cluster[0])
            .unwrap();
        assert_eq!(first.num_nodes(), 4);
        assert_eq!(first.num_edges(), 3);
        assert_eq!(first.neighbors_for(1).unwrap(), &[0, 2, 3]);
        first.check_integrity().unwrap();
        let second: Network = extractor
            .subnetwork(&network, &clustering, 1, &nodes_per_cluster[1])
            .unwrap();
        assert_eq!(second.num_nodes(), 4);
        assert_eq!(second.num_edges(), 3);
        second.check_integrity().unwrap();
    }

    #[test]
    fn test_single_node_subnetwork_has_empty_adjacency() {
        let network: Network = weighted_network();
        let mut clustering: Clustering = Clustering::new_singleton(network.num_nodes());
        clustering.remove_empty_clusters();
        let subnetwork: Network = network.create_subnetwork(&clustering, 3).unwrap();
        assert_eq!(subnetwork.num_nodes(), 1);
        assert_eq!(subnetwork.num_edges(), 0);
    }

    #[test]
    fn test_pruning_keeps_heaviest_edges() {
        let network: Network = weighted_network();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(99);
        let pruned: Network = network.create_pruned_network(3, &mut rng);
        assert_eq!(pruned.num_edges(), 3);
        // distinct weights, so the outcome ignores the tie-breaking draws
        assert_eq!(pruned.weights_for(0).unwrap(), &[10.0]);
        assert_eq!(pruned.weights_for(5).unwrap(), &[8.0, 12.0]);
        pruned.check_integrity().unwrap();
    }

    #[test]
    fn test_pruning_with_all_weights_equal() {
        let edges: Vec<(usize, usize, f64)> =
            vec![(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)];
        let network: Network = NetworkBuilder::new()
            .build_from_edge_list(4, edges)
            .unwrap();
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(7);
        let pruned: Network = network.create_pruned_network(2, &mut rng);
        assert_eq!(pruned.num_edges(), 2);
        pruned.check_integrity().unwrap();
    }
}
