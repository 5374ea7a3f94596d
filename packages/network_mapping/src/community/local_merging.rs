// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::quality_increment;
use crate::arithmetic;
use crate::clustering::Clustering;
use crate::errors::CoreError;
use crate::network::Network;

pub const DEFAULT_RANDOMNESS: f64 = 1e-2;

/// Stochastically merges the nodes of a subnetwork, starting from singleton
/// clusters, in a single randomly ordered pass.
///
/// A node may only move while it is still alone in its cluster and its
/// cluster is well connected to the rest of the subnetwork; a cluster that
/// receives a node stops being a move candidate source forever. Candidate
/// clusters are weighted by `exp(quality increment / randomness)`, so small
/// positive `randomness` values approach the greedy choice while larger ones
/// explore more of the partition space.
///
/// The merger cannot perform well at scale if it asks the heap for fresh
/// working memory on every subnetwork, so the scratch collections live in
/// this struct and are reused for the lifetime of a multilevel run.
#[derive(Debug)]
pub struct LocalMerging {
    node_order: Vec<usize>,
    neighboring_clusters: Vec<usize>,
    edge_weight_per_cluster: Vec<f64>,
    non_singleton_clusters: Vec<bool>,
    cumulative_increments: Vec<f64>,
}

impl LocalMerging {
    pub fn with_capacity(capacity: usize) -> LocalMerging {
        return LocalMerging {
            node_order: Vec::with_capacity(capacity),
            neighboring_clusters: Vec::with_capacity(capacity),
            edge_weight_per_cluster: Vec::with_capacity(capacity),
            non_singleton_clusters: Vec::with_capacity(capacity),
            cumulative_increments: Vec::with_capacity(capacity),
        };
    }

    pub fn merge_clustering<T>(
        &mut self,
        subnetwork: &Network,
        adjusted_resolution: f64,
        randomness: f64,
        rng: &mut T,
    ) -> Result<Clustering, CoreError>
    where
        T: Rng,
    {
        let n_nodes: usize = subnetwork.num_nodes();
        let mut clustering: Clustering = Clustering::new_singleton(n_nodes);
        if n_nodes == 1 {
            return Ok(clustering);
        }
        self.reset(n_nodes, rng);

        let mut improved: bool = false;
        let mut cluster_weights: Vec<f64> = subnetwork.node_weights();
        // starts as each node's total incident edge weight; all of it is
        // external while every cluster is a singleton
        let mut external_edge_weight_per_cluster: Vec<f64> =
            subnetwork.total_edge_weight_per_node();
        let total_node_weight: f64 = subnetwork.total_node_weight();

        let node_order: &Vec<usize> = &self.node_order;
        let neighboring_clusters: &mut Vec<usize> = &mut self.neighboring_clusters;
        let edge_weight_per_cluster: &mut Vec<f64> = &mut self.edge_weight_per_cluster;
        let non_singleton_clusters: &mut Vec<bool> = &mut self.non_singleton_clusters;
        let cumulative_increments: &mut Vec<f64> = &mut self.cumulative_increments;

        for node in node_order {
            let node: usize = *node;
            if !node_can_move(
                node,
                &cluster_weights,
                &external_edge_weight_per_cluster,
                total_node_weight,
                non_singleton_clusters,
                adjusted_resolution,
            ) {
                continue;
            }

            neighboring_clusters.clear();
            neighboring_clusters.push(node);
            cumulative_increments.clear();

            // empty the node's singleton; its own cluster stays a candidate
            cluster_weights[node] = 0_f64;
            external_edge_weight_per_cluster[node] = 0_f64;

            let (neighbors, weights) = subnetwork.neighbor_slice(node);
            for k in 0..neighbors.len() {
                let neighbor_cluster: usize = clustering.cluster_of(neighbors[k])?;
                if edge_weight_per_cluster[neighbor_cluster] == 0_f64 {
                    neighboring_clusters.push(neighbor_cluster);
                }
                edge_weight_per_cluster[neighbor_cluster] += weights[k];
            }

            let node_weight: f64 = subnetwork.node_weight(node);
            let mut best_cluster: usize = node;
            let mut max_increment: f64 = 0_f64;
            let mut total_transformed_increment: f64 = 0_f64;
            for k in 0..neighboring_clusters.len() {
                let candidate: usize = neighboring_clusters[k];
                let candidate_weight: f64 = cluster_weights[candidate];
                // only well-connected clusters may receive the node
                if external_edge_weight_per_cluster[candidate]
                    >= candidate_weight * (total_node_weight - candidate_weight)
                        * adjusted_resolution
                {
                    let increment: f64 = quality_increment::calculate(
                        edge_weight_per_cluster[candidate],
                        node_weight,
                        candidate_weight,
                        adjusted_resolution,
                    );
                    if increment > max_increment {
                        best_cluster = candidate;
                        max_increment = increment;
                    }
                    if increment >= 0_f64 {
                        total_transformed_increment +=
                            arithmetic::approximate_exponent(increment / randomness);
                    }
                }
                cumulative_increments.push(total_transformed_increment);
                edge_weight_per_cluster[candidate] = 0_f64;
            }

            let chosen_cluster: usize = if total_transformed_increment < f64::INFINITY {
                let target: f64 = total_transformed_increment * rng.gen::<f64>();
                neighboring_clusters
                    [arithmetic::first_index_at_least(cumulative_increments, target)]
            } else {
                best_cluster
            };

            cluster_weights[chosen_cluster] += node_weight;
            for k in 0..neighbors.len() {
                if clustering.cluster_of(neighbors[k])? == chosen_cluster {
                    external_edge_weight_per_cluster[chosen_cluster] -= weights[k];
                } else {
                    external_edge_weight_per_cluster[chosen_cluster] += weights[k];
                }
            }

            if chosen_cluster != node {
                clustering.set_cluster(node, chosen_cluster)?;
                non_singleton_clusters[chosen_cluster] = true;
                improved = true;
            }
        }

        if improved {
            clustering.remove_empty_clusters();
        }
        return Ok(clustering);
    }

    fn reset<T>(
        &mut self,
        length: usize,
        rng: &mut T,
    ) where
        T: Rng,
    {
        self.node_order.clear();
        self.neighboring_clusters.clear();
        self.edge_weight_per_cluster.clear();
        self.edge_weight_per_cluster.resize(length, 0_f64);
        self.non_singleton_clusters.clear();
        self.non_singleton_clusters.resize(length, false);
        self.cumulative_increments.clear();

        for i in 0..length {
            self.node_order.push(i);
        }
        for i in 0..length {
            let random_index: usize = rng.gen_range(0..length);
            let old_value: usize = self.node_order[i];
            self.node_order[i] = self.node_order[random_index];
            self.node_order[random_index] = old_value;
        }
    }
}

fn node_can_move(
    node: usize,
    cluster_weights: &Vec<f64>,
    external_edge_weight_per_cluster: &Vec<f64>,
    total_node_weight: f64,
    non_singleton_clusters: &Vec<bool>,
    adjusted_resolution: f64,
) -> bool {
    let connectivity_threshold: f64 = cluster_weights[node]
        * (total_node_weight - cluster_weights[node])
        * adjusted_resolution;
    return !non_singleton_clusters[node]
        && external_edge_weight_per_cluster[node] >= connectivity_threshold;
}
