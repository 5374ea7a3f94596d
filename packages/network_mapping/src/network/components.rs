// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::collections::VecDeque;

use super::network::Network;
use crate::clustering::Clustering;

const UNVISITED: usize = usize::MAX;

impl Network {
    /// Labels the connected components of the network via breadth-first
    /// search and returns them as a clustering, ordered by decreasing
    /// component size. Components of equal size keep the order of their
    /// smallest node ids.
    pub fn identify_components(&self) -> Clustering {
        let n_nodes: usize = self.num_nodes();
        let mut components: Vec<usize> = vec![UNVISITED; n_nodes];
        let mut n_components: usize = 0;
        let mut frontier: VecDeque<usize> = VecDeque::new();

        for start in 0..n_nodes {
            if components[start] != UNVISITED {
                continue;
            }
            components[start] = n_components;
            frontier.push_back(start);
            while let Some(node) = frontier.pop_front() {
                let (neighbors, _) = self.neighbor_slice(node);
                for neighbor in neighbors {
                    if components[*neighbor] == UNVISITED {
                        components[*neighbor] = n_components;
                        frontier.push_back(*neighbor);
                    }
                }
            }
            n_components += 1;
        }

        let mut clustering: Clustering = Clustering::from_assignments(components, n_components);
        clustering.order_clusters_by_n_nodes();
        return clustering;
    }
}
