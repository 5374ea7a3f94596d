// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use crate::clustering::Clustering;
use crate::community;
use crate::community::cluster_size;
use crate::errors::CoreError;
use crate::layout::Layout;
use crate::log;
use crate::mapping::{GradientDescent, VosParams};
use crate::network::Network;
use crate::quality::cpm_quality;

/// The maximisation function for clustering runs. Modularity is CPM with the
/// resolution rescaled and the node weights set to the per-node total edge
/// weights; the drivers perform the rescale, the caller builds the network
/// with the matching node weighting (see
/// [`NetworkBuilder::node_weights_from_edges`](crate::network::NetworkBuilder::node_weights_from_edges)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClusteringQualityFunction {
    Cpm,
    Modularity,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClusteringMethod {
    Leiden,
    Louvain,
}

/// The minimisation function for layout runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutQualityFunction {
    Vos,
    LinLog,
}

/// Edge weight normalisations applied before clustering or layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Normalization {
    NoNormalization,
    AssociationStrength,
    Fractionalization,
}

impl Normalization {
    pub fn apply(
        &self,
        network: &Network,
    ) -> Network {
        return match self {
            Normalization::NoNormalization => network.create_network_without_normalization(),
            Normalization::AssociationStrength => {
                network.create_normalized_network_using_association_strength()
            }
            Normalization::Fractionalization => {
                network.create_normalized_network_using_fractionalization()
            }
        };
    }
}

/// Runs a clustering algorithm from a number of random starts and keeps the
/// clustering with the highest quality. The winner has its small clusters
/// merged away when a minimum size is set, and its cluster ids ordered by
/// decreasing cluster size.
#[derive(Clone, Debug)]
pub struct ClusteringDriver {
    pub method: ClusteringMethod,
    pub quality_function: ClusteringQualityFunction,
    pub resolution: f64,
    pub randomness: f64,
    pub iterations: usize,
    pub random_starts: usize,
    pub min_cluster_size: Option<u64>,
}

impl Default for ClusteringDriver {
    fn default() -> ClusteringDriver {
        return ClusteringDriver {
            method: ClusteringMethod::Leiden,
            quality_function: ClusteringQualityFunction::Modularity,
            resolution: crate::resolution::DEFAULT_RESOLUTION,
            randomness: community::local_merging::DEFAULT_RANDOMNESS,
            iterations: 1,
            random_starts: 1,
            min_cluster_size: None,
        };
    }
}

impl ClusteringDriver {
    pub fn run<T>(
        &self,
        network: &Network,
        initial_clustering: Option<&Clustering>,
        rng: &mut T,
    ) -> Result<Clustering, CoreError>
    where
        T: Rng,
    {
        if self.random_starts == 0 {
            return Err(CoreError::ParameterRangeError("random_starts"));
        }
        let use_modularity: bool =
            self.quality_function == ClusteringQualityFunction::Modularity;

        let mut best: Option<(Clustering, f64)> = None;
        for start in 0..self.random_starts {
            let (_, candidate) = match self.method {
                ClusteringMethod::Leiden => community::leiden(
                    network,
                    initial_clustering.cloned(),
                    Some(self.iterations),
                    Some(self.resolution),
                    Some(self.randomness),
                    rng,
                    use_modularity,
                )?,
                ClusteringMethod::Louvain => community::louvain(
                    network,
                    initial_clustering.cloned(),
                    Some(self.iterations),
                    Some(self.resolution),
                    rng,
                    use_modularity,
                )?,
            };
            let quality: f64 =
                cpm_quality(network, &candidate, Some(self.resolution), use_modularity)?;
            log!("Random start {} reached quality {}", start + 1, quality);
            if best
                .as_ref()
                .map_or(true, |(_, best_quality)| quality > *best_quality)
            {
                best = Some((candidate, quality));
            }
        }

        let (mut clustering, _) = best.unwrap();
        if let Some(min_cluster_size) = self.min_cluster_size {
            cluster_size::remove_small_clusters_by_n_nodes(
                network,
                &mut clustering,
                min_cluster_size,
            )?;
        }
        clustering.order_clusters_by_n_nodes();
        return Ok(clustering);
    }
}

/// Runs the gradient descent layout from a number of random starts and keeps
/// the layout with the lowest quality, standardised into canonical position.
#[derive(Clone, Debug)]
pub struct LayoutDriver {
    pub quality_function: LayoutQualityFunction,
    pub attraction: i32,
    pub repulsion: i32,
    pub edge_weight_increment: f64,
    pub random_starts: usize,
    pub max_iterations: usize,
}

impl Default for LayoutDriver {
    fn default() -> LayoutDriver {
        return LayoutDriver {
            quality_function: LayoutQualityFunction::Vos,
            attraction: crate::mapping::DEFAULT_ATTRACTION,
            repulsion: crate::mapping::DEFAULT_REPULSION,
            edge_weight_increment: crate::mapping::DEFAULT_EDGE_WEIGHT_INCREMENT,
            random_starts: 1,
            max_iterations: crate::mapping::DEFAULT_MAX_ITERATIONS,
        };
    }
}

impl LayoutDriver {
    pub fn run<T>(
        &self,
        network: &Network,
        initial_layout: Option<&Layout>,
        rng: &mut T,
    ) -> Result<Layout, CoreError>
    where
        T: Rng,
    {
        if self.random_starts == 0 {
            return Err(CoreError::ParameterRangeError("random_starts"));
        }
        if network.num_nodes() == 0 {
            return Err(CoreError::EmptyNetworkError);
        }
        let params: VosParams = match self.quality_function {
            LayoutQualityFunction::Vos => {
                VosParams::new(self.attraction, self.repulsion, self.edge_weight_increment)?
            }
            LayoutQualityFunction::LinLog => VosParams::linlog(),
        };
        // without a uniform attraction term the components of a disconnected
        // network would drift apart without bound
        if params.edge_weight_increment <= 0_f64
            && network.identify_components().n_clusters() > 1
        {
            return Err(CoreError::ParameterRangeError("edge_weight_increment"));
        }

        let mut descent: GradientDescent = GradientDescent::new(params);
        descent.max_iterations = self.max_iterations;

        let mut best: Option<(Layout, f64)> = None;
        for start in 0..self.random_starts {
            let mut layout: Layout = match initial_layout {
                Some(layout) => layout.clone(),
                None => Layout::new_random(network.num_nodes(), rng),
            };
            descent.improve_layout(network, &mut layout, rng)?;
            let quality: f64 = params.quality(network, &layout)?;
            log!("Random start {} reached quality {}", start + 1, quality);
            if best
                .as_ref()
                .map_or(true, |(_, best_quality)| quality < *best_quality)
            {
                best = Some((layout, quality));
            }
        }

        let (mut layout, _) = best.unwrap();
        layout.standardize(true);
        return Ok(layout);
    }
}
