// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::arithmetic;
use crate::errors::CoreError;
use crate::layout::Layout;
use crate::network::Network;

pub const DEFAULT_ATTRACTION: i32 = 2;
pub const DEFAULT_REPULSION: i32 = 1;
pub const DEFAULT_EDGE_WEIGHT_INCREMENT: f64 = 0_f64;

/// The parameters of the VOS family of layout quality functions.
///
/// The quality of a layout, to be minimised, is
///
/// ```text
/// sum over edges of        weight * cost(distance, attraction)
/// + sum over node pairs of edge_weight_increment * cost(distance, attraction)
/// - sum over node pairs of node_weight_i * node_weight_j * cost(distance, repulsion)
/// ```
///
/// with `cost(d, k) = d^k / k` for non-zero `k` and `ln d` for `k = 0`. The
/// edge weight increment makes all node pairs attract a little, which keeps
/// the components of a disconnected network from drifting apart.
#[derive(Clone, Copy, Debug)]
pub struct VosParams {
    pub attraction: i32,
    pub repulsion: i32,
    pub edge_weight_increment: f64,
}

impl VosParams {
    pub fn new(
        attraction: i32,
        repulsion: i32,
        edge_weight_increment: f64,
    ) -> Result<VosParams, CoreError> {
        if attraction <= repulsion {
            return Err(CoreError::ParameterRangeError("attraction"));
        }
        if edge_weight_increment < 0_f64 {
            return Err(CoreError::ParameterRangeError("edge_weight_increment"));
        }
        return Ok(VosParams {
            attraction,
            repulsion,
            edge_weight_increment,
        });
    }

    /// The LinLog quality function, the limit of the VOS family in which
    /// both the attraction and the repulsion cost become logarithmic.
    pub fn linlog() -> VosParams {
        return VosParams {
            attraction: 0,
            repulsion: 0,
            edge_weight_increment: 0_f64,
        };
    }

    /// The quality of a layout under these parameters; lower is better.
    /// Coincident nodes make a logarithmic cost term infinite; that is an
    /// accepted degeneracy, since random initialisation makes exact
    /// coincidence vanishingly unlikely.
    pub fn quality(
        &self,
        network: &Network,
        layout: &Layout,
    ) -> Result<f64, CoreError> {
        let n_nodes: usize = network.num_nodes();
        if layout.num_nodes() != n_nodes {
            return Err(CoreError::ParameterRangeError("layout"));
        }
        let (x, y) = layout.coordinates();
        let mut quality: f64 = 0_f64;

        for node in 0..n_nodes {
            let (neighbors, weights) = network.edges_for(node)?;
            for k in 0..neighbors.len() {
                let neighbor: usize = neighbors[k];
                if neighbor < node {
                    let distance: f64 = ((x[node] - x[neighbor]) * (x[node] - x[neighbor])
                        + (y[node] - y[neighbor]) * (y[node] - y[neighbor]))
                        .sqrt();
                    quality += weights[k] * distance_cost(distance, self.attraction);
                }
            }
        }

        for node in 0..n_nodes {
            for other in 0..node {
                let distance: f64 = ((x[node] - x[other]) * (x[node] - x[other])
                    + (y[node] - y[other]) * (y[node] - y[other]))
                    .sqrt();
                if self.edge_weight_increment > 0_f64 {
                    quality +=
                        self.edge_weight_increment * distance_cost(distance, self.attraction);
                }
                quality -= network.node_weight(node)
                    * network.node_weight(other)
                    * distance_cost(distance, self.repulsion);
            }
        }
        return Ok(quality);
    }
}

pub(crate) fn distance_cost(
    distance: f64,
    exponent: i32,
) -> f64 {
    return if exponent != 0 {
        arithmetic::fast_pow(distance, exponent) / exponent as f64
    } else {
        distance.ln()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    #[test]
    fn test_attraction_must_exceed_repulsion() {
        assert!(VosParams::new(2, 1, 0.0).is_ok());
        match VosParams::new(1, 1, 0.0) {
            Err(CoreError::ParameterRangeError(parameter)) => assert_eq!(parameter, "attraction"),
            other => panic!("expected a parameter range error, got {:?}", other),
        }
        assert!(VosParams::new(1, 2, 0.0).is_err());
    }

    #[test]
    fn test_negative_increment_is_rejected() {
        assert!(VosParams::new(2, 1, -0.5).is_err());
    }

    #[test]
    fn test_quality_of_a_single_edge() {
        let network: Network = NetworkBuilder::new()
            .build_from_edge_list(2, vec![(0, 1, 2.0)])
            .unwrap();
        let layout: Layout =
            Layout::from_coordinates(vec![0.0, 3.0], vec![0.0, 4.0]).unwrap();
        let params: VosParams = VosParams::new(2, 1, 0.0).unwrap();
        // distance 5: attraction 2 * 25 / 2, repulsion 1 * 1 * 5
        let quality: f64 = params.quality(&network, &layout).unwrap();
        assert!((quality - (25.0 - 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_closer_edges_have_lower_quality() {
        let network: Network = NetworkBuilder::new()
            .build_from_edge_list(2, vec![(0, 1, 1.0)])
            .unwrap();
        let params: VosParams = VosParams::new(2, 1, 0.0).unwrap();
        let far: Layout = Layout::from_coordinates(vec![0.0, 4.0], vec![0.0, 0.0]).unwrap();
        let near: Layout = Layout::from_coordinates(vec![0.0, 1.0], vec![0.0, 0.0]).unwrap();
        let far_quality: f64 = params.quality(&network, &far).unwrap();
        let near_quality: f64 = params.quality(&network, &near).unwrap();
        assert!(near_quality < far_quality);
    }
}
