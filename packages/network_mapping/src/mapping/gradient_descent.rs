// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use super::vos::{distance_cost, VosParams};
use crate::arithmetic;
use crate::errors::CoreError;
use crate::layout::Layout;
use crate::log;
use crate::network::Network;
use crate::random_vector::random_permutation;

pub const DEFAULT_MAX_ITERATIONS: usize = 1000;
pub const DEFAULT_INITIAL_STEP_SIZE: f64 = 1_f64;
pub const DEFAULT_MIN_STEP_SIZE: f64 = 0.001;
pub const DEFAULT_STEP_SIZE_REDUCTION: f64 = 0.75;
pub const DEFAULT_REQUIRED_QUALITY_IMPROVEMENTS: usize = 5;

/// Minimises a VOS quality function by normalised gradient descent with
/// sequential per-node updates and an adaptive step size.
///
/// Each iteration walks the nodes in a fresh random permutation and moves
/// every node a fixed distance along the negative gradient of the quality
/// with respect to its own coordinates. The quality itself is accumulated
/// during the same sweep, counting every node pair once. After the sweep the
/// step size adapts: `required_quality_improvements` consecutive improving
/// iterations divide it by `step_size_reduction` (making the steps larger),
/// while a non-improving iteration multiplies it by the same factor and
/// starts the count over. Descent stops after `max_iterations` or once the
/// step size drops below `min_step_size`.
#[derive(Clone, Debug)]
pub struct GradientDescent {
    pub params: VosParams,
    pub max_iterations: usize,
    pub initial_step_size: f64,
    pub min_step_size: f64,
    pub step_size_reduction: f64,
    pub required_quality_improvements: usize,
}

impl GradientDescent {
    pub fn new(params: VosParams) -> GradientDescent {
        return GradientDescent {
            params,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_step_size: DEFAULT_INITIAL_STEP_SIZE,
            min_step_size: DEFAULT_MIN_STEP_SIZE,
            step_size_reduction: DEFAULT_STEP_SIZE_REDUCTION,
            required_quality_improvements: DEFAULT_REQUIRED_QUALITY_IMPROVEMENTS,
        };
    }

    pub fn improve_layout<T>(
        &self,
        network: &Network,
        layout: &mut Layout,
        rng: &mut T,
    ) -> Result<(), CoreError>
    where
        T: Rng,
    {
        let n_nodes: usize = network.num_nodes();
        if layout.num_nodes() != n_nodes {
            return Err(CoreError::ParameterRangeError("layout"));
        }
        if self.step_size_reduction <= 0_f64 || self.step_size_reduction >= 1_f64 {
            return Err(CoreError::ParameterRangeError("step_size_reduction"));
        }

        let attraction: i32 = self.params.attraction;
        let repulsion: i32 = self.params.repulsion;
        let edge_weight_increment: f64 = self.params.edge_weight_increment;

        let mut step_size: f64 = self.initial_step_size;
        let mut previous_quality: f64 = f64::INFINITY;
        let mut n_improvements: usize = 0;
        let mut visited: Vec<bool> = vec![false; n_nodes];

        for iteration in 0..self.max_iterations {
            let mut quality: f64 = 0_f64;
            for flag in visited.iter_mut() {
                *flag = false;
            }
            let node_order: Vec<usize> = random_permutation(n_nodes, rng);

            for i in 0..n_nodes {
                let node: usize = node_order[i];
                let node_weight: f64 = network.node_weight(node);
                let mut gradient_x: f64 = 0_f64;
                let mut gradient_y: f64 = 0_f64;

                // attraction along the edges
                let (neighbors, weights) = network.neighbor_slice(node);
                for k in 0..neighbors.len() {
                    let neighbor: usize = neighbors[k];
                    let distance_x: f64 = layout.x[node] - layout.x[neighbor];
                    let distance_y: f64 = layout.y[node] - layout.y[neighbor];
                    let squared_distance: f64 =
                        distance_x * distance_x + distance_y * distance_y;
                    let distance: f64 = squared_distance.sqrt();
                    if squared_distance > 0_f64 {
                        let gradient_factor: f64 =
                            weights[k] * arithmetic::fast_pow(distance, attraction)
                                / squared_distance;
                        gradient_x += gradient_factor * distance_x;
                        gradient_y += gradient_factor * distance_y;
                    }
                    if !visited[neighbor] {
                        quality += weights[k] * distance_cost(distance, attraction);
                    }
                }

                // repulsion between all pairs, plus the uniform attraction of
                // the edge weight increment when one is set
                for other in 0..n_nodes {
                    if other == node {
                        continue;
                    }
                    let distance_x: f64 = layout.x[node] - layout.x[other];
                    let distance_y: f64 = layout.y[node] - layout.y[other];
                    let squared_distance: f64 =
                        distance_x * distance_x + distance_y * distance_y;
                    let distance: f64 = squared_distance.sqrt();

                    if squared_distance > 0_f64 {
                        let gradient_factor: f64 = node_weight
                            * network.node_weight(other)
                            * arithmetic::fast_pow(distance, repulsion)
                            / squared_distance;
                        gradient_x -= gradient_factor * distance_x;
                        gradient_y -= gradient_factor * distance_y;
                    }
                    if !visited[other] {
                        quality -= node_weight
                            * network.node_weight(other)
                            * distance_cost(distance, repulsion);
                    }

                    if edge_weight_increment > 0_f64 {
                        if squared_distance > 0_f64 {
                            let gradient_factor: f64 = edge_weight_increment
                                * arithmetic::fast_pow(distance, attraction)
                                / squared_distance;
                            gradient_x += gradient_factor * distance_x;
                            gradient_y += gradient_factor * distance_y;
                        }
                        if !visited[other] {
                            quality +=
                                edge_weight_increment * distance_cost(distance, attraction);
                        }
                    }
                }

                let gradient_length: f64 =
                    (gradient_x * gradient_x + gradient_y * gradient_y).sqrt();
                if gradient_length > 0_f64 {
                    layout.x[node] -= step_size * gradient_x / gradient_length;
                    layout.y[node] -= step_size * gradient_y / gradient_length;
                }
                visited[node] = true;
            }

            if quality < previous_quality {
                n_improvements += 1;
                if n_improvements >= self.required_quality_improvements {
                    step_size /= self.step_size_reduction;
                    n_improvements = 0;
                }
            } else {
                step_size *= self.step_size_reduction;
                n_improvements = 0;
            }
            previous_quality = quality;

            if step_size < self.min_step_size {
                log!(
                    "Gradient descent stopped after {} iterations with step size {}",
                    iteration + 1,
                    step_size
                );
                break;
            }
        }
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn small_network() -> Network {
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 3, 1.0),
            (3, 0, 1.0),
            (0, 2, 1.0),
        ];
        return NetworkBuilder::new()
            .build_from_edge_list(4, edges)
            .unwrap();
    }

    #[test]
    fn test_descent_improves_a_random_layout() {
        let network: Network = small_network();
        let params: VosParams = VosParams::new(2, 1, 0.0).unwrap();
        let descent: GradientDescent = GradientDescent::new(params);
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(2024);
        let mut layout: Layout = Layout::new_random(network.num_nodes(), &mut rng);
        let quality_before: f64 = params.quality(&network, &layout).unwrap();
        descent.improve_layout(&network, &mut layout, &mut rng).unwrap();
        let quality_after: f64 = params.quality(&network, &layout).unwrap();
        assert!(quality_after < quality_before);
        for node in 0..network.num_nodes() {
            let (x, y) = layout.position(node);
            assert!(x.is_finite() && y.is_finite());
        }
    }

    #[test]
    fn test_descent_is_deterministic_under_a_fixed_seed() {
        let network: Network = small_network();
        let descent: GradientDescent =
            GradientDescent::new(VosParams::new(2, 1, 0.0).unwrap());
        let mut rng1: XorShiftRng = XorShiftRng::seed_from_u64(6);
        let mut rng2: XorShiftRng = XorShiftRng::seed_from_u64(6);
        let mut layout1: Layout = Layout::new_random(network.num_nodes(), &mut rng1);
        let mut layout2: Layout = Layout::new_random(network.num_nodes(), &mut rng2);
        descent.improve_layout(&network, &mut layout1, &mut rng1).unwrap();
        descent.improve_layout(&network, &mut layout2, &mut rng2).unwrap();
        assert_eq!(layout1, layout2);
    }

    #[test]
    fn test_mismatched_layout_is_rejected() {
        let network: Network = small_network();
        let descent: GradientDescent =
            GradientDescent::new(VosParams::new(2, 1, 0.0).unwrap());
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(6);
        let mut layout: Layout = Layout::new_random(2, &mut rng);
        assert!(descent.improve_layout(&network, &mut layout, &mut rng).is_err());
    }
}
