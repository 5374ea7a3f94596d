// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use rand::Rng;

use crate::arithmetic;
use crate::errors::CoreError;

/// Two-dimensional node coordinates. Created at random in `[-1, 1]^2` or from
/// caller-supplied coordinates, then moved around by the layout optimiser and
/// the standardisation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
}

impl Layout {
    pub fn new_random<T>(
        n_nodes: usize,
        rng: &mut T,
    ) -> Layout
    where
        T: Rng,
    {
        let mut x: Vec<f64> = Vec::with_capacity(n_nodes);
        let mut y: Vec<f64> = Vec::with_capacity(n_nodes);
        for _ in 0..n_nodes {
            x.push(2_f64 * rng.gen::<f64>() - 1_f64);
            y.push(2_f64 * rng.gen::<f64>() - 1_f64);
        }
        return Layout { x, y };
    }

    pub fn from_coordinates(
        x: Vec<f64>,
        y: Vec<f64>,
    ) -> Result<Layout, CoreError> {
        if x.len() != y.len() {
            return Err(CoreError::ParameterRangeError("coordinates"));
        }
        return Ok(Layout { x, y });
    }

    pub fn num_nodes(&self) -> usize {
        return self.x.len();
    }

    pub fn coordinates(&self) -> (&[f64], &[f64]) {
        return (&self.x, &self.y);
    }

    pub fn position(
        &self,
        node: usize,
    ) -> (f64, f64) {
        return (self.x[node], self.y[node]);
    }

    /// The mean Euclidean distance over all node pairs; 0 for fewer than two
    /// nodes.
    pub fn average_distance(&self) -> f64 {
        let n_nodes: usize = self.num_nodes();
        if n_nodes < 2 {
            return 0_f64;
        }
        let mut summed_distance: f64 = 0_f64;
        for i in 0..n_nodes {
            for j in 0..i {
                let distance_x: f64 = self.x[i] - self.x[j];
                let distance_y: f64 = self.y[i] - self.y[j];
                summed_distance += (distance_x * distance_x + distance_y * distance_y).sqrt();
            }
        }
        return summed_distance / ((n_nodes * (n_nodes - 1) / 2) as f64);
    }

    /// Rotates all coordinates clockwise by `angle` radians, so that a point
    /// lying along the direction `(cos angle, sin angle)` ends up on the
    /// positive x axis.
    pub fn rotate(
        &mut self,
        angle: f64,
    ) {
        let cos: f64 = angle.cos();
        let sin: f64 = angle.sin();
        for i in 0..self.num_nodes() {
            let x: f64 = self.x[i];
            let y: f64 = self.y[i];
            self.x[i] = cos * x + sin * y;
            self.y[i] = -sin * x + cos * y;
        }
    }

    pub fn flip_x(&mut self) {
        for x in self.x.iter_mut() {
            *x = -*x;
        }
    }

    pub fn flip_y(&mut self) {
        for y in self.y.iter_mut() {
            *y = -*y;
        }
    }

    /// Puts the layout in a canonical position: centroid at the origin, the
    /// direction of maximum variance along the x axis, both medians
    /// non-positive and, when `standardize_distances` is set, a mean pairwise
    /// distance of 1. Applying it twice changes nothing beyond floating-point
    /// noise.
    pub fn standardize(
        &mut self,
        standardize_distances: bool,
    ) {
        let n_nodes: usize = self.num_nodes();
        if n_nodes == 0 {
            return;
        }

        let mean_x: f64 = self.x.iter().sum::<f64>() / n_nodes as f64;
        let mean_y: f64 = self.y.iter().sum::<f64>() / n_nodes as f64;
        for i in 0..n_nodes {
            self.x[i] -= mean_x;
            self.y[i] -= mean_y;
        }

        let mut variance_x: f64 = 0_f64;
        let mut variance_y: f64 = 0_f64;
        let mut covariance: f64 = 0_f64;
        for i in 0..n_nodes {
            variance_x += self.x[i] * self.x[i];
            variance_y += self.y[i] * self.y[i];
            covariance += self.x[i] * self.y[i];
        }
        // closed-form principal axis of the 2x2 covariance matrix
        let angle: f64 = 0.5 * (2_f64 * covariance).atan2(variance_x - variance_y);
        self.rotate(angle);

        if arithmetic::median(&self.x) > 0_f64 {
            self.flip_x();
        }
        if arithmetic::median(&self.y) > 0_f64 {
            self.flip_y();
        }

        if standardize_distances {
            let average_distance: f64 = self.average_distance();
            if average_distance > 0_f64 {
                for i in 0..n_nodes {
                    self.x[i] /= average_distance;
                    self.y[i] /= average_distance;
                }
            }
        }
    }
}
