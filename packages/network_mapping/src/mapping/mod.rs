// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

pub use self::gradient_descent::{
    GradientDescent, DEFAULT_INITIAL_STEP_SIZE, DEFAULT_MAX_ITERATIONS, DEFAULT_MIN_STEP_SIZE,
    DEFAULT_REQUIRED_QUALITY_IMPROVEMENTS, DEFAULT_STEP_SIZE_REDUCTION,
};
pub use self::vos::{
    VosParams, DEFAULT_ATTRACTION, DEFAULT_EDGE_WEIGHT_INCREMENT, DEFAULT_REPULSION,
};

mod gradient_descent;
mod vos;
