// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use crate::network::Network;

pub const DEFAULT_RESOLUTION: f64 = 1_f64;

/// The moving algorithms measure every candidate move with the same CPM gain
/// expression whether the caller asked for CPM or modularity maximisation.
/// Modularity is CPM on a network whose node weights are the per-node total
/// edge weights, with the resolution rescaled by
/// `1 / (2 * total_edge_weight + total_edge_weight_self_links)`; that rescale
/// happens here, once, before the hot loops run.
///
/// For CPM the resolution passes through unchanged. In either case a missing
/// resolution falls back to [`DEFAULT_RESOLUTION`].
pub fn adjust_resolution(
    resolution: Option<f64>,
    network: &Network,
    use_modularity: bool,
) -> f64 {
    let resolution: f64 = resolution.unwrap_or(DEFAULT_RESOLUTION);
    return if use_modularity {
        resolution
            / (2_f64 * network.total_edge_weight() + network.total_edge_weight_self_links())
    } else {
        resolution
    };
}
