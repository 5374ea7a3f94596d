// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#[cfg(test)]
mod tests {
    use network_mapping::clustering::Clustering;
    use network_mapping::driver::{
        ClusteringDriver, ClusteringMethod, ClusteringQualityFunction, LayoutDriver,
        Normalization,
    };
    use network_mapping::layout::Layout;
    use network_mapping::network::{Network, NetworkBuilder};
    use network_mapping::quality::cpm_quality;

    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn bridged_triangles() -> Network {
        // triangle 0-1-2 and triangle 3-4-5 linked by the edge 2-3
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 1.0),
            (1, 2, 1.0),
            (2, 0, 1.0),
            (2, 3, 1.0),
            (3, 5, 1.0),
            (5, 4, 1.0),
            (4, 3, 1.0),
        ];
        return NetworkBuilder::new()
            .node_weights_from_edges()
            .check_integrity()
            .build_from_edge_list(6, edges)
            .unwrap();
    }

    #[test]
    fn test_leiden_cpm_with_association_strength_finds_the_triangles() {
        let network: Network = bridged_triangles();
        let normalized: Network = Normalization::AssociationStrength.apply(&network);
        let driver: ClusteringDriver = ClusteringDriver {
            method: ClusteringMethod::Leiden,
            quality_function: ClusteringQualityFunction::Cpm,
            resolution: 0.2,
            iterations: 2,
            ..ClusteringDriver::default()
        };
        for seed in [1_u64, 42, 20260801].iter() {
            let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(*seed);
            let clustering: Clustering = driver.run(&normalized, None, &mut rng).unwrap();
            assert_eq!(clustering.n_clusters(), 2);
            assert_eq!(clustering[0], clustering[1]);
            assert_eq!(clustering[0], clustering[2]);
            assert_eq!(clustering[3], clustering[4]);
            assert_eq!(clustering[3], clustering[5]);
            assert_ne!(clustering[0], clustering[3]);
            let quality: f64 =
                cpm_quality(&normalized, &clustering, Some(0.2), false).unwrap();
            assert!(quality > 0.0);
        }
    }

    #[test]
    fn test_modularity_equals_rescaled_cpm() {
        let network: Network = bridged_triangles();
        let rescaled_resolution: f64 = 1.0
            / (2.0 * network.total_edge_weight() + network.total_edge_weight_self_links());

        let modularity_driver: ClusteringDriver = ClusteringDriver {
            method: ClusteringMethod::Louvain,
            quality_function: ClusteringQualityFunction::Modularity,
            resolution: 1.0,
            iterations: 3,
            ..ClusteringDriver::default()
        };
        let cpm_driver: ClusteringDriver = ClusteringDriver {
            method: ClusteringMethod::Louvain,
            quality_function: ClusteringQualityFunction::Cpm,
            resolution: rescaled_resolution,
            iterations: 3,
            ..ClusteringDriver::default()
        };

        let mut modularity_rng: XorShiftRng = XorShiftRng::seed_from_u64(99);
        let mut cpm_rng: XorShiftRng = XorShiftRng::seed_from_u64(99);
        let from_modularity: Clustering = modularity_driver
            .run(&network, None, &mut modularity_rng)
            .unwrap();
        let from_cpm: Clustering = cpm_driver.run(&network, None, &mut cpm_rng).unwrap();
        assert_eq!(from_modularity, from_cpm);
    }

    #[test]
    fn test_association_strength_makes_all_node_weights_one() {
        let network: Network = bridged_triangles();
        let normalized: Network = Normalization::AssociationStrength.apply(&network);
        assert_eq!(
            normalized.total_node_weight(),
            normalized.num_nodes() as f64
        );
    }

    #[test]
    fn test_small_cluster_removal_through_the_driver() {
        // a community of four plus a weakly attached pair
        let edges: Vec<(usize, usize, f64)> = vec![
            (0, 1, 5.0),
            (1, 2, 5.0),
            (2, 3, 5.0),
            (3, 0, 5.0),
            (0, 2, 5.0),
            (3, 4, 1.0),
            (4, 5, 5.0),
        ];
        let network: Network = NetworkBuilder::new()
            .node_weights_from_edges()
            .build_from_edge_list(6, edges)
            .unwrap();
        let driver: ClusteringDriver = ClusteringDriver {
            min_cluster_size: Some(3),
            iterations: 2,
            random_starts: 2,
            ..ClusteringDriver::default()
        };
        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(7);
        let clustering: Clustering = driver.run(&network, None, &mut rng).unwrap();
        for count in clustering.num_nodes_per_cluster() {
            assert!(count >= 3);
        }
    }

    #[test]
    fn test_clustering_and_layout_pipeline() {
        let network: Network = bridged_triangles();
        let normalized: Network = Normalization::AssociationStrength.apply(&network);

        let clustering_driver: ClusteringDriver = ClusteringDriver {
            quality_function: ClusteringQualityFunction::Cpm,
            resolution: 0.2,
            iterations: 2,
            ..ClusteringDriver::default()
        };
        let layout_driver: LayoutDriver = LayoutDriver {
            random_starts: 2,
            max_iterations: 200,
            ..LayoutDriver::default()
        };

        let mut rng: XorShiftRng = XorShiftRng::seed_from_u64(314);
        let clustering: Clustering =
            clustering_driver.run(&normalized, None, &mut rng).unwrap();
        let layout: Layout = layout_driver.run(&normalized, None, &mut rng).unwrap();

        assert_eq!(clustering.num_nodes(), 6);
        assert_eq!(layout.num_nodes(), 6);
        // the two communities separate along the principal axis
        let (x, _) = layout.coordinates();
        let first_centroid: f64 = (x[0] + x[1] + x[2]) / 3.0;
        let second_centroid: f64 = (x[3] + x[4] + x[5]) / 3.0;
        assert!((first_centroid - second_centroid).abs() > 0.5);
    }
}
