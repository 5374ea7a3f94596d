// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::collections::HashMap;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::time::Instant;

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use network_mapping::clustering::Clustering;
use network_mapping::driver::{
    ClusteringDriver, ClusteringQualityFunction, LayoutDriver, LayoutQualityFunction,
    Normalization,
};
use network_mapping::errors::CoreError;
use network_mapping::layout::Layout;
use network_mapping::network::{Network, NetworkBuilder};
use network_mapping::quality::cpm_quality;

use crate::args::CliArgs;

#[derive(Debug)]
pub enum RunError {
    EdgeFileFormatError,
    IoError(std::io::Error),
    CoreError(CoreError),
}

impl From<std::io::Error> for RunError {
    fn from(err: std::io::Error) -> RunError {
        return RunError::IoError(err);
    }
}

impl From<CoreError> for RunError {
    fn from(err: CoreError) -> RunError {
        return RunError::CoreError(err);
    }
}

struct LabeledEdgeList {
    labels: Vec<String>,
    edges: Vec<(usize, usize, f64)>,
}

fn id_for(
    label: &str,
    label_to_id: &mut HashMap<String, usize>,
    labels: &mut Vec<String>,
) -> usize {
    return match label_to_id.get(label) {
        Some(id) => *id,
        None => {
            let new_id: usize = labels.len();
            label_to_id.insert(String::from(label), new_id);
            labels.push(String::from(label));
            new_id
        }
    };
}

fn load_edge_list(args: &CliArgs) -> Result<LabeledEdgeList, RunError> {
    let minimum_required_length: usize = args
        .source_index
        .max(args.target_index)
        .max(args.weight_index.unwrap_or(args.target_index))
        + 1;
    let mut reader: BufReader<File> = BufReader::new(File::open(&args.source_edges)?);
    let mut contents: String = String::new();
    reader.read_to_string(&mut contents)?;

    let mut label_to_id: HashMap<String, usize> = HashMap::new();
    let mut labels: Vec<String> = Vec::new();
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    for (line_number, line) in contents.lines().enumerate() {
        if line.is_empty() || (args.skip_first_line && line_number == 0) {
            continue;
        }
        let splits: Vec<&str> = line.split(&args.separator).collect();
        if splits.len() < minimum_required_length {
            return Err(RunError::EdgeFileFormatError);
        }
        let source: usize = id_for(splits[args.source_index], &mut label_to_id, &mut labels);
        let target: usize = id_for(splits[args.target_index], &mut label_to_id, &mut labels);
        let weight: f64 = match args.weight_index {
            Some(weight_index) => splits[weight_index]
                .parse::<f64>()
                .map_err(|_err| RunError::EdgeFileFormatError)?,
            None => 1_f64,
        };
        edges.push((source, target, weight));
    }
    return Ok(LabeledEdgeList { labels, edges });
}

pub fn run(args: &CliArgs) -> Result<(), RunError> {
    let start_instant: Instant = Instant::now();
    let edge_list: LabeledEdgeList = load_edge_list(args)?;
    let use_modularity: bool = args.quality_function == ClusteringQualityFunction::Modularity;

    let mut builder: NetworkBuilder = NetworkBuilder::new().check_integrity();
    if use_modularity || args.normalization != Normalization::NoNormalization {
        builder = builder.node_weights_from_edges();
    }
    let network: Network = builder.build_from_edge_list(edge_list.labels.len(), edge_list.edges)?;
    let network: Network = if use_modularity {
        network
    } else {
        args.normalization.apply(&network)
    };
    let loaded_file_instant: Instant = Instant::now();

    let mut rng: XorShiftRng = match args.seed {
        Some(seed) => {
            println!("Using {} for PRNG seed", seed as u64);
            XorShiftRng::seed_from_u64(seed as u64)
        }
        None => XorShiftRng::from_entropy(),
    };

    let clustering_driver: ClusteringDriver = ClusteringDriver {
        method: args.method,
        quality_function: args.quality_function,
        resolution: args.resolution,
        randomness: args.randomness,
        iterations: args.iterations,
        random_starts: args.random_starts,
        min_cluster_size: args.min_cluster_size.map(|size| size as u64),
    };
    let clustering: Clustering = clustering_driver.run(&network, None, &mut rng)?;
    let quality_score: f64 =
        cpm_quality(&network, &clustering, Some(args.resolution), use_modularity)?;
    println!(
        "Found {} clusters with a quality score of {:?}",
        clustering.n_clusters(),
        quality_score
    );

    println!("Writing clusters to {}", args.clusters_output_path);
    let mut clusters_file: File = File::create(&args.clusters_output_path)?;
    for item in &clustering {
        writeln!(
            clusters_file,
            "{},{}",
            edge_list.labels[item.node], item.cluster
        )?;
    }
    let clustering_instant: Instant = Instant::now();

    if let Some(layout_output_path) = &args.layout_output_path {
        let layout_driver: LayoutDriver = LayoutDriver {
            quality_function: LayoutQualityFunction::Vos,
            attraction: args.attraction,
            repulsion: args.repulsion,
            edge_weight_increment: args.edge_weight_increment,
            random_starts: args.random_starts,
            ..LayoutDriver::default()
        };
        let layout: Layout = layout_driver.run(&network, None, &mut rng)?;
        println!("Writing layout to {}", layout_output_path);
        let mut layout_file: File = File::create(layout_output_path)?;
        for node in 0..layout.num_nodes() {
            let (x, y) = layout.position(node);
            writeln!(layout_file, "{},{},{}", edge_list.labels[node], x, y)?;
        }
    }

    let finished_instant: Instant = Instant::now();
    println!(
        "Time to load file: {:?}",
        loaded_file_instant.duration_since(start_instant)
    );
    println!(
        "Time to cluster: {:?}",
        clustering_instant.duration_since(loaded_file_instant)
    );
    println!(
        "Total time: {:?}",
        finished_instant.duration_since(start_instant)
    );
    return Ok(());
}
