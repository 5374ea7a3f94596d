// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use clap::{App, Arg};
use std::convert::TryFrom;

mod args;
mod run;

use crate::args::*;

fn main() {
    let matches = App::new("network_mapping_cli")
        .version("0.1.0")
        .about("Clusters the communities of a provided edge list, optionally lays the network out in the plane, and outputs the results")
        .arg(
            Arg::with_name(SOURCE_EDGES)
                .help("The edge list that defines the graph's connections")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name(CLUSTERS_OUTPUT)
                .help("The output for the communities detected")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name(LAYOUT_OUTPUT)
                .help("An output path for node coordinates; the layout only runs when one is given")
                .long("layout_output")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SEPARATOR)
                .short("s")
                .help("The character to split the edge list on")
                .takes_value(true)
                .default_value("\t"),
        )
        .arg(
            Arg::with_name(SOURCE_INDEX)
                .takes_value(true)
                .help("0-based index of source column from edge file")
                .default_value("0"),
        )
        .arg(
            Arg::with_name(TARGET_INDEX)
                .takes_value(true)
                .help("0-based index of target column from edge file")
                .default_value("1"),
        )
        .arg(
            Arg::with_name(WEIGHT_INDEX)
                .takes_value(true)
                .help("0-based index of weight column from edge file"),
        )
        .arg(
            Arg::with_name(SEED)
                .takes_value(true)
                .help("A seed value to start the PRNG")
                .long("seed"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .takes_value(true)
                .help("Number of iterations of the clustering algorithm per random start. Randomization is part of both algorithms; more iterations give them more chances to escape a local maximum")
                .short("i")
                .default_value("1"),
        )
        .arg(
            Arg::with_name(RESOLUTION)
                .takes_value(true)
                .help("Resolution of the maximization function; higher values lead to more communities")
                .short("r")
                .default_value("1.0"),
        )
        .arg(
            Arg::with_name(RANDOMNESS)
                .takes_value(true)
                .help("Randomness of the leiden refinement phase; higher values explore more of the partition space")
                .default_value("1E-2"),
        )
        .arg(
            Arg::with_name(QUALITY)
                .takes_value(true)
                .help("Quality function to maximize")
                .short("q")
                .possible_value("modularity")
                .possible_value("cpm")
                .default_value("modularity"),
        )
        .arg(
            Arg::with_name(ALGORITHM)
                .takes_value(true)
                .help("Clustering algorithm to run")
                .short("a")
                .possible_value("leiden")
                .possible_value("louvain")
                .default_value("leiden"),
        )
        .arg(
            Arg::with_name(NORMALIZATION)
                .takes_value(true)
                .help("Edge weight normalization, applied for cpm runs")
                .short("n")
                .possible_value("none")
                .possible_value("association_strength")
                .possible_value("fractionalization")
                .default_value("none"),
        )
        .arg(
            Arg::with_name(RANDOM_STARTS)
                .takes_value(true)
                .help("Number of random starts; the best result is kept")
                .long("random_starts")
                .default_value("1"),
        )
        .arg(
            Arg::with_name(MIN_CLUSTER_SIZE)
                .takes_value(true)
                .help("Merge away clusters with fewer nodes than this")
                .long("min_cluster_size"),
        )
        .arg(
            Arg::with_name(ATTRACTION)
                .takes_value(true)
                .help("Attraction exponent of the layout quality function")
                .long("attraction")
                .default_value("2"),
        )
        .arg(
            Arg::with_name(REPULSION)
                .takes_value(true)
                .help("Repulsion exponent of the layout quality function; must be smaller than the attraction")
                .long("repulsion")
                .default_value("1"),
        )
        .arg(
            Arg::with_name(EDGE_WEIGHT_INCREMENT)
                .takes_value(true)
                .help("Uniform attraction between all node pairs; required to be positive for disconnected networks")
                .long("edge_weight_increment")
                .default_value("0.0"),
        )
        .arg(
            Arg::with_name(HAS_HEADER)
                .help("Flag must be added if the source file contains a header line")
                .long("has_header"),
        )
        .get_matches();

    match CliArgs::try_from(matches) {
        Ok(cli_args) => {
            if let Err(err) = run::run(&cli_args) {
                println!("An error occurred: {:?}", err);
            }
        }
        Err(err) => println!("{:?}", err),
    }
}
