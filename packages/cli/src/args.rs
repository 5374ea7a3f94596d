// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use clap::ArgMatches;
use std::convert::TryFrom;
use std::num::{ParseFloatError, ParseIntError};

use network_mapping::driver::{ClusteringMethod, ClusteringQualityFunction, Normalization};

pub const SOURCE_EDGES: &str = "EDGE_LIST_FILE";
pub const CLUSTERS_OUTPUT: &str = "CLUSTERS_OUTPUT_PATH";
pub const LAYOUT_OUTPUT: &str = "layout_output";
pub const SEPARATOR: &str = "separator";
pub const SOURCE_INDEX: &str = "source_index";
pub const TARGET_INDEX: &str = "target_index";
pub const WEIGHT_INDEX: &str = "weight_index";
pub const SEED: &str = "seed";
pub const ITERATIONS: &str = "iterations";
pub const RESOLUTION: &str = "resolution";
pub const RANDOMNESS: &str = "randomness";
pub const QUALITY: &str = "quality";
pub const ALGORITHM: &str = "algorithm";
pub const NORMALIZATION: &str = "normalization";
pub const RANDOM_STARTS: &str = "random_starts";
pub const MIN_CLUSTER_SIZE: &str = "min_cluster_size";
pub const ATTRACTION: &str = "attraction";
pub const REPULSION: &str = "repulsion";
pub const EDGE_WEIGHT_INCREMENT: &str = "edge_weight_increment";
pub const HAS_HEADER: &str = "has_header";

pub struct CliArgs {
    pub source_edges: String,
    pub clusters_output_path: String,
    pub layout_output_path: Option<String>,
    pub separator: String,
    pub source_index: usize,
    pub target_index: usize,
    pub weight_index: Option<usize>,
    pub seed: Option<usize>,
    pub iterations: usize,
    pub resolution: f64,
    pub randomness: f64,
    pub quality_function: ClusteringQualityFunction,
    pub method: ClusteringMethod,
    pub normalization: Normalization,
    pub random_starts: usize,
    pub min_cluster_size: Option<usize>,
    pub attraction: i32,
    pub repulsion: i32,
    pub edge_weight_increment: f64,
    pub skip_first_line: bool,
}

impl TryFrom<ArgMatches<'_>> for CliArgs {
    type Error = ParseCliError;

    fn try_from(matches: ArgMatches<'_>) -> Result<Self, Self::Error> {
        let source_edges = matches
            .value_of(SOURCE_EDGES)
            .ok_or(ParseCliError::RequiredValueError)?;
        let clusters_output = matches
            .value_of(CLUSTERS_OUTPUT)
            .ok_or(ParseCliError::RequiredValueError)?;
        let layout_output: Option<String> =
            matches.value_of(LAYOUT_OUTPUT).map(|path| path.into());
        let separator = matches
            .value_of(SEPARATOR)
            .ok_or(ParseCliError::RequiredValueError)?;
        let source_index: usize = matches.value_of(SOURCE_INDEX).as_a()?;
        let target_index: usize = matches.value_of(TARGET_INDEX).as_a()?;
        let weight_index: Option<usize> = matches.value_of(WEIGHT_INDEX).as_a()?;
        let seed: Option<usize> = matches.value_of(SEED).as_a()?;
        let iterations: usize = matches.value_of(ITERATIONS).as_a()?;
        let resolution: f64 = matches.value_of(RESOLUTION).as_a()?;
        let randomness: f64 = matches.value_of(RANDOMNESS).as_a()?;
        let random_starts: usize = matches.value_of(RANDOM_STARTS).as_a()?;
        let min_cluster_size: Option<usize> = matches.value_of(MIN_CLUSTER_SIZE).as_a()?;
        let attraction: i32 = matches.value_of(ATTRACTION).as_a()?;
        let repulsion: i32 = matches.value_of(REPULSION).as_a()?;
        let edge_weight_increment: f64 = matches.value_of(EDGE_WEIGHT_INCREMENT).as_a()?;
        let quality_function: ClusteringQualityFunction = match matches.value_of(QUALITY) {
            Some("cpm") => Ok(ClusteringQualityFunction::Cpm),
            Some("modularity") => Ok(ClusteringQualityFunction::Modularity),
            Some(_) => Err(ParseCliError::InvalidQualityFunctionError),
            None => Err(ParseCliError::RequiredValueError),
        }?;
        let method: ClusteringMethod = match matches.value_of(ALGORITHM) {
            Some("leiden") => Ok(ClusteringMethod::Leiden),
            Some("louvain") => Ok(ClusteringMethod::Louvain),
            Some(_) => Err(ParseCliError::InvalidAlgorithmError),
            None => Err(ParseCliError::RequiredValueError),
        }?;
        let normalization: Normalization = match matches.value_of(NORMALIZATION) {
            Some("none") => Ok(Normalization::NoNormalization),
            Some("association_strength") => Ok(Normalization::AssociationStrength),
            Some("fractionalization") => Ok(Normalization::Fractionalization),
            Some(_) => Err(ParseCliError::InvalidNormalizationError),
            None => Err(ParseCliError::RequiredValueError),
        }?;
        let skip_first_line: bool = matches.is_present(HAS_HEADER);
        let cli_args: CliArgs = CliArgs {
            source_edges: source_edges.into(),
            clusters_output_path: clusters_output.into(),
            layout_output_path: layout_output,
            separator: separator.into(),
            source_index,
            target_index,
            weight_index,
            seed,
            iterations,
            resolution,
            randomness,
            quality_function,
            method,
            normalization,
            random_starts,
            min_cluster_size,
            attraction,
            repulsion,
            edge_weight_increment,
            skip_first_line,
        };
        return Ok(cli_args);
    }
}

#[derive(Debug)]
pub enum ParseCliError {
    RequiredValueError,
    NotANumber,
    InvalidQualityFunctionError,
    InvalidAlgorithmError,
    InvalidNormalizationError,
}

impl From<ParseFloatError> for ParseCliError {
    fn from(_: ParseFloatError) -> Self {
        return ParseCliError::NotANumber;
    }
}

impl From<ParseIntError> for ParseCliError {
    fn from(_: ParseIntError) -> Self {
        return ParseCliError::NotANumber;
    }
}

trait As<T> {
    fn as_a(&self) -> Result<T, ParseCliError>;
}

impl As<f64> for Option<&str> {
    fn as_a(&self) -> Result<f64, ParseCliError> {
        return match self {
            Some(cli_arg) => Ok(cli_arg.parse::<f64>()?),
            None => Err(ParseCliError::RequiredValueError),
        };
    }
}

impl As<usize> for Option<&str> {
    fn as_a(&self) -> Result<usize, ParseCliError> {
        return match self {
            Some(cli_arg) => Ok(cli_arg.parse::<usize>()?),
            None => Err(ParseCliError::RequiredValueError),
        };
    }
}

impl As<i32> for Option<&str> {
    fn as_a(&self) -> Result<i32, ParseCliError> {
        return match self {
            Some(cli_arg) => Ok(cli_arg.parse::<i32>()?),
            None => Err(ParseCliError::RequiredValueError),
        };
    }
}

impl As<Option<usize>> for Option<&str> {
    fn as_a(&self) -> Result<Option<usize>, ParseCliError> {
        return match self {
            Some(cli_arg) => Ok(Some(cli_arg.parse::<usize>()?)),
            None => Ok(None),
        };
    }
}
