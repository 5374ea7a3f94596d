// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

/// Errors surfaced by the core library. Construction errors carry the
/// description of the violated invariant; parameter errors carry the name of
/// the offending parameter. All of them are fatal for the current call and
/// none are retried internally.
#[derive(Clone, Debug, PartialEq)]
pub enum CoreError {
    ClusterIndexingError,
    EmptyNetworkError,
    InternalNetworkIndexingError,
    InvalidNetworkError(&'static str),
    ParameterRangeError(&'static str),
    QueueError,
}
