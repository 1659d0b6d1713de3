//! `ShuffleError`: the crate's unified public error enum.
//!
//! Only missing-input conditions and decode/parse failures are fatal and
//! surface here; construction-phase problems are recovered locally (logged
//! and aggregated into the `ShuffleReport`) rather than propagated as errors.
//! See spec §7.

use crate::topology::point::Endpoint;
use thiserror::Error;

/// Unified error type returned by fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShuffleError {
    /// Empty `Group` input; shuffle aborts immediately with no map produced.
    #[error("no group data: the input group set is empty")]
    NoGroupData,

    /// The start endpoint is not indexed to any `Group`; shuffle aborts.
    #[error("start group not found for endpoint {0}")]
    StartGroupNotFound(Endpoint),

    /// A persisted map entry is missing its `=` separator or is otherwise
    /// structurally malformed.
    #[error("malformed map entry: {0:?}")]
    MalformedEntry(String),

    /// A persisted endpoint field could not be parsed as `<region>[:<slot>]`.
    #[error("malformed endpoint: {0:?}")]
    MalformedEndpoint(String),

    /// The same arrival key appears more than once in a persisted map.
    #[error("duplicate map key {0}")]
    DuplicateMapKey(Endpoint),

    /// A group table failed to parse from or serialize to its external form.
    #[error("group table parse error: {0}")]
    TableParse(String),
}
