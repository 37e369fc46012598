//! Errors for stream-network topology (index bounds, edge attributes, node
//! flows, source declarations, and structural configuration checks).
//!
//! This module defines [`NetworkError`], the configuration error type raised
//! while constructing a [`FlowNetwork`](crate::network::FlowNetwork). All of
//! these errors are fatal for a given network and are meant to be surfaced
//! before any likelihood evaluation takes place.
//!
//! ## Conventions
//! - **Node and edge indices are 0-based** (match Rust/NumPy).
//! - Edge distances must be **finite and non-negative**; node flows must be
//!   **finite and strictly positive**.
//! - A node that is neither a declared source nor reachable through an edge
//!   with positive distance would carry zero conditional variance; this is
//!   reported here rather than as an infinite precision later on.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for network construction and validation.
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Configuration errors for a directed flow network.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkError {
    // ---- Shape ----
    /// The network has no nodes.
    EmptyNetwork,

    /// Two per-edge arrays disagree in length.
    EdgeLengthMismatch { field: &'static str, expected: usize, actual: usize },

    // ---- Index bounds ----
    /// An edge endpoint is not a valid node index.
    EdgeNodeOutOfRange { edge: usize, node: usize, n_nodes: usize },

    /// A declared source is not a valid node index.
    SourceOutOfRange { index: usize, node: usize, n_nodes: usize },

    // ---- Attribute values ----
    /// Edge distances must be finite and >= 0.
    InvalidDistance { edge: usize, value: f64 },

    /// Node flows must be finite and > 0.
    InvalidFlow { node: usize, value: f64 },

    // ---- Structure ----
    /// An edge connects a node to itself.
    SelfLoop { edge: usize, node: usize },

    /// The edge set contains a directed cycle through `node`.
    CyclicNetwork { node: usize },

    /// A non-source node without incoming edges (zero conditional variance).
    OrphanNode { node: usize },

    /// A non-source node whose incoming edges all have zero distance, so its
    /// conditional variance is zero for every decay rate.
    DegenerateInflow { node: usize },
}

impl std::error::Error for NetworkError {}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Shape ----
            NetworkError::EmptyNetwork => {
                write!(f, "Network must contain at least one node.")
            }
            NetworkError::EdgeLengthMismatch { field, expected, actual } => {
                write!(f, "Edge array '{field}' length mismatch: expected {expected}, got {actual}")
            }
            // ---- Index bounds ----
            NetworkError::EdgeNodeOutOfRange { edge, node, n_nodes } => {
                write!(f, "Edge {edge} references node {node}, but the network has {n_nodes} nodes")
            }
            NetworkError::SourceOutOfRange { index, node, n_nodes } => {
                write!(
                    f,
                    "Source entry {index} references node {node}, but the network has {n_nodes} nodes"
                )
            }
            // ---- Attribute values ----
            NetworkError::InvalidDistance { edge, value } => {
                write!(f, "Distance of edge {edge} must be finite and >= 0; got: {value}")
            }
            NetworkError::InvalidFlow { node, value } => {
                write!(f, "Flow at node {node} must be finite and > 0; got: {value}")
            }
            // ---- Structure ----
            NetworkError::SelfLoop { edge, node } => {
                write!(f, "Edge {edge} is a self loop on node {node}")
            }
            NetworkError::CyclicNetwork { node } => {
                write!(f, "Network contains a directed cycle through node {node}")
            }
            NetworkError::OrphanNode { node } => {
                write!(
                    f,
                    "Node {node} has no incoming edges and is not a declared source; its conditional variance would be zero"
                )
            }
            NetworkError::DegenerateInflow { node } => {
                write!(
                    f,
                    "All incoming edges of node {node} have zero distance; its conditional variance would be zero"
                )
            }
        }
    }
}

/// Convert a [`NetworkError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<NetworkError> for PyErr {
    fn from(err: NetworkError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
