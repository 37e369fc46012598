//! network — validated directed flow-network topology.
//!
//! Purpose
//! -------
//! Hold the in-memory description of a stream network (nodes, directed edges,
//! distances, flows, and source nodes) and reject configurations that cannot
//! define a valid conditional-autoregressive precision matrix.
//!
//! Key behaviors
//! -------------
//! - [`FlowNetwork`] validates and stores the topology once; all downstream
//!   code indexes into it without re-checking.
//! - [`validation`] exposes the individual checks (bounds, attributes,
//!   acyclicity, inflow) for reuse and testing.
//! - [`NetworkError`] reports configuration errors as fatal, pre-evaluation
//!   failures.
//!
//! Invariants & assumptions
//! ------------------------
//! - The edge set is a DAG rooted at source nodes; every non-source node has
//!   an incoming edge with positive distance.
//!
//! Conventions
//! -----------
//! - 0-based indices, edges pointing downstream (`from` upstream of `to`).
//! - No file parsing lives here; loaders hand over plain arrays.

pub mod errors;
pub mod topology;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{NetworkError, NetworkResult};
pub use self::topology::FlowNetwork;
