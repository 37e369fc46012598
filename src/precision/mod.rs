//! precision — sparse GMRF precision matrix of a flow network.
//!
//! Purpose
//! -------
//! Build `Q = (I - Gamma)^T V (I - Gamma)` from a [`FlowNetwork`](crate::network::FlowNetwork)
//! and a spatial decay rate, where `Gamma` carries flow-weighted
//! distance-decay correlations along edges and `V = diag(1 / v_n)` holds the
//! inverse conditional variances.
//!
//! Key behaviors
//! -------------
//! - [`edges`] evaluates per-edge weights, correlations, and variances plus
//!   their `theta`-derivatives.
//! - [`triplets`] assembles sparse matrices with duplicate coordinates summed.
//! - [`NetworkPrecision`] owns all intermediates and exposes factored helpers
//!   (`(I - Gamma) x`, `log|Q|`) used by the density and gradient code.
//!
//! Conventions
//! -----------
//! - Sparse storage is `nalgebra_sparse::CscMatrix<f64>`.
//! - Errors are reported as [`PrecisionError`].

pub mod builder;
pub mod edges;
pub mod errors;
pub mod triplets;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::builder::NetworkPrecision;
pub use self::edges::EdgeTerms;
pub use self::errors::{PrecisionError, PrecisionResult};
pub use self::triplets::TripletList;
