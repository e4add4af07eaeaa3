#![forbid(unsafe_code)]

//! Minimum-bend orthogonal representations and bar layering for planar embeddings.
//!
//! The pipeline reduces the choice of corner angles and edge bends to a min-cost flow problem
//! ([`network`], [`solver`]), reads the optimal flow back as an [`OrthogonalRepresentation`]
//! ([`shape`]), and groups the vertices of the resulting rectilinear drawing into numbered bars
//! ([`direction`], [`bars`]) for a downstream compaction stage.

pub use tapir_embedding as embedding;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod bars;
pub mod direction;
pub mod error;
pub mod network;
pub mod options;
pub mod pipeline;
pub mod shape;
pub mod solver;

pub use bars::{Bar, BarId, BarLayering};
pub use direction::{DirectionalGraph, Heading};
pub use error::{Error, ErrorClass, Result};
pub use network::FlowNetwork;
pub use options::{AxisSource, BarOptions, LayoutOptions, OrthogonalizeOptions};
pub use pipeline::{Layout, Orthogonalization, build_bars, layout, orthogonalize};
pub use shape::{Bend, Bends, OrthogonalRepresentation, OrthogonalShape, Tuple};
pub use solver::SolveStats;
