#![forbid(unsafe_code)]

//! Planar embedding container used by `tapir`.
//!
//! A [`PlanarEmbedding`] is an arena of vertices, edges, darts and faces addressed by dense
//! integer ids. Every cross reference (edge endpoints, the darts of an edge, the darts bounding a
//! face) is an index into one of the parallel vectors, so the structure is cheap to clone and
//! trivially serializable through [`EmbeddingSpec`].

pub mod embedding;
pub mod error;
pub mod spec;

pub use embedding::{
    Axis, Dart, DartId, Edge, EdgeId, EdgeSplit, Face, FaceId, PlanarEmbedding, Vertex, VertexId,
};
pub use error::{EmbeddingError, Result};
pub use spec::{EdgeSpec, EmbeddingSpec, FaceSpec, VertexSpec};
