//! Arena entries stored by [`PlanarEmbedding`](super::PlanarEmbedding).

use super::{DartId, EdgeId, FaceId, VertexId};
use serde::{Deserialize, Serialize};

/// The two orthogonal track directions an edge can be drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub name: String,
    /// Bounding box; only used to bound bar extents downstream.
    pub width: f64,
    pub height: f64,
    pub edges: Vec<EdgeId>,
    /// Creation order, used for deterministic tie-breaking.
    pub number: usize,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub v: VertexId,
    pub w: VertexId,
    pub axis: Axis,
    pub darts: Vec<DartId>,
}

impl Edge {
    pub fn opposite(&self, x: VertexId) -> Option<VertexId> {
        if x == self.v {
            Some(self.w)
        } else if x == self.w {
            Some(self.v)
        } else {
            None
        }
    }
}

/// A directed traversal of one edge along the boundary of `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dart {
    pub from: VertexId,
    pub to: VertexId,
    pub edge: EdgeId,
    pub face: FaceId,
}

#[derive(Debug, Clone, Default)]
pub struct Face {
    /// Boundary darts in traversal order; the face lies to the left of each dart.
    pub darts: Vec<DartId>,
    pub outer: bool,
}

impl Face {
    pub fn degree(&self) -> usize {
        self.darts.len()
    }
}
