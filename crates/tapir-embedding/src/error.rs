use crate::embedding::{DartId, EdgeId, FaceId, VertexId};

pub type Result<T> = std::result::Result<T, EmbeddingError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EmbeddingError {
    #[error("unknown vertex: {name}")]
    UnknownVertex { name: String },

    #[error("vertex id out of range: {vertex}")]
    VertexOutOfRange { vertex: VertexId },

    #[error("edge id out of range: {edge}")]
    EdgeOutOfRange { edge: EdgeId },

    #[error("duplicate vertex name: {name}")]
    DuplicateVertex { name: String },

    #[error("edge {v} -> {w} is a self-loop")]
    SelfLoop { v: VertexId, w: VertexId },

    #[error("no unused edge between {from} and {to} for face boundary")]
    MissingEdge { from: VertexId, to: VertexId },

    #[error("face boundary needs at least two vertices, got {len}")]
    DegenerateFace { len: usize },

    #[error("face {face} is not cyclically consistent at dart {dart}")]
    BrokenCycle { face: FaceId, dart: DartId },

    #[error("edge {edge} has {count} darts, expected 2")]
    DartCount { edge: EdgeId, count: usize },

    #[error("darts of edge {edge} do not run in opposite directions")]
    ParallelDarts { edge: EdgeId },

    #[error("embedding has {count} outer faces, expected exactly 1")]
    OuterFaceCount { count: usize },
}
