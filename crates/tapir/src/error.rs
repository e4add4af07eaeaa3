use crate::embedding::{DartId, EdgeId, EmbeddingError, FaceId, VertexId};

pub type Result<T> = std::result::Result<T, Error>;

/// The two failure classes of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// A malformed embedding or a defect in network construction/solving. Never recoverable.
    InvariantViolation,
    /// The solver could not route all production to the sink; the embedding has no orthogonal
    /// representation under this network.
    BlockedFlow,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("flow blocked after delivering {delivered} of {required} units (balanced: {balanced})")]
    BlockedFlow {
        delivered: i64,
        required: i64,
        balanced: bool,
    },

    /// Blocked although production was balanced and every vertex has degree <= 4, which a
    /// well-formed embedding never produces.
    #[error("network infeasible despite balanced production: {delivered} of {required} units")]
    InfeasibleNetwork { delivered: i64, required: i64 },

    #[error("dart {dart} in face {face} decoded to a zero angle")]
    ZeroAngle { face: FaceId, dart: DartId },

    #[error("dart {dart} in face {face} has angle {angle}, expected 1..=4")]
    AngleOutOfRange { face: FaceId, dart: DartId, angle: i64 },

    #[error("dart {dart} is not part of the shape of face {face}")]
    UnknownDart { face: FaceId, dart: DartId },

    #[error("bend index {index} out of range for dart {dart} with {len} bends")]
    BendIndexOutOfRange { dart: DartId, index: usize, len: usize },

    #[error("no consistent direction can be assigned around vertex {vertex}")]
    DirectionConflict { vertex: VertexId },

    #[error("no corner vertex: no usable degree <= 2 vertex on the outer face")]
    MissingCornerVertex,

    /// The root's bar has a predecessor along the layered axis, so it cannot anchor the numbering.
    #[error("root vertex {vertex} does not lie on a source bar")]
    RootNotSource { vertex: VertexId },

    #[error("edge {edge} still carries bends; subdivide bends before building bars")]
    BentEdge { edge: EdgeId },

    #[error("bar adjacency contains a cycle")]
    BarCycle,
}

impl Error {
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::BlockedFlow { .. } => ErrorClass::BlockedFlow,
            _ => ErrorClass::InvariantViolation,
        }
    }
}
