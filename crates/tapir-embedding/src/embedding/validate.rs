//! Structural checks for [`PlanarEmbedding`].

use super::{DartId, EdgeId, FaceId, PlanarEmbedding};
use crate::error::{EmbeddingError, Result};

impl PlanarEmbedding {
    /// Checks the combinatorial invariants every downstream stage relies on:
    ///
    /// - exactly one face is flagged outer,
    /// - each face boundary is cyclically consistent (`to` of dart *i* is `from` of dart *i+1*),
    /// - each edge has exactly two darts, running in opposite directions.
    ///
    /// It does not check planarity itself (Euler's formula is left to the flow network, where an
    /// inconsistent embedding surfaces as unbalanced production).
    pub fn validate(&self) -> Result<()> {
        let outer = self.faces.iter().filter(|f| f.outer).count();
        if outer != 1 {
            return Err(EmbeddingError::OuterFaceCount { count: outer });
        }

        for (ix, face) in self.faces.iter().enumerate() {
            let n = face.darts.len();
            if n < 2 {
                return Err(EmbeddingError::DegenerateFace { len: n });
            }
            for (i, &d) in face.darts.iter().enumerate() {
                let next = face.darts[(i + 1) % n];
                if self.darts[d.0].to != self.darts[next.0].from
                    || self.darts[d.0].face != FaceId(ix)
                {
                    return Err(EmbeddingError::BrokenCycle {
                        face: FaceId(ix),
                        dart: d,
                    });
                }
            }
        }

        for (ix, edge) in self.edges.iter().enumerate() {
            let edge_id = EdgeId(ix);
            let &[a, b] = edge.darts.as_slice() else {
                return Err(EmbeddingError::DartCount {
                    edge: edge_id,
                    count: edge.darts.len(),
                });
            };
            if !self.opposite_darts(a, b) {
                return Err(EmbeddingError::ParallelDarts { edge: edge_id });
            }
        }

        Ok(())
    }

    fn opposite_darts(&self, a: DartId, b: DartId) -> bool {
        let (a, b) = (&self.darts[a.0], &self.darts[b.0]);
        a.from == b.to && a.to == b.from
    }
}
