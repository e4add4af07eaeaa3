//! Bend subdivision: turns every bend into a dummy vertex so each edge is a straight segment.

use super::OrthogonalRepresentation;
use crate::embedding::{EdgeId, PlanarEmbedding};
use crate::error::Result;

impl OrthogonalRepresentation {
    /// Returns a copy of `g` and of this representation in which every bend has been replaced by
    /// a zero-size vertex.
    ///
    /// Edges are split from their `v` end: the first segment keeps the edge id and its axis tag,
    /// and every bend toggles the axis of the segment after it. Corners and bends of untouched
    /// darts are carried over unchanged.
    pub fn subdivide_bends(
        &self,
        g: &PlanarEmbedding,
    ) -> Result<(PlanarEmbedding, OrthogonalRepresentation)> {
        let mut g = g.clone();
        let mut rep = self.clone();
        let mut inserted_vertices = 0usize;

        for ix in 0..g.edge_count() {
            let mut current = EdgeId(ix);
            let mut axis = g.edge(current).axis;
            let mut k = 0usize;
            loop {
                let edge = g.edge(current);
                let Some(forward) = edge
                    .darts
                    .iter()
                    .copied()
                    .find(|&d| g.dart(d).from == edge.v)
                else {
                    break;
                };
                let n = rep.bends(forward).map(|b| b.len()).unwrap_or(0);
                if n == 0 {
                    break;
                }

                let name = fresh_name(&g, ix, k);
                axis = axis.other();
                let split = g.split_edge(current, name, axis)?;
                for &(kept, inserted) in &split.darts {
                    let face = g.dart(kept).face;
                    // The forward dart meets the split bend first, its twin meets it last.
                    let bend_index = if kept == forward { 0 } else { n - 1 };
                    rep.insert_edge(face, kept, bend_index, inserted)?;
                }

                current = split.head_edge;
                k += 1;
                inserted_vertices += 1;
            }
        }

        tracing::debug!(
            vertices = inserted_vertices,
            "subdivided bends into dummy vertices"
        );
        Ok((g, rep))
    }
}

fn fresh_name(g: &PlanarEmbedding, edge: usize, bend: usize) -> String {
    let base = format!("bend:e{edge}:{bend}");
    let mut name = base.clone();
    let mut suffix = 0usize;
    while g.vertex_id(&name).is_some() {
        suffix += 1;
        name = format!("{base}~{suffix}");
    }
    name
}
