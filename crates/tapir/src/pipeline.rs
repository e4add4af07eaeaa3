//! End-to-end entry points: network construction, solving, decoding and bar layering.

use crate::bars::BarLayering;
use crate::embedding::{Axis, PlanarEmbedding};
use crate::error::{Error, Result};
use crate::network::FlowNetwork;
use crate::options::{BarOptions, LayoutOptions, OrthogonalizeOptions};
use crate::shape::OrthogonalRepresentation;
use crate::solver::{self, SolveStats};

#[derive(Debug, Clone)]
pub struct Orthogonalization {
    /// The solved network, kept for inspection of individual arc flows.
    pub network: FlowNetwork,
    pub stats: SolveStats,
    pub representation: OrthogonalRepresentation,
}

/// Computes a minimum-bend orthogonal representation of `g`.
pub fn orthogonalize(
    g: &PlanarEmbedding,
    options: &OrthogonalizeOptions,
) -> Result<Orthogonalization> {
    let _span = tracing::debug_span!(
        "orthogonalize",
        vertices = g.vertex_count(),
        faces = g.face_count()
    )
    .entered();

    if options.validate {
        g.validate()?;
    }
    let mut network = FlowNetwork::build(g);
    let stats = solver::solve(&mut network).map_err(|err| classify_blocked(g, err))?;
    let representation = OrthogonalRepresentation::decode(&network, g)?;
    Ok(Orthogonalization {
        network,
        stats,
        representation,
    })
}

/// A balanced network over vertices of degree at most 4 always admits a full flow, so a blocked
/// solve there points at a malformed embedding rather than a legitimately infeasible one.
fn classify_blocked(g: &PlanarEmbedding, err: Error) -> Error {
    match err {
        Error::BlockedFlow {
            delivered,
            required,
            balanced: true,
        } if g.vertices().all(|(v, _)| g.degree(v) <= 4) => {
            tracing::debug!(delivered, required, "blocked flow on a balanced network");
            Error::InfeasibleNetwork {
                delivered,
                required,
            }
        }
        other => other,
    }
}

/// Builds the bar layering of a bend-free representation along `options.primary`.
pub fn build_bars(
    g: &PlanarEmbedding,
    representation: &OrthogonalRepresentation,
    options: &BarOptions,
) -> Result<BarLayering> {
    let _span = tracing::debug_span!("build_bars", primary = ?options.primary).entered();
    BarLayering::build(g, representation, options)
}

#[derive(Debug, Clone)]
pub struct Layout {
    /// The input embedding, with a dummy vertex per bend when bends were subdivided.
    pub embedding: PlanarEmbedding,
    pub representation: OrthogonalRepresentation,
    pub stats: SolveStats,
    /// Bars numbered along the horizontal axis (vertical bars, ordered West to East).
    pub horizontal: BarLayering,
    /// Bars numbered along the vertical axis (horizontal bars, ordered South to North).
    pub vertical: BarLayering,
}

/// Orthogonalizes `g` and builds the bar layerings of both axes.
pub fn layout(g: &PlanarEmbedding, options: &LayoutOptions) -> Result<Layout> {
    let _span = tracing::info_span!("layout", vertices = g.vertex_count()).entered();

    let Orthogonalization {
        stats,
        representation,
        ..
    } = orthogonalize(g, &options.orthogonalize)?;

    let (embedding, representation) = if options.subdivide_bends {
        representation.subdivide_bends(g)?
    } else {
        (g.clone(), representation)
    };

    let horizontal = build_bars(
        &embedding,
        &representation,
        &options.bar_options(Axis::Horizontal),
    )?;
    let vertical = build_bars(
        &embedding,
        &representation,
        &options.bar_options(Axis::Vertical),
    )?;

    Ok(Layout {
        embedding,
        representation,
        stats,
        horizontal,
        vertical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::VertexId;

    fn star(leaves: usize) -> PlanarEmbedding {
        let mut g = PlanarEmbedding::new();
        let c = g.add_vertex("c");
        let mut walk: Vec<VertexId> = Vec::new();
        for i in 0..leaves {
            let l = g.add_vertex(format!("l{i}"));
            g.add_edge(c, l, Axis::Horizontal).unwrap();
            walk.push(c);
            walk.push(l);
        }
        g.add_face(&walk, true).unwrap();
        g
    }

    #[test]
    fn balanced_blocks_on_low_degree_graphs_are_infeasible_networks() {
        let blocked = Error::BlockedFlow {
            delivered: 3,
            required: 4,
            balanced: true,
        };
        assert_eq!(
            classify_blocked(&star(4), blocked.clone()),
            Error::InfeasibleNetwork {
                delivered: 3,
                required: 4
            }
        );
        assert_eq!(classify_blocked(&star(5), blocked.clone()), blocked);

        let unbalanced = Error::BlockedFlow {
            delivered: 3,
            required: 4,
            balanced: false,
        };
        assert_eq!(classify_blocked(&star(4), unbalanced.clone()), unbalanced);
    }

    #[test]
    fn high_degree_vertices_stay_blocked_flow() {
        let err = orthogonalize(&star(5), &OrthogonalizeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::BlockedFlow { balanced: true, .. }));
    }
}
