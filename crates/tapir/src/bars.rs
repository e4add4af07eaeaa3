//! Bar decomposition and topological layering.
//!
//! With a horizontal primary axis, a bar is a maximal vertical chain of vertices: members are
//! joined by cross (vertical) edges, and bars are ordered left to right by the forward (East)
//! primary edges between them. The vertical primary axis is the same construction rotated.

use crate::direction::{DirectionalGraph, Heading, assign_edge_directions, seed_headings};
use crate::embedding::{Axis, EmbeddingError, PlanarEmbedding, VertexId};
use crate::error::{Error, Result};
use crate::options::BarOptions;
use crate::shape::OrthogonalRepresentation;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BarId(pub usize);

impl fmt::Display for BarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct Bar {
    /// The axis the bar runs along (the cross axis of the layering).
    pub axis: Axis,
    /// Members in order along `axis`, starting from the South (or West) end.
    pub vertices: Vec<VertexId>,
    /// Bars reached by a forward primary edge out of a member, in discovery order.
    pub neighbors: Vec<BarId>,
    pub number: i64,
}

#[derive(Debug, Clone)]
pub struct BarLayering {
    primary: Axis,
    bars: Vec<Bar>,
    bar_of: Vec<Option<BarId>>,
    root: VertexId,
    directions: DirectionalGraph,
}

impl BarLayering {
    /// Partitions the vertices of a bend-free representation into bars and numbers them.
    pub fn build(
        g: &PlanarEmbedding,
        rep: &OrthogonalRepresentation,
        options: &BarOptions,
    ) -> Result<Self> {
        let Rooting {
            root,
            offset,
            directions,
        } = select_root(g, rep, options)?;

        let mut layering = Self {
            primary: options.primary,
            bars: Vec::new(),
            bar_of: vec![None; g.vertex_count()],
            root,
            directions,
        };
        layering.create_bars(g, root);
        for (v, _) in g.vertices() {
            layering.create_bars(g, v);
        }
        layering.link_neighbors(g);
        layering.number_bars(offset)?;

        tracing::debug!(
            bars = layering.bars.len(),
            max_number = ?layering.max_number(),
            axis = ?options.primary,
            root = %root,
            "built bar layering"
        );
        Ok(layering)
    }

    pub fn primary(&self) -> Axis {
        self.primary
    }

    /// The axis every bar runs along.
    pub fn axis(&self) -> Axis {
        self.primary.other()
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn directions(&self) -> &DirectionalGraph {
        &self.directions
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BarId, &Bar)> + '_ {
        self.bars.iter().enumerate().map(|(ix, b)| (BarId(ix), b))
    }

    pub fn get(&self, id: BarId) -> &Bar {
        &self.bars[id.0]
    }

    /// The bar `v` belongs to.
    pub fn bar(&self, v: VertexId) -> Option<BarId> {
        self.bar_of.get(v.0).copied().flatten()
    }

    pub fn number(&self, v: VertexId) -> Option<i64> {
        self.bar(v).map(|b| self.bars[b.0].number)
    }

    pub fn max_number(&self) -> Option<i64> {
        self.bars.iter().map(|b| b.number).max()
    }

    /// Creates the bar of `seed` and every bar reachable from it through forward edges.
    fn create_bars(&mut self, g: &PlanarEmbedding, seed: VertexId) {
        let mut work: VecDeque<VertexId> = VecDeque::new();
        work.push_back(seed);
        while let Some(v) = work.pop_front() {
            if self.bar_of[v.0].is_some() {
                continue;
            }
            let id = self.collect_bar(g, v);
            for &m in &self.bars[id.0].vertices {
                for &e in self.directions.forward_edges(m) {
                    if let Some(head) = self.directions.head(e) {
                        if self.bar_of[head.0].is_none() {
                            work.push_back(head);
                        }
                    }
                }
            }
        }
    }

    /// Collects the cross-edge component of `seed` into a new bar.
    fn collect_bar(&mut self, g: &PlanarEmbedding, seed: VertexId) -> BarId {
        let id = BarId(self.bars.len());
        let mut members = vec![seed];
        self.bar_of[seed.0] = Some(id);
        let mut ix = 0;
        while ix < members.len() {
            let u = members[ix];
            ix += 1;
            for &e in self.directions.cross_edges(u) {
                let Some(w) = g.edge(e).opposite(u) else {
                    continue;
                };
                if self.bar_of[w.0].is_none() {
                    self.bar_of[w.0] = Some(id);
                    members.push(w);
                }
            }
        }

        let vertices = self.order_along_bar(g, members);
        self.bars.push(Bar {
            axis: self.axis(),
            vertices,
            neighbors: Vec::new(),
            number: 0,
        });
        id
    }

    /// Orders bar members by walking forward along the bar from its backward end.
    fn order_along_bar(&self, g: &PlanarEmbedding, mut members: Vec<VertexId>) -> Vec<VertexId> {
        members.sort();
        let ahead = Heading::forward(self.axis());
        let step = |v: VertexId, heading: Heading| {
            g.darts_from(v)
                .find(|&d| self.directions.heading(d) == Some(heading))
                .map(|d| g.dart(d).to)
        };

        let Some(start) = members
            .iter()
            .copied()
            .find(|&m| step(m, ahead.opposite()).is_none())
        else {
            return members;
        };
        let mut ordered = Vec::with_capacity(members.len());
        let mut at = Some(start);
        while let Some(v) = at {
            if ordered.contains(&v) || members.binary_search(&v).is_err() {
                break;
            }
            ordered.push(v);
            at = step(v, ahead);
        }
        for m in members {
            if !ordered.contains(&m) {
                ordered.push(m);
            }
        }
        ordered
    }

    fn link_neighbors(&mut self, g: &PlanarEmbedding) {
        for ix in 0..self.bars.len() {
            let mut neighbors: Vec<BarId> = Vec::new();
            for &m in &self.bars[ix].vertices {
                for &e in self.directions.forward_edges(m) {
                    let Some(b) = self.directions.head(e).and_then(|h| self.bar(h)) else {
                        debug_assert!(false, "forward edge {e} without a bar at its head");
                        continue;
                    };
                    if b.0 != ix && !neighbors.contains(&b) {
                        neighbors.push(b);
                    }
                }
            }
            self.bars[ix].neighbors = neighbors;
        }
        debug_assert!(g.vertices().all(|(v, _)| self.bar(v).is_some()));
    }

    /// Longest-path numbering over the bar adjacency (Kahn's order, one relaxation per link).
    /// Every bar without predecessors starts at `offset`; the root's bar is always one of them.
    fn number_bars(&mut self, offset: i64) -> Result<()> {
        let mut indegree = vec![0usize; self.bars.len()];
        for bar in &self.bars {
            for n in &bar.neighbors {
                indegree[n.0] += 1;
            }
        }
        let mut number = vec![offset; self.bars.len()];
        let mut queue: VecDeque<usize> = (0..self.bars.len())
            .filter(|&ix| indegree[ix] == 0)
            .collect();
        let mut done = 0usize;
        while let Some(ix) = queue.pop_front() {
            done += 1;
            for &n in &self.bars[ix].neighbors {
                number[n.0] = number[n.0].max(number[ix] + 1);
                indegree[n.0] -= 1;
                if indegree[n.0] == 0 {
                    queue.push_back(n.0);
                }
            }
        }
        if done != self.bars.len() {
            return Err(Error::BarCycle);
        }
        for (bar, n) in self.bars.iter_mut().zip(number) {
            bar.number = n;
        }
        Ok(())
    }
}

/// The numbering origin of a layering and the directions seeded from it.
#[derive(Debug, Clone)]
pub struct Rooting {
    pub root: VertexId,
    pub offset: i64,
    pub directions: DirectionalGraph,
}

/// Picks the numbering origin, its offset and the rotation of the drawing.
///
/// A designated corner vertex (from the options, then from the embedding) starts at `-1` and must
/// lie on the outer face; otherwise every outer-face vertex of degree at most 2 is a candidate, in
/// vertex order, starting at `0`. Each candidate is tried with every seed heading the axis source
/// allows, and the first one that lies on a source bar along both axes wins, so the horizontal and
/// vertical layerings share it and its rotation.
///
/// When no candidate is a corner of both axes, the rotation of the first assignable candidate is
/// kept and the root is the first candidate on a source bar along `options.primary`. A designated
/// corner that is not on such a bar is [`Error::RootNotSource`].
pub fn select_root(
    g: &PlanarEmbedding,
    rep: &OrthogonalRepresentation,
    options: &BarOptions,
) -> Result<Rooting> {
    let (candidates, offset) = root_candidates(g, options.corner_vertex)?;

    let mut fallback: Option<DirectionalGraph> = None;
    let mut first_error: Option<Error> = None;
    for &v in &candidates {
        for seed in seed_headings(g, v, options.axis_source) {
            match assign_edge_directions(g, rep, options.primary, v, seed, options.axis_source) {
                Ok(directions) => {
                    if bar_is_source(g, &directions, v, Axis::Horizontal)
                        && bar_is_source(g, &directions, v, Axis::Vertical)
                    {
                        return Ok(Rooting {
                            root: v,
                            offset,
                            directions,
                        });
                    }
                    if fallback.is_none() {
                        fallback = Some(directions);
                    }
                }
                Err(err) => {
                    tracing::debug!(root = %v, ?seed, %err, "rejected root candidate");
                    first_error.get_or_insert(err);
                }
            }
        }
    }

    let Some(directions) = fallback else {
        return Err(first_error.unwrap_or(Error::MissingCornerVertex));
    };
    let root = candidates
        .iter()
        .copied()
        .find(|&v| bar_is_source(g, &directions, v, options.primary))
        .ok_or(Error::RootNotSource {
            vertex: candidates[0],
        })?;
    tracing::debug!(
        root = %root,
        axis = ?options.primary,
        "no corner of both axes, rooting one axis"
    );
    Ok(Rooting {
        root,
        offset,
        directions,
    })
}

/// Root candidates in preference order, with the numbering offset they start at.
fn root_candidates(
    g: &PlanarEmbedding,
    corner_vertex: Option<VertexId>,
) -> Result<(Vec<VertexId>, i64)> {
    let outer = g.outer_face().ok_or(Error::MissingCornerVertex)?;
    let on_outer: Vec<VertexId> = g
        .face(outer)
        .darts
        .iter()
        .map(|&d| g.dart(d).from)
        .collect();

    if let Some(v) = corner_vertex.or(g.corner_vertex()) {
        if v.0 >= g.vertex_count() {
            return Err(EmbeddingError::VertexOutOfRange { vertex: v }.into());
        }
        if !on_outer.contains(&v) {
            return Err(Error::MissingCornerVertex);
        }
        return Ok((vec![v], -1));
    }

    let mut candidates: Vec<VertexId> = on_outer
        .into_iter()
        .filter(|&v| g.degree(v) <= 2)
        .collect();
    candidates.sort_by_key(|v| g.vertex(*v).number);
    candidates.dedup();
    if candidates.is_empty() {
        return Err(Error::MissingCornerVertex);
    }
    Ok((candidates, 0))
}

/// Whether no member of `v`'s bar along `primary` is entered by a forward edge.
fn bar_is_source(
    g: &PlanarEmbedding,
    dirs: &DirectionalGraph,
    v: VertexId,
    primary: Axis,
) -> bool {
    let backward = Heading::forward(primary).opposite();
    let mut seen = vec![false; g.vertex_count()];
    let mut stack = vec![v];
    seen[v.0] = true;
    while let Some(u) = stack.pop() {
        for d in g.darts_from(u) {
            match dirs.heading(d) {
                Some(h) if h == backward => return false,
                Some(h) if h.axis() != primary => {
                    let w = g.dart(d).to;
                    if !seen[w.0] {
                        seen[w.0] = true;
                        stack.push(w);
                    }
                }
                _ => {}
            }
        }
    }
    true
}
