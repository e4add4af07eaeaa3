//! Edge directions of a rectilinear orthogonal representation.
//!
//! Corner angles fix the heading of every dart once a single dart's heading is known: walking
//! counter-clockwise around a vertex, the next leaving dart turns clockwise by the corner angle
//! between the two. Directions are committed one vertex at a time in waves, starting at the root.
//! A vertex is deferred to the next wave when its headings disagree with what its neighbours
//! already committed, or when its new edges would close a cycle of forward edges (possibly
//! through bars its cross edges merge).

use crate::embedding::{Axis, DartId, EdgeId, PlanarEmbedding, VertexId};
use crate::error::{Error, Result};
use crate::options::AxisSource;
use crate::shape::OrthogonalRepresentation;
use std::collections::BTreeSet;

/// Compass heading of a dart, numbered counter-clockwise from East.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Heading {
    East,
    North,
    West,
    South,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::East, Heading::North, Heading::West, Heading::South];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Turns counter-clockwise by `quarter_turns` (negative turns clockwise).
    pub fn rotate(self, quarter_turns: i32) -> Self {
        let ix = (self.index() as i32 + quarter_turns).rem_euclid(4);
        Self::ALL[ix as usize]
    }

    pub fn opposite(self) -> Self {
        self.rotate(2)
    }

    pub fn axis(self) -> Axis {
        match self {
            Heading::East | Heading::West => Axis::Horizontal,
            Heading::North | Heading::South => Axis::Vertical,
        }
    }

    /// East for a horizontal primary axis, North for a vertical one.
    pub fn forward(primary: Axis) -> Self {
        match primary {
            Axis::Horizontal => Heading::East,
            Axis::Vertical => Heading::North,
        }
    }

    pub fn is_forward(self, primary: Axis) -> bool {
        self == Self::forward(primary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Primary { tail: VertexId, head: VertexId },
    Cross { a: VertexId, b: VertexId },
}

/// Visit marks shared by every reachability search of one assignment. A slot is marked when it
/// holds the current generation; each vertex has one slot per "took a forward edge" flag.
#[derive(Debug)]
struct VisitMarks {
    marks: Vec<u32>,
    generation: u32,
    stack: Vec<(VertexId, bool)>,
}

impl VisitMarks {
    fn new(vertices: usize) -> Self {
        Self {
            marks: vec![0; 2 * vertices],
            generation: 0,
            stack: Vec::new(),
        }
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.marks.fill(0);
            self.generation = 1;
        }
    }

    fn visit(&mut self, v: VertexId, ok: bool) {
        let slot = 2 * v.0 + usize::from(ok);
        if self.marks[slot] != self.generation {
            self.marks[slot] = self.generation;
            self.stack.push((v, ok));
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionalGraph {
    primary: Axis,
    dart_heading: Vec<Option<Heading>>,
    /// Heading of each edge walked from its `v` end.
    edge_heading: Vec<Option<Heading>>,
    /// `(tail, head)` of each committed primary-axis edge.
    ends: Vec<Option<(VertexId, VertexId)>>,
    forward: Vec<Vec<EdgeId>>,
    reverse: Vec<Vec<EdgeId>>,
    cross: Vec<Vec<EdgeId>>,
    committed: Vec<bool>,
}

impl DirectionalGraph {
    fn new(g: &PlanarEmbedding, primary: Axis) -> Self {
        Self {
            primary,
            dart_heading: vec![None; g.dart_count()],
            edge_heading: vec![None; g.edge_count()],
            ends: vec![None; g.edge_count()],
            forward: vec![Vec::new(); g.vertex_count()],
            reverse: vec![Vec::new(); g.vertex_count()],
            cross: vec![Vec::new(); g.vertex_count()],
            committed: vec![false; g.vertex_count()],
        }
    }

    pub fn primary(&self) -> Axis {
        self.primary
    }

    pub fn heading(&self, d: DartId) -> Option<Heading> {
        self.dart_heading.get(d.0).copied().flatten()
    }

    pub fn edge_heading(&self, e: EdgeId) -> Option<Heading> {
        self.edge_heading.get(e.0).copied().flatten()
    }

    pub fn edge_axis(&self, e: EdgeId) -> Option<Axis> {
        self.edge_heading(e).map(Heading::axis)
    }

    /// Primary-axis edges leaving `v` in the forward heading.
    pub fn forward_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.forward[v.0]
    }

    /// Primary-axis edges entering `v` in the forward heading.
    pub fn reverse_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.reverse[v.0]
    }

    pub fn cross_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.cross[v.0]
    }

    pub fn tail(&self, e: EdgeId) -> Option<VertexId> {
        self.ends.get(e.0).copied().flatten().map(|(t, _)| t)
    }

    pub fn head(&self, e: EdgeId) -> Option<VertexId> {
        self.ends.get(e.0).copied().flatten().map(|(_, h)| h)
    }

    /// Whether `to` is reachable from `from` through committed forward primary edges, cross edges
    /// in either direction and the uncommitted `pending` links. With `through_forward` set, only
    /// paths that take at least one forward edge count.
    fn reaches(
        &self,
        g: &PlanarEmbedding,
        from: VertexId,
        to: VertexId,
        through_forward: bool,
        pending: &[Link],
        marks: &mut VisitMarks,
    ) -> bool {
        marks.reset();
        marks.visit(from, !through_forward);
        while let Some((u, ok)) = marks.stack.pop() {
            if u == to && ok {
                return true;
            }
            let ahead = self.forward[u.0].iter().filter_map(|&e| self.head(e)).chain(
                pending.iter().filter_map(|link| match *link {
                    Link::Primary { tail: t, head: h } if t == u => Some(h),
                    _ => None,
                }),
            );
            for w in ahead {
                marks.visit(w, true);
            }
            let sideways = self.cross[u.0]
                .iter()
                .filter_map(|&e| g.edge(e).opposite(u))
                .chain(pending.iter().filter_map(|link| match *link {
                    Link::Cross { a, b } if a == u => Some(b),
                    Link::Cross { a, b } if b == u => Some(a),
                    _ => None,
                }));
            for w in sideways {
                marks.visit(w, ok);
            }
        }
        false
    }

    /// Headings of every dart leaving `v`, derived from one leaving dart of known heading.
    ///
    /// Returns `None` when the corner angles around `v` do not add up to a full turn.
    fn rotate_around(
        &self,
        g: &PlanarEmbedding,
        rep: &OrthogonalRepresentation,
        v: VertexId,
        seed: Option<(DartId, Heading)>,
    ) -> Option<Vec<(DartId, Heading)>> {
        let (start, heading) = match seed {
            Some(s) => s,
            None => g
                .darts_from(v)
                .find_map(|d| self.heading(d).map(|h| (d, h)))?,
        };
        let mut out = vec![(start, heading)];
        let (mut x, mut h) = (start, heading);
        for _ in 0..=g.degree(v) {
            let succ = g.face_successor(g.twin(x)?)?;
            let angle = rep.angle(succ)?;
            h = h.rotate(-i32::from(angle));
            if succ == start {
                return (h == heading).then_some(out);
            }
            out.push((succ, h));
            x = succ;
        }
        None
    }

    fn commit(&mut self, g: &PlanarEmbedding, v: VertexId, headings: &[(DartId, Heading)]) {
        for &(d, h) in headings {
            self.dart_heading[d.0] = Some(h);
            let Some(twin) = g.twin(d) else {
                continue;
            };
            self.dart_heading[twin.0] = Some(h.opposite());

            let e = g.dart(d).edge;
            if self.edge_heading[e.0].is_some() {
                continue;
            }
            let edge = g.edge(e);
            let along = if g.dart(d).from == edge.v {
                h
            } else {
                h.opposite()
            };
            self.edge_heading[e.0] = Some(along);

            let to = g.dart(d).to;
            if h.axis() == self.primary {
                let (tail, head) = if h.is_forward(self.primary) {
                    (v, to)
                } else {
                    (to, v)
                };
                self.ends[e.0] = Some((tail, head));
                self.forward[tail.0].push(e);
                self.reverse[head.0].push(e);
            } else {
                self.cross[v.0].push(e);
                self.cross[to.0].push(e);
            }
        }
        self.committed[v.0] = true;
    }
}

/// The leaving dart of `root` that comes first along the outer face boundary.
pub fn seed_dart(g: &PlanarEmbedding, root: VertexId) -> Option<DartId> {
    let outer = g.outer_face()?;
    g.face(outer)
        .darts
        .iter()
        .copied()
        .find(|&d| g.dart(d).from == root)
}

/// Candidate headings for the seed dart of `root`, most preferred first.
///
/// The preferred heading is East for a horizontally tagged seed edge and North for a vertical
/// one; its opposite follows. With [`AxisSource::Headings`] the two quarter turns are tried too.
/// Empty when `root` has no leaving dart on the outer face.
pub fn seed_headings(
    g: &PlanarEmbedding,
    root: VertexId,
    axis_source: AxisSource,
) -> Vec<Heading> {
    let Some(d) = seed_dart(g, root) else {
        return Vec::new();
    };
    let preferred = Heading::forward(g.edge(g.dart(d).edge).axis);
    let mut out = vec![preferred, preferred.opposite()];
    if axis_source == AxisSource::Headings {
        out.extend([preferred.rotate(1), preferred.rotate(-1)]);
    }
    out
}

/// Assigns a heading to every dart of a bend-free representation and classifies every edge as
/// forward, reverse or cross relative to `primary`.
///
/// The root's first leaving dart on the outer face heads `seed`.
pub fn assign_edge_directions(
    g: &PlanarEmbedding,
    rep: &OrthogonalRepresentation,
    primary: Axis,
    root: VertexId,
    seed: Heading,
    axis_source: AxisSource,
) -> Result<DirectionalGraph> {
    for (d, dart) in g.darts() {
        if rep.bends(d).is_some_and(|b| !b.is_empty()) {
            return Err(Error::BentEdge { edge: dart.edge });
        }
    }

    let mut dg = DirectionalGraph::new(g, primary);
    let mut root_seed = seed_dart(g, root).map(|d| (d, seed));
    let mut marks = VisitMarks::new(g.vertex_count());
    let mut frontier: BTreeSet<VertexId> = BTreeSet::new();
    frontier.insert(root);

    let mut waves = 0usize;
    while !frontier.is_empty() {
        waves += 1;
        let mut deferred: BTreeSet<VertexId> = BTreeSet::new();
        let mut reached: BTreeSet<VertexId> = BTreeSet::new();
        let mut progress = false;

        for &v in &frontier {
            if dg.committed[v.0] {
                continue;
            }
            let headings = if g.degree(v) == 0 {
                Some(Vec::new())
            } else {
                dg.rotate_around(g, rep, v, if v == root { root_seed } else { None })
            };
            let Some(headings) = headings else {
                deferred.insert(v);
                continue;
            };
            if !accepts(g, &dg, v, &headings, axis_source, &mut marks) {
                tracing::warn!(vertex = %v, wave = waves, "deferring vertex direction assignment");
                deferred.insert(v);
                continue;
            }

            dg.commit(g, v, &headings);
            if v == root {
                root_seed = None;
            }
            progress = true;
            for &(d, _) in &headings {
                let to = g.dart(d).to;
                if !dg.committed[to.0] {
                    reached.insert(to);
                }
            }
        }

        if !progress {
            let vertex = deferred.first().copied().unwrap_or(root);
            return Err(Error::DirectionConflict { vertex });
        }
        frontier = deferred;
        frontier.extend(reached);
    }

    if let Some((v, _)) = g
        .vertices()
        .find(|(v, _)| !dg.committed[v.0] && g.degree(*v) > 0)
    {
        return Err(Error::DirectionConflict { vertex: v });
    }

    tracing::debug!(
        waves,
        forward = dg.forward.iter().map(Vec::len).sum::<usize>(),
        axis = ?primary,
        "assigned edge directions"
    );
    Ok(dg)
}

/// Whether `v` can commit `headings` against what is already committed.
fn accepts(
    g: &PlanarEmbedding,
    dg: &DirectionalGraph,
    v: VertexId,
    headings: &[(DartId, Heading)],
    axis_source: AxisSource,
    marks: &mut VisitMarks,
) -> bool {
    let mut pending: Vec<Link> = Vec::new();
    for &(d, h) in headings {
        if dg.heading(d).is_some_and(|known| known != h) {
            return false;
        }
        let e = g.dart(d).edge;
        if axis_source == AxisSource::Tags && g.edge(e).axis != h.axis() {
            return false;
        }
        if dg.edge_heading(e).is_some() {
            continue;
        }

        let to = g.dart(d).to;
        let link = if h.axis() == dg.primary {
            let (tail, head) = if h.is_forward(dg.primary) {
                (v, to)
            } else {
                (to, v)
            };
            if dg.reaches(g, head, tail, false, &pending, marks) {
                return false;
            }
            Link::Primary { tail, head }
        } else {
            // Merging two bars that a forward path already orders would close a bar cycle.
            if dg.reaches(g, v, to, true, &pending, marks)
                || dg.reaches(g, to, v, true, &pending, marks)
            {
                return false;
            }
            Link::Cross { a: v, b: to }
        };
        pending.push(link);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_both_ways() {
        assert_eq!(Heading::East.rotate(1), Heading::North);
        assert_eq!(Heading::East.rotate(-1), Heading::South);
        assert_eq!(Heading::South.rotate(-3), Heading::East);
        assert_eq!(Heading::West.rotate(4), Heading::West);
        assert_eq!(Heading::North.opposite(), Heading::South);
    }

    #[test]
    fn forward_heading_follows_primary_axis() {
        assert!(Heading::East.is_forward(Axis::Horizontal));
        assert!(!Heading::West.is_forward(Axis::Horizontal));
        assert!(Heading::North.is_forward(Axis::Vertical));
        assert_eq!(Heading::South.axis(), Axis::Vertical);
    }

    fn dart_between(g: &PlanarEmbedding, from: VertexId, to: VertexId) -> DartId {
        g.darts()
            .find(|(_, d)| d.from == from && d.to == to)
            .map(|(id, _)| id)
            .unwrap()
    }

    /// A triangle `a, b, c` with `a -> b` committed as forward and `b - c` committed as cross.
    fn triangle() -> (PlanarEmbedding, DirectionalGraph, [VertexId; 3]) {
        let mut g = PlanarEmbedding::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        g.add_edge(a, b, Axis::Horizontal).unwrap();
        g.add_edge(b, c, Axis::Vertical).unwrap();
        g.add_edge(c, a, Axis::Vertical).unwrap();
        g.add_face(&[a, b, c], false).unwrap();
        g.add_face(&[a, c, b], true).unwrap();

        let mut dg = DirectionalGraph::new(&g, Axis::Horizontal);
        dg.commit(&g, a, &[(dart_between(&g, a, b), Heading::East)]);
        dg.commit(&g, b, &[(dart_between(&g, b, c), Heading::North)]);
        (g, dg, [a, b, c])
    }

    #[test]
    fn forward_reachability_needs_a_forward_step() {
        let (g, dg, [a, b, c]) = triangle();
        let mut marks = VisitMarks::new(g.vertex_count());
        assert!(dg.reaches(&g, a, c, true, &[], &mut marks));
        assert!(!dg.reaches(&g, c, a, true, &[], &mut marks));
        assert!(dg.reaches(&g, c, b, false, &[], &mut marks));
        assert!(!dg.reaches(&g, c, b, true, &[], &mut marks));
    }

    #[test]
    fn cross_edges_never_merge_ordered_bars() {
        let (g, dg, [a, _, c]) = triangle();
        let mut marks = VisitMarks::new(g.vertex_count());
        let ca = dart_between(&g, c, a);
        // `a` already precedes `c`'s bar, so `c - a` cannot be vertical.
        assert!(!accepts(
            &g,
            &dg,
            c,
            &[(ca, Heading::South)],
            AxisSource::Headings,
            &mut marks
        ));
        assert!(accepts(
            &g,
            &dg,
            c,
            &[(ca, Heading::West)],
            AxisSource::Headings,
            &mut marks
        ));
    }

    #[test]
    fn visit_marks_survive_generation_wraparound() {
        let mut marks = VisitMarks::new(2);
        marks.generation = u32::MAX;
        marks.marks[0] = 1;
        marks.reset();
        assert_eq!(marks.generation, 1);
        marks.visit(VertexId(0), false);
        assert_eq!(marks.stack, vec![(VertexId(0), false)]);
        marks.visit(VertexId(0), false);
        marks.visit(VertexId(0), true);
        assert_eq!(marks.stack.len(), 2);
    }
}
