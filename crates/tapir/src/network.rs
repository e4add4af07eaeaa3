//! Flow network whose feasible flows are orthogonal representations (Tamassia's construction).
//!
//! Every vertex and every face becomes a node. One unit of flow on a vertex arc `v -> f` widens
//! the corner of `v` in `f` by 90° beyond the minimum of 90°; one unit on a face arc `f -> g`
//! is a bend on the shared edge that is 90° as seen from `f` (and 270° from `g`). Only face arcs
//! cost anything, so a minimum-cost flow is a minimum-bend representation.

use crate::embedding::{DartId, FaceId, PlanarEmbedding, VertexId};
use std::fmt;

/// Vertex arcs let a corner grow from 90° (flow 0) to 360° (flow 3).
pub const VERTEX_ARC_CAPACITY: i64 = 3;
/// Capacity of face arcs; bends along an edge are not bounded.
pub const UNBOUNDED: i64 = i64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArcId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Vertex(VertexId),
    Face(FaceId),
    Source,
    Sink,
}

#[derive(Debug, Clone)]
pub struct FlowNode {
    pub kind: NodeKind,
    /// Supply if positive, demand if negative. Always 0 for the source and the sink.
    pub production: i64,
    pub inputs: Vec<ArcId>,
    pub outputs: Vec<ArcId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    Vertex,
    Face,
    Supply,
    Demand,
}

#[derive(Debug, Clone)]
pub struct FlowArc {
    pub source: NodeId,
    pub destination: NodeId,
    pub capacity: i64,
    pub cost: i64,
    pub flow: i64,
    /// The dart a vertex or face arc was created for.
    pub dart: Option<DartId>,
    pub kind: ArcKind,
}

#[derive(Debug, Clone)]
pub struct FlowNetwork {
    nodes: Vec<FlowNode>,
    arcs: Vec<FlowArc>,
    vertex_nodes: Vec<NodeId>,
    face_nodes: Vec<NodeId>,
    vertex_arc_by_dart: Vec<Option<ArcId>>,
    face_arc_by_dart: Vec<Option<ArcId>>,
    source: NodeId,
    sink: NodeId,
}

/// Production of a vertex node: a degree-4 vertex is balanced, lower degrees supply angle.
pub fn vertex_production(degree: usize) -> i64 {
    4 - degree as i64
}

/// Production of a face node.
///
/// Internal faces of degree 2 are pinned to 0; every other face absorbs `degree - 4` units
/// (internal) or `degree + 4` units (outer).
pub fn face_production(degree: usize, outer: bool) -> i64 {
    let degree = degree as i64;
    if outer {
        -(degree + 4)
    } else if degree == 2 {
        0
    } else {
        -(degree - 4)
    }
}

impl FlowNetwork {
    pub fn build(g: &PlanarEmbedding) -> Self {
        let mut net = FlowNetwork {
            nodes: Vec::with_capacity(g.vertex_count() + g.face_count() + 2),
            arcs: Vec::with_capacity(2 * g.dart_count() + g.vertex_count() + g.face_count()),
            vertex_nodes: Vec::with_capacity(g.vertex_count()),
            face_nodes: Vec::with_capacity(g.face_count()),
            vertex_arc_by_dart: vec![None; g.dart_count()],
            face_arc_by_dart: vec![None; g.dart_count()],
            source: NodeId(0),
            sink: NodeId(0),
        };

        for (v, _) in g.vertices() {
            let id = net.add_node(NodeKind::Vertex(v), vertex_production(g.degree(v)));
            net.vertex_nodes.push(id);
        }
        for (f, face) in g.faces() {
            let id = net.add_node(NodeKind::Face(f), face_production(face.degree(), face.outer));
            net.face_nodes.push(id);
        }

        for (f, face) in g.faces() {
            let to = net.face_nodes[f.0];
            for &d in &face.darts {
                let from = net.vertex_nodes[g.dart(d).from.0];
                let arc = net.add_arc(from, to, VERTEX_ARC_CAPACITY, 0, Some(d), ArcKind::Vertex);
                net.vertex_arc_by_dart[d.0] = Some(arc);
            }
        }

        for (f, face) in g.faces() {
            let from = net.face_nodes[f.0];
            for &d in &face.darts {
                let Some(twin) = g.twin(d) else {
                    continue;
                };
                let other = g.dart(twin).face;
                // Both sides of a bridge lie in the same face; bending it changes nothing.
                if other == f {
                    continue;
                }
                let to = net.face_nodes[other.0];
                let arc = net.add_arc(from, to, UNBOUNDED, 1, Some(d), ArcKind::Face);
                net.face_arc_by_dart[d.0] = Some(arc);
            }
        }

        net.source = net.add_node(NodeKind::Source, 0);
        net.sink = net.add_node(NodeKind::Sink, 0);
        for ix in 0..net.nodes.len() {
            let production = net.nodes[ix].production;
            if production > 0 {
                net.add_arc(net.source, NodeId(ix), production, 0, None, ArcKind::Supply);
            } else if production < 0 {
                net.add_arc(NodeId(ix), net.sink, -production, 0, None, ArcKind::Demand);
            }
        }

        if !net.is_balanced() {
            tracing::warn!(
                supply = net.total_supply(),
                demand = net.total_demand(),
                "flow network production is unbalanced"
            );
        }
        tracing::debug!(
            nodes = net.nodes.len(),
            arcs = net.arcs.len(),
            supply = net.total_supply(),
            demand = net.total_demand(),
            "built flow network"
        );
        net
    }

    fn add_node(&mut self, kind: NodeKind, production: i64) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(FlowNode {
            kind,
            production,
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        id
    }

    fn add_arc(
        &mut self,
        source: NodeId,
        destination: NodeId,
        capacity: i64,
        cost: i64,
        dart: Option<DartId>,
        kind: ArcKind,
    ) -> ArcId {
        let id = ArcId(self.arcs.len());
        self.arcs.push(FlowArc {
            source,
            destination,
            capacity,
            cost,
            flow: 0,
            dart,
            kind,
        });
        self.nodes[source.0].outputs.push(id);
        self.nodes[destination.0].inputs.push(id);
        id
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn sink(&self) -> NodeId {
        self.sink
    }

    pub fn node(&self, id: NodeId) -> &FlowNode {
        &self.nodes[id.0]
    }

    pub fn arc(&self, id: ArcId) -> &FlowArc {
        &self.arcs[id.0]
    }

    pub(crate) fn arc_mut(&mut self, id: ArcId) -> &mut FlowArc {
        &mut self.arcs[id.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FlowNode)> + '_ {
        self.nodes.iter().enumerate().map(|(ix, n)| (NodeId(ix), n))
    }

    pub fn arcs(&self) -> impl Iterator<Item = (ArcId, &FlowArc)> + '_ {
        self.arcs.iter().enumerate().map(|(ix, a)| (ArcId(ix), a))
    }

    pub fn vertex_node(&self, v: VertexId) -> NodeId {
        self.vertex_nodes[v.0]
    }

    pub fn face_node(&self, f: FaceId) -> NodeId {
        self.face_nodes[f.0]
    }

    /// The vertex arc carrying the corner of `d.from` in `d`'s face.
    pub fn vertex_arc(&self, d: DartId) -> Option<ArcId> {
        self.vertex_arc_by_dart.get(d.0).copied().flatten()
    }

    /// The face arc leaving `d`'s face across `d`.
    pub fn face_arc(&self, d: DartId) -> Option<ArcId> {
        self.face_arc_by_dart.get(d.0).copied().flatten()
    }

    /// Sum of positive productions, i.e. the flow the solver must deliver.
    pub fn total_supply(&self) -> i64 {
        self.nodes.iter().map(|n| n.production.max(0)).sum()
    }

    pub fn total_demand(&self) -> i64 {
        self.nodes.iter().map(|n| (-n.production).max(0)).sum()
    }

    pub fn is_balanced(&self) -> bool {
        self.total_supply() == self.total_demand()
    }

    pub fn production_sum(&self) -> i64 {
        self.nodes.iter().map(|n| n.production).sum()
    }

    /// Total cost of the current flow, which equals the number of bends once solved.
    pub fn cost(&self) -> i64 {
        self.arcs.iter().map(|a| a.flow * a.cost).sum()
    }

    /// Net flow out of `id` (outflow minus inflow).
    pub fn net_outflow(&self, id: NodeId) -> i64 {
        let node = &self.nodes[id.0];
        let out: i64 = node.outputs.iter().map(|a| self.arcs[a.0].flow).sum();
        let inn: i64 = node.inputs.iter().map(|a| self.arcs[a.0].flow).sum();
        out - inn
    }
}
