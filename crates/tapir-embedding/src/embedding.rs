//! The [`PlanarEmbedding`] container.
//!
//! This module contains the arena itself plus the builder operations used by fixtures and by the
//! bend subdivision pass in `tapir` (see [`PlanarEmbedding::split_edge`]).

use crate::error::{EmbeddingError, Result};
use rustc_hash::FxBuildHasher;

mod entries;
mod ids;
mod validate;

pub use entries::{Axis, Dart, Edge, Face, Vertex};
pub use ids::{DartId, EdgeId, FaceId, VertexId};

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

/// Result of [`PlanarEmbedding::split_edge`].
#[derive(Debug, Clone)]
pub struct EdgeSplit {
    pub vertex: VertexId,
    /// The original edge id, now running from the original `v` to the new vertex.
    pub tail_edge: EdgeId,
    /// The new edge, running from the new vertex to the original `w`.
    pub head_edge: EdgeId,
    /// `(kept, inserted)` per original dart: the kept dart still starts at its original `from`
    /// and ends at the new vertex; the inserted dart follows it in the same face.
    pub darts: Vec<(DartId, DartId)>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanarEmbedding {
    vertices: Vec<Vertex>,
    vertex_index: HashMap<String, usize>,
    edges: Vec<Edge>,
    darts: Vec<Dart>,
    faces: Vec<Face>,
    corner: Option<VertexId>,
}

impl PlanarEmbedding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex, or returns the existing id if `name` is already present.
    pub fn add_vertex(&mut self, name: impl Into<String>) -> VertexId {
        let name = name.into();
        if let Some(&ix) = self.vertex_index.get(&name) {
            return VertexId(ix);
        }
        let ix = self.vertices.len();
        self.vertex_index.insert(name.clone(), ix);
        self.vertices.push(Vertex {
            name,
            width: 0.0,
            height: 0.0,
            edges: Vec::new(),
            number: ix,
        });
        VertexId(ix)
    }

    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.vertex_index.get(name).copied().map(VertexId)
    }

    pub fn set_vertex_size(&mut self, v: VertexId, width: f64, height: f64) -> Result<()> {
        self.check_vertex(v)?;
        let vertex = &mut self.vertices[v.0];
        vertex.width = width;
        vertex.height = height;
        Ok(())
    }

    pub fn add_edge(&mut self, v: VertexId, w: VertexId, axis: Axis) -> Result<EdgeId> {
        self.check_vertex(v)?;
        self.check_vertex(w)?;
        if v == w {
            return Err(EmbeddingError::SelfLoop { v, w });
        }
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge {
            v,
            w,
            axis,
            darts: Vec::new(),
        });
        self.vertices[v.0].edges.push(id);
        self.vertices[w.0].edges.push(id);
        Ok(id)
    }

    /// Adds a face bounded by the closed vertex walk `boundary`.
    ///
    /// Each consecutive pair (wrapping around) is resolved to an edge between the two vertices
    /// that has no dart in that direction yet, so a bridge is walked as `.., a, b, a, ..`.
    /// Nothing is modified when resolution fails.
    pub fn add_face(&mut self, boundary: &[VertexId], outer: bool) -> Result<FaceId> {
        if boundary.len() < 2 {
            return Err(EmbeddingError::DegenerateFace {
                len: boundary.len(),
            });
        }
        for &v in boundary {
            self.check_vertex(v)?;
        }

        let mut resolved: Vec<(VertexId, VertexId, EdgeId)> = Vec::with_capacity(boundary.len());
        for (i, &from) in boundary.iter().enumerate() {
            let to = boundary[(i + 1) % boundary.len()];
            let edge = self.vertices[from.0]
                .edges
                .iter()
                .copied()
                .find(|&e| {
                    let edge = &self.edges[e.0];
                    let connects = (edge.v == from && edge.w == to) || (edge.v == to && edge.w == from);
                    connects
                        && !edge.darts.iter().any(|d| self.darts[d.0].from == from)
                        && !resolved.iter().any(|&(f, _, used)| used == e && f == from)
                })
                .ok_or(EmbeddingError::MissingEdge { from, to })?;
            resolved.push((from, to, edge));
        }

        let face = FaceId(self.faces.len());
        let mut darts = Vec::with_capacity(resolved.len());
        for (from, to, edge) in resolved {
            let id = DartId(self.darts.len());
            self.darts.push(Dart {
                from,
                to,
                edge,
                face,
            });
            self.edges[edge.0].darts.push(id);
            darts.push(id);
        }
        self.faces.push(Face { darts, outer });
        Ok(face)
    }

    /// Designates the vertex used as the origin of bar numbering.
    pub fn set_corner_vertex(&mut self, v: VertexId) -> Result<()> {
        self.check_vertex(v)?;
        self.corner = Some(v);
        Ok(())
    }

    pub fn corner_vertex(&self) -> Option<VertexId> {
        self.corner
    }

    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.0]
    }

    pub fn edge(&self, e: EdgeId) -> &Edge {
        &self.edges[e.0]
    }

    pub fn dart(&self, d: DartId) -> &Dart {
        &self.darts[d.0]
    }

    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.0]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn dart_count(&self) -> usize {
        self.darts.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> + '_ {
        self.vertices.iter().enumerate().map(|(ix, v)| (VertexId(ix), v))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges.iter().enumerate().map(|(ix, e)| (EdgeId(ix), e))
    }

    pub fn darts(&self) -> impl Iterator<Item = (DartId, &Dart)> + '_ {
        self.darts.iter().enumerate().map(|(ix, d)| (DartId(ix), d))
    }

    pub fn faces(&self) -> impl Iterator<Item = (FaceId, &Face)> + '_ {
        self.faces.iter().enumerate().map(|(ix, f)| (FaceId(ix), f))
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.vertices[v.0].edges.len()
    }

    pub fn face_degree(&self, f: FaceId) -> usize {
        self.faces[f.0].degree()
    }

    pub fn outer_face(&self) -> Option<FaceId> {
        self.faces
            .iter()
            .position(|f| f.outer)
            .map(FaceId)
    }

    /// The other dart of the same edge.
    pub fn twin(&self, d: DartId) -> Option<DartId> {
        let edge = &self.edges[self.darts[d.0].edge.0];
        edge.darts.iter().copied().find(|&other| other != d)
    }

    /// Darts leaving `v`, in incident-edge order.
    pub fn darts_from(&self, v: VertexId) -> impl Iterator<Item = DartId> + '_ {
        self.vertices[v.0].edges.iter().flat_map(move |e| {
            self.edges[e.0]
                .darts
                .iter()
                .copied()
                .filter(move |d| self.darts[d.0].from == v)
        })
    }

    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.vertices[a.0]
            .edges
            .iter()
            .copied()
            .find(|e| self.edges[e.0].opposite(a) == Some(b))
    }

    /// Position of `d` within its face boundary.
    pub fn position_in_face(&self, d: DartId) -> Option<usize> {
        let face = self.darts[d.0].face;
        self.faces[face.0].darts.iter().position(|&x| x == d)
    }

    /// The dart following `d` along its face boundary.
    pub fn face_successor(&self, d: DartId) -> Option<DartId> {
        let face = &self.faces[self.darts[d.0].face.0];
        let pos = self.position_in_face(d)?;
        Some(face.darts[(pos + 1) % face.darts.len()])
    }

    /// Subdivides `edge` with a new zero-size vertex named `name`.
    ///
    /// The original edge keeps its id and axis and now ends at the new vertex; the new edge runs
    /// from the new vertex to the original `w` with `head_axis`. Every existing dart keeps its id
    /// and face position as the first half of its split, and the second half is inserted right
    /// after it, so per-dart data keyed by the old ids stays attached to the same corner.
    pub fn split_edge(
        &mut self,
        edge: EdgeId,
        name: impl Into<String>,
        head_axis: Axis,
    ) -> Result<EdgeSplit> {
        if edge.0 >= self.edges.len() {
            return Err(EmbeddingError::EdgeOutOfRange { edge });
        }
        let name = name.into();
        if self.vertex_index.contains_key(&name) {
            return Err(EmbeddingError::DuplicateVertex { name });
        }

        let Edge { v, w, darts, .. } = self.edges[edge.0].clone();
        let mid = self.add_vertex(name);
        let head_edge = EdgeId(self.edges.len());
        self.edges.push(Edge {
            v: mid,
            w,
            axis: head_axis,
            darts: Vec::new(),
        });
        self.edges[edge.0].w = mid;
        self.edges[edge.0].darts.clear();
        for e in &mut self.vertices[w.0].edges {
            if *e == edge {
                *e = head_edge;
            }
        }
        self.vertices[mid.0].edges = vec![edge, head_edge];

        let mut pairs = Vec::with_capacity(darts.len());
        for kept in darts {
            let Dart { from, face, .. } = self.darts[kept.0];
            let inserted = DartId(self.darts.len());
            let (kept_edge, inserted_edge, inserted_to) = if from == v {
                (edge, head_edge, w)
            } else {
                (head_edge, edge, v)
            };
            self.darts[kept.0].to = mid;
            self.darts[kept.0].edge = kept_edge;
            self.darts.push(Dart {
                from: mid,
                to: inserted_to,
                edge: inserted_edge,
                face,
            });
            self.edges[kept_edge.0].darts.push(kept);
            self.edges[inserted_edge.0].darts.push(inserted);

            let Some(pos) = self.position_in_face(kept) else {
                debug_assert!(false, "dart {kept} missing from its face");
                continue;
            };
            self.faces[face.0].darts.insert(pos + 1, inserted);
            pairs.push((kept, inserted));
        }

        Ok(EdgeSplit {
            vertex: mid,
            tail_edge: edge,
            head_edge,
            darts: pairs,
        })
    }

    fn check_vertex(&self, v: VertexId) -> Result<()> {
        if v.0 < self.vertices.len() {
            Ok(())
        } else {
            Err(EmbeddingError::VertexOutOfRange { vertex: v })
        }
    }
}
