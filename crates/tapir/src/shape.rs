//! Orthogonal representation decoded from a solved [`FlowNetwork`].
//!
//! Each face gets an [`OrthogonalShape`]: its boundary darts in order, each with a [`Tuple`] of
//! the corner angle at the dart's `from` vertex and the bends met walking along the dart.

use crate::embedding::{DartId, FaceId, PlanarEmbedding, VertexId};
use crate::error::{Error, Result};
use crate::network::FlowNetwork;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

mod subdivide;

/// A 90° turn along an edge, as seen from the face the dart bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bend {
    /// 90° inside the dart's face.
    Convex,
    /// 270° inside the dart's face.
    Reflex,
}

impl Bend {
    pub fn flipped(self) -> Self {
        match self {
            Bend::Convex => Bend::Reflex,
            Bend::Reflex => Bend::Convex,
        }
    }

    /// The corner angle (in 90° units) a bend becomes once it is turned into a vertex.
    pub fn corner_angle(self) -> u8 {
        match self {
            Bend::Convex => 1,
            Bend::Reflex => 3,
        }
    }
}

/// Ordered bends along a dart, starting at the dart's `from` vertex.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bends(Vec<Bend>);

impl Bends {
    pub fn new() -> Self {
        Self::default()
    }

    /// `convex` bends that are 90° inside the face followed by `reflex` bends that are 270°.
    pub fn from_flow(convex: usize, reflex: usize) -> Self {
        let mut seq = Vec::with_capacity(convex + reflex);
        seq.extend(std::iter::repeat_n(Bend::Convex, convex));
        seq.extend(std::iter::repeat_n(Bend::Reflex, reflex));
        Self(seq)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Bend] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Bend> + '_ {
        self.0.iter().copied()
    }

    pub fn convex_count(&self) -> usize {
        self.0.iter().filter(|b| **b == Bend::Convex).count()
    }

    pub fn reflex_count(&self) -> usize {
        self.0.len() - self.convex_count()
    }

    /// The same bends as read by the twin dart: reversed order, opposite polarity.
    pub fn mirrored(&self) -> Self {
        Self(self.0.iter().rev().map(|b| b.flipped()).collect())
    }

    /// Net quarter turns to the left accumulated along the dart.
    pub fn rotation(&self) -> i32 {
        self.convex_count() as i32 - self.reflex_count() as i32
    }

    /// Bit-set encoding: bit `i` is set for a convex bend at position `i`, clear for a reflex
    /// one, and a marker bit is set at position `len` to delimit the run. No bends encode to an
    /// empty set.
    pub fn encode(&self) -> Vec<bool> {
        if self.0.is_empty() {
            return Vec::new();
        }
        let mut bits: Vec<bool> = self.0.iter().map(|b| *b == Bend::Convex).collect();
        bits.push(true);
        bits
    }

    /// Inverse of [`Bends::encode`]; trailing clear bits after the marker are ignored.
    pub fn decode(bits: &[bool]) -> Self {
        let Some(marker) = bits.iter().rposition(|b| *b) else {
            return Self::new();
        };
        Self(
            bits[..marker]
                .iter()
                .map(|&b| if b { Bend::Convex } else { Bend::Reflex })
                .collect(),
        )
    }

    /// Splits around the bend at `index`: `(before, bend, after)`.
    pub fn split_at(&self, index: usize) -> Option<(Bends, Bend, Bends)> {
        let bend = *self.0.get(index)?;
        Some((
            Bends(self.0[..index].to_vec()),
            bend,
            Bends(self.0[index + 1..].to_vec()),
        ))
    }
}

impl FromIterator<Bend> for Bends {
    fn from_iter<I: IntoIterator<Item = Bend>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    /// Corner angle at the dart's `from` vertex in 90° units, `1..=4`.
    pub angle: u8,
    pub bends: Bends,
}

impl Tuple {
    pub fn new(angle: u8, bends: Bends) -> Self {
        Self { angle, bends }
    }

    pub fn degrees(&self) -> u32 {
        u32::from(self.angle) * 90
    }
}

#[derive(Debug, Clone)]
pub struct OrthogonalShape {
    face: FaceId,
    tuples: IndexMap<DartId, Tuple, FxBuildHasher>,
}

impl OrthogonalShape {
    pub fn new(face: FaceId) -> Self {
        Self {
            face,
            tuples: IndexMap::default(),
        }
    }

    pub fn face(&self) -> FaceId {
        self.face
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn tuple(&self, d: DartId) -> Option<&Tuple> {
        self.tuples.get(&d)
    }

    pub fn contains(&self, d: DartId) -> bool {
        self.tuples.contains_key(&d)
    }

    /// Darts in boundary order.
    pub fn darts(&self) -> impl Iterator<Item = DartId> + '_ {
        self.tuples.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DartId, &Tuple)> + '_ {
        self.tuples.iter().map(|(d, t)| (*d, t))
    }

    /// Sum of corner angles in 90° units.
    pub fn angle_sum(&self) -> u32 {
        self.tuples.values().map(|t| u32::from(t.angle)).sum()
    }

    pub fn bend_count(&self) -> usize {
        self.tuples.values().map(|t| t.bends.len()).sum()
    }

    /// Appends `d` at the end of the boundary.
    pub fn push(&mut self, d: DartId, tuple: Tuple) -> Result<()> {
        self.check_angle(d, tuple.angle)?;
        self.tuples.insert(d, tuple);
        Ok(())
    }

    /// Replaces the entry of `old` by `replacements`, in order, at `old`'s boundary position.
    /// Every other entry keeps its position and data.
    pub fn replace_dart(&mut self, old: DartId, replacements: Vec<(DartId, Tuple)>) -> Result<()> {
        let Some(index) = self.tuples.get_index_of(&old) else {
            return Err(Error::UnknownDart {
                face: self.face,
                dart: old,
            });
        };
        for (d, t) in &replacements {
            self.check_angle(*d, t.angle)?;
        }
        self.tuples.shift_remove_index(index);
        for (offset, (d, t)) in replacements.into_iter().enumerate() {
            self.tuples.shift_insert(index + offset, d, t);
        }
        Ok(())
    }

    /// Splits `dart` at its bend `bend_index`, as happens when the edge is subdivided there.
    ///
    /// `dart` keeps its corner angle and the bends before the split; `inserted` follows it,
    /// starting at the new vertex with the corner the bend turns into (90° for a convex bend,
    /// 270° for a reflex one) and the bends after the split.
    pub fn insert_edge(&mut self, dart: DartId, bend_index: usize, inserted: DartId) -> Result<()> {
        let Some(tuple) = self.tuples.get(&dart) else {
            return Err(Error::UnknownDart {
                face: self.face,
                dart,
            });
        };
        let Some((before, bend, after)) = tuple.bends.split_at(bend_index) else {
            return Err(Error::BendIndexOutOfRange {
                dart,
                index: bend_index,
                len: tuple.bends.len(),
            });
        };
        let head = Tuple::new(tuple.angle, before);
        let tail = Tuple::new(bend.corner_angle(), after);
        self.replace_dart(dart, vec![(dart, head), (inserted, tail)])
    }

    fn check_angle(&self, dart: DartId, angle: u8) -> Result<()> {
        match angle {
            0 => Err(Error::ZeroAngle {
                face: self.face,
                dart,
            }),
            1..=4 => Ok(()),
            _ => Err(Error::AngleOutOfRange {
                face: self.face,
                dart,
                angle: i64::from(angle),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OrthogonalRepresentation {
    shapes: Vec<OrthogonalShape>,
    face_of_dart: Vec<Option<FaceId>>,
}

impl OrthogonalRepresentation {
    /// Reads the solved flow back into per-face shapes.
    ///
    /// The corner of dart `d` is one more than the flow on its vertex arc. The bends of `d` are
    /// the flow on its face arc (convex, first) followed by the flow on the twin's face arc
    /// (reflex). A dart without a vertex arc decodes to a zero angle, which is an invariant
    /// violation, not a recoverable condition.
    pub fn decode(network: &FlowNetwork, g: &PlanarEmbedding) -> Result<Self> {
        let mut rep = Self {
            shapes: Vec::with_capacity(g.face_count()),
            face_of_dart: vec![None; g.dart_count()],
        };
        for (f, face) in g.faces() {
            let mut shape = OrthogonalShape::new(f);
            for &d in &face.darts {
                let angle = network
                    .vertex_arc(d)
                    .map(|a| network.arc(a).flow + 1)
                    .unwrap_or(0);
                let angle = match angle {
                    0 => return Err(Error::ZeroAngle { face: f, dart: d }),
                    1..=4 => angle as u8,
                    _ => {
                        return Err(Error::AngleOutOfRange {
                            face: f,
                            dart: d,
                            angle,
                        });
                    }
                };

                let bends = match network.face_arc(d) {
                    Some(arc) => {
                        let forward = network.arc(arc).flow;
                        let reverse = g
                            .twin(d)
                            .and_then(|t| network.face_arc(t))
                            .map(|a| network.arc(a).flow)
                            .unwrap_or(0);
                        Bends::from_flow(forward.max(0) as usize, reverse.max(0) as usize)
                    }
                    None => Bends::new(),
                };
                shape.push(d, Tuple::new(angle, bends))?;
                rep.face_of_dart[d.0] = Some(f);
            }
            rep.shapes.push(shape);
        }

        tracing::debug!(
            faces = rep.shapes.len(),
            bends = rep.bend_count(),
            "decoded orthogonal representation"
        );
        Ok(rep)
    }

    /// A bend-free representation of a drawing whose corner angles are already known, such as
    /// one produced by an earlier layout.
    pub fn from_angles<F>(g: &PlanarEmbedding, mut angle: F) -> Result<Self>
    where
        F: FnMut(DartId) -> u8,
    {
        let mut rep = Self {
            shapes: Vec::with_capacity(g.face_count()),
            face_of_dart: vec![None; g.dart_count()],
        };
        for (f, face) in g.faces() {
            let mut shape = OrthogonalShape::new(f);
            for &d in &face.darts {
                shape.push(d, Tuple::new(angle(d), Bends::new()))?;
                rep.face_of_dart[d.0] = Some(f);
            }
            rep.shapes.push(shape);
        }
        Ok(rep)
    }

    pub fn shapes(&self) -> &[OrthogonalShape] {
        &self.shapes
    }

    pub fn shape(&self, f: FaceId) -> &OrthogonalShape {
        &self.shapes[f.0]
    }

    pub fn face_of(&self, d: DartId) -> Option<FaceId> {
        self.face_of_dart.get(d.0).copied().flatten()
    }

    pub fn tuple(&self, d: DartId) -> Option<&Tuple> {
        self.face_of(d).and_then(|f| self.shapes[f.0].tuple(d))
    }

    pub fn angle(&self, d: DartId) -> Option<u8> {
        self.tuple(d).map(|t| t.angle)
    }

    pub fn bends(&self, d: DartId) -> Option<&Bends> {
        self.tuple(d).map(|t| &t.bends)
    }

    /// Total bends; each bend is recorded on both darts of its edge and counted once.
    pub fn bend_count(&self) -> usize {
        self.shapes.iter().map(|s| s.bend_count()).sum::<usize>() / 2
    }

    /// Sum of `v`'s corner angles over all faces, in 90° units.
    pub fn vertex_angle_sum(&self, g: &PlanarEmbedding, v: VertexId) -> u32 {
        g.darts_from(v)
            .filter_map(|d| self.angle(d))
            .map(u32::from)
            .sum()
    }

    pub fn face_angle_sum(&self, f: FaceId) -> u32 {
        self.shapes[f.0].angle_sum()
    }

    /// See [`OrthogonalShape::replace_dart`].
    pub fn replace_dart(
        &mut self,
        face: FaceId,
        old: DartId,
        replacements: Vec<(DartId, Tuple)>,
    ) -> Result<()> {
        let added: Vec<DartId> = replacements.iter().map(|(d, _)| *d).collect();
        self.shapes[face.0].replace_dart(old, replacements)?;
        if !added.contains(&old) {
            if let Some(slot) = self.face_of_dart.get_mut(old.0) {
                *slot = None;
            }
        }
        for d in added {
            self.register(d, face);
        }
        Ok(())
    }

    /// See [`OrthogonalShape::insert_edge`].
    pub fn insert_edge(
        &mut self,
        face: FaceId,
        dart: DartId,
        bend_index: usize,
        inserted: DartId,
    ) -> Result<()> {
        self.shapes[face.0].insert_edge(dart, bend_index, inserted)?;
        self.register(inserted, face);
        Ok(())
    }

    fn register(&mut self, d: DartId, face: FaceId) {
        if d.0 >= self.face_of_dart.len() {
            self.face_of_dart.resize(d.0 + 1, None);
        }
        self.face_of_dart[d.0] = Some(face);
    }
}
