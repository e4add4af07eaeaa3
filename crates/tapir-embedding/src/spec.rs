//! Serializable fixture format for [`PlanarEmbedding`].
//!
//! Vertices are referred to by name; faces list their boundary as a closed vertex walk.

use crate::embedding::{Axis, PlanarEmbedding};
use crate::error::{EmbeddingError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingSpec {
    pub vertices: Vec<VertexSpec>,
    pub edges: Vec<EdgeSpec>,
    pub faces: Vec<FaceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexSpec {
    pub id: String,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub v: String,
    pub w: String,
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceSpec {
    pub vertices: Vec<String>,
    #[serde(default)]
    pub outer: bool,
}

impl PlanarEmbedding {
    pub fn from_spec(spec: &EmbeddingSpec) -> Result<Self> {
        let mut g = PlanarEmbedding::new();
        for v in &spec.vertices {
            if g.vertex_id(&v.id).is_some() {
                return Err(EmbeddingError::DuplicateVertex { name: v.id.clone() });
            }
            let id = g.add_vertex(v.id.clone());
            g.set_vertex_size(id, v.width, v.height)?;
        }

        let lookup = |g: &PlanarEmbedding, name: &str| {
            g.vertex_id(name).ok_or_else(|| EmbeddingError::UnknownVertex {
                name: name.to_string(),
            })
        };

        for e in &spec.edges {
            let v = lookup(&g, &e.v)?;
            let w = lookup(&g, &e.w)?;
            g.add_edge(v, w, e.axis)?;
        }
        for f in &spec.faces {
            let boundary = f
                .vertices
                .iter()
                .map(|name| lookup(&g, name))
                .collect::<Result<Vec<_>>>()?;
            g.add_face(&boundary, f.outer)?;
        }
        if let Some(corner) = &spec.corner {
            let v = lookup(&g, corner)?;
            g.set_corner_vertex(v)?;
        }
        Ok(g)
    }

    pub fn to_spec(&self) -> EmbeddingSpec {
        let name = |v: crate::VertexId| self.vertex(v).name.clone();
        EmbeddingSpec {
            vertices: self
                .vertices()
                .map(|(_, v)| VertexSpec {
                    id: v.name.clone(),
                    width: v.width,
                    height: v.height,
                })
                .collect(),
            edges: self
                .edges()
                .map(|(_, e)| EdgeSpec {
                    v: name(e.v),
                    w: name(e.w),
                    axis: e.axis,
                })
                .collect(),
            faces: self
                .faces()
                .map(|(_, f)| FaceSpec {
                    vertices: f.darts.iter().map(|&d| name(self.dart(d).from)).collect(),
                    outer: f.outer,
                })
                .collect(),
            corner: self.corner_vertex().map(name),
        }
    }
}
