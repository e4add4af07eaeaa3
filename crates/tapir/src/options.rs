//! Pipeline options.

use crate::embedding::{Axis, VertexId};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrthogonalizeOptions {
    /// Run [`PlanarEmbedding::validate`](crate::embedding::PlanarEmbedding::validate) before
    /// building the flow network.
    pub validate: bool,
}

impl Default for OrthogonalizeOptions {
    fn default() -> Self {
        Self { validate: true }
    }
}

/// Where bar construction takes each edge's axis from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSource {
    /// The embedding's axis tags; a tag that disagrees with the corner angles is a conflict.
    #[default]
    Tags,
    /// The headings implied by the corner angles. The seed edge's tag only picks the preferred
    /// rotation of the drawing; the other three are tried when it yields no corner root.
    Headings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    /// Bars are numbered along this axis; their members are joined by edges of the other axis.
    pub primary: Axis,
    /// Overrides the embedding's designated corner vertex.
    pub corner_vertex: Option<VertexId>,
    pub axis_source: AxisSource,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            primary: Axis::Horizontal,
            corner_vertex: None,
            axis_source: AxisSource::Tags,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub orthogonalize: OrthogonalizeOptions,
    /// Replace every bend with a dummy vertex before building bars. Bar construction rejects
    /// bent edges, so turning this off only makes sense for inputs known to be bend-free.
    pub subdivide_bends: bool,
    pub corner_vertex: Option<VertexId>,
    pub axis_source: AxisSource,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orthogonalize: OrthogonalizeOptions::default(),
            subdivide_bends: true,
            corner_vertex: None,
            axis_source: AxisSource::Tags,
        }
    }
}

impl LayoutOptions {
    pub(crate) fn bar_options(&self, primary: Axis) -> BarOptions {
        BarOptions {
            primary,
            corner_vertex: self.corner_vertex,
            axis_source: self.axis_source,
        }
    }
}
