//! Dense arena ids.
//!
//! Ids are plain indices into the parallel vectors of a
//! [`PlanarEmbedding`](super::PlanarEmbedding); they are only meaningful for the embedding that
//! handed them out.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(VertexId, "v");
arena_id!(EdgeId, "e");
arena_id!(DartId, "d");
arena_id!(FaceId, "f");
