//! The per-pass mesh container and its entities.
//!
//! All entities live in typed arenas owned by [`Mesh`] and reference each
//! other through stable integer ids; discarding a pass drops the whole arena
//! at once. A `Mesh` is exclusively owned by the cut operation that created
//! it and is rebuilt from scratch whenever the interface moves.

pub use self::edge::{Edge, Node};
pub use self::element::Element;
pub use self::facet::Facet;
pub use self::line::Line;
pub use self::mesh::Mesh;
pub use self::point::{Point, Position};
pub use self::side::Side;
pub use self::volume_cell::{BoundaryCell, DirectRule, VolumeCell};

mod edge;
mod element;
mod facet;
mod line;
mod mesh;
mod point;
mod side;
mod volume_cell;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(
            feature = "serde-serialize",
            derive(serde::Serialize, serde::Deserialize)
        )]
        pub struct $name(pub(crate) u32);

        impl $name {
            /// The arena index of this id.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Stable id of a [`Point`] within one cut pass.
    PointId
);
entity_id!(
    /// Stable id of a [`Node`].
    NodeId
);
entity_id!(
    /// Stable id of an [`Edge`].
    EdgeId
);
entity_id!(
    /// Stable id of a [`Side`].
    SideId
);
entity_id!(
    /// Stable id of a [`Line`].
    LineId
);
entity_id!(
    /// Stable id of a [`Facet`].
    FacetId
);
entity_id!(
    /// Stable id of a [`VolumeCell`].
    CellId
);
entity_id!(
    /// Stable id of a [`BoundaryCell`].
    BcellId
);
entity_id!(
    /// Stable id of an [`Element`].
    ElementId
);
