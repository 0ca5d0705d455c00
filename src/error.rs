//! Error types reported by the cut pipeline.

use crate::math::Real;
use crate::shape::CellShape;

/// Errors that can occur while cutting a background mesh with an interface.
///
/// The variants carry different severities, handled by the cut drivers:
/// [`CutError::UnsupportedCellType`] and [`CutError::Consistency`] abort the
/// whole pass, [`CutError::Topology`] and [`CutError::Classification`] mark a
/// single element unresolved while the pass continues, and
/// [`CutError::VolumeMismatch`] is fatal only in strict mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CutError {
    /// A cell shape reached a lookup table that has no entry for it.
    ///
    /// This indicates a configuration error rather than a geometric edge
    /// case, so it always aborts the cut pass.
    #[error("unsupported cell shape {shape:?} in {context}")]
    UnsupportedCellType {
        /// The offending shape.
        shape: CellShape,
        /// The lookup that failed, e.g. `"cubature degree table"`.
        context: &'static str,
    },

    /// Inconsistent intersection data prevented the facet or volume-cell
    /// reconstruction of one element.
    ///
    /// The element is marked unresolved and reported; the pass continues for
    /// the other elements.
    #[error("topology failure on element {element}: {reason}")]
    Topology {
        /// External id of the affected background element.
        element: i32,
        /// Human-readable description of the inconsistency.
        reason: String,
    },

    /// A point or facet position stayed ambiguous even after the tolerance
    /// was relaxed.
    #[error("position classification failed on element {element}: {reason}")]
    Classification {
        /// External id of the affected background element.
        element: i32,
        /// Description of the ambiguity.
        reason: String,
    },

    /// The volumes of an element's volume cells do not sum up to the
    /// element's own volume.
    #[error(
        "volume mismatch on element {element}: cells sum to {cells} but the element volume is {element_volume}"
    )]
    VolumeMismatch {
        /// External id of the affected background element.
        element: i32,
        /// Sum of the element's volume-cell volumes.
        cells: Real,
        /// Nominal volume of the background element.
        element_volume: Real,
    },

    /// Two processes disagree about the cut of a shared cutter side or about
    /// the dof-set count of a shared node.
    ///
    /// Always fatal: proceeding would silently corrupt the global dof
    /// numbering.
    #[error("cross-process disagreement: {reason}")]
    Consistency {
        /// Description of the disagreement.
        reason: String,
    },
}

impl CutError {
    /// Does this error abort the whole cut pass?
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CutError::UnsupportedCellType { .. } | CutError::Consistency { .. }
        )
    }
}
