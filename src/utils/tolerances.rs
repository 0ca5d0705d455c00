//! The tolerance policy shared by every layer of the cut pipeline.
//!
//! All geometric decisions — point snapping, Newton acceptance bounds,
//! planarity checks, level-set sign reading, volume conservation — take their
//! thresholds from this module, so a single place controls how aggressively
//! near-degenerate configurations are merged away.

use crate::math::{Point, Real};

/// Base tolerance for merging coincident intersection points.
pub const TOLERANCE: Real = 1e-12;

/// Smallest distance that is still considered a real extent; anything below
/// is a degenerate entity (zero-length edge, zero-area facet).
pub const MINIMAL_TOL: Real = 1e-14;

/// Tolerance on the sign of a level-set value. Values within this band count
/// as lying on the interface.
pub const REFERENCE_TOL: Real = 1e-8;

/// Out-of-plane deviation above which a facet stops counting as planar.
pub const PLANAR_TOL: Real = 1e-10;

/// Acceptance margin on parametric coordinates: a Newton root is kept if it
/// lies within `[-1 - LOCAL_TOL, 1 + LOCAL_TOL]` in every direction.
pub const LOCAL_TOL: Real = 1e-10;

/// Relative tolerance of the per-element volume-conservation check.
pub const VOLUME_TOL: Real = 1e-9;

/// Absolute + relative tolerance pair, scaled by a characteristic length.
///
/// The defaults are the bare constants above; [`Tolerances::scaled`] inflates
/// them by the extent of the geometry at hand so that meshes far from the
/// origin or with large elements snap consistently.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tolerances {
    /// Absolute snap distance between two points.
    pub snap: Real,
    /// Acceptance margin on parametric coordinates.
    pub local: Real,
    /// Relative volume-conservation tolerance.
    pub volume: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Tolerances {
            snap: TOLERANCE,
            local: LOCAL_TOL,
            volume: VOLUME_TOL,
        }
    }
}

impl Tolerances {
    /// Tolerances scaled by the characteristic length of the given point set.
    pub fn scaled(points: &[Point<Real>]) -> Self {
        let mut extent: Real = 0.0;
        for p in points {
            for k in 0..3 {
                extent = extent.max(p[k].abs());
            }
        }
        let scale = extent.max(1.0);
        Tolerances {
            snap: TOLERANCE * scale,
            local: LOCAL_TOL,
            volume: VOLUME_TOL,
        }
    }

    /// A copy of `self` with every threshold widened by `factor`.
    ///
    /// Used by the classification retry and by the degenerate-intersection
    /// recovery paths.
    pub fn widened(self, factor: Real) -> Self {
        Tolerances {
            snap: self.snap * factor,
            local: self.local * factor,
            volume: self.volume,
        }
    }
}
