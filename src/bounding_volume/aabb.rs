//! Axis Aligned Bounding Box.

use crate::math::{Point, Real, Vector, DIM};
use num_traits::Bounded;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is the simplest bounding volume, defined by its minimum and maximum
/// corners. Before any exact intersection is attempted, the cut driver builds
/// one inflated AABB per background element and per cutter side and discards
/// every pair whose boxes do not overlap.
#[derive(Debug, PartialEq, Copy, Clone)]
#[cfg_attr(
    feature = "serde-serialize",
    derive(serde::Serialize, serde::Deserialize)
)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates on each axis.
    pub mins: Point<Real>,
    /// The point with the greatest coordinates on each axis.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// `mins` must be componentwise smaller than `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` componentwise greater than `maxs`.
    ///
    /// Merging it with any point or box yields that point or box, which makes
    /// it the natural accumulator seed.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Computes the AABB of a set of points.
    pub fn from_points<'a, I>(pts: I) -> Self
    where
        I: IntoIterator<Item = &'a Point<Real>>,
    {
        let mut result = Aabb::new_invalid();
        for pt in pts {
            result.take_point(*pt);
        }
        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        let half: Real = 0.5;
        (self.maxs - self.mins) * half
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Returns an AABB with the same center as `self` but with extents
    /// enlarged by `amount` on each side.
    #[inline]
    pub fn loosened(&self, amount: Real) -> Aabb {
        debug_assert!(amount >= 0.0, "the loosening margin must be positive");
        Aabb {
            mins: self.mins + Vector::repeat(-amount),
            maxs: self.maxs + Vector::repeat(amount),
        }
    }

    /// The smallest AABB containing both `self` and `other`.
    #[inline]
    pub fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.coords.inf(&other.mins.coords).into(),
            maxs: self.maxs.coords.sup(&other.maxs.coords).into(),
        }
    }

    /// Does this AABB intersect `other`?
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        for i in 0..DIM {
            if self.mins[i] > other.maxs[i] || other.mins[i] > self.maxs[i] {
                return false;
            }
        }
        true
    }

    /// Does this AABB contain the point `pt`?
    #[inline]
    pub fn contains_local_point(&self, pt: &Point<Real>) -> bool {
        for i in 0..DIM {
            if pt[i] < self.mins[i] || pt[i] > self.maxs[i] {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod test {
    use super::Aabb;
    use crate::math::Point;

    #[test]
    fn aabb_merge_and_intersect() {
        let a = Aabb::from_points(&[Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)]);
        let b = Aabb::from_points(&[Point::new(2.0, 0.0, 0.0), Point::new(3.0, 1.0, 1.0)]);
        assert!(!a.intersects(&b));
        assert!(a.loosened(1.5).intersects(&b));

        let m = a.merged(&b);
        assert_eq!(m.mins, Point::new(0.0, 0.0, 0.0));
        assert_eq!(m.maxs, Point::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn aabb_invalid_absorbs_points() {
        let mut aabb = Aabb::new_invalid();
        aabb.take_point(Point::new(1.0, -2.0, 3.0));
        assert_eq!(aabb.mins, Point::new(1.0, -2.0, 3.0));
        assert_eq!(aabb.maxs, Point::new(1.0, -2.0, 3.0));
    }
}
