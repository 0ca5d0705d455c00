//! Numerical integration rules on the reference cells.
//!
//! Everything derives from one audited 1-D Gauss–Legendre table: tensor
//! products for the line/quad/hex families, collapsed-coordinate (Duffy)
//! transformations for the simplex and degenerate families. Exactness at a
//! requested polynomial degree is preserved by raising the 1-D point count to
//! absorb the collapse jacobians.

pub use self::cubature::cubature_degree;
pub use self::gauss::gauss_legendre;
pub use self::rules::{cell_area, cell_volume, GaussRule};

mod cubature;
mod gauss;
mod rules;
