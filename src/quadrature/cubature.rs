use crate::error::CutError;
use crate::shape::CellShape;

/// Cubature degree an integration cell must be integrated with, given the
/// shape of the background element it lives in.
///
/// The degree accounts for the composition of the integration cell's own map
/// with the background element's shape functions: a linear cell inside a
/// quadratic element needs a markedly higher degree than the same cell inside
/// a linear element.
pub fn cubature_degree(
    cell: CellShape,
    background: CellShape,
) -> Result<u32, CutError> {
    match cell {
        CellShape::Line2 => Ok(4),
        CellShape::Tri3 => Ok(4),
        CellShape::Quad4 => Ok(4),
        CellShape::Wedge6 => Ok(4),
        CellShape::Pyramid5 => Ok(4),
        CellShape::Hex8 => match background {
            CellShape::Hex8 => Ok(6),
            CellShape::Hex20 => Ok(15),
            CellShape::Hex27 => Ok(15),
            CellShape::Tet4 => Ok(6),
            CellShape::Tet10 => Ok(6),
            CellShape::Wedge6 => Ok(6),
            CellShape::Wedge15 => Ok(14),
            CellShape::Pyramid5 => Ok(6),
            _ => Err(CutError::UnsupportedCellType {
                shape: background,
                context: "cubature degree table (hex8 cell)",
            }),
        },
        CellShape::Tet4 => match background {
            CellShape::Hex8 => Ok(6),
            CellShape::Hex20 => Ok(15),
            CellShape::Hex27 => Ok(15),
            CellShape::Tet4 => Ok(6),
            CellShape::Tet10 => Ok(7),
            CellShape::Wedge6 => Ok(6),
            CellShape::Wedge15 => Ok(14),
            CellShape::Pyramid5 => Ok(6),
            _ => Err(CutError::UnsupportedCellType {
                shape: background,
                context: "cubature degree table (tet4 cell)",
            }),
        },
        _ => Err(CutError::UnsupportedCellType {
            shape: cell,
            context: "cubature degree table",
        }),
    }
}

#[cfg(test)]
mod test {
    use super::cubature_degree;
    use crate::shape::CellShape;

    #[test]
    fn tet4_degrees_by_background() {
        assert_eq!(cubature_degree(CellShape::Tet4, CellShape::Hex8).unwrap(), 6);
        assert_eq!(
            cubature_degree(CellShape::Tet4, CellShape::Hex20).unwrap(),
            15
        );
        assert_eq!(
            cubature_degree(CellShape::Tet4, CellShape::Hex27).unwrap(),
            15
        );
        assert_eq!(
            cubature_degree(CellShape::Tet4, CellShape::Tet10).unwrap(),
            7
        );
    }

    #[test]
    fn surface_cells_are_degree_four() {
        for cell in [CellShape::Line2, CellShape::Tri3, CellShape::Quad4] {
            assert_eq!(cubature_degree(cell, CellShape::Hex8).unwrap(), 4);
        }
    }

    #[test]
    fn unknown_background_is_rejected() {
        assert!(cubature_degree(CellShape::Hex8, CellShape::Line2).is_err());
        assert!(cubature_degree(CellShape::Hex27, CellShape::Hex8).is_err());
    }
}
