//! Integration rules for volume and boundary cells: tessellation into
//! elementary cells with tabulated cubature degrees, or direct
//! divergence-theorem quadrature.

pub use self::direct_divergence::direct_divergence_rule;
pub use self::integration_cell::IntegrationCell;
pub use self::tessellate::{create_boundary_cells, tessellate_cell};

use crate::cut::Options;
use crate::cut::VolumeRuleKind;
use crate::error::CutError;
use crate::mesh::{ElementId, Mesh};

mod direct_divergence;
mod integration_cell;
mod tessellate;

/// Equips every volume cell of `element` with an integration rule and builds
/// the boundary cells of its interface facets.
///
/// Tessellation falls back to the direct-divergence rule for cells whose
/// facets carry holes (the midpoint fan cannot represent those).
pub fn create_cell_rules(
    mesh: &mut Mesh,
    element: ElementId,
    options: &Options,
) -> Result<(), CutError> {
    let cells = mesh.element(element).cells().to_vec();
    for cell in cells {
        let has_holes = mesh
            .cell(cell)
            .facets()
            .iter()
            .any(|&f| !mesh.facet(f).holes().is_empty());

        match options.volume_rule {
            VolumeRuleKind::Tessellation if !has_holes => {
                tessellate_cell(mesh, element, cell, options)?;
            }
            _ => {
                if has_holes && options.volume_rule == VolumeRuleKind::Tessellation {
                    log::debug!(
                        "cell {cell} has facets with holes, switching to direct divergence"
                    );
                }
                let rule = direct_divergence_rule(mesh, element, cell)?;
                mesh.cell_mut(cell).direct_rule = Some(rule);
            }
        }
        create_boundary_cells(mesh, element, cell, options)?;
    }
    Ok(())
}
