use crate::math::Real;
use crate::mesh::{BoundaryCell, ElementId, Mesh, VolumeCell};

/// Read access to the cut state of one background element.
///
/// This is the view collaborators consume: the element's volume cells (with
/// position, volume, bounding facets and integration rule) and its boundary
/// cells on the interface.
#[derive(Copy, Clone)]
pub struct ElementHandle<'a> {
    mesh: &'a Mesh,
    id: ElementId,
}

impl<'a> ElementHandle<'a> {
    pub(crate) fn new(mesh: &'a Mesh, id: ElementId) -> Self {
        ElementHandle { mesh, id }
    }

    /// The id this element carries in the caller's mesh.
    pub fn external_id(&self) -> i32 {
        self.mesh.element(self.id).external_id()
    }

    /// Was this element crossed by the interface?
    pub fn is_cut(&self) -> bool {
        self.mesh
            .element(self.id)
            .facets()
            .iter()
            .any(|&f| self.mesh.facet(f).on_cut_side())
    }

    /// Was the cut of this element abandoned because of inconsistent
    /// intersection data?
    pub fn is_unresolved(&self) -> bool {
        self.mesh.element(self.id).is_unresolved()
    }

    /// The volume cells of this element.
    ///
    /// Uncut elements report their single whole-element cell; elements
    /// admitted but not crossed by a level set therefore report zero *cut*
    /// cells through [`ElementHandle::num_cut_cells`].
    pub fn cells(&self) -> impl Iterator<Item = &'a VolumeCell> + '_ {
        self.mesh
            .element(self.id)
            .cells()
            .iter()
            .map(move |&c| self.mesh.cell(c))
    }

    /// Number of volume cells.
    pub fn num_cells(&self) -> usize {
        self.mesh.element(self.id).cells().len()
    }

    /// Number of volume cells produced by an actual cut; zero when the
    /// element is untouched by the interface.
    pub fn num_cut_cells(&self) -> usize {
        if self.is_cut() {
            self.num_cells()
        } else {
            0
        }
    }

    /// The boundary cells of this element on the interface.
    pub fn boundary_cells(&self) -> Vec<&'a BoundaryCell> {
        let mut bcells = Vec::new();
        for &c in self.mesh.element(self.id).cells() {
            for &b in self.mesh.cell(c).boundary_cells() {
                bcells.push(self.mesh.boundary_cell(b));
            }
        }
        bcells
    }

    /// Sum of the element's volume-cell volumes.
    pub fn cell_volume_sum(&self) -> Real {
        self.cells().map(|c| c.volume()).sum()
    }

    /// The underlying mesh.
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }
}
