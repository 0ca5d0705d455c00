use bitflags::bitflags;

bitflags! {
    /// Flags steering the cut pipeline.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct CutFlags: u32 {
        /// Classify point/facet/cell positions after the cut. Without this
        /// flag only the geometric decomposition is computed: positions stay
        /// undecided and no volumes, integration rules or dof-sets are
        /// derived (all of those need oriented interface facets).
        const FIND_POSITIONS = 1 << 0;
        /// Check per-element volume conservation after the rules are built.
        const CHECK_VOLUMES = 1 << 1;
        /// Treat a failed volume check as an error instead of a warning.
        const STRICT_VOLUME = 1 << 2;
        /// Count dof-sets for inside cells as well (two-sided physics).
        const INCLUDE_INNER = 1 << 3;
    }
}

impl Default for CutFlags {
    fn default() -> Self {
        CutFlags::FIND_POSITIONS | CutFlags::CHECK_VOLUMES
    }
}

/// Strategy used to equip a volume cell with an integration rule.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VolumeRuleKind {
    /// Tessellate the cell into elementary integration cells.
    #[default]
    Tessellation,
    /// Build a quadrature rule directly from the bounding facets via the
    /// divergence theorem.
    DirectDivergence,
}

/// Options of one cut pass.
#[derive(Copy, Clone, Debug)]
pub struct Options {
    /// Pipeline flags.
    pub flags: CutFlags,
    /// Integration-rule strategy for volume cells.
    pub volume_rule: VolumeRuleKind,
    /// Emit quad4 boundary cells where possible instead of splitting them
    /// into two tri3 cells.
    pub gen_quad4: bool,
    /// Keep whole-element hex8 integration cells instead of splitting them
    /// into five tet4 cells.
    pub gen_hex8: bool,
    /// Keep whole-element wedge6 integration cells.
    pub gen_wedge6: bool,
    /// Keep whole-element pyramid5 integration cells.
    pub gen_pyramid5: bool,
    /// Level-set admission: treat only the plus domain as physical, so
    /// all-minus elements are still tracked (they must not carry dofs).
    pub lsv_only_plus_domain: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            flags: CutFlags::default(),
            volume_rule: VolumeRuleKind::default(),
            gen_quad4: true,
            gen_hex8: true,
            gen_wedge6: true,
            gen_pyramid5: true,
            lsv_only_plus_domain: false,
        }
    }
}

impl Options {
    /// Is strict volume checking enabled?
    pub fn strict(&self) -> bool {
        self.flags.contains(CutFlags::STRICT_VOLUME)
    }
}
