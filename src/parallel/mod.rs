//! Nodal dof-set counting and the cross-process consistency exchange.

pub use self::dofset::find_nodal_dofsets;
pub use self::exchange::{
    package_cut_state, synchronize, verify_agreement, CutExchange, InProcessExchange, SideCut,
    SidePackage,
};

mod dofset;
mod exchange;
