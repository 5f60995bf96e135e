//! Planetlod - Adaptive octree LOD and chunk lifecycle scheduling for
//! procedurally generated planet terrain

pub mod core;
pub mod math;
pub mod terrain;
