//! Contract with the external density/polygonization kernel
//!
//! The kernel is an opaque collaborator (GPU compute in production): given
//! a cubic region it generates a density field and extracts a triangle
//! soup. The core only owns the dispatch parameters, the readback triangle
//! layout, and the buffer-capacity rules.

use bytemuck::{Pod, Zeroable};

use crate::core::types::{Result, Vec3};

use super::config::NoiseParams;

/// Density samples per chunk axis
pub const VOXELS_PER_AXIS: u32 = 16;

/// Voxels per chunk
pub const TOTAL_VOXELS: u32 = VOXELS_PER_AXIS * VOXELS_PER_AXIS * VOXELS_PER_AXIS;

/// Corner samples per axis (one more than voxels)
pub const POINTS_PER_AXIS: u32 = VOXELS_PER_AXIS + 1;

/// Corner samples per chunk
pub const TOTAL_POINTS: u32 = POINTS_PER_AXIS * POINTS_PER_AXIS * POINTS_PER_AXIS;

/// Readback buffer capacity: a marching-cubes cell emits at most 5 triangles
pub const MAX_TRIANGLE_COUNT: usize = TOTAL_VOXELS as usize * 5;

/// Kernel threads per dispatch group axis; affects dispatch granularity
/// only, never results
pub const THREADS_PER_GROUP: u32 = 8;

/// Dispatch group count covering `extent` threads per axis
pub fn dispatch_groups(extent: u32) -> u32 {
    extent.div_ceil(THREADS_PER_GROUP)
}

/// Triangle capacity for a given per-axis voxel resolution
pub fn max_triangle_count(voxels_per_axis: u32) -> usize {
    (voxels_per_axis * voxels_per_axis * voxels_per_axis) as usize * 5
}

/// One triangle as read back from the kernel, 36 bytes, GPU buffer layout
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

/// Parameters for one kernel dispatch
///
/// The planet-shape fields are passed through to the kernel opaquely; the
/// core never interprets them.
#[derive(Clone, Copy, Debug)]
pub struct DispatchParams {
    /// Min corner of the chunk cell, planet-local space
    pub origin: Vec3,
    /// Edge length of one voxel (cell size / voxels per axis)
    pub voxel_size: f32,
    /// Density samples per axis
    pub voxels_per_axis: u32,
    pub planet_radius: f32,
    pub sea_level: f32,
    pub noise: NoiseParams,
}

/// Blocking density-field + polygonization kernel.
///
/// Implementations must reset any internal scratch state (notably an
/// append-buffer counter) before each dispatch, so repeated calls with
/// different origins never cross-contaminate. The returned count is the
/// number of triangles written to the front of `out` and must never exceed
/// `out.len()`; reporting more is a contract violation the caller treats
/// as fatal.
pub trait DensityKernel {
    fn generate(&mut self, params: &DispatchParams, out: &mut [Triangle]) -> Result<usize>;
}
