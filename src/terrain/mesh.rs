//! Terrain mesh assembly from kernel output
//!
//! Bridges a chunk's octree cell to the density/polygonization kernel:
//! derives the dispatch parameters from the cell, reads back the triangle
//! soup, and assembles the chunk's geometry buffer.

use super::chunk::MeshData;
use super::config::PlanetConfig;
use super::kernel::{max_triangle_count, DensityKernel, DispatchParams, Triangle};
use super::node::NodeKey;
use crate::core::types::Result;

/// Builds chunk geometry by dispatching the kernel over a cell.
///
/// Owns a fixed-capacity readback buffer sized for the worst case (5
/// triangles per voxel) so no per-build allocation happens.
pub struct TerrainMeshBuilder<K> {
    kernel: K,
    config: PlanetConfig,
    scratch: Vec<Triangle>,
}

impl<K: DensityKernel> TerrainMeshBuilder<K> {
    pub fn new(kernel: K, config: PlanetConfig) -> Self {
        let capacity = max_triangle_count(config.voxels_per_axis);
        Self {
            kernel,
            config,
            scratch: vec![Triangle::default(); capacity],
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// Build geometry for the cell `node` into `mesh`.
    ///
    /// The mesh is fully rebuilt, never patched: on success it is either
    /// consistent with `node` or empty (degenerate kernel output).
    ///
    /// # Panics
    /// Panics if the kernel reports more triangles than the readback buffer
    /// holds; silent truncation would corrupt geometry, so this is treated
    /// as a fatal contract violation.
    pub fn build(&mut self, node: NodeKey, mesh: &mut MeshData) -> Result<()> {
        let params = DispatchParams {
            origin: node.min_corner(),
            voxel_size: node.size / self.config.voxels_per_axis as f32,
            voxels_per_axis: self.config.voxels_per_axis,
            planet_radius: self.config.planet_radius,
            sea_level: self.config.sea_level,
            noise: self.config.noise,
        };

        let count = self.kernel.generate(&params, &mut self.scratch)?;
        assert!(
            count <= self.scratch.len(),
            "kernel reported {} triangles for a buffer of {}",
            count,
            self.scratch.len()
        );

        mesh.clear();
        mesh.vertices.reserve(count * 3);
        mesh.indices.reserve(count * 3);
        // TODO: deduplicate vertices shared across triangle edges
        for tri in &self.scratch[..count] {
            let base = mesh.vertices.len() as u32;
            mesh.vertices.extend_from_slice(&[tri.a, tri.b, tri.c]);
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        // A mesh with zero extent renders nothing; clear it outright rather
        // than keep stale zero-area geometry.
        if let Some(bounds) = mesh.bounds() {
            if bounds.size().length_squared() == 0.0 {
                mesh.clear();
                return Ok(());
            }
        }

        // TODO: compute normals in the kernel
        mesh.recalculate_normals();
        Ok(())
    }
}
