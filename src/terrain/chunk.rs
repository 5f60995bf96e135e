//! Renderable chunk and its geometry buffer

use crate::core::types::Vec3;
use crate::math::Aabb;

use super::node::NodeKey;

/// CPU-side geometry buffer for one chunk
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list, 3 indices per triangle
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Drop all geometry, keeping allocations for reuse
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.normals.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Bounds of the vertex set, `None` when empty
    pub fn bounds(&self) -> Option<Aabb> {
        let (first, rest) = self.vertices.split_first()?;
        let mut bounds = Aabb::new(*first, *first);
        for v in rest {
            bounds.expand(*v);
        }
        Some(bounds)
    }

    /// Rebuild vertex normals from the triangle soup: accumulate face
    /// normals per vertex, then normalize. With no shared vertices each
    /// vertex simply gets its face normal.
    pub fn recalculate_normals(&mut self) {
        self.normals.clear();
        self.normals.resize(self.vertices.len(), Vec3::ZERO);
        for tri in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.vertices[i1] - self.vertices[i0])
                .cross(self.vertices[i2] - self.vertices[i0]);
            self.normals[i0] += face;
            self.normals[i1] += face;
            self.normals[i2] += face;
        }
        for n in &mut self.normals {
            *n = n.normalize_or_zero();
        }
    }
}

/// One renderable unit, bound to at most one octree leaf at a time.
///
/// Chunks are created by the pool and reused across many different leaves
/// over their lifetime; deactivation parks them for reuse instead of
/// destroying them. The geometry is always consistent with the bound node
/// once the chunk is active.
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    node: Option<NodeKey>,
    active: bool,
    pub mesh: MeshData,
}

impl Chunk {
    /// The leaf this chunk currently represents (stale after deactivation
    /// until the chunk is rebound)
    pub fn node(&self) -> Option<NodeKey> {
        self.node
    }

    /// Whether the chunk is live in the rendered set
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Edge length of the bound cell
    pub fn size(&self) -> Option<f32> {
        self.node.map(|k| k.size)
    }

    /// World-space anchor a host places this chunk at: the bound cell's
    /// min corner
    pub fn world_anchor(&self) -> Option<Vec3> {
        self.node.map(|k| k.min_corner())
    }

    pub(crate) fn bind(&mut self, key: NodeKey) {
        self.node = Some(key);
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}
