//! Adaptive planet terrain: octree LOD, chunk lifecycle scheduling, and
//! the mesh-generation contract with the density/polygonization kernel.

pub mod config;
pub mod node;
pub mod octree;
pub mod chunk;
pub mod pool;
pub mod scheduler;
pub mod kernel;
pub mod mesh;
pub mod manager;

pub use config::{NoiseParams, PlanetConfig};
pub use node::{NodeId, NodeKey, OctreeNode};
pub use octree::Octree;
pub use chunk::{Chunk, MeshData};
pub use pool::{ChunkId, ChunkPool};
pub use scheduler::{ChunkScheduler, TickStats};
pub use kernel::{
    DensityKernel, DispatchParams, Triangle,
    dispatch_groups, max_triangle_count,
    MAX_TRIANGLE_COUNT, POINTS_PER_AXIS, THREADS_PER_GROUP, TOTAL_POINTS, TOTAL_VOXELS,
    VOXELS_PER_AXIS,
};
pub use mesh::TerrainMeshBuilder;
pub use manager::TerrainManager;
