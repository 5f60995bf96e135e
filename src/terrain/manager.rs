//! Planet terrain manager
//!
//! Ties the pieces together and drives one cooperative tick per frame:
//! regenerate the octree around the LOD target, diff its leaf set against
//! the rendered chunks, and let the scheduler retire and promote through
//! the pool and mesh builder. Everything runs synchronously inside the
//! tick; there are no internal threads.

use crate::core::types::{Result, Vec3};

use super::chunk::Chunk;
use super::config::PlanetConfig;
use super::kernel::DensityKernel;
use super::mesh::TerrainMeshBuilder;
use super::node::NodeKey;
use super::octree::Octree;
use super::pool::ChunkPool;
use super::scheduler::{ChunkScheduler, TickStats};

/// Owns the octree, scheduler, pool and mesh builder for one planet
pub struct TerrainManager<K> {
    config: PlanetConfig,
    octree: Octree,
    scheduler: ChunkScheduler,
    pool: ChunkPool,
    builder: TerrainMeshBuilder<K>,
}

impl<K: DensityKernel> TerrainManager<K> {
    pub fn new(config: PlanetConfig, kernel: K) -> Self {
        let octree = Octree::new(
            config.render_radius(),
            config.root_node_size,
            config.min_node_size,
        );
        let scheduler = ChunkScheduler::new(config.promotions_per_tick);
        let builder = TerrainMeshBuilder::new(kernel, config.clone());

        Self {
            config,
            octree,
            scheduler,
            pool: ChunkPool::new(),
            builder,
        }
    }

    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn pool(&self) -> &ChunkPool {
        &self.pool
    }

    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }

    /// Run one tick for a LOD target in planet-local space.
    ///
    /// Pass [`Vec3::INFINITY`] when there is no target; the tree collapses
    /// to its roots and all chunks retire over the following ticks.
    pub fn update(&mut self, lod_target: Vec3) -> Result<TickStats> {
        self.octree.regenerate(lod_target);
        let leaves = self.octree.leaf_keys();

        let builder = &mut self.builder;
        let stats = self.scheduler.tick(&leaves, &mut self.pool, |key, chunk| {
            builder.build(key, &mut chunk.mesh)
        })?;

        log::debug!(
            "tick: {} leaves, {} retired, {} enqueued, {} promoted, {} pending, {} rendered",
            stats.leaves,
            stats.retired,
            stats.enqueued,
            stats.promoted,
            stats.pending,
            stats.rendered
        );
        Ok(stats)
    }

    /// Currently rendered chunks with the leaf each represents, for a host
    /// to submit to rendering or collision
    pub fn rendered_chunks(&self) -> impl Iterator<Item = (NodeKey, &Chunk)> {
        self.scheduler
            .rendered()
            .iter()
            .map(|(key, id)| (*key, self.pool.get(*id)))
    }
}
