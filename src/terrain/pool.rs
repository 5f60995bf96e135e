//! Reusable chunk pool
//!
//! Retired chunks go into a FIFO free queue and are handed back out before
//! any new chunk is instantiated. The pool grows on demand and never
//! shrinks; growth is bounded in practice by the per-tick promotion cap.

use std::collections::VecDeque;

use super::chunk::Chunk;

/// Handle to a pooled chunk
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkId(u32);

impl ChunkId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Pool of reusable renderable chunks
#[derive(Default)]
pub struct ChunkPool {
    chunks: Vec<Chunk>,
    free: VecDeque<ChunkId>,
    created: usize,
}

impl ChunkPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a chunk, reusing the oldest freed one when available.
    /// Pool exhaustion is never an error: a fresh chunk is instantiated
    /// on demand.
    pub fn acquire(&mut self) -> ChunkId {
        if let Some(id) = self.free.pop_front() {
            return id;
        }
        let id = ChunkId(self.chunks.len() as u32);
        self.chunks.push(Chunk::default());
        self.created += 1;
        log::trace!("pool: instantiated chunk {}", id.0);
        id
    }

    /// Deactivate a chunk and park it for reuse
    pub fn release(&mut self, id: ChunkId) {
        self.chunks[id.index()].set_active(false);
        self.free.push_back(id);
    }

    pub fn get(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.index()]
    }

    pub fn get_mut(&mut self, id: ChunkId) -> &mut Chunk {
        &mut self.chunks[id.index()]
    }

    /// Total chunks ever instantiated
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Chunks currently parked in the free queue
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total chunks owned by the pool, active or free
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterate over currently active chunks
    pub fn active_chunks(&self) -> impl Iterator<Item = (ChunkId, &Chunk)> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_active())
            .map(|(i, c)| (ChunkId(i as u32), c))
    }
}
