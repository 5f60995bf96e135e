//! Chunk lifecycle scheduler
//!
//! Reconciles the octree's current leaf set against the set of rendered
//! chunks once per tick. Retirement runs before promotion so chunks freed
//! this tick are reusable by this tick's builds, and promotion is capped
//! per tick so a burst of leaf churn (a teleporting target, say) never
//! triggers an unbounded batch of mesh builds in one frame.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::core::types::Result;

use super::chunk::Chunk;
use super::node::NodeKey;
use super::pool::{ChunkId, ChunkPool};

/// Counters from one scheduler tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Leaves in the fresh leaf set
    pub leaves: usize,
    /// Chunks retired to the pool this tick
    pub retired: usize,
    /// Leaves newly queued this tick
    pub enqueued: usize,
    /// Chunks built and activated this tick
    pub promoted: usize,
    /// Leaves still awaiting a chunk after this tick
    pub pending: usize,
    /// Leaves currently rendered after this tick
    pub rendered: usize,
    /// Total chunks ever instantiated by the pool
    pub pool_created: usize,
    /// Chunks parked in the pool's free queue after this tick
    pub pool_free: usize,
}

/// Per-leaf render state machine: Unseen -> Queued -> Rendered, with
/// Rendered leaves retiring back to Unseen when their node disappears.
///
/// Keys are structural ([`NodeKey`]), never arena handles, so a cell
/// re-derived after a collapse/re-subdivide cycle is recognized as the
/// same work item.
pub struct ChunkScheduler {
    pending: VecDeque<NodeKey>,
    pending_set: HashSet<NodeKey>,
    rendered: HashMap<NodeKey, ChunkId>,
    promotions_per_tick: usize,
}

impl ChunkScheduler {
    /// `promotions_per_tick` caps mesh builds per tick; the default pacing
    /// is one build per tick to spread kernel cost across frames.
    pub fn new(promotions_per_tick: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            rendered: HashMap::new(),
            promotions_per_tick,
        }
    }

    /// Currently rendered leaves and their chunks
    pub fn rendered(&self) -> &HashMap<NodeKey, ChunkId> {
        &self.rendered
    }

    pub fn is_rendered(&self, key: &NodeKey) -> bool {
        self.rendered.contains_key(key)
    }

    pub fn is_pending(&self, key: &NodeKey) -> bool {
        self.pending_set.contains(key)
    }

    /// Leaves awaiting a chunk
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Per-tick promotion cap
    pub fn promotions_per_tick(&self) -> usize {
        self.promotions_per_tick
    }

    /// Run one reconciliation tick against a fresh leaf set.
    ///
    /// `build` fills the chunk's geometry for a leaf; it runs at most
    /// `promotions_per_tick` times. On a build error the chunk is returned
    /// to the pool and the error propagates; already-promoted work from the
    /// same tick stays rendered.
    pub fn tick<F>(
        &mut self,
        leaves: &[NodeKey],
        pool: &mut ChunkPool,
        mut build: F,
    ) -> Result<TickStats>
    where
        F: FnMut(NodeKey, &mut Chunk) -> Result<()>,
    {
        let leaf_set: HashSet<NodeKey> = leaves.iter().copied().collect();

        // Retire first so freed chunks are available to this tick's
        // promotions.
        let stale: Vec<NodeKey> = self
            .rendered
            .keys()
            .filter(|key| !leaf_set.contains(key))
            .copied()
            .collect();
        let retired = stale.len();
        for key in stale {
            if let Some(id) = self.rendered.remove(&key) {
                pool.release(id);
                log::trace!("scheduler: retired chunk for {:?}", key);
            }
        }

        // Queue newly-seen leaves, deduplicated against both the rendered
        // map and the queue itself.
        let mut enqueued = 0;
        for key in leaves {
            if !self.rendered.contains_key(key) && self.pending_set.insert(*key) {
                self.pending.push_back(*key);
                enqueued += 1;
            }
        }

        // Promote at a capped rate. Entries that became rendered through an
        // earlier promotion, or whose leaf collapsed away while queued, are
        // dropped without consuming a promotion slot.
        let mut promoted = 0;
        while promoted < self.promotions_per_tick {
            let Some(key) = self.pending.pop_front() else {
                break;
            };
            self.pending_set.remove(&key);
            if self.rendered.contains_key(&key) || !leaf_set.contains(&key) {
                continue;
            }

            let id = pool.acquire();
            let chunk = pool.get_mut(id);
            chunk.bind(key);
            if let Err(e) = build(key, chunk) {
                pool.release(id);
                return Err(e);
            }
            pool.get_mut(id).set_active(true);
            self.rendered.insert(key, id);
            promoted += 1;
            log::trace!("scheduler: promoted chunk for {:?}", key);
        }

        Ok(TickStats {
            leaves: leaves.len(),
            retired,
            enqueued,
            promoted,
            pending: self.pending.len(),
            rendered: self.rendered.len(),
            pool_created: pool.created_count(),
            pool_free: pool.free_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::types::Vec3;

    fn key(n: u32) -> NodeKey {
        NodeKey {
            depth: 1,
            position: Vec3::new(n as f32, 0.0, 0.0),
            size: 16.0,
        }
    }

    fn build_ok(_: NodeKey, chunk: &mut Chunk) -> Result<()> {
        chunk.mesh.clear();
        chunk.mesh.vertices.push(Vec3::ZERO);
        Ok(())
    }

    #[test]
    fn test_promotion_rate_limit_under_churn() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();
        let leaves: Vec<NodeKey> = (0..200).map(key).collect();

        for tick in 1..=10 {
            let stats = sched.tick(&leaves, &mut pool, build_ok).unwrap();
            assert!(stats.promoted <= 1);
            assert_eq!(stats.rendered, tick);
        }
        assert_eq!(pool.created_count(), 10);
    }

    #[test]
    fn test_eventual_conservation() {
        let mut sched = ChunkScheduler::new(3);
        let mut pool = ChunkPool::new();
        let leaves: Vec<NodeKey> = (0..10).map(key).collect();

        let mut ticks = 0;
        loop {
            let stats = sched.tick(&leaves, &mut pool, build_ok).unwrap();
            ticks += 1;
            if stats.pending == 0 {
                break;
            }
            assert!(ticks < 100, "queue must drain");
        }

        let rendered: HashSet<NodeKey> = sched.rendered().keys().copied().collect();
        let expected: HashSet<NodeKey> = leaves.iter().copied().collect();
        assert_eq!(rendered, expected);

        // Once converged, further ticks are no-ops.
        let stats = sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert_eq!(stats.retired, 0);
        assert_eq!(stats.enqueued, 0);
        assert_eq!(stats.promoted, 0);
    }

    #[test]
    fn test_enqueue_dedup_while_pending() {
        let mut sched = ChunkScheduler::new(0);
        let mut pool = ChunkPool::new();
        let leaves = vec![key(0), key(1)];

        let stats = sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert_eq!(stats.enqueued, 2);

        // Same leaves again: nothing re-queued while still pending.
        let stats = sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert_eq!(stats.enqueued, 0);
        assert_eq!(sched.pending_count(), 2);
    }

    #[test]
    fn test_retire_before_promote_reuses_chunk_same_tick() {
        let mut sched = ChunkScheduler::new(5);
        let mut pool = ChunkPool::new();

        // Render three leaves.
        let first: Vec<NodeKey> = (0..3).map(key).collect();
        sched.tick(&first, &mut pool, build_ok).unwrap();
        assert_eq!(pool.created_count(), 3);

        // Replace them with three different leaves in one tick: the three
        // retirements must feed the three promotions.
        let second: Vec<NodeKey> = (10..13).map(key).collect();
        let stats = sched.tick(&second, &mut pool, build_ok).unwrap();
        assert_eq!(stats.retired, 3);
        assert_eq!(stats.promoted, 3);
        assert_eq!(pool.created_count(), 3, "no new chunks while free ones existed");
    }

    #[test]
    fn test_stale_queue_entry_dropped_without_consuming_slot() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();

        // Tick 1: a promoted, b left queued.
        sched.tick(&[key(0), key(1)], &mut pool, build_ok).unwrap();
        assert!(sched.is_rendered(&key(0)));
        assert!(sched.is_pending(&key(1)));

        // Tick 2: b vanished, c appeared. The stale b entry is dropped and
        // the single promotion slot still goes to c.
        let stats = sched.tick(&[key(0), key(2)], &mut pool, build_ok).unwrap();
        assert_eq!(stats.promoted, 1);
        assert!(sched.is_rendered(&key(2)));
        assert!(!sched.is_pending(&key(1)));
    }

    #[test]
    fn test_already_rendered_entry_skipped() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();
        sched.tick(&[key(0)], &mut pool, build_ok).unwrap();
        assert!(sched.is_rendered(&key(0)));

        // Force the raced state: a duplicate queue entry for a leaf that is
        // already rendered.
        sched.pending.push_back(key(0));
        sched.pending_set.insert(key(0));

        let stats = sched.tick(&[key(0)], &mut pool, build_ok).unwrap();
        assert_eq!(stats.promoted, 0);
        assert_eq!(sched.rendered().len(), 1);
        assert_eq!(pool.created_count(), 1);
    }

    #[test]
    fn test_retirement_deactivates_chunk() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();
        sched.tick(&[key(0)], &mut pool, build_ok).unwrap();
        let id = *sched.rendered().get(&key(0)).unwrap();
        assert!(pool.get(id).is_active());

        let stats = sched.tick(&[key(1)], &mut pool, build_ok).unwrap();
        assert_eq!(stats.retired, 1);
        assert!(!pool.get(id).is_active());
        assert!(!sched.is_rendered(&key(0)));
    }

    #[test]
    fn test_fifo_promotion_order() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();
        let leaves = vec![key(0), key(1), key(2)];

        sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert!(sched.is_rendered(&key(0)));
        sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert!(sched.is_rendered(&key(1)));
        sched.tick(&leaves, &mut pool, build_ok).unwrap();
        assert!(sched.is_rendered(&key(2)));
    }

    #[test]
    fn test_build_error_returns_chunk_to_pool() {
        let mut sched = ChunkScheduler::new(1);
        let mut pool = ChunkPool::new();

        let result = sched.tick(&[key(0)], &mut pool, |_, _| {
            Err(Error::Kernel("dispatch failed".into()))
        });
        assert!(result.is_err());
        assert!(!sched.is_rendered(&key(0)));
        assert_eq!(pool.free_count(), 1, "failed chunk parked for reuse");
    }

    #[test]
    fn test_teleport_churn_stays_capped() {
        let mut sched = ChunkScheduler::new(2);
        let mut pool = ChunkPool::new();

        // Settle on one region.
        let a: Vec<NodeKey> = (0..4).map(key).collect();
        for _ in 0..4 {
            sched.tick(&a, &mut pool, build_ok).unwrap();
        }

        // Teleport: hundreds of new leaves at once. Builds stay capped.
        let b: Vec<NodeKey> = (100..400).map(key).collect();
        let stats = sched.tick(&b, &mut pool, build_ok).unwrap();
        assert_eq!(stats.retired, 4);
        assert_eq!(stats.promoted, 2);
        assert_eq!(stats.pending, 298);
    }
}
