//! Adaptive octree covering a spherical render volume
//!
//! A forest of fixed-size root cubes tiles the sphere of render radius.
//! Every regeneration pass walks the forest and subdivides cells near the
//! LOD target while collapsing cells away from it, producing a shell
//! structure where cell size roughly doubles with distance.

use crate::core::types::Vec3;
use crate::math::Aabb;

use super::node::{NodeId, NodeKey, OctreeNode, SUBDIVISION_DIRS};

/// Octree forest with arena-backed node storage.
///
/// Nodes are stored in slots; collapsing a subtree returns its slots to a
/// free list for reuse by later subdivisions, so a steady-state tree churns
/// without growing the arena.
pub struct Octree {
    slots: Vec<Option<OctreeNode>>,
    free: Vec<NodeId>,
    roots: Vec<NodeId>,
    root_size: f32,
    min_node_size: f32,
    render_radius: f32,
}

impl Octree {
    /// Build the root forest for a sphere of `render_radius` around the
    /// local origin, tiled with cubes of edge `root_size`.
    ///
    /// Candidate cubes on the integer grid are kept only when the closest
    /// point of their bounds lies strictly within the render radius, so the
    /// corner cubes of the grid that never approach the sphere are excluded
    /// up front.
    pub fn new(render_radius: f32, root_size: f32, min_node_size: f32) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            roots: Vec::new(),
            root_size,
            min_node_size,
            render_radius,
        };

        let r = ((render_radius / root_size - 0.5).ceil() as i32).max(0);
        for x in -r..=r {
            for y in -r..=r {
                for z in -r..=r {
                    let position = root_size * Vec3::new(x as f32, y as f32, z as f32);
                    let bounds = Aabb::cube(position, root_size);
                    if bounds.distance_to_point(Vec3::ZERO) < render_radius {
                        let id = tree.alloc(OctreeNode::new(None, 0, position, root_size));
                        tree.roots.push(id);
                    }
                }
            }
        }

        log::info!(
            "octree: {} root nodes of size {} covering radius {}",
            tree.roots.len(),
            root_size,
            render_radius
        );

        tree
    }

    /// Root node handles, in construction order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Borrow a node by handle
    ///
    /// # Panics
    /// Panics if the handle refers to a freed slot.
    pub fn node(&self, id: NodeId) -> &OctreeNode {
        self.slots[id.index()]
            .as_ref()
            .expect("stale node handle")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut OctreeNode {
        self.slots[id.index()]
            .as_mut()
            .expect("stale node handle")
    }

    /// Minimum cell size below which subdivision stops
    pub fn min_node_size(&self) -> f32 {
        self.min_node_size
    }

    /// Root cube edge length
    pub fn root_size(&self) -> f32 {
        self.root_size
    }

    /// Radius of the covered sphere
    pub fn render_radius(&self) -> f32 {
        self.render_radius
    }

    fn alloc(&mut self, node: OctreeNode) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Some(node));
            id
        }
    }

    /// Split a leaf into 8 children, one per sign combination, each with
    /// half the edge length and centered a quarter edge away. No-op when
    /// the node already has children.
    pub fn subdivide(&mut self, id: NodeId) {
        let node = self.node(id);
        if node.children.is_some() {
            return;
        }
        let (position, size, depth) = (node.position, node.size, node.depth);

        let mut children = [NodeId(0); 8];
        for (i, dir) in SUBDIVISION_DIRS.iter().enumerate() {
            let child = OctreeNode::new(
                Some(id),
                depth + 1,
                position + *dir * (size / 4.0),
                size / 2.0,
            );
            children[i] = self.alloc(child);
        }
        self.node_mut(id).children = Some(children);
    }

    /// Collapse a node back to a leaf, discarding its entire descendant
    /// subtree at all depths. No-op when the node is already a leaf.
    pub fn undivide(&mut self, id: NodeId) {
        let Some(children) = self.node_mut(id).children.take() else {
            return;
        };
        let mut stack: Vec<NodeId> = children.to_vec();
        while let Some(child) = stack.pop() {
            let node = self.slots[child.index()]
                .take()
                .expect("stale node handle");
            if let Some(grandchildren) = node.children {
                stack.extend_from_slice(&grandchildren);
            }
            self.free.push(child);
        }
    }

    /// Re-shape the forest around `target`.
    ///
    /// Pre-order worklist traversal: a cell larger than the minimum size
    /// whose bounds come within a quarter of its edge length of the target
    /// subdivides, and its children (including any created by that split)
    /// are visited in the same pass, so a single call refines fully down to
    /// the minimum size. Every other cell collapses to a leaf. The pass is
    /// deterministic and idempotent for a fixed target.
    pub fn regenerate(&mut self, target: Vec3) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            let (size, bounds) = (node.size, node.bounds());

            if size > self.min_node_size && bounds.distance_to_point(target) < size / 4.0 {
                self.subdivide(id);
                if let Some(children) = self.node(id).children {
                    for child in children.iter().rev() {
                        stack.push(*child);
                    }
                }
            } else {
                self.undivide(id);
            }
        }
    }

    /// All current leaf handles in traversal order (roots first, each
    /// subtree pre-order)
    pub fn leaf_nodes(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            match self.node(id).children {
                Some(children) => {
                    for child in children.iter().rev() {
                        stack.push(*child);
                    }
                }
                None => leaves.push(id),
            }
        }
        leaves
    }

    /// Structural keys of all current leaves, in traversal order
    pub fn leaf_keys(&self) -> Vec<NodeKey> {
        self.leaf_nodes()
            .into_iter()
            .map(|id| self.node(id).key())
            .collect()
    }

    /// Number of live nodes in the forest
    pub fn node_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total arena slots, live or free
    pub fn arena_len(&self) -> usize {
        self.slots.len()
    }
}
