//! Octree node storage and structural node identity

use crate::core::types::Vec3;
use crate::math::Aabb;
use std::hash::{Hash, Hasher};

/// Child offset directions for subdivision, one per sign combination.
///
/// The order is fixed so that subdividing the same node always produces
/// children in the same sequence; rendering does not depend on it.
pub const SUBDIVISION_DIRS: [Vec3; 8] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, -1.0, -1.0),
];

/// Handle into the octree's node arena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single octree cell
///
/// Nodes live in the [`Octree`](crate::terrain::Octree) arena and reference
/// their parent and children by handle, so collapsing a subtree just returns
/// its slots to the free list.
#[derive(Clone, Copy, Debug)]
pub struct OctreeNode {
    /// Cell center
    pub position: Vec3,
    /// Cell edge length
    pub size: f32,
    /// Root = 0
    pub depth: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Option<[NodeId; 8]>,
}

impl OctreeNode {
    pub(crate) fn new(parent: Option<NodeId>, depth: u32, position: Vec3, size: f32) -> Self {
        Self {
            position,
            size,
            depth,
            parent,
            children: None,
        }
    }

    /// A node is a leaf when it has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// A node is a root when it has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Parent handle, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles, `None` for leaves
    pub fn children(&self) -> Option<&[NodeId; 8]> {
        self.children.as_ref()
    }

    /// World-space bounds of the cell
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.position, self.size)
    }

    /// Structural identity of this cell
    pub fn key(&self) -> NodeKey {
        NodeKey {
            depth: self.depth,
            position: self.position,
            size: self.size,
        }
    }
}

/// Structural identity of an octree cell: (depth, position, size).
///
/// Two cells with equal keys are interchangeable even when they are distinct
/// arena entries, so a cell re-derived after a collapse/re-subdivide cycle
/// maps back onto the chunk it already had. Equality and hashing use the f32
/// bit patterns; every key is produced by the same arithmetic path from the
/// same roots, so bit-exact comparison is sound.
#[derive(Clone, Copy, Debug)]
pub struct NodeKey {
    pub depth: u32,
    pub position: Vec3,
    pub size: f32,
}

impl NodeKey {
    /// World-space bounds of the cell
    pub fn bounds(&self) -> Aabb {
        Aabb::cube(self.position, self.size)
    }

    /// Min corner of the cell (center offset by half the edge length);
    /// the anchor a host places the chunk at.
    pub fn min_corner(&self) -> Vec3 {
        self.position - Vec3::splat(self.size * 0.5)
    }
}

impl PartialEq for NodeKey {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth
            && self.position.x.to_bits() == other.position.x.to_bits()
            && self.position.y.to_bits() == other.position.y.to_bits()
            && self.position.z.to_bits() == other.position.z.to_bits()
            && self.size.to_bits() == other.size.to_bits()
    }
}

impl Eq for NodeKey {}

impl Hash for NodeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.depth.hash(state);
        self.position.x.to_bits().hash(state);
        self.position.y.to_bits().hash(state);
        self.position.z.to_bits().hash(state);
        self.size.to_bits().hash(state);
    }
}
