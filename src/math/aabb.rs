//! Axis-aligned bounding box

use crate::core::types::Vec3;

/// Axis-aligned bounding box defined by min and max corners
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create AABB from center and half-extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Create a cube AABB from center and edge length
    pub fn cube(center: Vec3, size: f32) -> Self {
        Self::from_center_half_extent(center, Vec3::splat(size * 0.5))
    }

    /// Get center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get size (max - min)
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get half-extents
    pub fn half_extent(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Check if point is inside AABB
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x && p.x <= self.max.x &&
        p.y >= self.min.y && p.y <= self.max.y &&
        p.z >= self.min.z && p.z <= self.max.z
    }

    /// Closest point on (or inside) the AABB to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    /// Distance from `p` to the closest point on the AABB (0 if inside)
    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        self.closest_point(p).distance(p)
    }

    /// Expand AABB to include point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.center(), Vec3::splat(0.5));
        assert_eq!(aabb.size(), Vec3::ONE);
    }

    #[test]
    fn test_cube() {
        let aabb = Aabb::cube(Vec3::ZERO, 2.0);
        assert_eq!(aabb.min, Vec3::splat(-1.0));
        assert_eq!(aabb.max, Vec3::splat(1.0));
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(!aabb.contains_point(Vec3::splat(2.0)));
    }

    #[test]
    fn test_closest_point_inside() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let p = Vec3::splat(0.25);
        assert_eq!(aabb.closest_point(p), p);
        assert_eq!(aabb.distance_to_point(p), 0.0);
    }

    #[test]
    fn test_closest_point_outside() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let p = Vec3::new(3.0, 0.5, 0.5);
        assert_eq!(aabb.closest_point(p), Vec3::new(1.0, 0.5, 0.5));
        assert_eq!(aabb.distance_to_point(p), 2.0);
    }

    #[test]
    fn test_distance_to_corner() {
        let aabb = Aabb::new(Vec3::splat(512.0), Vec3::splat(1536.0));
        let d = aabb.distance_to_point(Vec3::ZERO);
        let expected = (3.0f32 * 512.0 * 512.0).sqrt();
        assert!((d - expected).abs() < 1e-3);
    }

    #[test]
    fn test_expand() {
        let mut aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        aabb.expand(Vec3::new(2.0, -1.0, 0.5));
        assert_eq!(aabb.min, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 1.0, 1.0));
    }
}
