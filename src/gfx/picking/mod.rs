//! # Picking Primitives
//!
//! Rays and axis-aligned boxes for mouse picking. A click is turned into a
//! world-space [`Ray`] by [`Camera::screen_to_world`](crate::gfx::camera::Camera::screen_to_world)
//! and tested against the collision world's boxes.
//!
//! ```rust
//! use cgmath::Vector3;
//! use playground::gfx::picking::{Aabb, Ray};
//!
//! let unit = Aabb::from_center_half_extents(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
//! let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
//! assert_eq!(unit.intersect_ray(&ray), Some(4.0));
//! ```

use cgmath::{ElementWise, InnerSpace, Vector2, Vector3};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray; `direction` is normalized.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Pixel coordinates (origin top-left, y down) to normalized device coordinates.
pub fn screen_to_ndc(point: Vector2<f32>, size: Vector2<f32>) -> Vector2<f32> {
    Vector2::new(
        (2.0 * point.x) / size.x - 1.0,
        1.0 - (2.0 * point.y) / size.y, // Flip Y axis
    )
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Slab test. Returns the distance along `ray` to the first intersection,
    /// or `None` if the box is missed or lies behind the origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            // Origin inside the box hits the exit face.
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn box_from_center_and_half_extents() {
        let aabb = Aabb::from_center_half_extents(Vector3::new(2.0, 0.0, 0.0), Vector3::new(1.0, 0.5, 1.0));
        assert_eq!(aabb.min, Vector3::new(1.0, -0.5, -1.0));
        assert_eq!(aabb.max, Vector3::new(3.0, 0.5, 1.0));
    }

    #[test]
    fn ray_aabb_intersection() {
        let aabb = unit_box();

        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&ray), Some(4.0));

        let ray_miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&ray_miss).is_none());

        let behind = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&behind).is_none());
    }

    #[test]
    fn ray_from_inside_hits_exit_face() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(unit_box().intersect_ray(&ray), Some(1.0));
    }

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.magnitude() - 1.0).abs() < 1e-6);
        assert!((ray.point_at(5.0) - Vector3::new(0.0, 3.0, 4.0)).magnitude() < 1e-5);
    }

    #[test]
    fn screen_corners_map_to_ndc_corners() {
        let size = Vector2::new(1024.0, 768.0);
        assert_eq!(screen_to_ndc(Vector2::new(0.0, 0.0), size), Vector2::new(-1.0, 1.0));
        assert_eq!(screen_to_ndc(Vector2::new(512.0, 384.0), size), Vector2::new(0.0, 0.0));
        assert_eq!(screen_to_ndc(Vector2::new(1024.0, 768.0), size), Vector2::new(1.0, -1.0));
    }
}
