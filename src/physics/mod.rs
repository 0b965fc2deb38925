//! # Collision World
//!
//! A flat set of axis-aligned box colliders keyed by id, queried with rays for
//! mouse picking. There is no dynamics: colliders only move when told to.

use cgmath::Vector3;

use crate::gfx::geometry::{box_geometry, DiffuseVertex, MeshGeometry};
use crate::gfx::picking::{Aabb, Ray};

pub type ColliderId = u32;

/// Result of a successful ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The collider that was hit
    pub id: ColliderId,
    /// World-space intersection point
    pub point: Vector3<f32>,
    /// Distance from the ray origin
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Collider {
    id: ColliderId,
    half_extents: Vector3<f32>,
    position: Vector3<f32>,
}

impl Collider {
    fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }
}

#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a box collider, replacing any existing collider with the same id.
    pub fn add_collision(
        &mut self,
        id: ColliderId,
        half_extents: Vector3<f32>,
        position: Vector3<f32>,
    ) {
        self.remove(id);
        self.colliders.push(Collider {
            id,
            half_extents,
            position,
        });
        log::debug!("collider {id} added at {position:?}");
    }

    /// Returns `false` when no collider has `id`.
    pub fn set_position(&mut self, id: ColliderId, position: Vector3<f32>) -> bool {
        match self.colliders.iter_mut().find(|collider| collider.id == id) {
            Some(collider) => {
                collider.position = position;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: ColliderId) -> bool {
        let before = self.colliders.len();
        self.colliders.retain(|collider| collider.id != id);
        self.colliders.len() != before
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Closest collider along `ray` within `max_distance`.
    pub fn cast(&self, ray: &Ray, max_distance: f32) -> Option<RayHit> {
        let hit = self
            .colliders
            .iter()
            .filter_map(|collider| {
                collider
                    .bounds()
                    .intersect_ray(ray)
                    .filter(|&distance| distance <= max_distance)
                    .map(|distance| RayHit {
                        id: collider.id,
                        point: ray.point_at(distance),
                        distance,
                    })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance));

        if hit.is_none() {
            log::trace!("ray cast from {:?} missed", ray.origin);
        }
        hit
    }

    /// One box mesh per collider, combined into a single geometry.
    pub fn compute_debug_geometry(&self) -> MeshGeometry<DiffuseVertex> {
        let mut vertices = Vec::with_capacity(self.colliders.len() * 24);
        let mut faces = Vec::with_capacity(self.colliders.len() * 12);

        for collider in &self.colliders {
            let (box_vertices, box_faces) =
                box_geometry(collider.half_extents.into(), collider.position.into()).into_parts();
            let base = vertices.len() as u32;
            faces.extend(box_faces.into_iter().map(|face| face.offset(base)));
            vertices.extend(box_vertices);
        }

        MeshGeometry::from_parts(vertices, faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_collision(1, Vector3::new(1.0, 1.0, 1.0), Vector3::new(-2.0, 0.0, 0.0));
        world.add_collision(2, Vector3::new(1.0, 1.0, 1.0), Vector3::new(2.0, 0.0, 0.0));
        world
    }

    #[test]
    fn closest_collider_is_reported() {
        let ray = Ray::new(Vector3::new(-10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        let hit = world().cast(&ray, 50.0).expect("both boxes lie on the ray");
        assert_eq!(hit.id, 1);
        assert!((hit.distance - 7.0).abs() < 1e-5);
        assert!((hit.point.x + 3.0).abs() < 1e-5);
    }

    #[test]
    fn miss_and_out_of_range_are_none() {
        let world = world();
        let up = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(world.cast(&up, 50.0), None);

        let far = Ray::new(Vector3::new(-100.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(world.cast(&far, 50.0), None);
    }

    #[test]
    fn moving_a_collider_moves_its_hits() {
        let mut world = world();
        assert!(world.set_position(1, Vector3::new(-2.0, 10.0, 0.0)));
        assert!(!world.set_position(7, Vector3::new(0.0, 0.0, 0.0)));

        let ray = Ray::new(Vector3::new(-10.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(world.cast(&ray, 50.0).map(|hit| hit.id), Some(2));
    }

    #[test]
    fn reusing_an_id_replaces_the_collider() {
        let mut world = world();
        world.add_collision(1, Vector3::new(0.5, 0.5, 0.5), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn debug_geometry_has_one_box_per_collider() {
        let geometry = world().compute_debug_geometry();
        assert_eq!(geometry.vertex_count(), 48);
        assert_eq!(geometry.face_count(), 24);
        assert!(geometry.indices().iter().all(|&i| i < 48));
        assert!(geometry.vertices()[24..]
            .iter()
            .all(|vertex| vertex.position[0] >= 1.0));
    }

    #[test]
    fn empty_world_has_empty_debug_geometry() {
        let geometry = CollisionWorld::new().compute_debug_geometry();
        assert!(geometry.is_empty());
    }
}
