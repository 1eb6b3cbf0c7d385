//! Ray picking against placed bricks and the ground plane

use glam::{DVec2, DVec3};
use shared::InstanceId;

use crate::geometry::{compute_world_bounding_box, Aabb};
use crate::state::scene::{SceneState, SubElement};
use crate::state::PointerHit;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f64> {
    let inv_dir = ray.direction.recip();

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Where the ray meets the ground plane (y = 0), as (x, z)
pub fn ray_ground(ray: &Ray) -> Option<DVec2> {
    if ray.direction.y.abs() < 1e-12 {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return None;
    }
    let p = ray.at(t);
    Some(DVec2::new(p.x, p.z))
}

/// World box of one brick at its final pose
pub fn element_box(element: &SubElement) -> Aabb {
    let [w, d, h] = element.spec.size;
    let p = element.final_position;
    let mut b = compute_world_bounding_box(DVec2::new(p.x, p.z), w, d, h, element.final_rotation_y);
    b.min.y = p.y - h / 2.0;
    b.max.y = p.y + h / 2.0;
    b
}

/// Nearest built, idle instance with a brick under the ray
pub fn pick_instance(ray: &Ray, scene: &SceneState) -> Option<InstanceId> {
    let mut best: Option<(&InstanceId, f64)> = None;
    for instance in scene.interactable() {
        for element in instance.elements() {
            if let Some(t) = ray_aabb(ray, &element_box(element)) {
                if best.map_or(true, |(_, bt)| t < bt) {
                    best = Some((instance.id(), t));
                }
            }
        }
    }
    best.map(|(id, _)| id.clone())
}

/// Resolve a pointer ray: bricks first, then the ground
pub fn resolve_hit(ray: &Ray, scene: &SceneState) -> PointerHit {
    if let Some(id) = pick_instance(ray, scene) {
        return PointerHit::Instance(id);
    }
    match ray_ground(ray) {
        Some(point) => PointerHit::Ground(point),
        None => PointerHit::Nothing,
    }
}
