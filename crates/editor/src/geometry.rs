//! Footprint bounding boxes and yaw helpers.
//!
//! All boxes are axis-aligned in world space. The ground plane is XZ and Y
//! points up; a yaw rotation is about the Y axis.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use shared::{GroundPoint, Obstacle};

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Center of the bounding box
    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// True when the boxes overlap on both X and Z. Touching edges do not count.
    pub fn intersects_xz(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Pull the horizontal faces inward by `buffer`
    pub fn shrink_xz(&self, buffer: f64) -> Self {
        let d = DVec3::new(buffer, 0.0, buffer);
        Self {
            min: self.min + d,
            max: self.max - d,
        }
    }

    /// Push every face outward by `margin`
    pub fn inflate(&self, margin: f64) -> Self {
        let d = DVec3::splat(margin);
        Self {
            min: self.min - d,
            max: self.max + d,
        }
    }
}

/// Wrap any angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Rotate a local (x, z) offset about the vertical axis.
///
/// Uses the right-handed Y-up convention: `x' = x cos + z sin`,
/// `z' = -x sin + z cos`.
pub fn rotate_offset(offset: DVec2, rotation_y: f64) -> DVec2 {
    let (s, c) = rotation_y.sin_cos();
    DVec2::new(offset.x * c + offset.y * s, -offset.x * s + offset.y * c)
}

/// World-space bounding box of a `width` x `depth` footprint centred on
/// `center`, rotated by `rotation_y`, extending from the ground to `height`.
pub fn compute_world_bounding_box(
    center: DVec2,
    footprint_width: f64,
    footprint_depth: f64,
    height: f64,
    rotation_y: f64,
) -> Aabb {
    let hw = footprint_width / 2.0;
    let hd = footprint_depth / 2.0;
    let corners = [
        DVec2::new(hw, hd),
        DVec2::new(hw, -hd),
        DVec2::new(-hw, hd),
        DVec2::new(-hw, -hd),
    ];

    let theta = normalize_angle(rotation_y);
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for corner in corners {
        let r = rotate_offset(corner, theta);
        min = min.min(r);
        max = max.max(r);
    }

    let min = min + center;
    let max = max + center;
    Aabb {
        min: DVec3::new(min.x, 0.0, min.y),
        max: DVec3::new(max.x, height, max.y),
    }
}

/// Bounding box of a road segment
pub fn obstacle_box(obstacle: &Obstacle) -> Aabb {
    compute_world_bounding_box(
        to_vec(obstacle.center),
        obstacle.width,
        obstacle.length,
        shared::dims::ROAD_HEIGHT,
        obstacle.rotation_y,
    )
}

/// Snap a ground point to the centre of the nearest grid cell
pub fn snap_to_grid(point: DVec2, unit: f64) -> DVec2 {
    if unit <= 0.0 {
        return point;
    }
    (point / unit).round() * unit
}

pub fn to_vec(p: GroundPoint) -> DVec2 {
    DVec2::new(p.x, p.z)
}

pub fn to_point(v: DVec2) -> GroundPoint {
    GroundPoint::new(v.x, v.y)
}
