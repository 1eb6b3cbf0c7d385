//! Placement validation against built instances and road segments

use glam::DVec2;
use shared::{InstanceId, Obstacle, Variation};

use crate::geometry::{compute_world_bounding_box, obstacle_box, Aabb};
use crate::state::scene::SceneState;
use crate::state::settings::EditorSettings;

/// World-unit size of the thing being placed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintSpec {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl FootprintSpec {
    pub fn of(variation: &Variation) -> Self {
        Self {
            width: variation.world_width(),
            depth: variation.world_depth(),
            height: variation.world_height(),
        }
    }

    /// World box of this footprint at `center`, rotated by `rotation_y`
    pub fn world_box(&self, center: DVec2, rotation_y: f64) -> Aabb {
        compute_world_bounding_box(center, self.width, self.depth, self.height, rotation_y)
    }
}

/// What stopped a candidate placement
#[derive(Clone, Debug, PartialEq)]
pub enum Blocker {
    Instance(InstanceId),
    /// Index into the obstacle list
    Obstacle(usize),
}

impl std::fmt::Display for Blocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Blocker::Instance(id) => write!(f, "instance {}", id),
            Blocker::Obstacle(index) => write!(f, "road segment {}", index),
        }
    }
}

/// Read-only collision checks for one editor frame
pub struct CollisionValidator<'a> {
    scene: &'a SceneState,
    obstacles: &'a [Obstacle],
    buffer: f64,
    obstacle_margin: f64,
}

impl<'a> CollisionValidator<'a> {
    pub fn new(scene: &'a SceneState, obstacles: &'a [Obstacle], settings: &EditorSettings) -> Self {
        Self {
            scene,
            obstacles,
            buffer: settings.collision_buffer,
            obstacle_margin: settings.obstacle_margin,
        }
    }

    /// Find the first built instance or road the candidate overlaps.
    ///
    /// The candidate box is shrunk inward by the collision buffer so exactly
    /// touching footprints pass; roads are inflated by the obstacle margin.
    /// Instances that are not built never block, and `exclude` is skipped so
    /// an instance can be checked against everything but itself.
    pub fn find_blocker(
        &self,
        target: DVec2,
        rotation_y: f64,
        exclude: Option<&str>,
        footprint: &FootprintSpec,
    ) -> Option<Blocker> {
        let candidate = footprint.world_box(target, rotation_y).shrink_xz(self.buffer);

        for other in self.scene.instances() {
            if exclude == Some(other.id().as_str()) || !other.is_built() {
                continue;
            }
            if candidate.intersects_xz(&other.occupied_box()) {
                tracing::debug!("Collision: candidate overlaps instance {}", other.id());
                return Some(Blocker::Instance(other.id().clone()));
            }
        }

        for (index, road) in self.obstacles.iter().enumerate() {
            let road_box = obstacle_box(road).inflate(self.obstacle_margin);
            if candidate.intersects_xz(&road_box) {
                tracing::debug!("Collision: candidate overlaps road segment {}", index);
                return Some(Blocker::Obstacle(index));
            }
        }

        None
    }

    /// True when nothing blocks the candidate
    pub fn is_placement_valid(
        &self,
        target: DVec2,
        rotation_y: f64,
        exclude: Option<&str>,
        footprint: &FootprintSpec,
    ) -> bool {
        self.find_blocker(target, rotation_y, exclude, footprint).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use shared::GroundPoint;
    use std::f64::consts::FRAC_PI_2;

    fn square(size: f64) -> FootprintSpec {
        FootprintSpec {
            width: size,
            depth: size,
            height: 2.0,
        }
    }

    #[test]
    fn test_empty_scene_is_valid() {
        let scene = SceneState::default();
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &[], &settings);
        assert!(v.is_placement_valid(DVec2::ZERO, 0.0, None, &square(4.0)));
    }

    #[test]
    fn test_built_instance_blocks_overlap() {
        let mut scene = SceneState::default();
        let id = fixtures::insert_built(&mut scene, &fixtures::square_variation(4.0), DVec2::ZERO);
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &[], &settings);

        assert_eq!(
            v.find_blocker(DVec2::new(2.0, 1.0), 0.0, None, &square(4.0)),
            Some(Blocker::Instance(id.clone()))
        );
        assert!(v.is_placement_valid(DVec2::new(10.0, 0.0), 0.0, None, &square(4.0)));
        // an instance never collides with itself
        assert!(v.is_placement_valid(DVec2::new(1.0, 0.0), 0.0, Some(&id), &square(4.0)));
    }

    #[test]
    fn test_touching_footprints_are_valid() {
        let mut scene = SceneState::default();
        fixtures::insert_built(&mut scene, &fixtures::square_variation(4.0), DVec2::ZERO);
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &[], &settings);

        assert!(v.is_placement_valid(DVec2::new(4.0, 0.0), 0.0, None, &square(4.0)));
        assert!(v.is_placement_valid(DVec2::new(0.0, -4.0), 0.0, None, &square(4.0)));
        assert!(!v.is_placement_valid(DVec2::new(3.5, 0.0), 0.0, None, &square(4.0)));
    }

    #[test]
    fn test_building_instance_does_not_block() {
        let mut scene = SceneState::default();
        let variation = fixtures::square_variation(4.0);
        scene.insert_building(
            "pending".to_string(),
            "square".to_string(),
            0,
            &variation,
            DVec2::ZERO,
        );
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &[], &settings);
        assert!(v.is_placement_valid(DVec2::ZERO, 0.0, None, &square(4.0)));
    }

    #[test]
    fn test_unbuilding_instance_does_not_block() {
        let mut scene = SceneState::default();
        let id = fixtures::insert_built(&mut scene, &fixtures::square_variation(4.0), DVec2::ZERO);
        scene.begin_unbuild(&id).unwrap();
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &[], &settings);
        assert!(v.is_placement_valid(DVec2::ZERO, 0.0, None, &square(4.0)));
    }

    #[test]
    fn test_road_blocks_with_margin() {
        let scene = SceneState::default();
        let roads = vec![shared::Obstacle::road(2.0, 20.0, GroundPoint::new(0.0, 0.0))];
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &roads, &settings);

        assert_eq!(
            v.find_blocker(DVec2::new(2.0, 0.0), 0.0, None, &square(4.0)),
            Some(Blocker::Obstacle(0))
        );
        // road edge at x = 1, inflated to 1.1; candidate edge at 3.1 - 2 + 0.1 = 1.2
        assert!(v.is_placement_valid(DVec2::new(3.1, 0.0), 0.0, None, &square(4.0)));
        // candidate edge at 3.0 - 2 + 0.1 = 1.1, exactly touching the inflated road
        assert!(v.is_placement_valid(DVec2::new(3.0, 0.0), 0.0, None, &square(4.0)));
        assert!(!v.is_placement_valid(DVec2::new(2.9, 0.0), 0.0, None, &square(4.0)));
    }

    #[test]
    fn test_rotation_changes_outcome() {
        let scene = SceneState::default();
        // road along z at x = 3; a 2 x 8 footprint only reaches it once turned
        let roads = vec![shared::Obstacle::road(1.0, 40.0, GroundPoint::new(3.0, 0.0))];
        let settings = EditorSettings::default();
        let v = CollisionValidator::new(&scene, &roads, &settings);
        let long = FootprintSpec {
            width: 2.0,
            depth: 8.0,
            height: 1.0,
        };

        assert!(v.is_placement_valid(DVec2::ZERO, 0.0, None, &long));
        assert!(!v.is_placement_valid(DVec2::ZERO, FRAC_PI_2, None, &long));
    }
}
