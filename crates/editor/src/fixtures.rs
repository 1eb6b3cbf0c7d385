//! Factory functions for creating test data.
//!
//! Provides catalogs, variations, road layouts and pre-populated scenes used
//! in unit tests, the integration tests and the test harness.

use glam::DVec2;
use shared::*;

use crate::state::scene::SceneState;
use crate::state::{EditorSettings, EditorState};

// ── Variation factories ─────────────────────────────────────────

/// A bare `size` x `size` lot with no bricks besides the plate and fence
pub fn square_variation(size: f64) -> Variation {
    sized_variation("Square", size, size, 2)
}

/// A lot of arbitrary size and brick height with no house elements
pub fn sized_variation(name: &str, width: f64, depth: f64, height: u32) -> Variation {
    Variation {
        name: name.to_string(),
        footprint: Footprint { width, depth },
        height,
        elements: Vec::new(),
    }
}

/// A full house from the built-in catalog (cottage, small)
pub fn house_variation() -> Variation {
    builtin_catalog().templates[0].variations[0].clone()
}

// ── Catalogs ────────────────────────────────────────────────────

/// Small catalog with predictable footprints:
/// `square` (Four 4x4, Six 6x6), `long` (Strip 2x8) and `house` (Cottage 10x10)
pub fn test_catalog() -> Catalog {
    Catalog::new(vec![
        Template {
            id: "square".to_string(),
            name: "Square".to_string(),
            variations: vec![
                sized_variation("Four", 4.0, 4.0, 2),
                sized_variation("Six", 6.0, 6.0, 3),
            ],
        },
        Template {
            id: "long".to_string(),
            name: "Long".to_string(),
            variations: vec![sized_variation("Strip", 2.0, 8.0, 2)],
        },
        Template {
            id: "house".to_string(),
            name: "House".to_string(),
            variations: vec![house_variation()],
        },
    ])
}

// ── Roads ───────────────────────────────────────────────────────

/// One road running along z through `x`
pub fn road_along_z(x: f64, width: f64) -> Obstacle {
    Obstacle::road(width, 200.0, GroundPoint::new(x, 0.0))
}

/// One road running along x through `z`
pub fn road_along_x(z: f64, width: f64) -> Obstacle {
    Obstacle::road(200.0, width, GroundPoint::new(0.0, z))
}

// ── Scenes ──────────────────────────────────────────────────────

/// Insert an instance and complete its build right away
pub fn insert_built(scene: &mut SceneState, variation: &Variation, at: DVec2) -> InstanceId {
    let id = uuid::Uuid::new_v4().to_string();
    scene.insert_building(id.clone(), "square".to_string(), 0, variation, at);
    scene.complete_transition(&id);
    id
}

/// Editor over [`test_catalog`] with no roads and default settings
pub fn editor() -> EditorState {
    editor_with_roads(Vec::new())
}

pub fn editor_with_roads(roads: Vec<Obstacle>) -> EditorState {
    EditorState::new(test_catalog(), roads, EditorSettings::default())
}
