//! Headless test harness for programmatic editor manipulation.
//!
//! Wraps an [`EditorState`] with shorthand for placing, selecting, dragging
//! and completing animations, plus state inspection for assertions.

use std::time::Duration;

use glam::DVec2;
use shared::{InstanceId, Obstacle, SceneSnapshot};

use crate::error::EditorError;
use crate::fixtures;
use crate::state::scene::{Completed, Instance, Lifecycle};
use crate::state::{
    EditorEvent, EditorSettings, EditorState, PointerHit, PointerInput, TemplateSelection,
};
use crate::validation::SceneValidator;

/// Headless test harness over an editor with the test catalog
pub struct TestHarness {
    pub state: EditorState,
    clock: Duration,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    /// Empty editor, no roads
    pub fn new() -> Self {
        Self::with_state(fixtures::editor())
    }

    /// Empty editor with the given roads
    pub fn with_roads(roads: Vec<Obstacle>) -> Self {
        Self::with_state(fixtures::editor_with_roads(roads))
    }

    pub fn with_settings(roads: Vec<Obstacle>, settings: EditorSettings) -> Self {
        Self::with_state(EditorState::new(fixtures::test_catalog(), roads, settings))
    }

    pub fn with_state(state: EditorState) -> Self {
        Self {
            state,
            clock: Duration::ZERO,
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Place a template variation at (x, z) and return the new instance ID
    pub fn place(
        &mut self,
        template: &str,
        variation: usize,
        x: f64,
        z: f64,
    ) -> Result<InstanceId, EditorError> {
        self.state
            .place(&TemplateSelection::new(template, variation), DVec2::new(x, z))
    }

    /// Place and complete the build
    pub fn place_built(&mut self, template: &str, x: f64, z: f64) -> InstanceId {
        let id = self
            .place(template, 0, x, z)
            .unwrap_or_else(|e| panic!("placing {template} at ({x}, {z}) failed: {e}"));
        self.finish_animations();
        id
    }

    pub fn select(&mut self, id: &str) -> Result<(), EditorError> {
        self.state.select_instance(id)
    }

    pub fn deselect(&mut self) -> Option<InstanceId> {
        self.state.deselect()
    }

    pub fn rotate(&mut self, id: &str) -> Result<(), EditorError> {
        self.state.rotate(id)
    }

    pub fn move_to(&mut self, id: &str, x: f64, z: f64) -> Result<(), EditorError> {
        self.state.move_instance(id, DVec2::new(x, z))
    }

    pub fn unbuild(&mut self, id: &str) -> Result<(), EditorError> {
        self.state.unbuild(id)
    }

    // ── Pointer input ─────────────────────────────────────────

    /// Arm a template as if its list row was clicked
    pub fn arm(&mut self, template: &str, variation: usize) -> Result<(), EditorError> {
        self.state
            .select_template(TemplateSelection::new(template, variation))
    }

    pub fn click_ground(&mut self, x: f64, z: f64) {
        self.state
            .pointer_down(&PointerInput::mouse(PointerHit::Ground(DVec2::new(x, z))));
        self.state.pointer_up();
    }

    pub fn click_instance(&mut self, id: &str) {
        self.state
            .pointer_down(&PointerInput::mouse(PointerHit::Instance(id.to_string())));
        self.state.pointer_up();
    }

    /// Press on an instance, drag across `path` and release
    pub fn drag(&mut self, id: &str, path: &[(f64, f64)]) {
        self.state
            .pointer_down(&PointerInput::mouse(PointerHit::Instance(id.to_string())));
        for &(x, z) in path {
            self.state
                .pointer_move(&PointerInput::mouse(PointerHit::Ground(DVec2::new(x, z))));
        }
        self.state.pointer_up();
    }

    /// Touch drag with `step` between samples
    pub fn touch_drag(&mut self, id: &str, path: &[(f64, f64)], step: Duration) {
        self.state.pointer_down(&PointerInput::touch(
            PointerHit::Instance(id.to_string()),
            self.clock,
        ));
        for &(x, z) in path {
            self.clock += step;
            self.state.pointer_move(&PointerInput::touch(
                PointerHit::Ground(DVec2::new(x, z)),
                self.clock,
            ));
        }
        self.state.pointer_up();
    }

    // ── Animation ─────────────────────────────────────────────

    /// Advance the animation clock by `dt` seconds
    pub fn advance(&mut self, dt: f64) -> Vec<Completed> {
        let step = Duration::try_from_secs_f64(dt.max(0.0)).unwrap_or(Duration::MAX);
        self.clock = self.clock.saturating_add(step);
        self.state.tick(dt)
    }

    pub fn finish_animations(&mut self) -> Vec<Completed> {
        self.state.finish_animations()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn instance(&self, id: &str) -> &Instance {
        self.state
            .scene()
            .get(id)
            .unwrap_or_else(|| panic!("instance {id} not found"))
    }

    pub fn instance_count(&self) -> usize {
        self.state.scene().len()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.state.scene().contains(id)
    }

    pub fn position(&self, id: &str) -> DVec2 {
        self.instance(id).position()
    }

    pub fn rotation(&self, id: &str) -> f64 {
        self.instance(id).rotation_y()
    }

    pub fn lifecycle(&self, id: &str) -> Lifecycle {
        self.instance(id).lifecycle()
    }

    pub fn selected(&self) -> Option<&InstanceId> {
        self.state.selection().selected()
    }

    pub fn status(&self) -> &str {
        self.state.status()
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.state.scene().snapshot()
    }

    pub fn events(&mut self) -> Vec<EditorEvent> {
        self.state.drain_events()
    }

    /// Run all state validation checks
    pub fn validate(&self) -> Vec<String> {
        SceneValidator::new(&self.state).validate_all()
    }

    pub fn assert_valid(&self) {
        let errors = self.validate();
        assert!(errors.is_empty(), "editor state invalid: {errors:?}");
    }
}
