//! Pointer and button input routed to editor actions.
//!
//! The host resolves what a pointer is over (see [`crate::picking`]) and
//! passes the result in; nothing here knows about screens or cameras.

use std::time::Duration;

use glam::DVec2;
use shared::InstanceId;

use super::{CursorMode, EditorEvent, EditorState, GhostPreview, IDLE_STATUS};
use crate::geometry::snap_to_grid;

pub const GROUND_HINT_STATUS: &str = "Click on the green ground to place.";

/// What the pointer is over
#[derive(Clone, Debug, PartialEq)]
pub enum PointerHit {
    /// An interactable instance
    Instance(InstanceId),
    /// The ground plane at this (x, z)
    Ground(DVec2),
    Nothing,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// One pointer sample from the host
#[derive(Clone, Debug, PartialEq)]
pub struct PointerInput {
    pub hit: PointerHit,
    pub kind: PointerKind,
    /// Host clock at the time of the event
    pub time: Duration,
}

impl PointerInput {
    pub fn mouse(hit: PointerHit) -> Self {
        Self {
            hit,
            kind: PointerKind::Mouse,
            time: Duration::ZERO,
        }
    }

    pub fn touch(hit: PointerHit, time: Duration) -> Self {
        Self {
            hit,
            kind: PointerKind::Touch,
            time,
        }
    }
}

impl EditorState {
    /// Press: select or start dragging an instance, place the pending
    /// template, or clear the selection.
    pub fn pointer_down(&mut self, input: &PointerInput) {
        if self.any_animating() {
            tracing::debug!("Pointer down ignored while animating");
            return;
        }

        if let PointerHit::Instance(id) = &input.hit {
            if self.scene.interactable().any(|i| i.id() == id) {
                if self.selection.is_selected(id) {
                    self.begin_drag(id.clone());
                } else {
                    // refusals are logged by the action
                    let _ = self.select_instance(id);
                }
                return;
            }
        }

        if self.selection.pending().is_some() {
            match input.hit {
                PointerHit::Ground(point) => {
                    let _ = self.place_at(point);
                }
                _ => self.set_status(GROUND_HINT_STATUS),
            }
        } else {
            self.deselect();
            self.set_status(IDLE_STATUS);
        }
    }

    fn begin_drag(&mut self, id: InstanceId) {
        tracing::info!("Drag started for {id}");
        let status = format!("Moving {}...", self.template_name(&id));
        self.drag.begin(id);
        self.set_cursor(CursorMode::Moving);
        self.set_status(status);
    }

    /// Move: update the drag ghost. Touch moves are throttled.
    pub fn pointer_move(&mut self, input: &PointerInput) {
        let interval = Duration::from_millis(self.settings.touch_drag_interval_ms);
        let touch = input.kind == PointerKind::Touch;
        if !self.drag.accept_move(input.time, touch, interval) {
            return;
        }
        let Some(id) = self.drag.target().cloned() else {
            return;
        };

        let ghost = match input.hit {
            PointerHit::Ground(point) => self.ghost_at(&id, point),
            _ => None,
        };
        self.drag.set_ghost(ghost);
        self.emit(EditorEvent::Ghost(ghost));
    }

    fn ghost_at(&self, id: &str, point: DVec2) -> Option<GhostPreview> {
        let instance = self.scene.get(id)?;
        let position = snap_to_grid(point, self.settings.grid_unit);
        let rotation_y = instance.rotation_y();
        let valid = self.validator().is_placement_valid(
            position,
            rotation_y,
            Some(id),
            instance.footprint(),
        );
        Some(GhostPreview {
            position,
            rotation_y,
            bounds: instance.footprint().world_box(position, rotation_y),
            valid,
        })
    }

    /// Release: commit the drag as a move when the ghost is valid and
    /// somewhere new; otherwise keep the instance where it is.
    pub fn pointer_up(&mut self) {
        let Some((id, ghost)) = self.drag.end() else {
            return;
        };
        self.emit(EditorEvent::Ghost(None));
        self.set_cursor(CursorMode::Default);

        let Some(instance) = self.scene.get(&id) else {
            tracing::warn!("Drag target {id} vanished");
            return;
        };
        let current = instance.position();

        match ghost {
            Some(g) if g.valid && g.position != current => {
                // a refusal keeps the status it left
                let _ = self.move_instance(&id, g.position);
                return;
            }
            Some(g) if !g.valid => {
                tracing::info!("Drag of {id} cancelled at invalid location");
                let status = format!(
                    "Move cancelled (invalid location). {} selected.",
                    self.instance_name(&id)
                );
                self.refresh_highlight();
                self.set_status(status);
                return;
            }
            _ => {}
        }

        self.refresh_highlight();
        let status = self.selected_status(&id);
        self.set_status(status);
    }

    // ── Buttons ───────────────────────────────────────────────

    pub fn cancel_clicked(&mut self) {
        self.cancel_placement();
    }

    pub fn rotate_clicked(&mut self) {
        if let Some(id) = self.selection.selected().cloned() {
            let _ = self.rotate(&id);
        }
    }

    pub fn unbuild_clicked(&mut self) {
        if let Some(id) = self.selection.selected().cloned() {
            let _ = self.unbuild(&id);
        }
    }

    /// Double tap on the selected instance rotates it
    pub fn double_tap(&mut self, id: &str) {
        if self.selection.is_selected(id) {
            let _ = self.rotate(id);
        }
    }

    /// Click on a placed-list row
    pub fn list_item_clicked(&mut self, id: &str) {
        let _ = self.select_instance(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::state::TemplateSelection;

    fn editor_with_selected() -> (EditorState, InstanceId) {
        let mut state = fixtures::editor();
        let id = state
            .place(&TemplateSelection::new("square", 0), DVec2::ZERO)
            .unwrap();
        state.finish_animations();
        state.select_instance(&id).unwrap();
        (state, id)
    }

    fn ground(x: f64, z: f64) -> PointerInput {
        PointerInput::mouse(PointerHit::Ground(DVec2::new(x, z)))
    }

    #[test]
    fn test_click_ground_places_pending() {
        let mut state = fixtures::editor();
        state
            .select_template(TemplateSelection::new("square", 0))
            .unwrap();
        state.pointer_down(&ground(5.2, 5.0));
        assert_eq!(state.scene().len(), 1);
        assert!(state.selection().pending().is_none());
    }

    #[test]
    fn test_click_off_ground_with_pending_hints() {
        let mut state = fixtures::editor();
        state
            .select_template(TemplateSelection::new("square", 0))
            .unwrap();
        state.pointer_down(&PointerInput::mouse(PointerHit::Nothing));
        assert_eq!(state.status(), GROUND_HINT_STATUS);
        assert!(state.scene().is_empty());
    }

    #[test]
    fn test_click_empty_deselects() {
        let (mut state, _) = editor_with_selected();
        state.pointer_down(&ground(30.0, 30.0));
        assert!(state.selection().selected().is_none());
        assert_eq!(state.status(), IDLE_STATUS);
    }

    #[test]
    fn test_pointer_down_ignored_while_animating() {
        let mut state = fixtures::editor();
        state
            .place(&TemplateSelection::new("square", 0), DVec2::ZERO)
            .unwrap();
        state
            .place(&TemplateSelection::new("square", 0), DVec2::new(10.0, 0.0))
            .unwrap();
        let before = state.status().to_string();
        state.pointer_down(&ground(30.0, 30.0));
        assert_eq!(state.status(), before);
    }

    #[test]
    fn test_drag_to_valid_spot_moves() {
        let (mut state, id) = editor_with_selected();
        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id.clone())));
        assert!(state.drag().is_dragging());
        assert_eq!(state.cursor(), CursorMode::Moving);

        state.pointer_move(&ground(9.8, 0.2));
        let ghost = *state.drag().ghost().unwrap();
        assert_eq!(ghost.position, DVec2::new(10.0, 0.0));
        assert!(ghost.valid);

        state.pointer_up();
        assert!(!state.drag().is_dragging());
        assert_eq!(state.cursor(), CursorMode::Default);
        state.finish_animations();
        assert_eq!(state.scene().get(&id).unwrap().position(), DVec2::new(10.0, 0.0));
        assert!(state.selection().is_selected(&id));
    }

    #[test]
    fn test_drag_to_blocked_spot_cancels() {
        let (mut state, id) = editor_with_selected();
        let other = state
            .place(&TemplateSelection::new("square", 0), DVec2::new(10.0, 0.0))
            .unwrap();
        state.finish_animations();

        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id.clone())));
        state.pointer_move(&ground(9.0, 0.0));
        assert!(!state.drag().ghost().unwrap().valid);
        state.pointer_up();

        assert_eq!(state.scene().get(&id).unwrap().position(), DVec2::ZERO);
        assert!(!state.any_animating());
        assert!(state.selection().is_selected(&id));
        assert!(!state.selection().is_selected(&other));
        assert_eq!(
            state.status(),
            "Move cancelled (invalid location). Square (Four) selected."
        );
    }

    #[test]
    fn test_new_selection_clears_drag_ghost() {
        let (mut state, id) = editor_with_selected();
        let other = state
            .place(&TemplateSelection::new("square", 0), DVec2::new(20.0, 0.0))
            .unwrap();
        state.finish_animations();

        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id.clone())));
        state.pointer_move(&ground(-10.0, 0.0));
        state.drain_events();
        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(other.clone())));

        assert!(state.drag().target().is_none());
        assert!(state.drain_events().contains(&EditorEvent::Ghost(None)));
        state.pointer_up();
        assert!(!state.any_animating());
        assert_eq!(state.scene().get(&id).unwrap().position(), DVec2::ZERO);
        assert!(state.selection().is_selected(&other));
    }

    #[test]
    fn test_release_after_rotate_keeps_rotating_status() {
        let (mut state, id) = editor_with_selected();
        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id.clone())));
        state.pointer_move(&ground(10.0, 0.0));
        state.rotate_clicked();
        state.drain_events();

        state.pointer_up();
        assert_eq!(state.status(), "Rotating Square...");
        assert!(!state
            .drain_events()
            .iter()
            .any(|e| matches!(e, EditorEvent::Highlight(Some(_)))));

        state.finish_animations();
        let inst = state.scene().get(&id).unwrap();
        assert_eq!(inst.position(), DVec2::ZERO);
        assert!((inst.rotation_y() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_release_without_move_keeps_selection() {
        let (mut state, id) = editor_with_selected();
        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id.clone())));
        state.pointer_up();
        assert!(!state.any_animating());
        assert!(state.selection().is_selected(&id));
        assert_eq!(
            state.status(),
            "Selected Square (Four). Drag to move, Rotate, or Unbuild."
        );
    }

    #[test]
    fn test_ghost_hidden_off_ground() {
        let (mut state, id) = editor_with_selected();
        state.pointer_down(&PointerInput::mouse(PointerHit::Instance(id)));
        state.pointer_move(&ground(10.0, 0.0));
        state.pointer_move(&PointerInput::mouse(PointerHit::Nothing));
        assert!(state.drag().ghost().is_none());
        assert!(state
            .drain_events()
            .contains(&EditorEvent::Ghost(None)));
    }

    #[test]
    fn test_touch_drag_throttled() {
        let (mut state, id) = editor_with_selected();
        state.pointer_down(&PointerInput::touch(
            PointerHit::Instance(id),
            Duration::from_millis(0),
        ));
        state.pointer_move(&PointerInput::touch(
            PointerHit::Ground(DVec2::new(10.0, 0.0)),
            Duration::from_millis(100),
        ));
        state.pointer_move(&PointerInput::touch(
            PointerHit::Ground(DVec2::new(20.0, 0.0)),
            Duration::from_millis(105),
        ));
        assert_eq!(state.drag().ghost().unwrap().position, DVec2::new(10.0, 0.0));
    }

    #[test]
    fn test_buttons_act_on_selection() {
        let (mut state, id) = editor_with_selected();
        state.rotate_clicked();
        assert!(state.scene().get(&id).unwrap().is_animating());
        state.finish_animations();

        state.unbuild_clicked();
        state.finish_animations();
        assert!(state.scene().is_empty());
    }

    #[test]
    fn test_double_tap_only_rotates_selected() {
        let (mut state, id) = editor_with_selected();
        state.double_tap("someone-else");
        assert!(!state.any_animating());
        state.double_tap(&id);
        assert!(state.any_animating());
    }
}
