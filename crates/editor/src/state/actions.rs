//! Editor actions: template choice, placement, selection and the animated
//! lifecycle operations. Each action validates first and leaves the state
//! untouched when it refuses.

use glam::DVec2;
use shared::InstanceId;

use super::scene::short_id;
use super::{CursorMode, EditorEvent, EditorState, TemplateSelection, IDLE_STATUS};
use crate::animation::AnimationKind;
use crate::collision::FootprintSpec;
use crate::error::EditorError;
use crate::geometry::{normalize_angle, snap_to_grid};

pub const PLACE_BLOCKED_STATUS: &str = "Cannot place here (overlaps road or another building).";
pub const ROTATE_BLOCKED_STATUS: &str = "Cannot rotate: Space blocked.";

impl EditorState {
    /// Log a refusal and hand it back
    fn refuse(&self, err: EditorError) -> EditorError {
        if err.is_silent() {
            tracing::warn!("Action refused: {err}");
        } else {
            tracing::info!("Action refused: {err}");
        }
        err
    }

    // ── Placement ─────────────────────────────────────────────

    /// Arm a template variation for placement, dropping any selection
    pub fn select_template(&mut self, template: TemplateSelection) -> Result<(), EditorError> {
        if self.any_animating() {
            return Err(self.refuse(EditorError::Busy));
        }
        let variation = self
            .catalog
            .variation(&template.template_id, template.variation_index)
            .map_err(|e| self.refuse(e.into()))?;
        let status = format!(
            "Click ground to place {} ({}) - {}x{}.",
            self.catalog
                .template(&template.template_id)
                .map(|t| t.name.as_str())
                .unwrap_or(&template.template_id),
            variation.name,
            variation.footprint.width,
            variation.footprint.depth,
        );

        self.deselect();
        tracing::info!("Template armed: {}", template.item_key());
        self.selection.set_pending(template);
        self.set_cursor(CursorMode::Placing);
        self.refresh();
        self.set_status(status);
        Ok(())
    }

    /// Disarm the pending template. Returns false if none was armed.
    pub fn cancel_placement(&mut self) -> bool {
        if !self.selection.cancel_pending() {
            return false;
        }
        self.set_cursor(CursorMode::Default);
        self.refresh();
        self.set_status(IDLE_STATUS);
        true
    }

    /// Place the pending template at a ground point snapped to the grid
    pub fn place_at(&mut self, point: DVec2) -> Result<InstanceId, EditorError> {
        let Some(template) = self.selection.pending().cloned() else {
            return Err(self.refuse(EditorError::NothingPending));
        };
        let position = snap_to_grid(point, self.settings.grid_unit);
        let id = self.place(&template, position)?;

        self.selection.cancel_pending();
        self.set_cursor(CursorMode::Default);
        self.refresh();
        let status = format!("Building {}...", self.template_name(&id));
        self.set_status(status);
        Ok(id)
    }

    /// Place a template variation at `position` with zero rotation and start
    /// its build animation.
    pub fn place(
        &mut self,
        template: &TemplateSelection,
        position: DVec2,
    ) -> Result<InstanceId, EditorError> {
        let variation = self
            .catalog
            .variation(&template.template_id, template.variation_index)
            .map_err(|e| self.refuse(e.into()))?
            .clone();

        let footprint = FootprintSpec::of(&variation);
        let blocker = self.validator().find_blocker(position, 0.0, None, &footprint);
        if let Some(blocker) = blocker {
            self.set_status(PLACE_BLOCKED_STATUS);
            return Err(self.refuse(EditorError::CollisionRejected(blocker)));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let targets = self
            .scene
            .insert_building(
                id.clone(),
                template.template_id.clone(),
                template.variation_index,
                &variation,
                position,
            )
            .element_targets();
        let ticket = self.timeline.start(id.clone(), AnimationKind::Build, targets);
        tracing::info!(
            "Placed {} as {} at ({:.1}, {:.1}), build {ticket}",
            template.item_key(),
            short_id(&id),
            position.x,
            position.y
        );
        self.refresh();
        Ok(id)
    }

    // ── Selection ─────────────────────────────────────────────

    /// Select a built, idle instance. Selecting the current selection is a
    /// no-op.
    pub fn select_instance(&mut self, id: &str) -> Result<(), EditorError> {
        self.scene
            .check_idle(id, "select")
            .map_err(|e| self.refuse(e))?;
        if self.selection.is_selected(id) {
            return Ok(());
        }
        self.scene
            .set_selected(id, true)
            .map_err(|e| self.refuse(e))?;

        if self.selection.pending().is_some() {
            self.set_cursor(CursorMode::Default);
        }
        if let Some(target) = self.drag.target().cloned() {
            tracing::debug!("Drag of {} dropped by new selection", short_id(&target));
            self.drag.reset();
            self.emit(EditorEvent::Ghost(None));
            self.set_cursor(CursorMode::Default);
        }
        if let Some(previous) = self.selection.select(id.to_string()) {
            // the previous instance may already be gone
            let _ = self.scene.set_selected(&previous, false);
        }

        tracing::info!("Selected {}", short_id(id));
        self.emit(EditorEvent::SelectionChanged(Some(id.to_string())));
        self.refresh_highlight();
        self.refresh();
        let status = self.selected_status(id);
        self.set_status(status);
        Ok(())
    }

    /// Clear the selection, returning the instance that was selected
    pub fn deselect(&mut self) -> Option<InstanceId> {
        let id = self.selection.deselect()?;
        let _ = self.scene.set_selected(&id, false);
        self.drag.reset();

        tracing::info!("Deselected {}", short_id(&id));
        self.emit(EditorEvent::SelectionChanged(None));
        self.emit(EditorEvent::Highlight(None));
        self.refresh();
        Some(id)
    }

    // ── Lifecycle actions ─────────────────────────────────────

    /// Take an instance apart; it is removed once the animation completes
    pub fn unbuild(&mut self, id: &str) -> Result<(), EditorError> {
        self.scene
            .check_idle(id, "unbuild")
            .map_err(|e| self.refuse(e))?;
        let name = self.template_name(id);
        if self.selection.is_selected(id) {
            self.deselect();
        }

        let targets = self.scene.begin_unbuild(id).map_err(|e| self.refuse(e))?;
        let ticket = self
            .timeline
            .start(id.to_string(), AnimationKind::Unbuild, targets);
        tracing::info!("Unbuilding {}, {ticket}", short_id(id));

        self.refresh();
        self.set_status(format!("Unbuilding {name}..."));
        Ok(())
    }

    /// Move an instance to `to`, keeping its rotation
    pub fn move_instance(&mut self, id: &str, to: DVec2) -> Result<(), EditorError> {
        let instance = self
            .scene
            .check_idle(id, "move")
            .map_err(|e| self.refuse(e))?;
        let rotation = instance.rotation_y();
        let footprint = *instance.footprint();

        let blocker = self.validator().find_blocker(to, rotation, Some(id), &footprint);
        if let Some(blocker) = blocker {
            self.set_status(PLACE_BLOCKED_STATUS);
            return Err(self.refuse(EditorError::CollisionRejected(blocker)));
        }

        let targets = self.scene.begin_move(id, to).map_err(|e| self.refuse(e))?;
        let ticket = self.timeline.start(id.to_string(), AnimationKind::Move, targets);
        tracing::info!("Moving {} to ({:.1}, {:.1}), {ticket}", short_id(id), to.x, to.y);

        self.emit(EditorEvent::Highlight(None));
        self.refresh();
        let status = format!("Moving {}...", self.template_name(id));
        self.set_status(status);
        Ok(())
    }

    /// Turn an instance by one rotation step about its center
    pub fn rotate(&mut self, id: &str) -> Result<(), EditorError> {
        let instance = self
            .scene
            .check_idle(id, "rotate")
            .map_err(|e| self.refuse(e))?;
        let target = normalize_angle(instance.rotation_y() + self.settings.rotation_step());
        let position = instance.position();
        let footprint = *instance.footprint();

        let blocker = self
            .validator()
            .find_blocker(position, target, Some(id), &footprint);
        if let Some(blocker) = blocker {
            self.set_status(ROTATE_BLOCKED_STATUS);
            return Err(self.refuse(EditorError::CollisionRejected(blocker)));
        }

        let targets = self.scene.begin_rotate(id, target).map_err(|e| self.refuse(e))?;
        let ticket = self
            .timeline
            .start(id.to_string(), AnimationKind::Rotate, targets);
        tracing::info!(
            "Rotating {} to {:.0} deg, {ticket}",
            short_id(id),
            target.to_degrees()
        );

        self.emit(EditorEvent::Highlight(None));
        self.refresh();
        let status = format!("Rotating {}...", self.template_name(id));
        self.set_status(status);
        Ok(())
    }
}
