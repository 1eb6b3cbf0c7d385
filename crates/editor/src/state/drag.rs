//! Drag-to-move state

use std::time::Duration;

use glam::DVec2;
use shared::InstanceId;

use crate::geometry::Aabb;

/// Translucent preview of where a dragged instance would land
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GhostPreview {
    pub position: DVec2,
    pub rotation_y: f64,
    /// World box of the footprint at `position`
    pub bounds: Aabb,
    pub valid: bool,
}

/// Active drag target, its latest preview and the touch throttle clock
#[derive(Default, Debug)]
pub struct DragState {
    target: Option<InstanceId>,
    ghost: Option<GhostPreview>,
    last_move_at: Option<Duration>,
}

impl DragState {
    pub fn begin(&mut self, id: InstanceId) {
        self.target = Some(id);
        self.ghost = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&InstanceId> {
        self.target.as_ref()
    }

    pub fn ghost(&self) -> Option<&GhostPreview> {
        self.ghost.as_ref()
    }

    pub fn set_ghost(&mut self, ghost: Option<GhostPreview>) {
        self.ghost = ghost;
    }

    /// Decide whether a pointer move at `now` should be handled.
    ///
    /// Touch moves during a drag closer than `interval` to the last handled
    /// one are dropped; mouse moves always pass.
    pub fn accept_move(&mut self, now: Duration, touch: bool, interval: Duration) -> bool {
        if touch && self.is_dragging() {
            if let Some(last) = self.last_move_at {
                if now.saturating_sub(last) < interval {
                    return false;
                }
            }
        }
        self.last_move_at = Some(now);
        true
    }

    /// Stop dragging, returning the target and its last preview
    pub fn end(&mut self) -> Option<(InstanceId, Option<GhostPreview>)> {
        self.last_move_at = None;
        let ghost = self.ghost.take();
        self.target.take().map(|id| (id, ghost))
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.ghost = None;
        self.last_move_at = None;
    }
}
