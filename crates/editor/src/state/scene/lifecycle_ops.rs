//! Instance lifecycle transitions
//!
//! Building -> Built <-> Moving/Rotating, Built -> Unbuilding -> removed.
//! Operations on a missing or transitioning instance are refused with an
//! error and leave the store untouched.

use glam::DVec2;
use serde::Serialize;
use shared::{InstanceId, TemplateId, Variation};

use super::instance::{Instance, Lifecycle, Transition};
use super::SceneState;
use crate::animation::ElementTarget;
use crate::error::EditorError;
use crate::geometry::normalize_angle;

/// Result of finishing a transition
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Completed {
    Built(InstanceId),
    Moved(InstanceId),
    Rotated(InstanceId),
    Removed(InstanceId),
}

impl Completed {
    pub fn id(&self) -> &InstanceId {
        match self {
            Completed::Built(id)
            | Completed::Moved(id)
            | Completed::Rotated(id)
            | Completed::Removed(id) => id,
        }
    }
}

impl SceneState {
    /// Insert a freshly placed instance in the building state
    pub fn insert_building(
        &mut self,
        id: InstanceId,
        template_id: TemplateId,
        variation_index: usize,
        variation: &Variation,
        position: DVec2,
    ) -> &Instance {
        tracing::info!("Scene: inserting {id} ({template_id}:{variation_index})");
        self.instances.push(Instance::new(
            id,
            template_id,
            variation_index,
            variation,
            position,
        ));
        self.version += 1;
        &self.instances[self.instances.len() - 1]
    }

    /// Borrow an instance that is built and idle
    fn require_built(&mut self, id: &str, op: &'static str) -> Result<&mut Instance, EditorError> {
        let instance = self
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownInstance(id.to_string()))?;
        match instance.lifecycle {
            Lifecycle::Built => Ok(instance),
            Lifecycle::Transitioning(_) => Err(EditorError::InvalidOperation {
                id: id.to_string(),
                op,
                reason: "animation in progress",
            }),
        }
    }

    /// Check an action could target this instance right now
    pub fn check_idle(&self, id: &str, op: &'static str) -> Result<&Instance, EditorError> {
        let instance = self
            .get(id)
            .ok_or_else(|| EditorError::UnknownInstance(id.to_string()))?;
        if instance.is_animating() {
            return Err(EditorError::InvalidOperation {
                id: id.to_string(),
                op,
                reason: "animation in progress",
            });
        }
        Ok(instance)
    }

    /// Start taking an instance apart. Targets are in reverse build order.
    pub fn begin_unbuild(&mut self, id: &str) -> Result<Vec<ElementTarget>, EditorError> {
        let instance = self.require_built(id, "unbuild")?;
        instance.lifecycle = Lifecycle::Transitioning(Transition::Unbuilding);
        instance.selected = false;
        let mut targets = instance.element_targets();
        targets.reverse();
        self.version += 1;
        Ok(targets)
    }

    /// Start moving an instance, keeping its rotation
    pub fn begin_move(&mut self, id: &str, to: DVec2) -> Result<Vec<ElementTarget>, EditorError> {
        let instance = self.require_built(id, "move")?;
        let rotation = instance.rotation_y;
        instance.retarget(to, rotation);
        instance.lifecycle = Lifecycle::Transitioning(Transition::Moving { to });
        let targets = instance.element_targets();
        self.version += 1;
        Ok(targets)
    }

    /// Start rotating an instance in place to `to` (normalized into [0, 2π))
    pub fn begin_rotate(&mut self, id: &str, to: f64) -> Result<Vec<ElementTarget>, EditorError> {
        let instance = self.require_built(id, "rotate")?;
        let to = normalize_angle(to);
        let center = instance.position;
        instance.retarget(center, to);
        instance.lifecycle = Lifecycle::Transitioning(Transition::Rotating { to });
        let targets = instance.element_targets();
        self.version += 1;
        Ok(targets)
    }

    /// Finish whatever transition `id` is in. Returns `None` if the instance
    /// is missing or idle.
    pub fn complete_transition(&mut self, id: &str) -> Option<Completed> {
        let pos = self.instances.iter().position(|i| i.id == id)?;
        let instance = &mut self.instances[pos];
        let transition = match instance.lifecycle {
            Lifecycle::Transitioning(t) => t,
            Lifecycle::Built => {
                tracing::warn!("Scene: {id} has no transition to complete");
                return None;
            }
        };

        let done = match transition {
            Transition::Building => {
                instance.lifecycle = Lifecycle::Built;
                Completed::Built(instance.id.clone())
            }
            Transition::Moving { to } => {
                instance.position = to;
                instance.lifecycle = Lifecycle::Built;
                Completed::Moved(instance.id.clone())
            }
            Transition::Rotating { to } => {
                instance.rotation_y = to;
                instance.lifecycle = Lifecycle::Built;
                Completed::Rotated(instance.id.clone())
            }
            Transition::Unbuilding => {
                let removed = self.instances.remove(pos);
                Completed::Removed(removed.id)
            }
        };

        tracing::info!("Scene: {:?}", done);
        self.version += 1;
        Some(done)
    }

    /// Set the selected flag. Only built, idle instances can become selected.
    pub fn set_selected(&mut self, id: &str, selected: bool) -> Result<(), EditorError> {
        if selected {
            let instance = self.require_built(id, "select")?;
            instance.selected = true;
        } else {
            let instance = self
                .get_mut(id)
                .ok_or_else(|| EditorError::UnknownInstance(id.to_string()))?;
            instance.selected = false;
        }
        self.version += 1;
        Ok(())
    }

    /// Clear every selected flag
    pub fn clear_selected(&mut self) {
        for instance in &mut self.instances {
            instance.selected = false;
        }
    }

    /// Number of instances with the selected flag set
    pub fn selected_count(&self) -> usize {
        self.instances.iter().filter(|i| i.selected).count()
    }
}
