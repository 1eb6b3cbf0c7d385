//! Scene state management
//!
//! `SceneState` is the single owner of placed instances. Every mutation goes
//! through its operations, which enforce the lifecycle guards.

mod display;
mod instance;
mod lifecycle_ops;

pub(crate) use display::display_name;
pub use display::{lifecycle_status, placed_list, short_id, PlacedListItem};
pub use instance::{build_elements, Instance, Lifecycle, SubElement, Transition};
pub use lifecycle_ops::Completed;

use shared::{InstanceSnapshot, SceneSnapshot};

use crate::geometry::to_point;

/// Authoritative collection of placed instances, in placement order
#[derive(Default)]
pub struct SceneState {
    pub(crate) instances: Vec<Instance>,
    /// Monotonically increasing version counter for presentation refreshes
    pub(crate) version: u64,
}

impl SceneState {
    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get an instance by ID
    pub fn get(&self, id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Instance> {
        self.instances.iter_mut().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All instances in placement order
    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// True while any instance is transitioning
    pub fn any_animating(&self) -> bool {
        self.instances.iter().any(|i| i.is_animating())
    }

    /// Instances that are built and idle
    pub fn interactable(&self) -> impl Iterator<Item = &Instance> {
        self.instances
            .iter()
            .filter(|i| i.is_built() && !i.is_animating())
    }

    /// Serializable summary of every instance
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            version: 1,
            instances: self
                .instances
                .iter()
                .map(|i| InstanceSnapshot {
                    id: i.id.clone(),
                    template_id: i.template_id.clone(),
                    variation_index: i.variation_index,
                    position: to_point(i.position),
                    rotation_y: i.rotation_y,
                    state: i.lifecycle.label(),
                    selected: i.selected,
                    element_count: i.elements.len(),
                })
                .collect(),
        }
    }
}
