//! Placed instances and the bricks they own

use glam::{DVec2, DVec3};
use shared::dims::{BRICK_HEIGHT, PLATE_HEIGHT};
use shared::{dims, ElementSpec, InstanceId, LifecycleLabel, TemplateId, Variation};

use crate::animation::ElementTarget;
use crate::collision::FootprintSpec;
use crate::geometry::{rotate_offset, Aabb};

/// Animated operation an instance is going through
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Transition {
    Building,
    Unbuilding,
    Moving { to: DVec2 },
    Rotating { to: f64 },
}

/// Lifecycle of an instance that is present in the scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifecycle {
    Built,
    Transitioning(Transition),
}

impl Lifecycle {
    /// Built, or moving/rotating a built structure
    pub fn is_built(&self) -> bool {
        matches!(
            self,
            Lifecycle::Built
                | Lifecycle::Transitioning(Transition::Moving { .. })
                | Lifecycle::Transitioning(Transition::Rotating { .. })
        )
    }

    pub fn is_animating(&self) -> bool {
        matches!(self, Lifecycle::Transitioning(_))
    }

    pub fn label(&self) -> LifecycleLabel {
        match self {
            Lifecycle::Built => LifecycleLabel::Built,
            Lifecycle::Transitioning(Transition::Building) => LifecycleLabel::Building,
            Lifecycle::Transitioning(Transition::Unbuilding) => LifecycleLabel::Unbuilding,
            Lifecycle::Transitioning(Transition::Moving { .. }) => LifecycleLabel::Moving,
            Lifecycle::Transitioning(Transition::Rotating { .. }) => LifecycleLabel::Rotating,
        }
    }
}

/// One brick owned by an instance
#[derive(Clone, Debug, PartialEq)]
pub struct SubElement {
    pub spec: ElementSpec,
    /// Offset from the instance centre at zero rotation; y is the final height
    pub rel_offset: DVec3,
    pub final_position: DVec3,
    pub final_rotation_y: f64,
    /// Lower values are built first
    pub build_order: f64,
}

impl SubElement {
    fn new(spec: ElementSpec, rel_offset: DVec3) -> Self {
        Self {
            spec,
            rel_offset,
            final_position: rel_offset,
            final_rotation_y: 0.0,
            build_order: rel_offset.y,
        }
    }

    /// Recompute the world target for a new centre and yaw
    pub fn retarget(&mut self, center: DVec2, rotation_y: f64) {
        let r = rotate_offset(DVec2::new(self.rel_offset.x, self.rel_offset.z), rotation_y);
        self.final_position = DVec3::new(center.x + r.x, self.rel_offset.y, center.y + r.y);
        self.final_rotation_y = rotation_y;
    }
}

const FENCE_INSET: f64 = 0.5;
const GATE_WIDTH: i32 = 3;

/// Base plate, the variation's bricks lifted onto the plate, and a fence ring
/// with a gate on the front (-z) side, sorted by build order.
pub fn build_elements(variation: &Variation) -> Vec<SubElement> {
    let width = variation.footprint.width;
    let depth = variation.footprint.depth;
    let mut out = Vec::new();

    out.push(SubElement::new(
        ElementSpec::new([width, depth, PLATE_HEIGHT], [0.0, PLATE_HEIGHT / 2.0, 0.0], dims::DARK_GREEN),
        DVec3::new(0.0, PLATE_HEIGHT / 2.0, 0.0),
    ));

    for e in &variation.elements {
        let [x, y, z] = e.offset;
        out.push(SubElement::new(e.clone(), DVec3::new(x, y + PLATE_HEIGHT, z)));
    }

    let fence_y = BRICK_HEIGHT / 2.0 + PLATE_HEIGHT;
    let half_w = width / 2.0;
    let half_d = depth / 2.0;
    let gate_start = f64::from(-(GATE_WIDTH / 2));
    let gate_end = gate_start + f64::from(GATE_WIDTH);
    let mut fence = |x: f64, z: f64| {
        let offset = DVec3::new(x, fence_y, z);
        out.push(SubElement::new(
            ElementSpec::new([1.0, 1.0, BRICK_HEIGHT], offset.to_array(), dims::WHITE),
            offset,
        ));
    };

    let mut x = -half_w + FENCE_INSET;
    while x < half_w {
        if x < gate_start || x >= gate_end {
            fence(x, -half_d + FENCE_INSET);
        }
        fence(x, half_d - FENCE_INSET);
        x += 1.0;
    }
    let mut z = -half_d + FENCE_INSET + 1.0;
    while z < half_d - FENCE_INSET {
        fence(-half_w + FENCE_INSET, z);
        fence(half_w - FENCE_INSET, z);
        z += 1.0;
    }

    out.sort_by(|a, b| a.build_order.total_cmp(&b.build_order));
    out
}

/// A placed occurrence of a template variation
#[derive(Clone, Debug)]
pub struct Instance {
    pub(super) id: InstanceId,
    pub(super) template_id: TemplateId,
    pub(super) variation_index: usize,
    pub(super) position: DVec2,
    pub(super) rotation_y: f64,
    pub(super) lifecycle: Lifecycle,
    pub(super) selected: bool,
    pub(super) footprint: FootprintSpec,
    pub(super) elements: Vec<SubElement>,
}

impl Instance {
    pub(super) fn new(
        id: InstanceId,
        template_id: TemplateId,
        variation_index: usize,
        variation: &Variation,
        position: DVec2,
    ) -> Self {
        let mut elements = build_elements(variation);
        for e in &mut elements {
            e.retarget(position, 0.0);
        }
        Self {
            id,
            template_id,
            variation_index,
            position,
            rotation_y: 0.0,
            lifecycle: Lifecycle::Transitioning(Transition::Building),
            selected: false,
            footprint: FootprintSpec::of(variation),
            elements,
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    pub fn variation_index(&self) -> usize {
        self.variation_index
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_built(&self) -> bool {
        self.lifecycle.is_built()
    }

    pub fn is_animating(&self) -> bool {
        self.lifecycle.is_animating()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn footprint(&self) -> &FootprintSpec {
        &self.footprint
    }

    pub fn elements(&self) -> &[SubElement] {
        &self.elements
    }

    /// Pose the instance is settling into: the destination while moving or
    /// rotating, otherwise the current pose
    pub fn occupied_pose(&self) -> (DVec2, f64) {
        match self.lifecycle {
            Lifecycle::Transitioning(Transition::Moving { to }) => (to, self.rotation_y),
            Lifecycle::Transitioning(Transition::Rotating { to }) => (self.position, to),
            _ => (self.position, self.rotation_y),
        }
    }

    /// World box at the current pose
    pub fn world_box(&self) -> Aabb {
        self.footprint.world_box(self.position, self.rotation_y)
    }

    /// World box at the occupied pose, used for collision checks
    pub fn occupied_box(&self) -> Aabb {
        let (center, rotation) = self.occupied_pose();
        self.footprint.world_box(center, rotation)
    }

    /// Current element targets in build order
    pub fn element_targets(&self) -> Vec<ElementTarget> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, e)| ElementTarget {
                index,
                position: e.final_position,
                rotation_y: e.final_rotation_y,
            })
            .collect()
    }

    pub(super) fn retarget(&mut self, center: DVec2, rotation_y: f64) {
        for e in &mut self.elements {
            e.retarget(center, rotation_y);
        }
    }
}
