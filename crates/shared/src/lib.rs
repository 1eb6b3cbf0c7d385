use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod dims;

pub use catalog::{builtin_catalog, default_roads, Catalog, CatalogError};

/// Unique identifier of a placed instance
pub type InstanceId = String;

/// Identifier of a catalog template
pub type TemplateId = String;

/// Point on the ground plane (height is always ground level)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GroundPoint {
    pub x: f64,
    pub z: f64,
}

impl GroundPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Horizontal extent of a variation, in grid units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width: f64,
    pub depth: f64,
}

/// A single brick of a variation.
///
/// `size` is `[width, depth, height]` (width/depth in grid units, height in
/// world units), `offset` is the brick centre relative to the instance centre
/// measured from the top of the base plate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub size: [f64; 3],
    pub offset: [f64; 3],
    /// 24-bit RGB
    pub color: u32,
}

impl ElementSpec {
    pub fn new(size: [f64; 3], offset: [f64; 3], color: u32) -> Self {
        Self {
            size,
            offset,
            color,
        }
    }
}

/// A sized configuration of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub name: String,
    pub footprint: Footprint,
    /// Height in brick layers
    pub height: u32,
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
}

impl Variation {
    /// Footprint width in world units
    pub fn world_width(&self) -> f64 {
        self.footprint.width * dims::BRICK_UNIT_SIZE
    }

    /// Footprint depth in world units
    pub fn world_depth(&self) -> f64 {
        self.footprint.depth * dims::BRICK_UNIT_SIZE
    }

    /// Total structure height in world units, base plate included
    pub fn world_height(&self) -> f64 {
        f64::from(self.height) * dims::BRICK_HEIGHT + dims::PLATE_HEIGHT
    }
}

/// Static catalog entry describing a buildable structure kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub variations: Vec<Variation>,
}

/// Fixed road segment that blocks placement.
///
/// `width` runs along x and `length` along z before `rotation_y` is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: GroundPoint,
    pub width: f64,
    pub length: f64,
    #[serde(default)]
    pub rotation_y: f64,
}

impl Obstacle {
    pub fn road(width: f64, length: f64, center: GroundPoint) -> Self {
        Self {
            center,
            width,
            length,
            rotation_y: 0.0,
        }
    }
}

/// Lifecycle label reported to presentation code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleLabel {
    Building,
    Built,
    Unbuilding,
    Moving,
    Rotating,
}

impl LifecycleLabel {
    pub fn is_animating(&self) -> bool {
        !matches!(self, LifecycleLabel::Built)
    }
}

/// Summary of a placed instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub id: InstanceId,
    pub template_id: TemplateId,
    pub variation_index: usize,
    pub position: GroundPoint,
    pub rotation_y: f64,
    pub state: LifecycleLabel,
    #[serde(default)]
    pub selected: bool,
    pub element_count: usize,
}

fn default_version() -> u32 {
    1
}

/// Snapshot of every placed instance, in placement order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub instances: Vec<InstanceSnapshot>,
}

impl Default for SceneSnapshot {
    fn default() -> Self {
        Self {
            version: 1,
            instances: Vec::new(),
        }
    }
}
