//! Template catalog and default road layout

use serde::{Deserialize, Serialize};

use crate::dims::{self, BRICK_HEIGHT, PLATE_HEIGHT};
use crate::{ElementSpec, Footprint, GroundPoint, Obstacle, Template, Variation};

/// Catalog lookup errors
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Template id not present in the catalog
    UnknownTemplate(String),
    /// Variation index out of range for the template
    UnknownVariation { template_id: String, index: usize },
    /// Catalog JSON could not be parsed
    Parse(String),
    /// Catalog contents are inconsistent
    Invalid(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::UnknownTemplate(id) => write!(f, "Unknown template '{}'", id),
            CatalogError::UnknownVariation { template_id, index } => {
                write!(f, "Template '{}' has no variation {}", template_id, index)
            }
            CatalogError::Parse(msg) => write!(f, "Catalog parse error: {}", msg),
            CatalogError::Invalid(msg) => write!(f, "Invalid catalog: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only collection of templates
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub templates: Vec<Template>,
}

impl Catalog {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Parse and validate a catalog from JSON
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.check()?;
        Ok(catalog)
    }

    /// Check ids are unique and every footprint is positive
    pub fn check(&self) -> Result<(), CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate template id '{}'",
                    template.id
                )));
            }
            if template.variations.is_empty() {
                return Err(CatalogError::Invalid(format!(
                    "template '{}' has no variations",
                    template.id
                )));
            }
            for v in &template.variations {
                if v.footprint.width <= 0.0 || v.footprint.depth <= 0.0 {
                    return Err(CatalogError::Invalid(format!(
                        "variation '{}' of '{}' has an empty footprint",
                        v.name, template.id
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn template(&self, template_id: &str) -> Result<&Template, CatalogError> {
        self.templates
            .iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| CatalogError::UnknownTemplate(template_id.to_string()))
    }

    pub fn variation(&self, template_id: &str, index: usize) -> Result<&Variation, CatalogError> {
        self.template(template_id)?
            .variations
            .get(index)
            .ok_or_else(|| CatalogError::UnknownVariation {
                template_id: template_id.to_string(),
                index,
            })
    }

    /// Every (template, variation index, variation) triple, in catalog order
    pub fn items(&self) -> impl Iterator<Item = (&Template, usize, &Variation)> {
        self.templates
            .iter()
            .flat_map(|t| t.variations.iter().enumerate().map(move |(i, v)| (t, i, v)))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Walls, door gap, side windows and a roof plate for a house standing
/// inside the fence ring of a `width` x `depth` footprint.
fn house_elements(width: f64, depth: f64, layers: u32, wall: u32, roof: u32) -> Vec<ElementSpec> {
    let bw = width - 4.0;
    let bd = depth - 4.0;
    let mut out = Vec::new();

    for layer in 0..layers {
        let y = BRICK_HEIGHT * (f64::from(layer) + 0.5);
        let front_z = -(bd - 1.0) / 2.0;
        let back_z = (bd - 1.0) / 2.0;
        let side_x = (bw - 1.0) / 2.0;

        if layer < 2 {
            let piece = (bw - 2.0) / 2.0;
            let cx = (bw + 2.0) / 4.0;
            out.push(ElementSpec::new([piece, 1.0, BRICK_HEIGHT], [-cx, y, front_z], wall));
            out.push(ElementSpec::new([piece, 1.0, BRICK_HEIGHT], [cx, y, front_z], wall));
        } else {
            out.push(ElementSpec::new([bw, 1.0, BRICK_HEIGHT], [0.0, y, front_z], wall));
        }
        out.push(ElementSpec::new([bw, 1.0, BRICK_HEIGHT], [0.0, y, back_z], wall));

        let side = if layer == 1 { dims::TRANS_CLEAR_BLUE } else { wall };
        out.push(ElementSpec::new([1.0, bd - 2.0, BRICK_HEIGHT], [-side_x, y, 0.0], side));
        out.push(ElementSpec::new([1.0, bd - 2.0, BRICK_HEIGHT], [side_x, y, 0.0], side));
    }

    let roof_y = BRICK_HEIGHT * f64::from(layers) + PLATE_HEIGHT / 2.0;
    out.push(ElementSpec::new([bw + 2.0, bd + 2.0, PLATE_HEIGHT], [0.0, roof_y, 0.0], roof));
    out
}

fn variation(name: &str, width: f64, depth: f64, layers: u32, wall: u32, roof: u32) -> Variation {
    Variation {
        name: name.to_string(),
        footprint: Footprint { width, depth },
        height: layers,
        elements: house_elements(width, depth, layers, wall, roof),
    }
}

/// Catalog shipped with the editor
pub fn builtin_catalog() -> Catalog {
    Catalog::new(vec![
        Template {
            id: "cottage".to_string(),
            name: "Cottage".to_string(),
            variations: vec![
                variation("Small", 10.0, 10.0, 3, dims::RED, dims::DARK_GREY),
                variation("Wide", 12.0, 10.0, 3, dims::YELLOW, dims::BROWN),
            ],
        },
        Template {
            id: "townhouse".to_string(),
            name: "Townhouse".to_string(),
            variations: vec![
                variation("Narrow", 8.0, 12.0, 5, dims::TAN, dims::BLUE),
                variation("Corner", 12.0, 12.0, 4, dims::WHITE, dims::ORANGE),
            ],
        },
        Template {
            id: "tower".to_string(),
            name: "Lookout Tower".to_string(),
            variations: vec![variation("Lookout", 8.0, 8.0, 7, dims::GREY, dims::GREEN)],
        },
    ])
}

/// A north-south avenue through the origin and two east-west streets
pub fn default_roads() -> Vec<Obstacle> {
    vec![
        Obstacle::road(12.0, 300.0, GroundPoint::new(0.0, 0.0)),
        Obstacle::road(200.0, 10.0, GroundPoint::new(0.0, -60.0)),
        Obstacle::road(200.0, 10.0, GroundPoint::new(0.0, 60.0)),
    ]
}
