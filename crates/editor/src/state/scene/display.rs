//! Display helpers for placed instances

use serde::Serialize;
use shared::{Catalog, InstanceId};

use super::instance::Instance;
use super::SceneState;

/// Status word shown next to a placed instance
pub fn lifecycle_status(instance: &Instance) -> &'static str {
    if instance.is_animating() {
        "Animating..."
    } else if instance.is_built() {
        "Built"
    } else {
        "Unbuilt"
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Row of the placed-instances list
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlacedListItem {
    pub id: InstanceId,
    /// "Template (Variation)"
    pub label: String,
    pub status: &'static str,
    pub selected: bool,
    /// Whether clicking the row may select it
    pub selectable: bool,
}

/// Rows for every placed instance, sorted by id
pub fn placed_list(scene: &SceneState, catalog: &Catalog) -> Vec<PlacedListItem> {
    let mut rows: Vec<PlacedListItem> = scene
        .instances()
        .map(|i| PlacedListItem {
            id: i.id().clone(),
            label: display_name(catalog, i),
            status: lifecycle_status(i),
            selected: i.is_selected(),
            selectable: i.is_built() && !i.is_animating(),
        })
        .collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows
}

/// "Template (Variation)", falling back to raw ids for unknown entries
pub(crate) fn display_name(catalog: &Catalog, instance: &Instance) -> String {
    match catalog.variation(instance.template_id(), instance.variation_index()) {
        Ok(v) => {
            let name = catalog
                .template(instance.template_id())
                .map(|t| t.name.as_str())
                .unwrap_or(instance.template_id());
            format!("{} ({})", name, v.name)
        }
        Err(_) => format!("{}:{}", instance.template_id(), instance.variation_index()),
    }
}
