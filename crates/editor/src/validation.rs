//! Scene consistency checks.
//!
//! `SceneValidator` inspects an [`EditorState`] for broken invariants:
//! selection bookkeeping, unique ids, normalized rotations and overlapping
//! footprints.

use std::collections::HashSet;

use shared::InstanceId;

use crate::state::EditorState;

/// Validator for editor state integrity checks.
pub struct SceneValidator<'a> {
    state: &'a EditorState,
}

impl<'a> SceneValidator<'a> {
    pub fn new(state: &'a EditorState) -> Self {
        Self { state }
    }

    /// Number of instances carrying the selected flag
    pub fn selected_flag_count(&self) -> usize {
        self.state.scene().selected_count()
    }

    /// The selection slot and the instance flags agree
    pub fn is_selection_consistent(&self) -> bool {
        let scene = self.state.scene();
        match self.state.selection().selected() {
            Some(id) => {
                scene.get(id).is_some_and(|i| i.is_selected()) && scene.selected_count() == 1
            }
            None => scene.selected_count() == 0,
        }
    }

    /// A pending template and a selected instance never coexist
    pub fn are_slots_exclusive(&self) -> bool {
        let sel = self.state.selection();
        !(sel.pending().is_some() && sel.selected().is_some())
    }

    pub fn are_ids_unique(&self) -> bool {
        let mut seen = HashSet::new();
        self.state.scene().instances().all(|i| seen.insert(i.id()))
    }

    /// Every rotation lies in [0, 2π)
    pub fn are_rotations_normalized(&self) -> bool {
        self.state
            .scene()
            .instances()
            .all(|i| (0.0..std::f64::consts::TAU).contains(&i.rotation_y()))
    }

    /// Pairs of built instances whose occupied footprints overlap by more
    /// than the collision buffer
    pub fn overlapping_pairs(&self) -> Vec<(InstanceId, InstanceId)> {
        let buffer = self.state.settings.collision_buffer;
        let built: Vec<_> = self.state.scene().instances().filter(|i| i.is_built()).collect();
        let mut pairs = Vec::new();
        for (n, a) in built.iter().enumerate() {
            let a_box = a.occupied_box().shrink_xz(buffer);
            for b in &built[n + 1..] {
                if a_box.intersects_xz(&b.occupied_box()) {
                    pairs.push((a.id().clone(), b.id().clone()));
                }
            }
        }
        pairs
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the state is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.selected_flag_count() > 1 {
            errors.push(format!(
                "{} instances are flagged as selected",
                self.selected_flag_count()
            ));
        }

        if !self.is_selection_consistent() {
            errors.push(format!(
                "Selection slot {:?} disagrees with instance flags",
                self.state.selection().selected()
            ));
        }

        if !self.are_slots_exclusive() {
            errors.push("Both a pending template and a selected instance are set".to_string());
        }

        if !self.are_ids_unique() {
            errors.push("Duplicate instance ids".to_string());
        }

        if !self.are_rotations_normalized() {
            errors.push("Rotation outside [0, 2π)".to_string());
        }

        for (a, b) in self.overlapping_pairs() {
            errors.push(format!("Instances {a} and {b} overlap"));
        }

        errors
    }
}
