use serde::{Deserialize, Serialize};
use shared::{InstanceId, TemplateId};

/// Template variation waiting to be placed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    pub template_id: TemplateId,
    pub variation_index: usize,
}

impl TemplateSelection {
    pub fn new(template_id: impl Into<TemplateId>, variation_index: usize) -> Self {
        Self {
            template_id: template_id.into(),
            variation_index,
        }
    }

    /// Key used by template list rows: `"<template>:<variation>"`
    pub fn item_key(&self) -> String {
        format!("{}:{}", self.template_id, self.variation_index)
    }

    /// Parse a template list key
    pub fn parse_item_key(key: &str) -> Option<Self> {
        let (template_id, index) = key.rsplit_once(':')?;
        if template_id.is_empty() {
            return None;
        }
        Some(Self::new(template_id, index.parse().ok()?))
    }
}

/// Pending template and selected instance. At most one of the two is set.
#[derive(Default, Debug)]
pub struct SelectionState {
    pending: Option<TemplateSelection>,
    selected: Option<InstanceId>,
}

impl SelectionState {
    /// Template waiting for a ground click
    pub fn pending(&self) -> Option<&TemplateSelection> {
        self.pending.as_ref()
    }

    /// Currently selected instance
    pub fn selected(&self) -> Option<&InstanceId> {
        self.selected.as_ref()
    }

    /// Check if an instance is selected
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.as_deref() == Some(id)
    }

    /// Set the pending template, returning the instance that was deselected
    pub fn set_pending(&mut self, template: TemplateSelection) -> Option<InstanceId> {
        self.pending = Some(template);
        self.selected.take()
    }

    /// Clear the pending template. Returns true if one was set.
    pub fn cancel_pending(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Select an instance (clears previous selection and any pending
    /// template). Returns the previously selected instance, if different.
    pub fn select(&mut self, id: InstanceId) -> Option<InstanceId> {
        self.pending = None;
        let previous = self.selected.replace(id);
        match previous {
            Some(prev) if self.selected.as_ref() != Some(&prev) => Some(prev),
            _ => None,
        }
    }

    /// Clear the selected instance, returning it
    pub fn deselect(&mut self) -> Option<InstanceId> {
        self.selected.take()
    }

    /// Clear both slots
    pub fn clear(&mut self) {
        self.pending = None;
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_empty() {
        let s = SelectionState::default();
        assert!(s.pending().is_none());
        assert!(s.selected().is_none());
    }

    #[test]
    fn test_select_clears_previous() {
        let mut s = SelectionState::default();
        assert_eq!(s.select("a".to_string()), None);
        assert_eq!(s.select("b".to_string()), Some("a".to_string()));
        assert!(!s.is_selected("a"));
        assert!(s.is_selected("b"));
    }

    #[test]
    fn test_reselect_same_reports_nothing() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        assert_eq!(s.select("a".to_string()), None);
        assert!(s.is_selected("a"));
    }

    #[test]
    fn test_pending_clears_selection() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        let dropped = s.set_pending(TemplateSelection::new("cottage", 0));
        assert_eq!(dropped, Some("a".to_string()));
        assert!(s.selected().is_none());
        assert_eq!(s.pending().unwrap().template_id, "cottage");
    }

    #[test]
    fn test_select_clears_pending() {
        let mut s = SelectionState::default();
        s.set_pending(TemplateSelection::new("cottage", 1));
        s.select("a".to_string());
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_cancel_pending() {
        let mut s = SelectionState::default();
        assert!(!s.cancel_pending());
        s.set_pending(TemplateSelection::new("tower", 0));
        assert!(s.cancel_pending());
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_deselect_and_clear() {
        let mut s = SelectionState::default();
        s.select("a".to_string());
        assert_eq!(s.deselect(), Some("a".to_string()));
        assert_eq!(s.deselect(), None);
        s.set_pending(TemplateSelection::new("tower", 0));
        s.clear();
        assert!(s.pending().is_none());
    }

    #[test]
    fn test_item_key_parse() {
        let t = TemplateSelection::new("cottage", 1);
        assert_eq!(t.item_key(), "cottage:1");
        assert_eq!(TemplateSelection::parse_item_key("cottage:1"), Some(t));
        assert_eq!(TemplateSelection::parse_item_key("cottage"), None);
        assert_eq!(TemplateSelection::parse_item_key(":1"), None);
        assert_eq!(TemplateSelection::parse_item_key("cottage:x"), None);
    }
}
