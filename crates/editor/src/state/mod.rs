mod actions;
pub mod drag;
mod interaction;
pub mod scene;
pub mod selection;
pub mod settings;

use shared::{Catalog, InstanceId, Obstacle};

use crate::animation::{AnimationRequest, AnimationTicket, Timeline};
use crate::collision::CollisionValidator;
use crate::geometry::Aabb;
pub use actions::{PLACE_BLOCKED_STATUS, ROTATE_BLOCKED_STATUS};
pub use drag::{DragState, GhostPreview};
pub use interaction::{PointerHit, PointerInput, PointerKind, GROUND_HINT_STATUS};
pub use scene::{placed_list, Completed, PlacedListItem, SceneState};
pub use selection::{SelectionState, TemplateSelection};
pub use settings::{AnimationDurations, EditorSettings};

pub const READY_STATUS: &str = "Ready. Select template or click building/list item.";
pub const IDLE_STATUS: &str = "Select a template or click a building/list item.";

/// Pointer cursor the host should show
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorMode {
    #[default]
    Default,
    /// A template is waiting for a ground click
    Placing,
    /// A selected instance is being dragged
    Moving,
}

/// Visibility and enablement of the contextual action buttons
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionButtons {
    pub cancel_visible: bool,
    pub rotate_visible: bool,
    pub rotate_enabled: bool,
    pub unbuild_visible: bool,
    pub unbuild_enabled: bool,
}

/// Presentation update produced by the editor core
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// The placed-instances list needs re-rendering
    InstancesChanged,
    SelectionChanged(Option<InstanceId>),
    Buttons(ActionButtons),
    Status(String),
    Cursor(CursorMode),
    /// Outline box around the selected instance, or none
    Highlight(Option<Aabb>),
    Ghost(Option<GhostPreview>),
}

/// Combined editor state
pub struct EditorState {
    catalog: Catalog,
    obstacles: Vec<Obstacle>,
    pub settings: EditorSettings,
    scene: SceneState,
    selection: SelectionState,
    drag: DragState,
    timeline: Timeline,
    status: String,
    cursor: CursorMode,
    events: Vec<EditorEvent>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(
            shared::builtin_catalog(),
            shared::default_roads(),
            EditorSettings::default(),
        )
    }
}

impl EditorState {
    pub fn new(catalog: Catalog, obstacles: Vec<Obstacle>, settings: EditorSettings) -> Self {
        let timeline = Timeline::new(settings.animation.clone());
        Self {
            catalog,
            obstacles,
            settings,
            scene: SceneState::default(),
            selection: SelectionState::default(),
            drag: DragState::default(),
            timeline,
            status: READY_STATUS.to_string(),
            cursor: CursorMode::Default,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn cursor(&self) -> CursorMode {
        self.cursor
    }

    /// Collision checks against the current scene and roads
    pub fn validator(&self) -> CollisionValidator<'_> {
        CollisionValidator::new(&self.scene, &self.obstacles, &self.settings)
    }

    /// Rows for the placed-instances list
    pub fn placed_list(&self) -> Vec<PlacedListItem> {
        placed_list(&self.scene, &self.catalog)
    }

    pub fn any_animating(&self) -> bool {
        self.scene.any_animating()
    }

    /// Current action button state
    pub fn action_buttons(&self) -> ActionButtons {
        let selected = self.selected_instance_idle();
        ActionButtons {
            cancel_visible: self.selection.pending().is_some(),
            rotate_visible: selected,
            rotate_enabled: selected,
            unbuild_visible: selected,
            unbuild_enabled: selected,
        }
    }

    fn selected_instance_idle(&self) -> bool {
        self.selection
            .selected()
            .and_then(|id| self.scene.get(id))
            .is_some_and(|i| i.is_built() && !i.is_animating())
    }

    /// Take presentation events queued since the last call
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take animation play requests queued since the last call
    pub fn drain_animation_requests(&mut self) -> Vec<AnimationRequest> {
        self.timeline.drain_requests()
    }

    // ── Presentation plumbing ─────────────────────────────────

    fn set_status(&mut self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!("Status: {text}");
        self.status = text.clone();
        self.events.push(EditorEvent::Status(text));
    }

    fn set_cursor(&mut self, cursor: CursorMode) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.events.push(EditorEvent::Cursor(cursor));
        }
    }

    fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    /// Re-announce the list and the buttons after a lifecycle change
    fn refresh(&mut self) {
        self.events.push(EditorEvent::InstancesChanged);
        let buttons = self.action_buttons();
        self.events.push(EditorEvent::Buttons(buttons));
    }

    /// Highlight box around the selected instance at its current pose
    fn refresh_highlight(&mut self) {
        let bounds = self
            .selection
            .selected()
            .and_then(|id| self.scene.get(id))
            .map(|i| i.world_box());
        self.events.push(EditorEvent::Highlight(bounds));
    }

    /// "Template (Variation)" for an instance id
    fn instance_name(&self, id: &str) -> String {
        self.scene
            .get(id)
            .map(|i| scene::display_name(&self.catalog, i))
            .unwrap_or_else(|| id.to_string())
    }

    /// Template display name for an instance id
    fn template_name(&self, id: &str) -> String {
        self.scene
            .get(id)
            .map(|i| {
                self.catalog
                    .template(i.template_id())
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|_| i.template_id().clone())
            })
            .unwrap_or_else(|| id.to_string())
    }

    fn selected_status(&self, id: &str) -> String {
        format!(
            "Selected {}. Drag to move, Rotate, or Unbuild.",
            self.instance_name(id)
        )
    }

    // ── Animation completion ──────────────────────────────────

    /// Advance the animation clock by `dt` seconds and complete every
    /// animation that reached its duration.
    pub fn tick(&mut self, dt: f64) -> Vec<Completed> {
        let finished = self.timeline.advance(dt);
        finished
            .into_iter()
            .filter_map(|ticket| self.complete_animation(ticket))
            .collect()
    }

    /// Complete every in-flight animation immediately
    pub fn finish_animations(&mut self) -> Vec<Completed> {
        let mut done = Vec::new();
        while !self.timeline.is_idle() {
            for ticket in self.timeline.running_tickets() {
                done.extend(self.complete_animation(ticket));
            }
        }
        done
    }

    /// Apply the completion of one animation.
    ///
    /// Returns `None` for tickets that were never issued or already
    /// completed; those are logged and otherwise ignored.
    pub fn complete_animation(&mut self, ticket: AnimationTicket) -> Option<Completed> {
        let Some(finished) = self.timeline.finish(ticket) else {
            tracing::warn!("Animation {ticket}: stale completion ignored");
            return None;
        };
        let done = self.scene.complete_transition(&finished.instance_id)?;

        self.refresh();
        match &done {
            Completed::Moved(id) | Completed::Rotated(id) if self.selection.is_selected(id) => {
                let status = self.selected_status(id);
                self.refresh_highlight();
                self.set_status(status);
            }
            _ => {
                if !self.any_animating() && self.selection.pending().is_none() {
                    self.set_status(READY_STATUS);
                }
            }
        }
        Some(done)
    }
}
