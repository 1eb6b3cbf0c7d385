//! JSON command protocol for scripted editing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::harness::TestHarness;
use crate::state::TemplateSelection;

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Arm a template variation for placement
    SelectTemplate {
        template_id: String,
        #[serde(default)]
        variation_index: usize,
    },
    /// Disarm the pending template
    CancelPlacement,
    /// Place at (x, z): the pending template, or arm `template_id` first
    /// and place it in one step
    Place {
        x: f64,
        z: f64,
        #[serde(default)]
        template_id: Option<String>,
        #[serde(default)]
        variation_index: usize,
    },
    Select {
        id: String,
    },
    Deselect,
    Move {
        id: String,
        x: f64,
        z: f64,
    },
    Rotate {
        id: String,
    },
    Unbuild {
        id: String,
    },
    /// Advance the animation clock by `dt` seconds
    Advance {
        dt: f64,
    },
    /// Complete every running animation
    FinishAnimations,
    /// Inspect the editor: status, selection and the placed list
    Inspect,
    /// Run the consistency checks
    Validate,
    /// Export the scene as JSON.
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<(), E>> for CommandResponse {
    fn from(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Execute a single command on the harness.
pub fn execute_command(harness: &mut TestHarness, cmd: AgentCommand) -> CommandResponse {
    match cmd {
        AgentCommand::SelectTemplate {
            template_id,
            variation_index,
        } => harness.arm(&template_id, variation_index).into(),

        AgentCommand::CancelPlacement => {
            let cancelled = harness.state.cancel_placement();
            CommandResponse::ok_with_data(serde_json::json!({ "cancelled": cancelled }))
        }

        AgentCommand::Place {
            x,
            z,
            template_id,
            variation_index,
        } => {
            let point = DVec2::new(x, z);
            let result = match template_id {
                Some(template_id) => harness
                    .state
                    .select_template(TemplateSelection::new(template_id, variation_index))
                    .and_then(|()| {
                        let placed = harness.state.place_at(point);
                        if placed.is_err() {
                            harness.state.cancel_placement();
                        }
                        placed
                    }),
                None => harness.state.place_at(point),
            };
            match result {
                Ok(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                Err(e) => CommandResponse::err(e.to_string()),
            }
        }

        AgentCommand::Select { id } => harness.select(&id).into(),

        AgentCommand::Deselect => {
            let deselected = harness.deselect();
            CommandResponse::ok_with_data(serde_json::json!({ "deselected": deselected }))
        }

        AgentCommand::Move { id, x, z } => harness.move_to(&id, x, z).into(),

        AgentCommand::Rotate { id } => harness.rotate(&id).into(),

        AgentCommand::Unbuild { id } => harness.unbuild(&id).into(),

        AgentCommand::Advance { dt } => {
            let completed = harness.advance(dt);
            CommandResponse::ok_with_data(serde_json::json!({ "completed": completed }))
        }

        AgentCommand::FinishAnimations => {
            let completed = harness.finish_animations();
            CommandResponse::ok_with_data(serde_json::json!({ "completed": completed }))
        }

        AgentCommand::Inspect => {
            let state = &harness.state;
            CommandResponse::ok_with_data(serde_json::json!({
                "status": state.status(),
                "pending": state.selection().pending(),
                "selected": state.selection().selected(),
                "animating": state.any_animating(),
                "instance_count": state.scene().len(),
                "instances": state.placed_list(),
            }))
        }

        AgentCommand::Validate => {
            let errors = harness.validate();
            CommandResponse::ok_with_data(serde_json::json!({
                "valid": errors.is_empty(),
                "errors": errors,
            }))
        }

        AgentCommand::ExportScene => match serde_json::to_string_pretty(&harness.snapshot()) {
            Ok(json) => CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json })),
            Err(e) => CommandResponse::err(format!("Failed to serialize scene: {e}")),
        },
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json(harness: &mut TestHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch(
    harness: &mut TestHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(harness, cmd))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_serde_finish_animations() {
        let json = r#"{"command": "finish_animations"}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        assert!(matches!(cmd, AgentCommand::FinishAnimations));
    }

    #[test]
    fn test_command_serde_place_defaults() {
        let json = r#"{"command": "place", "x": 1.0, "z": 2.0}"#;
        let cmd: AgentCommand = serde_json::from_str(json).unwrap();
        match cmd {
            AgentCommand::Place {
                template_id,
                variation_index,
                ..
            } => {
                assert!(template_id.is_none());
                assert_eq!(variation_index, 0);
            }
            _ => panic!("Expected Place"),
        }
    }

    #[test]
    fn test_execute_place_with_template() {
        let mut h = TestHarness::new();
        let resp = execute_json(
            &mut h,
            r#"{"command": "place", "template_id": "square", "x": 0.4, "z": 0.0}"#,
        )
        .unwrap();
        assert!(resp.success);
        let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();
        assert_eq!(h.position(&id), DVec2::ZERO);
    }

    #[test]
    fn test_execute_place_without_pending_fails() {
        let mut h = TestHarness::new();
        let resp = execute_json(&mut h, r#"{"command": "place", "x": 0.0, "z": 0.0}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("no template is pending placement"));
    }

    #[test]
    fn test_execute_place_with_template_refused_while_building() {
        let mut h = TestHarness::new();
        h.place("square", 0, 0.0, 0.0).unwrap();
        let resp = execute_json(
            &mut h,
            r#"{"command": "place", "template_id": "square", "x": 20.0, "z": 0.0}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error.as_deref(), Some("an animation is still running"));
        assert_eq!(h.instance_count(), 1);
        assert!(h.state.selection().pending().is_none());
    }

    #[test]
    fn test_execute_place_with_template_blocked_disarms() {
        let mut h = TestHarness::new();
        h.place_built("square", 0.0, 0.0);
        let resp = execute_json(
            &mut h,
            r#"{"command": "place", "template_id": "square", "x": 1.0, "z": 0.0}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert!(h.state.selection().pending().is_none());
        assert_eq!(h.instance_count(), 1);
        h.assert_valid();
    }

    #[test]
    fn test_execute_advance_huge_dt() {
        let mut h = TestHarness::new();
        let id = h.place("square", 0, 0.0, 0.0).unwrap();
        let resp = execute_json(&mut h, r#"{"command": "advance", "dt": 1e300}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["completed"][0]["kind"], "built");
        assert_eq!(data["completed"][0]["id"], id.as_str());
        assert!(!h.state.any_animating());
    }

    #[test]
    fn test_execute_finish_reports_completions() {
        let mut h = TestHarness::new();
        let id = h.place("square", 0, 0.0, 0.0).unwrap();
        let resp = execute_json(&mut h, r#"{"command": "finish_animations"}"#).unwrap();
        let data = resp.data.unwrap();
        assert_eq!(data["completed"][0]["kind"], "built");
        assert_eq!(data["completed"][0]["id"], id.as_str());
    }

    #[test]
    fn test_execute_inspect() {
        let mut h = TestHarness::new();
        h.place_built("square", 0.0, 0.0);
        h.place_built("square", 10.0, 0.0);

        let resp = execute_json(&mut h, r#"{"command": "inspect"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        assert_eq!(data["instance_count"], 2);
        assert_eq!(data["instances"][0]["status"], "Built");
    }

    #[test]
    fn test_execute_export_scene() {
        let mut h = TestHarness::new();
        h.place_built("square", 0.0, 0.0);

        let resp = execute_json(&mut h, r#"{"command": "export_scene"}"#).unwrap();
        assert!(resp.success);
        let data = resp.data.unwrap();
        let scene_json = data["scene_json"].as_str().unwrap();
        assert!(scene_json.contains("instances"));
    }

    #[test]
    fn test_execute_invalid_json() {
        let mut h = TestHarness::new();
        let result = execute_json(&mut h, "not valid json");
        assert!(result.is_err());
    }
}
