// Library crate: the editor core plus the headless harness and command
// protocol used by integration tests and the `brickyard` script runner.

pub mod animation;
pub mod collision;
pub mod command;
pub mod error;
pub mod fixtures;
pub mod geometry;
pub mod harness;
pub mod picking;
pub mod state;
pub mod validation;

pub use error::EditorError;
pub use state::{EditorEvent, EditorState};
