//! Editor error taxonomy

use shared::{CatalogError, InstanceId};
use thiserror::Error;

use crate::collision::Blocker;

/// Why an editor action was refused.
///
/// `UnknownInstance` and `InvalidOperation` cover stale or racing input and are
/// only logged; `CollisionRejected` is reported to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("instance {0} does not exist")]
    UnknownInstance(InstanceId),

    #[error("cannot {op} instance {id}: {reason}")]
    InvalidOperation {
        id: InstanceId,
        op: &'static str,
        reason: &'static str,
    },

    #[error("placement blocked by {0}")]
    CollisionRejected(Blocker),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no template is pending placement")]
    NothingPending,

    #[error("an animation is still running")]
    Busy,
}

impl EditorError {
    /// Refusals that are logged but never shown to the user
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            EditorError::UnknownInstance(_) | EditorError::InvalidOperation { .. } | EditorError::Busy
        )
    }
}
