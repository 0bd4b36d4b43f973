use thiserror::Error;

use crate::gfx::scene::NodeId;

/// Errors surfaced by listener registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("unknown event name `{0}`")]
    UnknownEvent(String),

    #[error("event name is empty")]
    EmptyEventName,

    #[error("node {0} is not part of the scene graph")]
    NodeNotFound(NodeId),

    #[error("interaction manager is already borrowed, probably from inside a listener")]
    ManagerBusy,
}
