// src/lib.rs
//! Haggis Interaction
//!
//! Pointer and touch events for 3D scene graphs: ray picking through the
//! camera, per-node listeners and DOM-style bubbling, with a winit bridge.

pub mod gfx;
pub mod interaction;
pub mod prelude;

// Re-export main types for convenience
pub use gfx::{Node, NodeId, SceneGraph};
pub use interaction::{InteractionError, InteractionManager, PointerState};
