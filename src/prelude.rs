//! # Haggis Interaction Prelude
//!
//! Commonly used types for wiring pointer events into a scene.
//!
//! ## Usage
//!
//! ```rust
//! use haggis_interaction::prelude::*;
//!
//! let mut scene = SceneGraph::new();
//! let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), None);
//!
//! // Without an installed manager this only logs a warning
//! scene.on(cube, "click", |_: &mut PointerState| {}, false).unwrap();
//! ```

// Re-export scene and camera types
pub use crate::gfx::camera::{shared_camera, Camera, CameraHandle, OrbitCamera};
pub use crate::gfx::picking::{Intersection, AABB};
pub use crate::gfx::scene::{Node, NodeId, NodeKind, SceneGraph};

// Re-export the interaction layer
pub use crate::interaction::{
    Callback, DownFlag, EventKind, InteractionConfig, InteractionError, InteractionManager,
    MouseButton, NativeEvent, PointerState, Renderer, SharedInteraction, StaticSurface, Surface,
    SurfaceRenderer, TouchPoint, WindowEventAdapter, WindowSurface,
};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};
