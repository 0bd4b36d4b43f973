//! # Graphics Module
//!
//! The host-side pieces the interaction layer needs from a 3D engine: a camera
//! that can unproject screen points, a scene graph to walk, and ray picking
//! against node bounds.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Camera trait and orbit camera
//! - **Scene Graph** ([`scene`]) - Node hierarchy with visibility and transforms
//! - **Picking** ([`picking`]) - Rays, bounding boxes and ordered hit lists
//!
//! Rendering is not part of this crate; a renderer only has to hand the
//! interaction manager the surface it draws to.

pub mod camera;
pub mod picking;
pub mod scene;

// Re-export commonly used types
pub use camera::{Camera, CameraHandle, OrbitCamera};
pub use picking::{Intersection, Ray, Raycaster, AABB};
pub use scene::{Node, NodeId, NodeKind, SceneGraph};
