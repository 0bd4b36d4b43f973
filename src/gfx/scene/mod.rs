//! # Scene Graph Module
//!
//! The minimal node hierarchy the interaction layer walks: parent/child
//! ownership, per-node visibility with derived world visibility, local
//! transforms and optional pick bounds.
//!
//! ## Key Components
//!
//! - [`SceneGraph`] - Arena owning every node, addressed by [`NodeId`]
//! - [`Node`] - Name, kind, visibility, local transform and pick bounds
//! - [`NodeKind`] - Distinguishes the scene root from ordinary objects
//!
//! ## Usage
//!
//! ```
//! use haggis_interaction::gfx::scene::{Node, SceneGraph};
//!
//! let mut scene = SceneGraph::new();
//! let root = scene.insert(Node::scene("world"), None);
//! let cube = scene.insert(Node::object("cube"), Some(root));
//!
//! assert_eq!(scene.parent(cube), Some(root));
//! assert!(scene.world_visible(cube));
//! ```

pub mod node;
pub mod scene;

// Re-export main types
pub use node::{Node, NodeId, NodeKind};
pub use scene::{Ancestors, SceneGraph};
