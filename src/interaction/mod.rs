//! # Interaction Module
//!
//! DOM-style pointer events for scene nodes. Listeners are bound per node
//! with `name[.namespace]` strings, native mouse and touch input is hit
//! tested through the camera, and events bubble up the scene graph.
//!
//! ## Key Components
//!
//! - [`InteractionManager`] - Owns listeners and pointer state for one surface
//! - [`ListenerRegistry`] - Per-node listeners plus the kind-to-nodes index
//! - [`HitTester`] - Client coordinates to ordered scene hits
//! - [`PointerState`] - Mutable record handed to every listener
//! - [`WindowEventAdapter`] - Bridges winit window events to the manager
//!
//! ## Usage
//!
//! ```
//! use std::rc::Rc;
//! use cgmath::{Vector3, Zero};
//! use haggis_interaction::gfx::{camera::shared_camera, Node, OrbitCamera, SceneGraph, AABB};
//! use haggis_interaction::interaction::{
//!     InteractionManager, NativeEvent, PointerState, StaticSurface, Surface, SurfaceRenderer,
//! };
//!
//! let mut scene = SceneGraph::new();
//! let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), None);
//!
//! let camera = shared_camera(OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0));
//! let surface: Rc<dyn Surface> = Rc::new(StaticSurface::new(100, 100));
//! let manager = InteractionManager::new(camera, Rc::new(SurfaceRenderer::new(surface)), None);
//! let (shared, _) = scene.install_interaction(manager);
//!
//! scene
//!     .on(cube, "click.demo", |state: &mut PointerState| {
//!         println!("clicked at ({}, {})", state.x, state.y);
//!     }, false)
//!     .unwrap();
//!
//! shared.borrow_mut().on_click(&scene, &mut NativeEvent::mouse(50.0, 50.0));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hit_test;
pub mod manager;
pub mod node_api;
pub mod pointer;
pub mod pool;
pub mod registry;
pub mod state;
pub mod surface;
pub mod winit_adapter;

pub use config::{InteractionConfig, DEFAULT_RECT_CACHE_TTL};
pub use dispatch::dispatch;
pub use error::InteractionError;
pub use event::{EventKind, EventSelector, EVENT_ALIASES};
pub use hit_test::{HitTester, PickResult};
pub use manager::InteractionManager;
pub use node_api::SharedInteraction;
pub use pointer::{MouseButton, NativeEvent, PointerState, TouchId, TouchPoint};
pub use pool::{SlotId, TouchPool};
pub use registry::{Callback, Listener, ListenerRegistry};
pub use state::{DownFlag, InteractionStates, NodeInteraction};
pub use surface::{Renderer, StaticSurface, Surface, SurfaceRect, SurfaceRenderer, WindowSurface};
pub use winit_adapter::{ClickOutcome, ClickTracker, WindowEventAdapter};
