//! # Pick Events Demo
//!
//! Opens an empty window over a small scene of invisible cubes and logs every
//! pointer event the interaction layer delivers. Nothing is rendered; move the
//! mouse around the window center to hover and click the cubes.
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=info cargo run --example pick_events
//! ```
//!
//! ## What you'll see:
//! - `mouseover`/`mouseout` as the pointer crosses the three cubes
//! - `click` on a cube bubbling up to its group
//! - `mouseupoutside` when a press on a cube is released elsewhere
//! - scene-level clicks for everything that misses

use std::{cell::RefCell, rc::Rc, sync::Arc};

use anyhow::{Context, Result};
use cgmath::{Vector3, Zero};
use haggis_interaction::prelude::*;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

struct DemoState {
    window: Option<Arc<Window>>,
    scene: SceneGraph,
    camera: Rc<RefCell<OrbitCamera>>,
    manager: Option<SharedInteraction>,
    adapter: Option<WindowEventAdapter>,
}

impl DemoState {
    fn new() -> Self {
        let mut camera = OrbitCamera::new(8.0, 0.4, 0.2, Vector3::zero(), 1.0);
        camera.bounds.min_distance = Some(1.1);

        Self {
            window: None,
            scene: SceneGraph::new(),
            camera: Rc::new(RefCell::new(camera)),
            manager: None,
            adapter: None,
        }
    }

    /// Builds the scene and binds listeners once a surface exists.
    fn populate(&mut self, manager: InteractionManager) -> Result<()> {
        let scene = &mut self.scene;
        let world = scene.insert(Node::scene("world"), None);
        let group = scene.insert(Node::group("cubes"), Some(world));

        let names = ["left", "middle", "right"];
        let cubes: Vec<NodeId> = names
            .iter()
            .zip([-2.0, 0.0, 2.0])
            .map(|(name, x)| {
                let node = Node::object(*name)
                    .with_bounds(AABB::unit())
                    .with_translation(Vector3::new(x, 0.0, 0.0));
                scene.insert(node, Some(group))
            })
            .collect();

        let (shared, _) = scene.install_interaction(manager);
        self.manager = Some(shared);

        for (cube, name) in cubes.iter().zip(names) {
            scene.on(
                *cube,
                "mouseover mouseout mouseupoutside",
                move |state: &mut PointerState| {
                    if let Some(kind) = state.event {
                        log::info!("{} on {}", kind, name);
                    }
                },
                false,
            )?;
            scene.on(
                *cube,
                "click.demo",
                move |state: &mut PointerState| {
                    log::info!("clicked {} at ({:.0}, {:.0})", name, state.x, state.y);
                },
                false,
            )?;
        }

        scene.on(
            group,
            "click.demo",
            |state: &mut PointerState| log::info!("click bubbled to group from {:?}", state.intersect),
            false,
        )?;
        scene.on(
            world,
            "click.demo tap.demo",
            |state: &mut PointerState| {
                if state.intersect.is_some_and(|hit| hit.is_scene()) {
                    log::info!("clicked empty space");
                }
            },
            false,
        )?;
        Ok(())
    }
}

impl ApplicationHandler for DemoState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            WindowAttributes::default()
                .with_title("haggis-interaction: pick events")
                .with_inner_size(winit::dpi::LogicalSize::new(1200, 800)),
        ) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let PhysicalSize { width, height } = window.inner_size();
        self.camera.borrow_mut().resize_projection(width, height);

        let surface: Rc<dyn Surface> = Rc::new(WindowSurface::new(window.clone()));
        let renderer = Rc::new(SurfaceRenderer::new(surface));
        let camera: CameraHandle = self.camera.clone();
        let manager = InteractionManager::new(camera, renderer, None);

        if let Err(err) = self.populate(manager) {
            log::error!("failed to bind listeners: {err:#}");
            event_loop.exit();
            return;
        }

        self.adapter = Some(WindowEventAdapter::new(window.scale_factor()));
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let (Some(adapter), Some(manager)) = (self.adapter.as_mut(), self.manager.as_ref()) else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                if let Ok(mut manager) = manager.try_borrow_mut() {
                    manager.destroy();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.camera.borrow_mut().resize_projection(width, height);
                if let Ok(mut manager) = manager.try_borrow_mut() {
                    adapter.handle(&mut manager, &self.scene, &event);
                }
            }
            _ => {
                if let Ok(mut manager) = manager.try_borrow_mut() {
                    adapter.handle(&mut manager, &self.scene, &event);
                }
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut state = DemoState::new();
    event_loop.run_app(&mut state).context("event loop terminated")?;
    Ok(())
}
