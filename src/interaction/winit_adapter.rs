//! Feeds winit window events into an [`InteractionManager`].
//!
//! winit reports raw presses and releases only, so clicks, double clicks and
//! context-menu requests are synthesized here.

use std::{collections::HashMap, time::Instant};

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, Touch, TouchPhase, WindowEvent},
};

use crate::gfx::scene::SceneGraph;

use super::{
    config::InteractionConfig,
    manager::InteractionManager,
    pointer::{MouseButton, NativeEvent, TouchPoint},
};

/// What a button release amounts to once press position and timing are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    None,
    Click,
    DoubleClick,
    ContextMenu,
}

/// Press bookkeeping behind click synthesis.
#[derive(Debug, Default)]
pub struct ClickTracker {
    pressed: HashMap<MouseButton, (f32, f32)>,
    last_click: Option<(Instant, (f32, f32))>,
}

impl ClickTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: MouseButton, position: (f32, f32)) {
        self.pressed.insert(button, position);
    }

    /// A release close enough to its press is a click; a second left click
    /// within the double-click interval also yields `DoubleClick`.
    pub fn release(
        &mut self,
        button: MouseButton,
        position: (f32, f32),
        now: Instant,
        config: &InteractionConfig,
    ) -> ClickOutcome {
        let Some(pressed_at) = self.pressed.remove(&button) else {
            return ClickOutcome::None;
        };
        if distance(pressed_at, position) > config.click_slop {
            return ClickOutcome::None;
        }

        if button.is_right() {
            return ClickOutcome::ContextMenu;
        }

        let repeated = self.last_click.is_some_and(|(at, previous)| {
            now.duration_since(at) <= config.double_click_interval
                && distance(previous, position) <= config.click_slop
        });

        if repeated {
            self.last_click = None;
            ClickOutcome::DoubleClick
        } else {
            self.last_click = Some((now, position));
            ClickOutcome::Click
        }
    }

    pub fn reset(&mut self) {
        self.pressed.clear();
        self.last_click = None;
    }
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

/// Translates one window's events into manager handler calls.
#[derive(Debug)]
pub struct WindowEventAdapter {
    scale_factor: f64,
    cursor: Option<(f32, f32)>,
    clicks: ClickTracker,
}

impl WindowEventAdapter {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: None,
            clicks: ClickTracker::new(),
        }
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    /// Routes `event` to the manager. Returns true when a handler or listener
    /// asked for the default action to be suppressed.
    pub fn handle(
        &mut self,
        manager: &mut InteractionManager,
        scene: &SceneGraph,
        event: &WindowEvent,
    ) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let position = self.logical(*position);
                self.cursor_moved(manager, scene, position)
            }
            WindowEvent::CursorLeft { .. } => self.cursor_left(manager, scene),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(
                manager,
                scene,
                (*button).into(),
                *state == ElementState::Pressed,
            ),
            WindowEvent::Touch(Touch {
                phase,
                location,
                id,
                ..
            }) => {
                let (x, y) = self.logical(*location);
                self.touch(manager, scene, *phase, TouchPoint::new(*id, x, y))
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                manager.refresh_surface_rect();
                false
            }
            WindowEvent::Resized(_) => {
                manager.refresh_surface_rect();
                false
            }
            _ => false,
        }
    }

    pub fn cursor_moved(
        &mut self,
        manager: &mut InteractionManager,
        scene: &SceneGraph,
        position: (f32, f32),
    ) -> bool {
        self.cursor = Some(position);
        let mut event = NativeEvent::mouse(position.0, position.1);
        manager.on_mouse_move(scene, &mut event);
        event.default_prevented()
    }

    pub fn cursor_left(&mut self, manager: &mut InteractionManager, scene: &SceneGraph) -> bool {
        let (x, y) = self.cursor.take().unwrap_or_default();
        self.clicks.reset();
        let mut event = NativeEvent::mouse(x, y);
        manager.on_mouse_leave(scene, &mut event);
        event.default_prevented()
    }

    pub fn mouse_button(
        &mut self,
        manager: &mut InteractionManager,
        scene: &SceneGraph,
        button: MouseButton,
        pressed: bool,
    ) -> bool {
        let Some(position) = self.cursor else {
            log::trace!("{:?} button event before any cursor position, ignoring", button);
            return false;
        };
        let native = || NativeEvent::mouse(position.0, position.1).with_button(button);

        let mut event = native();
        if pressed {
            self.clicks.press(button, position);
            manager.on_mouse_down(scene, &mut event);
            return event.default_prevented();
        }

        manager.on_mouse_up(scene, &mut event);
        let mut prevented = event.default_prevented();

        let outcome = self
            .clicks
            .release(button, position, Instant::now(), manager.config());
        let mut follow_up = native();
        match outcome {
            ClickOutcome::None => {}
            ClickOutcome::Click => manager.on_click(scene, &mut follow_up),
            ClickOutcome::DoubleClick => {
                manager.on_click(scene, &mut follow_up);
                manager.on_dbl_click(scene, &mut follow_up);
            }
            ClickOutcome::ContextMenu => {
                manager.on_context_menu(scene, &mut follow_up);
                manager.on_right_click(scene, &mut follow_up);
            }
        }
        prevented |= follow_up.default_prevented();
        prevented
    }

    pub fn touch(
        &mut self,
        manager: &mut InteractionManager,
        scene: &SceneGraph,
        phase: TouchPhase,
        touch: TouchPoint,
    ) -> bool {
        let mut event = NativeEvent::touches(vec![touch]);
        match phase {
            TouchPhase::Started => manager.on_touch_start(scene, &mut event),
            TouchPhase::Moved => manager.on_touch_move(scene, &mut event),
            TouchPhase::Ended => manager.on_touch_end(scene, &mut event),
            TouchPhase::Cancelled => manager.on_touch_cancel(scene, &mut event),
        }
        event.default_prevented()
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> (f32, f32) {
        let logical = position.to_logical::<f32>(self.scale_factor);
        (logical.x, logical.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        camera::{shared_camera, OrbitCamera},
        picking::AABB,
        scene::{Node, NodeId},
    };
    use crate::interaction::{
        pointer::PointerState,
        registry::Callback,
        surface::{StaticSurface, Surface, SurfaceRenderer},
    };
    use cgmath::{Vector3, Zero};
    use std::{cell::RefCell, rc::Rc, time::Duration};

    #[test]
    fn test_release_near_press_is_click() {
        let config = InteractionConfig::default();
        let mut clicks = ClickTracker::new();
        let now = Instant::now();

        clicks.press(MouseButton::Left, (10.0, 10.0));
        assert_eq!(
            clicks.release(MouseButton::Left, (12.0, 11.0), now, &config),
            ClickOutcome::Click
        );

        clicks.press(MouseButton::Left, (10.0, 10.0));
        assert_eq!(
            clicks.release(MouseButton::Left, (40.0, 10.0), now, &config),
            ClickOutcome::None
        );
    }

    #[test]
    fn test_second_click_in_interval_is_double() {
        let config = InteractionConfig::default();
        let mut clicks = ClickTracker::new();
        let start = Instant::now();

        for (offset, expected) in [
            (0, ClickOutcome::Click),
            (100, ClickOutcome::DoubleClick),
            (200, ClickOutcome::Click),
            (1200, ClickOutcome::Click),
        ] {
            clicks.press(MouseButton::Left, (5.0, 5.0));
            let at = start + Duration::from_millis(offset);
            assert_eq!(clicks.release(MouseButton::Left, (5.0, 5.0), at, &config), expected);
        }
    }

    #[test]
    fn test_right_release_is_context_menu() {
        let config = InteractionConfig::default();
        let mut clicks = ClickTracker::new();
        clicks.press(MouseButton::Right, (5.0, 5.0));
        assert_eq!(
            clicks.release(MouseButton::Right, (5.0, 5.0), Instant::now(), &config),
            ClickOutcome::ContextMenu
        );
        // Release without a press
        assert_eq!(
            clicks.release(MouseButton::Right, (5.0, 5.0), Instant::now(), &config),
            ClickOutcome::None
        );
    }

    fn setup() -> (SceneGraph, NodeId, InteractionManager) {
        let mut scene = SceneGraph::new();
        let cube = scene.insert(Node::object("cube").with_bounds(AABB::unit()), None);
        let camera = shared_camera(OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0));
        let surface: Rc<dyn Surface> = Rc::new(StaticSurface::new(100, 100));
        let manager = InteractionManager::new(camera, Rc::new(SurfaceRenderer::new(surface)), None);
        (scene, cube, manager)
    }

    fn recorder(log: &Rc<RefCell<Vec<String>>>) -> Callback {
        let log = log.clone();
        Callback::new(move |state: &mut PointerState| {
            if let Some(kind) = state.event {
                log.borrow_mut().push(kind.to_string());
            }
        })
    }

    #[test]
    fn test_press_release_synthesizes_click() {
        let (scene, cube, mut manager) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        manager
            .bind(&scene, cube, "mousedown mouseup click", recorder(&log), false)
            .unwrap();

        let mut adapter = WindowEventAdapter::new(1.0);
        assert!(!adapter.mouse_button(&mut manager, &scene, MouseButton::Left, true));

        adapter.cursor_moved(&mut manager, &scene, (50.0, 50.0));
        assert!(adapter.mouse_button(&mut manager, &scene, MouseButton::Left, true));
        assert!(adapter.mouse_button(&mut manager, &scene, MouseButton::Left, false));
        assert_eq!(*log.borrow(), vec!["mousedown", "mouseup", "click"]);
    }

    #[test]
    fn test_touch_phases_reach_handlers() {
        let (scene, cube, mut manager) = setup();
        let log = Rc::new(RefCell::new(Vec::new()));
        manager
            .bind(&scene, cube, "touchstart touchend", recorder(&log), false)
            .unwrap();

        let mut adapter = WindowEventAdapter::new(1.0);
        let touch = TouchPoint::new(7, 50.0, 50.0);
        adapter.touch(&mut manager, &scene, TouchPhase::Started, touch);
        assert_eq!(manager.touch_pool().active_count(), 1);
        adapter.touch(&mut manager, &scene, TouchPhase::Cancelled, touch);

        assert_eq!(*log.borrow(), vec!["touchstart", "touchend"]);
        assert_eq!(manager.touch_pool().active_count(), 0);
    }
}
