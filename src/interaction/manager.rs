use std::rc::Rc;

use crate::gfx::{
    camera::CameraHandle,
    picking::Intersection,
    scene::{NodeId, SceneGraph},
};

use super::{
    config::InteractionConfig,
    dispatch::dispatch,
    error::InteractionError,
    event::{EventKind, EventSelector},
    hit_test::HitTester,
    pointer::{NativeEvent, PointerState, TouchPoint},
    pool::{SlotId, TouchPool},
    registry::{Callback, Listener, ListenerRegistry},
    state::{DownFlag, InteractionStates, NodeInteraction},
    surface::{Renderer, Surface},
};

/// Which pointer-state record a dispatch writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Mouse,
    Touch(SlotId),
}

/// Routes pointer and touch input on one surface to listeners on scene nodes.
///
/// Every piece of mutable interaction state (listeners, hover target, down
/// flags, active touches) belongs to the instance, so managers for different
/// surfaces never see each other's events.
pub struct InteractionManager {
    config: InteractionConfig,
    enabled: bool,
    camera: Option<CameraHandle>,
    renderer: Option<Rc<dyn Renderer>>,
    surface: Option<Rc<dyn Surface>>,
    registry: ListenerRegistry,
    hit_tester: HitTester,
    mouse: PointerState,
    touches: TouchPool,
    states: InteractionStates,
    hovered: Option<NodeId>,
}

impl InteractionManager {
    /// Creates an enabled manager.
    ///
    /// Without an explicit `surface` the manager listens on the renderer's.
    pub fn new(
        camera: CameraHandle,
        renderer: Rc<dyn Renderer>,
        surface: Option<Rc<dyn Surface>>,
    ) -> Self {
        Self::with_config(camera, renderer, surface, InteractionConfig::default())
    }

    pub fn with_config(
        camera: CameraHandle,
        renderer: Rc<dyn Renderer>,
        surface: Option<Rc<dyn Surface>>,
        config: InteractionConfig,
    ) -> Self {
        let surface = surface.or_else(|| renderer.surface());

        let mut manager = Self {
            config,
            enabled: true,
            camera: None,
            renderer: None,
            surface: None,
            registry: ListenerRegistry::new(),
            hit_tester: HitTester::with_ttl(config.rect_cache_ttl),
            mouse: PointerState::new(),
            touches: TouchPool::new(),
            states: InteractionStates::new(),
            hovered: None,
        };
        manager.set_camera(Some(camera));
        manager.set_renderer(Some(renderer), false);
        manager.set_target_surface(surface);
        manager
    }

    // === Lifecycle ===

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Turns every input handler into a no-op; listeners stay registered.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: InteractionConfig) {
        self.hit_tester.set_ttl(config.rect_cache_ttl);
        self.config = config;
    }

    pub fn set_auto_prevent_default(&mut self, enabled: bool) {
        self.config.auto_prevent_default = enabled;
    }

    pub fn set_camera(&mut self, camera: Option<CameraHandle>) {
        self.camera = camera;
    }

    pub fn camera(&self) -> Option<&CameraHandle> {
        self.camera.as_ref()
    }

    /// Replaces the renderer; with `set_surface` the manager also moves over
    /// to the renderer's surface.
    pub fn set_renderer(&mut self, renderer: Option<Rc<dyn Renderer>>, set_surface: bool) {
        self.renderer = renderer;

        if set_surface {
            let surface = self.renderer.as_ref().and_then(|renderer| renderer.surface());
            self.set_target_surface(surface);
        }
    }

    pub fn renderer(&self) -> Option<&Rc<dyn Renderer>> {
        self.renderer.as_ref()
    }

    /// Detaches from the current surface and starts listening on `surface`.
    pub fn set_target_surface(&mut self, surface: Option<Rc<dyn Surface>>) {
        if self.surface.take().is_some() {
            log::debug!("detached from previous target surface");
        }

        self.hit_tester.invalidate();
        self.surface = surface;

        if let Some(surface) = &self.surface {
            log::debug!(
                "attached to target surface ({:?} backing pixels)",
                surface.backing_size()
            );
        }
    }

    pub fn target_surface(&self) -> Option<&Rc<dyn Surface>> {
        self.surface.as_ref()
    }

    /// Drops the cached surface rectangle, e.g. after a resize.
    pub fn refresh_surface_rect(&mut self) {
        self.hit_tester.invalidate();
    }

    /// Drops every binding, pointer state and host reference.
    pub fn destroy(&mut self) {
        self.set_camera(None);
        self.registry.clear();
        self.set_renderer(None, false);
        self.set_target_surface(None);

        self.mouse = PointerState::new();
        self.touches.clear();
        self.states.clear();
        self.hovered = None;
        log::debug!("interaction manager destroyed");
    }

    // === Listener registry ===

    /// Binds `callback` to every event in `events` (`"click mouseover.menu"`).
    pub fn bind(
        &mut self,
        scene: &SceneGraph,
        node: NodeId,
        events: &str,
        callback: impl Into<Callback>,
        use_capture: bool,
    ) -> Result<(), InteractionError> {
        let selectors = EventSelector::parse_list(events)?;
        let target = scene.get(node).ok_or(InteractionError::NodeNotFound(node))?;
        let callback = callback.into();

        for selector in &selectors {
            self.registry
                .bind(node, target.is_scene(), selector, callback.clone(), use_capture);
        }
        log::debug!("bound `{}` on {} ({})", events, node, target.name);
        Ok(())
    }

    /// Removes listeners matching `events`; see [`ListenerRegistry::unbind`]
    /// for the matching rules. Returns the number removed.
    pub fn unbind(
        &mut self,
        node: NodeId,
        events: &str,
        callback: Option<&Callback>,
        use_capture: Option<bool>,
    ) -> Result<usize, InteractionError> {
        let selectors = EventSelector::parse_list(events)?;

        let removed = selectors
            .iter()
            .map(|selector| self.registry.unbind(node, selector, callback, use_capture))
            .sum();
        log::debug!("unbound `{}` on {} ({} listeners)", events, node, removed);
        Ok(removed)
    }

    /// Removes every listener and all interaction state of `node`.
    pub fn remove_events(&mut self, node: NodeId) -> usize {
        self.states.forget(node);
        if self.hovered == Some(node) {
            self.hovered = None;
        }
        self.registry.remove_node(node)
    }

    pub fn listeners(&self, node: NodeId, kind: EventKind) -> &[Listener] {
        self.registry.bound(node, kind)
    }

    pub fn interactive_items(&self, kind: EventKind) -> &[NodeId] {
        self.registry.items(kind)
    }

    pub fn scene_root(&self) -> Option<NodeId> {
        self.registry.scene_root()
    }

    // === Pointer state ===

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn mouse(&self) -> &PointerState {
        &self.mouse
    }

    pub fn touch_pool(&self) -> &TouchPool {
        &self.touches
    }

    pub fn is_down(&self, node: NodeId, flag: DownFlag) -> bool {
        self.states.is_down(node, flag)
    }

    pub fn node_state(&self, node: NodeId) -> Option<&NodeInteraction> {
        self.states.get(node)
    }

    /// Dispatches `kind` to `node` using the mouse pointer state.
    pub fn dispatch(
        &mut self,
        scene: &SceneGraph,
        kind: EventKind,
        node: NodeId,
        intersect: Option<&Intersection>,
    ) -> usize {
        dispatch(&self.registry, scene, kind, node, intersect, &mut self.mouse)
    }

    // === Mouse handlers ===

    pub fn on_mouse_move(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) || self.registry.items(EventKind::MouseMove).is_empty() {
            return;
        }

        let Some(hits) = self.pick(scene, &[EventKind::MouseMove], event, None, Channel::Mouse) else {
            return;
        };

        let Some(nearest) = hits.first().copied() else {
            if let Some(previous) = self.hovered.take() {
                self.emit(scene, EventKind::MouseOut, previous, None, Channel::Mouse, event);
            }
            return;
        };

        // Farthest to nearest, so the nearest hit is handled last
        for hit in hits.iter().rev() {
            self.emit(scene, EventKind::MouseMove, hit.object, Some(hit), Channel::Mouse, event);
        }

        if self.hovered != Some(nearest.object) {
            if let Some(previous) = self.hovered {
                self.emit(scene, EventKind::MouseOut, previous, None, Channel::Mouse, event);
            }
            self.emit(
                scene,
                EventKind::MouseOver,
                nearest.object,
                Some(&nearest),
                Channel::Mouse,
                event,
            );
            self.hovered = Some(nearest.object);
        }
    }

    /// The pointer left the surface: whatever was hovered gets `mouseout`.
    pub fn on_mouse_leave(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            self.emit(scene, EventKind::MouseOut, previous, None, Channel::Mouse, event);
        }
    }

    pub fn on_mouse_down(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) {
            return;
        }

        let (kind, outside, flag) = if event.button.is_right() {
            (EventKind::RightDown, EventKind::RightUpOutside, DownFlag::Right)
        } else {
            (EventKind::MouseDown, EventKind::MouseUpOutside, DownFlag::Mouse)
        };
        if self.registry.items(kind).is_empty() && self.registry.items(outside).is_empty() {
            return;
        }

        let Some(hits) = self.pick(scene, &[kind, outside], event, None, Channel::Mouse) else {
            return;
        };
        for hit in hits.iter().rev() {
            self.states.set_down(hit.object, flag, true);
            if self.registry.items(kind).contains(&hit.object) {
                self.emit(scene, kind, hit.object, Some(hit), Channel::Mouse, event);
            }
        }
    }

    pub fn on_mouse_up(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) {
            return;
        }

        let (kind, outside, flag) = if event.button.is_right() {
            (EventKind::RightUp, EventKind::RightUpOutside, DownFlag::Right)
        } else {
            (EventKind::MouseUp, EventKind::MouseUpOutside, DownFlag::Mouse)
        };

        // Nodes watching only for up-outside are hit tested too, so releasing
        // over them clears their flag without an up dispatch
        let watched = !self.registry.items(kind).is_empty()
            || !self.registry.items(outside).is_empty();
        if watched {
            if let Some(hits) = self.pick(scene, &[kind, outside], event, None, Channel::Mouse) {
                for hit in hits.iter().rev() {
                    self.states.set_down(hit.object, flag, false);
                    if self.registry.items(kind).contains(&hit.object) {
                        self.emit(scene, kind, hit.object, Some(hit), Channel::Mouse, event);
                    }
                }
            }
        }

        // Still down: pressed on the node but released somewhere else
        let candidates: Vec<NodeId> = self.registry.items(outside).iter().rev().copied().collect();
        for node in candidates {
            if self.states.is_down(node, flag) {
                self.emit(scene, outside, node, None, Channel::Mouse, event);
                self.states.set_down(node, flag, false);
            }
        }

        // The button is up everywhere now
        self.states.release_all(flag);
    }

    pub fn on_click(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        self.dispatch_hits(scene, EventKind::Click, event);
    }

    pub fn on_dbl_click(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        self.dispatch_hits(scene, EventKind::DblClick, event);
    }

    pub fn on_context_menu(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        self.dispatch_hits(scene, EventKind::ContextMenu, event);
    }

    pub fn on_right_click(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        self.dispatch_hits(scene, EventKind::RightClick, event);
    }

    // === Touch handlers ===

    pub fn on_touch_start(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) || self.registry.items(EventKind::TouchStart).is_empty() {
            return;
        }

        for touch in event.changed_touches.clone() {
            let slot = self.touches.acquire(touch.identifier);
            let channel = Channel::Touch(slot);
            let Some(hits) = self.pick(scene, &[EventKind::TouchStart], event, Some(touch), channel)
            else {
                continue;
            };

            for hit in hits.iter().rev() {
                self.states.associate(hit.object, touch.identifier, slot);
                self.states.set_down(hit.object, DownFlag::Touch, true);
                self.emit(scene, EventKind::TouchStart, hit.object, Some(hit), channel, event);
            }
        }
    }

    pub fn on_touch_move(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) || self.registry.items(EventKind::TouchMove).is_empty() {
            return;
        }

        for touch in event.changed_touches.clone() {
            let Some(slot) = self.touches.slot(touch.identifier) else {
                log::trace!("touch {} moved without a start, ignoring", touch.identifier);
                continue;
            };
            let Some(hits) =
                self.pick(scene, &[EventKind::TouchMove], event, Some(touch), Channel::Touch(slot))
            else {
                continue;
            };

            for hit in hits.iter().rev() {
                if let Some(owner) = self.states.association(hit.object, touch.identifier) {
                    self.emit(
                        scene,
                        EventKind::TouchMove,
                        hit.object,
                        Some(hit),
                        Channel::Touch(owner),
                        event,
                    );
                }
            }
        }
    }

    pub fn on_touch_end(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        if !self.accept(event) {
            return;
        }

        let listening = !self.registry.items(EventKind::TouchEnd).is_empty();
        for touch in event.changed_touches.clone() {
            let id = touch.identifier;

            if let (true, Some(slot)) = (listening, self.touches.slot(id)) {
                let hits = self
                    .pick(scene, &[EventKind::TouchEnd], event, Some(touch), Channel::Touch(slot))
                    .unwrap_or_default();

                for hit in hits.iter().rev() {
                    if let Some(owner) = self.states.association(hit.object, id) {
                        self.emit(
                            scene,
                            EventKind::TouchEnd,
                            hit.object,
                            Some(hit),
                            Channel::Touch(owner),
                            event,
                        );
                        self.states.dissociate(hit.object, id);
                    }
                }

                // Touched down on these but lifted elsewhere
                let candidates: Vec<NodeId> =
                    self.registry.items(EventKind::TouchEnd).iter().rev().copied().collect();
                for node in candidates {
                    if !self.states.is_down(node, DownFlag::Touch) {
                        continue;
                    }
                    if let Some(owner) = self.states.association(node, id) {
                        self.emit(
                            scene,
                            EventKind::TouchEndOutside,
                            node,
                            None,
                            Channel::Touch(owner),
                            event,
                        );
                        self.states.dissociate(node, id);
                    }
                }
            }

            self.states.end_touch(id);
            self.touches.release(id);
        }
    }

    /// Cancelled touches end like lifted ones.
    pub fn on_touch_cancel(&mut self, scene: &SceneGraph, event: &mut NativeEvent) {
        self.on_touch_end(scene, event);
    }

    // === Internals ===

    fn accept(&self, event: &mut NativeEvent) -> bool {
        if !self.enabled {
            return false;
        }
        if self.config.auto_prevent_default {
            event.prevent_default();
        }
        true
    }

    /// Hit test for handlers that keep no state between events.
    fn dispatch_hits(&mut self, scene: &SceneGraph, kind: EventKind, event: &mut NativeEvent) {
        if !self.accept(event) || self.registry.items(kind).is_empty() {
            return;
        }

        let Some(hits) = self.pick(scene, &[kind], event, None, Channel::Mouse) else {
            return;
        };
        for hit in hits.iter().rev() {
            self.emit(scene, kind, hit.object, Some(hit), Channel::Mouse, event);
        }
    }

    /// Hit tests the nodes registered for any of `kinds` and records the
    /// pointer position on the channel's state.
    ///
    /// `None` means the manager cannot hit test right now (no surface or no
    /// camera), which handlers treat as "ignore this input".
    fn pick(
        &mut self,
        scene: &SceneGraph,
        kinds: &[EventKind],
        event: &NativeEvent,
        touch: Option<TouchPoint>,
        channel: Channel,
    ) -> Option<Vec<Intersection>> {
        let Some(surface) = self.surface.clone() else {
            log::trace!("no target surface, ignoring {:?}", kinds);
            return None;
        };
        let Some(camera) = self.camera.clone() else {
            log::trace!("no camera, ignoring {:?}", kinds);
            return None;
        };
        let Ok(camera_ref) = camera.try_borrow() else {
            log::debug!("camera is mutably borrowed, ignoring {:?}", kinds);
            return None;
        };

        let merged;
        let candidates = match kinds {
            [kind] => self.registry.items(*kind),
            _ => {
                merged = self.registry.items_any(kinds);
                merged.as_slice()
            }
        };

        let client = touch.map_or((event.client_x, event.client_y), |t| (t.client_x, t.client_y));
        let result = self.hit_tester.intersect(
            scene,
            surface.as_ref(),
            &*camera_ref,
            client,
            candidates,
            self.registry.scene_root(),
        );

        let state = match channel {
            Channel::Mouse => &mut self.mouse,
            Channel::Touch(slot) => self.touches.state_mut(slot)?,
        };
        state.x = result.x;
        state.y = result.y;
        state.original_event = Some(event.clone());
        state.touch = touch;

        Some(result.intersections)
    }

    fn emit(
        &mut self,
        scene: &SceneGraph,
        kind: EventKind,
        node: NodeId,
        intersect: Option<&Intersection>,
        channel: Channel,
        event: &mut NativeEvent,
    ) -> usize {
        let state = match channel {
            Channel::Mouse => &mut self.mouse,
            Channel::Touch(slot) => match self.touches.state_mut(slot) {
                Some(state) => state,
                None => return 0,
            },
        };

        let invoked = dispatch(&self.registry, scene, kind, node, intersect, state);
        if state.take_default_prevented() {
            event.prevent_default();
        }
        invoked
    }
}
