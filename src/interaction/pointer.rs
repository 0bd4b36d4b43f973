//! Native input records and the per-pointer state handed to listeners.

use crate::gfx::{picking::Intersection, scene::NodeId};

use super::event::EventKind;

/// Identifier the host assigns to a touch for its whole lifetime.
pub type TouchId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
    Other(u16),
}

impl MouseButton {
    /// Only the secondary button maps onto the `right*` events.
    pub fn is_right(&self) -> bool {
        matches!(self, MouseButton::Right)
    }
}

impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Left => MouseButton::Left,
            winit::event::MouseButton::Middle => MouseButton::Middle,
            winit::event::MouseButton::Right => MouseButton::Right,
            winit::event::MouseButton::Back => MouseButton::Other(3),
            winit::event::MouseButton::Forward => MouseButton::Other(4),
            winit::event::MouseButton::Other(code) => MouseButton::Other(code),
        }
    }
}

/// One finger of a touch event, in surface client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub identifier: TouchId,
    pub client_x: f32,
    pub client_y: f32,
}

impl TouchPoint {
    pub fn new(identifier: TouchId, client_x: f32, client_y: f32) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
        }
    }
}

/// Host input event as delivered to the manager's handlers.
///
/// Client coordinates are relative to the page/window in logical units; the
/// hit tester maps them onto the surface's backing pixels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NativeEvent {
    pub client_x: f32,
    pub client_y: f32,
    pub button: MouseButton,
    pub changed_touches: Vec<TouchPoint>,
    default_prevented: bool,
}

impl NativeEvent {
    pub fn mouse(client_x: f32, client_y: f32) -> Self {
        Self {
            client_x,
            client_y,
            ..Default::default()
        }
    }

    pub fn touches(changed_touches: Vec<TouchPoint>) -> Self {
        Self {
            changed_touches,
            ..Default::default()
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    /// Asks the host to skip its own handling of this input.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Mutable record shared by every listener of one dispatch.
///
/// The mouse owns one instance; each active touch borrows one from the
/// manager's pool.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Pointer position in surface backing pixels
    pub x: f32,
    pub y: f32,
    /// Node whose listeners are currently running
    pub target: Option<NodeId>,
    pub original_event: Option<NativeEvent>,
    pub touch: Option<TouchPoint>,
    pub event: Option<EventKind>,
    /// Hit that triggered the dispatch; `None` for leave and outside events
    pub intersect: Option<Intersection>,
    propagate: bool,
    default_prevented: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps the event from bubbling past the current node.
    pub fn stop_propagation(&mut self) {
        self.propagate = false;
    }

    pub fn is_propagating(&self) -> bool {
        self.propagate
    }

    /// Marks the originating native event as handled.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
        if let Some(event) = self.original_event.as_mut() {
            event.prevent_default();
        }
    }

    pub(crate) fn take_default_prevented(&mut self) -> bool {
        std::mem::take(&mut self.default_prevented)
    }

    pub(crate) fn begin(
        &mut self,
        event: EventKind,
        target: NodeId,
        intersect: Option<Intersection>,
    ) {
        self.event = Some(event);
        self.target = Some(target);
        self.intersect = intersect;
        self.propagate = true;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
