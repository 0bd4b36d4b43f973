use std::collections::HashMap;

use crate::gfx::scene::NodeId;

use super::{pointer::TouchId, pool::SlotId};

/// Which button/channel went down on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownFlag {
    Mouse,
    Right,
    Touch,
}

/// Interaction bookkeeping for one node, kept outside the scene graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInteraction {
    pub mouse_down: bool,
    pub right_down: bool,
    pub touch_down: bool,
    touches: HashMap<TouchId, SlotId>,
}

impl NodeInteraction {
    fn flag_mut(&mut self, flag: DownFlag) -> &mut bool {
        match flag {
            DownFlag::Mouse => &mut self.mouse_down,
            DownFlag::Right => &mut self.right_down,
            DownFlag::Touch => &mut self.touch_down,
        }
    }

    pub fn is_down(&self, flag: DownFlag) -> bool {
        match flag {
            DownFlag::Mouse => self.mouse_down,
            DownFlag::Right => self.right_down,
            DownFlag::Touch => self.touch_down,
        }
    }

    pub fn touch_slot(&self, touch: TouchId) -> Option<SlotId> {
        self.touches.get(&touch).copied()
    }

    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    fn is_idle(&self) -> bool {
        !self.mouse_down && !self.right_down && !self.touch_down && self.touches.is_empty()
    }
}

/// Side table of per-node down flags and touch associations.
#[derive(Debug, Default)]
pub struct InteractionStates {
    nodes: HashMap<NodeId, NodeInteraction>,
}

impl InteractionStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeInteraction> {
        self.nodes.get(&node)
    }

    pub fn is_down(&self, node: NodeId, flag: DownFlag) -> bool {
        self.get(node).is_some_and(|state| state.is_down(flag))
    }

    pub fn set_down(&mut self, node: NodeId, flag: DownFlag, down: bool) {
        if down {
            *self.nodes.entry(node).or_default().flag_mut(flag) = true;
        } else if let Some(state) = self.nodes.get_mut(&node) {
            *state.flag_mut(flag) = false;
            self.prune(node);
        }
    }

    pub fn associate(&mut self, node: NodeId, touch: TouchId, slot: SlotId) {
        self.nodes.entry(node).or_default().touches.insert(touch, slot);
    }

    pub fn association(&self, node: NodeId, touch: TouchId) -> Option<SlotId> {
        self.get(node).and_then(|state| state.touch_slot(touch))
    }

    /// Drops the association of `touch` with `node`.
    ///
    /// The touch-down flag follows the remaining associations, so a second
    /// finger still resting on the node keeps it down.
    pub fn dissociate(&mut self, node: NodeId, touch: TouchId) {
        if let Some(state) = self.nodes.get_mut(&node) {
            state.touches.remove(&touch);
            state.touch_down = !state.touches.is_empty();
            self.prune(node);
        }
    }

    /// Drops `touch` from every node it was associated with.
    pub fn end_touch(&mut self, touch: TouchId) {
        for state in self.nodes.values_mut() {
            if state.touches.remove(&touch).is_some() {
                state.touch_down = !state.touches.is_empty();
            }
        }
        self.nodes.retain(|_, state| !state.is_idle());
    }

    /// Clears `flag` on every node.
    pub fn release_all(&mut self, flag: DownFlag) {
        for state in self.nodes.values_mut() {
            *state.flag_mut(flag) = false;
        }
        self.nodes.retain(|_, state| !state.is_idle());
    }

    pub fn forget(&mut self, node: NodeId) {
        self.nodes.remove(&node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    fn prune(&mut self, node: NodeId) {
        if self.nodes.get(&node).is_some_and(NodeInteraction::is_idle) {
            self.nodes.remove(&node);
        }
    }
}
