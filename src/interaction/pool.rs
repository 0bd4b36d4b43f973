use std::collections::HashMap;

use super::pointer::{PointerState, TouchId};

/// Index of a pooled [`PointerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

/// Free-list of pointer states for active touches.
///
/// Slots are never shrunk; ending a touch resets its state and makes the slot
/// the next one handed out.
#[derive(Debug, Default)]
pub struct TouchPool {
    slots: Vec<PointerState>,
    free: Vec<SlotId>,
    active: HashMap<TouchId, SlotId>,
}

impl TouchPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot tracking `touch`, taking one from the free list (or
    /// growing the pool) when the touch is new.
    pub fn acquire(&mut self, touch: TouchId) -> SlotId {
        if let Some(&slot) = self.active.get(&touch) {
            log::trace!("touch {} restarted, reusing its slot", touch);
            self.slots[slot.0].reset();
            return slot;
        }

        let slot = self.free.pop().unwrap_or_else(|| {
            self.slots.push(PointerState::new());
            SlotId(self.slots.len() - 1)
        });
        self.active.insert(touch, slot);
        slot
    }

    /// Ends `touch`, returning its slot to the free list.
    pub fn release(&mut self, touch: TouchId) -> Option<SlotId> {
        let slot = self.active.remove(&touch)?;
        self.slots[slot.0].reset();
        self.free.push(slot);
        Some(slot)
    }

    pub fn slot(&self, touch: TouchId) -> Option<SlotId> {
        self.active.get(&touch).copied()
    }

    pub fn state(&self, slot: SlotId) -> Option<&PointerState> {
        self.slots.get(slot.0)
    }

    pub fn state_mut(&mut self, slot: SlotId) -> Option<&mut PointerState> {
        self.slots.get_mut(slot.0)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.active.clear();
    }
}
