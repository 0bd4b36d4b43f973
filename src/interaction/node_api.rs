//! Per-node `on`/`off` entry points that forward to the manager installed on
//! the scene graph.

use std::{cell::RefCell, rc::Rc};

use crate::gfx::scene::{NodeId, SceneGraph};

use super::{error::InteractionError, manager::InteractionManager, registry::Callback};

/// Manager handle shared between the scene graph and the input loop.
pub type SharedInteraction = Rc<RefCell<InteractionManager>>;

impl SceneGraph {
    /// Makes `manager` the target of [`on`](Self::on) and [`off`](Self::off).
    ///
    /// Returns the previously installed manager, if any.
    pub fn install_interaction(
        &mut self,
        manager: InteractionManager,
    ) -> (SharedInteraction, Option<SharedInteraction>) {
        let shared = Rc::new(RefCell::new(manager));
        let previous = self.interaction.replace(shared.clone());
        log::debug!("interaction manager installed on scene graph");
        (shared, previous)
    }

    pub fn uninstall_interaction(&mut self) -> Option<SharedInteraction> {
        self.interaction.take()
    }

    pub fn interaction(&self) -> Option<&SharedInteraction> {
        self.interaction.as_ref()
    }

    /// Registers `callback` on `node` for each name in `events`.
    ///
    /// Without an installed manager this only logs a warning.
    pub fn on(
        &self,
        node: NodeId,
        events: &str,
        callback: impl Into<Callback>,
        use_capture: bool,
    ) -> Result<(), InteractionError> {
        let Some(shared) = self.interaction.as_ref() else {
            log::warn!("no interaction manager installed, `{}` on {} ignored", events, node);
            return Ok(());
        };

        let mut manager = shared
            .try_borrow_mut()
            .map_err(|_| InteractionError::ManagerBusy)?;
        manager.bind(self, node, events, callback, use_capture)
    }

    /// Removes listeners from `node`; `callback` and `use_capture` narrow the
    /// match when given.
    pub fn off(
        &self,
        node: NodeId,
        events: &str,
        callback: Option<&Callback>,
        use_capture: Option<bool>,
    ) -> Result<usize, InteractionError> {
        let Some(shared) = self.interaction.as_ref() else {
            log::warn!("no interaction manager installed, `{}` on {} ignored", events, node);
            return Ok(0);
        };

        let mut manager = shared
            .try_borrow_mut()
            .map_err(|_| InteractionError::ManagerBusy)?;
        manager.unbind(node, events, callback, use_capture)
    }

    /// Drops every listener registered on `node`.
    pub fn remove_events(&self, node: NodeId) -> Result<usize, InteractionError> {
        let Some(shared) = self.interaction.as_ref() else {
            log::warn!("no interaction manager installed, remove_events on {} ignored", node);
            return Ok(0);
        };

        let mut manager = shared
            .try_borrow_mut()
            .map_err(|_| InteractionError::ManagerBusy)?;
        Ok(manager.remove_events(node))
    }
}
