//! Per-node listener storage and the interactive-item index.

use std::{collections::HashMap, fmt, rc::Rc};

use crate::gfx::scene::NodeId;

use super::{
    event::{EventKind, EventSelector},
    pointer::PointerState,
};

/// Listener callback, compared by identity.
///
/// Keep a clone around to remove exactly this callback later with
/// `unbind`/`off`.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&mut PointerState)>);

impl Callback {
    pub fn new(callback: impl Fn(&mut PointerState) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn call(&self, state: &mut PointerState) {
        (self.0)(state)
    }

    pub fn ptr_eq(&self, other: &Callback) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

impl<F> From<F> for Callback
where
    F: Fn(&mut PointerState) + 'static,
{
    fn from(callback: F) -> Self {
        Callback::new(callback)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listener {
    pub callback: Callback,
    pub use_capture: bool,
    pub namespace: Option<String>,
}

/// Listener lists per node plus the reverse `kind -> nodes` index used to pick
/// hit-test candidates without walking the scene.
pub struct ListenerRegistry {
    listeners: HashMap<NodeId, HashMap<EventKind, Vec<Listener>>>,
    items: HashMap<EventKind, Vec<NodeId>>,
    scene_root: Option<NodeId>,
    hover_sampler: Callback,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            items: HashMap::new(),
            scene_root: None,
            hover_sampler: Callback::noop(),
        }
    }

    /// Registers `callback` on `node` for the selector's kind.
    ///
    /// Hover kinds also get the implicit no-op `mousemove` registration when
    /// the node has no move listener yet. `is_scene` nodes become the scene
    /// root if none is set.
    pub fn bind(
        &mut self,
        node: NodeId,
        is_scene: bool,
        selector: &EventSelector,
        callback: Callback,
        use_capture: bool,
    ) {
        self.push(
            node,
            selector.kind,
            Listener {
                callback,
                use_capture,
                namespace: selector.namespace.clone(),
            },
        );

        if is_scene && self.scene_root.is_none() {
            log::debug!("scene root {} became interactive", node);
            self.scene_root = Some(node);
        }

        if selector.kind.is_hover() && !self.has_listeners(node, EventKind::MouseMove) {
            let sampler = self.hover_sampler.clone();
            self.push(
                node,
                EventKind::MouseMove,
                Listener {
                    callback: sampler,
                    use_capture: false,
                    namespace: None,
                },
            );
        }
    }

    /// Removes matching listeners and returns how many went away.
    ///
    /// - no `callback`: everything in the selector's namespace (or everything
    ///   when it has none)
    /// - `callback` without `use_capture`: callback and namespace must match
    /// - both: callback, capture flag and namespace must match
    pub fn unbind(
        &mut self,
        node: NodeId,
        selector: &EventSelector,
        callback: Option<&Callback>,
        use_capture: Option<bool>,
    ) -> usize {
        let namespace = selector.namespace.as_deref();
        let removed = self.remove_where(node, selector.kind, |listener| match callback {
            None => namespace.is_none() || listener.namespace.as_deref() == namespace,
            Some(callback) => {
                listener.callback.ptr_eq(callback)
                    && listener.namespace.as_deref() == namespace
                    && use_capture.map_or(true, |capture| listener.use_capture == capture)
            }
        });

        if selector.kind.is_hover()
            && !self.has_listeners(node, EventKind::MouseOver)
            && !self.has_listeners(node, EventKind::MouseOut)
        {
            let sampler = self.hover_sampler.clone();
            self.remove_where(node, EventKind::MouseMove, |listener| {
                listener.callback.ptr_eq(&sampler) && listener.namespace.is_none()
            });
        }

        if self.scene_root == Some(node) && !self.listeners.contains_key(&node) {
            log::debug!("scene root {} has no listeners left", node);
            self.scene_root = None;
        }

        removed
    }

    /// Drops every listener of `node`.
    pub fn remove_node(&mut self, node: NodeId) -> usize {
        let Some(kinds) = self.listeners.remove(&node) else {
            return 0;
        };

        for kind in kinds.keys() {
            self.unindex(node, *kind);
        }
        if self.scene_root == Some(node) {
            self.scene_root = None;
        }
        kinds.values().map(Vec::len).sum()
    }

    /// Listeners of `node` for `kind`, in registration order.
    pub fn bound(&self, node: NodeId, kind: EventKind) -> &[Listener] {
        self.listeners
            .get(&node)
            .and_then(|kinds| kinds.get(&kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_listeners(&self, node: NodeId, kind: EventKind) -> bool {
        !self.bound(node, kind).is_empty()
    }

    /// Nodes with at least one listener for `kind`, in first-bind order.
    pub fn items(&self, kind: EventKind) -> &[NodeId] {
        self.items.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes registered for any of `kinds`, without duplicates.
    pub fn items_any(&self, kinds: &[EventKind]) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = Vec::new();
        for kind in kinds {
            for node in self.items(*kind) {
                if !nodes.contains(node) {
                    nodes.push(*node);
                }
            }
        }
        nodes
    }

    pub fn scene_root(&self) -> Option<NodeId> {
        self.scene_root
    }

    pub fn is_hover_sampler(&self, callback: &Callback) -> bool {
        self.hover_sampler.ptr_eq(callback)
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
        self.items.clear();
        self.scene_root = None;
    }

    fn push(&mut self, node: NodeId, kind: EventKind, listener: Listener) {
        self.listeners
            .entry(node)
            .or_default()
            .entry(kind)
            .or_default()
            .push(listener);

        let items = self.items.entry(kind).or_default();
        if !items.contains(&node) {
            items.push(node);
        }
    }

    fn remove_where(
        &mut self,
        node: NodeId,
        kind: EventKind,
        matches: impl Fn(&Listener) -> bool,
    ) -> usize {
        let Some(kinds) = self.listeners.get_mut(&node) else {
            return 0;
        };
        let Some(listeners) = kinds.get_mut(&kind) else {
            return 0;
        };

        let before = listeners.len();
        listeners.retain(|listener| !matches(listener));
        let removed = before - listeners.len();

        if listeners.is_empty() {
            kinds.remove(&kind);
            if kinds.is_empty() {
                self.listeners.remove(&node);
            }
            self.unindex(node, kind);
        }
        removed
    }

    fn unindex(&mut self, node: NodeId, kind: EventKind) {
        if let Some(items) = self.items.get_mut(&kind) {
            items.retain(|&n| n != node);
            if items.is_empty() {
                self.items.remove(&kind);
            }
        }
    }
}

impl Default for ListenerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{Node, SceneGraph};

    fn nodes(count: usize) -> Vec<NodeId> {
        let mut scene = SceneGraph::new();
        (0..count)
            .map(|i| scene.insert(Node::object(format!("n{i}")), None))
            .collect()
    }

    fn sel(name: &str) -> EventSelector {
        name.parse().unwrap()
    }

    #[test]
    fn test_bind_indexes_node_once() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        registry.bind(n, false, &sel("click"), Callback::noop(), false);
        registry.bind(n, false, &sel("click"), Callback::noop(), true);

        assert_eq!(registry.items(EventKind::Click), &[n]);
        assert_eq!(registry.bound(n, EventKind::Click).len(), 2);
    }

    #[test]
    fn test_last_unbind_removes_from_index() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        let cb = Callback::noop();
        registry.bind(n, false, &sel("click"), cb.clone(), false);

        assert_eq!(registry.unbind(n, &sel("click"), Some(&cb), None), 1);
        assert!(registry.items(EventKind::Click).is_empty());
        assert!(!registry.has_listeners(n, EventKind::Click));
    }

    #[test]
    fn test_unbind_matching_rules() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        let cb = Callback::noop();
        registry.bind(n, false, &sel("click.ui"), cb.clone(), false);
        registry.bind(n, false, &sel("click.ui"), cb.clone(), true);
        registry.bind(n, false, &sel("click"), cb.clone(), false);
        registry.bind(n, false, &sel("click.game"), Callback::noop(), false);

        // Fully qualified: only the capture listener in `ui`
        assert_eq!(registry.unbind(n, &sel("click.ui"), Some(&cb), Some(true)), 1);
        // Callback without namespace only matches namespace-less entries
        assert_eq!(registry.unbind(n, &sel("click"), Some(&cb), None), 1);
        // Namespace sweep
        assert_eq!(registry.unbind(n, &sel("click.game"), None, None), 1);
        assert_eq!(registry.bound(n, EventKind::Click).len(), 1);
        // Plain sweep removes the rest
        assert_eq!(registry.unbind(n, &sel("click"), None, None), 1);
        assert!(registry.items(EventKind::Click).is_empty());
    }

    #[test]
    fn test_hover_adds_single_implicit_move_listener() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        registry.bind(n, false, &sel("mouseover"), Callback::noop(), false);
        registry.bind(n, false, &sel("mouseout"), Callback::noop(), false);

        let moves = registry.bound(n, EventKind::MouseMove);
        assert_eq!(moves.len(), 1);
        assert!(registry.is_hover_sampler(&moves[0].callback));
        assert_eq!(registry.items(EventKind::MouseMove), &[n]);
    }

    #[test]
    fn test_hover_sampler_removed_with_last_hover_listener() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        registry.bind(n, false, &sel("mouseover"), Callback::noop(), false);
        registry.bind(n, false, &sel("mouseout"), Callback::noop(), false);

        registry.unbind(n, &sel("mouseover"), None, None);
        assert_eq!(registry.bound(n, EventKind::MouseMove).len(), 1);

        registry.unbind(n, &sel("mouseout"), None, None);
        assert!(registry.bound(n, EventKind::MouseMove).is_empty());
        assert!(registry.items(EventKind::MouseMove).is_empty());
    }

    #[test]
    fn test_existing_move_listener_suppresses_sampler() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        let mover = Callback::noop();
        registry.bind(n, false, &sel("mousemove"), mover.clone(), false);
        registry.bind(n, false, &sel("mouseover"), Callback::noop(), false);
        registry.unbind(n, &sel("mouseover"), None, None);

        let moves = registry.bound(n, EventKind::MouseMove);
        assert_eq!(moves.len(), 1);
        assert!(moves[0].callback.ptr_eq(&mover));
    }

    #[test]
    fn test_scene_root_tracks_listeners() {
        let n = nodes(1)[0];
        let mut registry = ListenerRegistry::new();
        registry.bind(n, true, &sel("click"), Callback::noop(), false);
        registry.bind(n, true, &sel("mousedown"), Callback::noop(), false);
        assert_eq!(registry.scene_root(), Some(n));

        registry.unbind(n, &sel("click"), None, None);
        assert_eq!(registry.scene_root(), Some(n));
        registry.unbind(n, &sel("mousedown"), None, None);
        assert_eq!(registry.scene_root(), None);
    }

    #[test]
    fn test_remove_node_clears_every_kind() {
        let ids = nodes(2);
        let mut registry = ListenerRegistry::new();
        registry.bind(ids[0], false, &sel("click"), Callback::noop(), false);
        registry.bind(ids[0], false, &sel("mouseover"), Callback::noop(), false);
        registry.bind(ids[1], false, &sel("click"), Callback::noop(), false);

        assert_eq!(registry.remove_node(ids[0]), 3);
        assert_eq!(registry.items(EventKind::Click), &[ids[1]]);
        assert!(registry.items(EventKind::MouseMove).is_empty());
    }
}
