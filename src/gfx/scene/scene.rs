use cgmath::Matrix4;

use crate::gfx::picking::AABB;
use crate::interaction::SharedInteraction;

use super::node::{Node, NodeId};

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Node arena with parent/child ownership.
///
/// Nodes are addressed by generational [`NodeId`]s. The graph owns the
/// optional interaction manager installed through
/// [`install_interaction`](SceneGraph::install_interaction) so the per-node
/// `on`/`off` calls can reach it.
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
    pub(crate) interaction: Option<SharedInteraction>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            interaction: None,
        }
    }

    /// Adds a node, optionally as a child of `parent`.
    ///
    /// A stale `parent` handle inserts the node as a root.
    pub fn insert(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let parent = parent.filter(|&p| {
            let alive = self.contains(p);
            if !alive {
                log::debug!("parent {} is not in the scene graph, inserting as root", p);
            }
            alive
        });
        node.parent = parent;
        node.children.clear();

        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };

        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.push(id);
        }

        self.len += 1;
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Walks the parent chain of `id`, nearest ancestor first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.parent(id),
        }
    }

    /// Moves `child` under `parent` (or detaches it with `None`).
    ///
    /// Returns false if either handle is stale or the move would create a cycle.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> bool {
        if !self.contains(child) {
            return false;
        }
        if let Some(parent) = parent {
            if !self.contains(parent)
                || parent == child
                || self.ancestors(parent).any(|ancestor| ancestor == child)
            {
                return false;
            }
        }

        if let Some(old_parent) = self.parent(child).and_then(|p| self.get_mut(p)) {
            old_parent.children.retain(|&c| c != child);
        }
        if let Some(new_parent) = parent.and_then(|p| self.get_mut(p)) {
            new_parent.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
        }
        true
    }

    /// Removes `id` and its whole subtree, returning every removed handle.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        if let Some(parent) = self.parent(id).and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&c| c != id);
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let slot = &mut self.slots[current.index as usize];
            if let Some(node) = slot.node.take() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(current.index);
                self.len -= 1;
                stack.extend(node.children);
                removed.push(current);
            }
        }

        if let Some(shared) = &self.interaction {
            match shared.try_borrow_mut() {
                Ok(mut manager) => {
                    for node in &removed {
                        manager.remove_events(*node);
                    }
                }
                Err(_) => log::warn!(
                    "interaction manager busy, listeners of {} removed nodes kept",
                    removed.len()
                ),
            }
        }
        removed
    }

    /// True when the node and every ancestor are visible.
    pub fn world_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Product of the local transforms from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let node = self.get(id)?;
        let mut transform = node.transform;
        for ancestor in self.ancestors(id) {
            if let Some(parent) = self.get(ancestor) {
                transform = parent.transform * transform;
            }
        }
        Some(transform)
    }

    /// Pick bounds of `id` in world space.
    pub fn world_bounds(&self, id: NodeId) -> Option<AABB> {
        let bounds = self.get(id)?.bounds?;
        Some(bounds.transform(&self.world_transform(id)?))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|node| {
                (
                    NodeId {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    node,
                )
            })
        })
    }

    /// Finds the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's ancestors; see [`SceneGraph::ancestors`].
pub struct Ancestors<'a> {
    scene: &'a SceneGraph,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Vector4};

    #[test]
    fn test_insert_links_parent_and_child() {
        let mut scene = SceneGraph::new();
        let root = scene.insert(Node::scene("root"), None);
        let child = scene.insert(Node::object("child"), Some(root));

        assert_eq!(scene.parent(child), Some(root));
        assert_eq!(scene.children(root), &[child]);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_ancestors_walk_to_root() {
        let mut scene = SceneGraph::new();
        let root = scene.insert(Node::scene("root"), None);
        let group = scene.insert(Node::group("group"), Some(root));
        let leaf = scene.insert(Node::object("leaf"), Some(group));

        let chain: Vec<NodeId> = scene.ancestors(leaf).collect();
        assert_eq!(chain, vec![group, root]);
        assert_eq!(scene.ancestors(root).count(), 0);
    }

    #[test]
    fn test_world_visible_checks_ancestors() {
        let mut scene = SceneGraph::new();
        let root = scene.insert(Node::scene("root"), None);
        let leaf = scene.insert(Node::object("leaf"), Some(root));
        assert!(scene.world_visible(leaf));

        scene.get_mut(root).unwrap().visible = false;
        assert!(!scene.world_visible(leaf));
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut scene = SceneGraph::new();
        let parent = scene.insert(
            Node::group("parent").with_translation(Vector3::new(1.0, 0.0, 0.0)),
            None,
        );
        let child = scene.insert(
            Node::object("child").with_translation(Vector3::new(0.0, 2.0, 0.0)),
            Some(parent),
        );

        let world = scene.world_transform(child).unwrap();
        assert_eq!(world * Vector4::new(0.0, 0.0, 0.0, 1.0), Vector4::new(1.0, 2.0, 0.0, 1.0));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.insert(Node::group("a"), None);
        let b = scene.insert(Node::group("b"), Some(a));

        assert!(!scene.set_parent(a, Some(b)));
        assert!(!scene.set_parent(a, Some(a)));
        assert!(scene.set_parent(b, None));
        assert!(scene.children(a).is_empty());
        assert!(scene.set_parent(a, Some(b)));
        assert_eq!(scene.parent(a), Some(b));
    }

    #[test]
    fn test_remove_invalidates_subtree_handles() {
        let mut scene = SceneGraph::new();
        let root = scene.insert(Node::scene("root"), None);
        let group = scene.insert(Node::group("group"), Some(root));
        let leaf = scene.insert(Node::object("leaf"), Some(group));

        let removed = scene.remove(group);
        assert_eq!(removed.len(), 2);
        assert!(!scene.contains(group));
        assert!(!scene.contains(leaf));
        assert!(scene.children(root).is_empty());

        // Slot reuse must not revive the old handle
        let fresh = scene.insert(Node::object("fresh"), None);
        assert!(scene.contains(fresh));
        assert!(!scene.contains(leaf) && !scene.contains(group));
        assert_eq!(scene.find_by_name("fresh"), Some(fresh));
    }
}
