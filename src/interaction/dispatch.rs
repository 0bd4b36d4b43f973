use crate::gfx::{picking::Intersection, scene::NodeId, scene::SceneGraph};

use super::{event::EventKind, pointer::PointerState, registry::ListenerRegistry};

/// Delivers `kind` to `node` and bubbles it up the parent chain.
///
/// Nodes without listeners for `kind` are skipped over. At a node with
/// listeners every one of them runs, newest first, each seeing a freshly
/// reset propagation flag. The walk moves on to the parent only if some
/// non-capture listener left the flag set, so an ancestor hears about a given
/// dispatch at most once.
///
/// Returns the number of listeners invoked.
pub fn dispatch(
    registry: &ListenerRegistry,
    scene: &SceneGraph,
    kind: EventKind,
    node: NodeId,
    intersect: Option<&Intersection>,
    state: &mut PointerState,
) -> usize {
    let mut invoked = 0;
    let mut current = Some(node);

    while let Some(target) = current {
        let listeners = registry.bound(target, kind);
        if listeners.is_empty() {
            current = scene.parent(target);
            continue;
        }

        let mut bubble = false;
        for listener in listeners.iter().rev() {
            state.begin(kind, target, intersect.copied());
            listener.callback.call(state);
            invoked += 1;

            if state.is_propagating() && !listener.use_capture {
                bubble = true;
            }
        }

        log::trace!("{} delivered to {} ({} listeners)", kind, target, listeners.len());
        current = if bubble { scene.parent(target) } else { None };
    }

    invoked
}
