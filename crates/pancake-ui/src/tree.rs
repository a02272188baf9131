//! Widget tree: identity, structure and the dirty set.
//!
//! A [`WidgetTree`] is a cheap, cloneable handle. All of its bookkeeping (the
//! id index, the dirty set, the id counter and queued messages) sits behind
//! one mutex, so attach, detach and dirty marking never interleave. The lock
//! is never held while user code (hooks, handlers, `prepare`) runs.

use crate::arguments::Arguments;
use crate::dirty::DirtyFlags;
use crate::error::{ToppingError, ToppingResult};
use crate::registry::ToppingRegistry;
use crate::value::ChangeHook;
use crate::widget::{Attachment, IntoWidget, Widget};
use crate::widget_id::WidgetId;
use crate::widgets::Root;
use indexmap::IndexMap;
use pancake_core::alloc::HashMap;
use pancake_core::profiling::profile_function;
use parking_lot::Mutex;
use std::sync::Arc;

struct TreeState {
    index: IndexMap<WidgetId, Arc<Widget>>,
    dirty: HashMap<WidgetId, DirtyFlags>,
    next_id: u64,
    messages: Vec<String>,
}

pub(crate) struct TreeShared {
    state: Mutex<TreeState>,
    registry: Arc<ToppingRegistry>,
    root: Arc<Widget>,
}

/// Handle to a tree of widgets.
#[derive(Clone)]
pub struct WidgetTree {
    shared: Arc<TreeShared>,
}

impl WidgetTree {
    /// A tree with the built-in kinds registered.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ToppingRegistry::builtin()))
    }

    /// A tree resolving kind names through `registry`.
    pub fn with_registry(registry: Arc<ToppingRegistry>) -> Self {
        let root = Root::widget();
        let shared = Arc::new(TreeShared {
            state: Mutex::new(TreeState {
                index: IndexMap::new(),
                dirty: HashMap::default(),
                next_id: WidgetId::ROOT.as_u64(),
                messages: Vec::new(),
            }),
            registry,
            root: root.clone(),
        });
        let tree = Self { shared };
        tree.register(&root);
        tree
    }

    pub(crate) fn from_shared(shared: Arc<TreeShared>) -> Self {
        Self { shared }
    }

    pub fn root(&self) -> Arc<Widget> {
        self.shared.root.clone()
    }

    pub fn registry(&self) -> Arc<ToppingRegistry> {
        self.shared.registry.clone()
    }

    /// Whether both handles point at the same tree.
    pub fn ptr_eq(&self, other: &WidgetTree) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Append to the root.
    pub fn add(&self, child: impl IntoWidget) -> ToppingResult<Arc<Widget>> {
        self.shared.root.add(child)
    }

    /// Append to the root under a sibling-unique name.
    pub fn add_named(&self, child: impl IntoWidget, name: impl Into<String>) -> ToppingResult<Arc<Widget>> {
        self.shared.root.add_named(child, name)
    }

    /// Build `kind` from the registry and append it to the root.
    pub fn create(&self, kind: &str, arguments: Arguments) -> ToppingResult<Arc<Widget>> {
        let spec = self.shared.registry.spec(kind, arguments)?;
        self.add(spec)
    }

    /// Append `child` under `parent`, which must belong to this tree.
    pub fn attach(&self, parent: &Arc<Widget>, child: impl IntoWidget) -> ToppingResult<Arc<Widget>> {
        if !self.owns(parent) {
            return Err(ToppingError::NotAttached);
        }
        parent.add(child)
    }

    /// Remove `widget` and its descendants from the tree. Does nothing when the
    /// widget is already detached, belongs to another tree, or is the root.
    pub fn detach(&self, widget: &Arc<Widget>) {
        if Arc::ptr_eq(widget, &self.shared.root) {
            tracing::debug!("the root widget cannot be detached");
            return;
        }
        if self.owns(widget) {
            widget.remove();
        }
    }

    fn owns(&self, widget: &Widget) -> bool {
        widget.tree().is_some_and(|tree| tree.ptr_eq(self))
    }

    pub fn resolve(&self, id: WidgetId) -> Option<Arc<Widget>> {
        self.shared.state.lock().index.get(&id).cloned()
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.shared.state.lock().index.contains_key(&id)
    }

    /// Number of attached widgets, root included.
    pub fn len(&self) -> usize {
        self.shared.state.lock().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.root.children().is_empty()
    }

    /// Attached ids in attach order.
    pub fn ids(&self) -> Vec<WidgetId> {
        self.shared.state.lock().index.keys().copied().collect()
    }

    /// Root child with the given name.
    pub fn find(&self, name: &str) -> Option<Arc<Widget>> {
        self.shared.root.child(name)
    }

    /// Add `flags` to `id`'s dirty entry.
    ///
    /// Parents that render their children inline are marked too, since the
    /// child has no node of its own on the client. Unknown ids are ignored.
    pub fn mark_dirty(&self, id: WidgetId, flags: DirtyFlags) {
        profile_function!();
        if flags.is_empty() {
            return;
        }
        let mut state = self.shared.state.lock();
        Self::mark_dirty_locked(&mut state, id, flags);
    }

    fn mark_dirty_locked(state: &mut TreeState, id: WidgetId, flags: DirtyFlags) {
        let Some(widget) = state.index.get(&id).cloned() else {
            tracing::trace!(%id, "dirty mark for detached widget dropped");
            return;
        };
        *state.dirty.entry(id).or_default() |= flags;

        let propagated = match flags.propagation_flags() {
            f if f.is_empty() => DirtyFlags::CHILDREN,
            f => f,
        };
        let mut current = widget;
        while let Some(parent) = current.parent() {
            if !parent.renders_inline() {
                break;
            }
            let Some(parent_id) = parent.id() else {
                break;
            };
            let entry = state.dirty.entry(parent_id).or_default();
            if entry.contains(propagated) {
                break;
            }
            *entry |= propagated;
            current = parent;
        }
    }

    /// Whether any widget awaits re-rendering.
    pub fn is_dirty(&self) -> bool {
        !self.shared.state.lock().dirty.is_empty()
    }

    /// Dirty flags recorded for `id`.
    pub fn dirty_flags(&self, id: WidgetId) -> DirtyFlags {
        self.shared
            .state
            .lock()
            .dirty
            .get(&id)
            .copied()
            .unwrap_or_default()
    }

    /// Dirty ids in ascending order.
    pub fn dirty_ids(&self) -> Vec<WidgetId> {
        let mut ids: Vec<_> = self.shared.state.lock().dirty.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Swap the dirty set out for an empty one in one step.
    pub(crate) fn take_dirty(&self) -> HashMap<WidgetId, DirtyFlags> {
        std::mem::take(&mut self.shared.state.lock().dirty)
    }

    /// Queue a notification for the client.
    pub fn show_message(&self, text: impl Into<String>) {
        let text = text.into();
        tracing::debug!(message = %text, "message queued");
        self.shared.state.lock().messages.push(text);
    }

    /// Drain queued notifications.
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut self.shared.state.lock().messages)
    }

    fn change_hook(&self, id: WidgetId) -> ChangeHook {
        let tree = Arc::downgrade(&self.shared);
        Arc::new(move |_, _| {
            if let Some(shared) = tree.upgrade() {
                WidgetTree::from_shared(shared).mark_dirty(id, DirtyFlags::VALUE);
            }
        })
    }

    /// Give every unattached node under `widget` an id, in pre-order.
    ///
    /// Each node is attached and its children read under the node's own
    /// lock, so a child added concurrently is either seen here or registers
    /// itself through its now attached parent. Nodes that are already
    /// attached were registered by such a concurrent add and are skipped.
    fn register(&self, widget: &Arc<Widget>) -> Vec<WidgetId> {
        let mut state = self.shared.state.lock();
        let mut ids = Vec::new();
        let mut stack = vec![widget.clone()];
        while let Some(node) = stack.pop() {
            let id = WidgetId::from_raw(state.next_id);
            let attachment = Attachment {
                id,
                tree: Arc::downgrade(&self.shared),
            };
            let Some(children) = node.attach_listing_children(attachment) else {
                continue;
            };
            state.next_id += 1;
            stack.extend(children.into_iter().rev());
            node.cell().set_on_change(Some(self.change_hook(id)));
            state.index.insert(id, node);
            ids.push(id);
        }
        ids
    }

    /// Give `child`'s subtree ids and mark `parent` structurally dirty.
    pub(crate) fn register_subtree(&self, child: &Arc<Widget>, parent: &Arc<Widget>) {
        let ids = self.register(child);
        tracing::debug!(kind = child.kind(), first_id = ?ids.first(), count = ids.len(), "subtree attached");
        if let Some(parent_id) = parent.id() {
            self.mark_dirty(parent_id, DirtyFlags::CHILDREN);
        }
    }

    /// Drop `widget`'s subtree from the index and the dirty set.
    pub(crate) fn unregister_subtree(&self, widget: &Arc<Widget>, parent: Option<&Arc<Widget>>) {
        let subtree = widget.subtree();
        let mut removed = 0usize;
        {
            let mut state = self.shared.state.lock();
            for node in &subtree {
                let Some(id) = node.id() else { continue };
                if state.index.shift_remove(&id).is_some() {
                    removed += 1;
                }
                state.dirty.remove(&id);
                node.attach_to(None);
                node.cell().set_on_change(None);
            }
            if let Some(parent_id) = parent.and_then(|p| p.id()) {
                Self::mark_dirty_locked(&mut state, parent_id, DirtyFlags::CHILDREN);
            }
        }
        tracing::debug!(kind = widget.kind(), removed, "subtree detached");
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("WidgetTree")
            .field("widgets", &state.index.len())
            .field("dirty", &state.dirty.len())
            .field("next_id", &state.next_id)
            .finish()
    }
}
