//! Widget nodes and the [`Topping`] trait.
//!
//! A [`Widget`] is the shared, addressable node of the tree: it owns its
//! children, holds a weak back-reference to its parent, wraps a [`ValueCell`]
//! for its externally visible value and delegates kind-specific behaviour to a
//! boxed [`Topping`].
//!
//! Widgets are created from a [`ToppingSpec`] (kind name + keyword arguments
//! + factory). Construction runs [`Topping::prepare`] exactly once, which is
//! where a kind builds its children and wires its value hooks.
//!
//! # Example
//! ```
//! use pancake_ui::widgets::{Button, Label, Row};
//! use pancake_ui::WidgetTree;
//!
//! let tree = WidgetTree::new();
//! let row = tree.add(Row::spec()).unwrap();
//! let label = row.add(Label::spec("idle")).unwrap();
//! let button = row.add(Button::spec("Go")).unwrap();
//!
//! let target = label.clone();
//! button.set_clicked(move |_| {
//!     target.set_value("clicked".into());
//! });
//! button.click();
//! assert_eq!(label.value(), "clicked");
//! ```

use crate::arguments::Arguments;
use crate::dirty::DirtyFlags;
use crate::error::{RenderError, ToppingError, ToppingResult};
use crate::event::{Event, EventKind};
use crate::registry::ToppingFactory;
use crate::tree::{TreeShared, WidgetTree};
use crate::value::{Value, ValueCell};
use crate::widget_id::WidgetId;
use parking_lot::{Mutex, RwLock};
use std::any::Any;
use std::sync::{Arc, Weak};

/// Kind-specific behaviour of a widget.
pub trait Topping: Any + Send + Sync {
    /// One-time construction hook: build children, install value hooks and
    /// set the initial value.
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let _ = cx;
        Ok(())
    }

    /// Produce this widget's markup.
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError>;

    /// Map an event to a new value for this widget, if any.
    ///
    /// Widgets take no value from the client unless their kind opts in;
    /// editable kinds return [`Event::value_change`].
    fn event_preprocessor(&self, event: &Event) -> Option<Value> {
        let _ = event;
        None
    }

    /// Whether children are rendered into this widget's own markup without
    /// their own addressable node. Changes to such children re-render this
    /// widget instead.
    fn inline_children(&self) -> bool {
        false
    }
}

/// A kind that can be registered by name.
pub trait ToppingKind: Topping + Sized {
    /// Registry name, also the `data-pk-kind` of rendered fragments.
    const KIND: &'static str;

    /// Argument that receives the value when the kind is spawned with a
    /// single value (see [`ToppingRegistry::spec_with_primary`](crate::ToppingRegistry::spec_with_primary)).
    const PRIMARY: Option<&'static str> = None;

    /// Validate the arguments and build the kind's state.
    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self>;
}

/// Callback invoked when a clickable widget is clicked.
pub type ClickHandler = Arc<dyn Fn(&Click) + Send + Sync>;

/// Context passed to a click handler.
pub struct Click {
    /// The clicked widget.
    pub widget: Arc<Widget>,
    /// The tree the widget belongs to, if attached.
    pub tree: Option<WidgetTree>,
}

/// Recipe for a widget: kind name, arguments and the factory that builds the
/// kind's state.
#[derive(Clone)]
pub struct ToppingSpec {
    kind: String,
    arguments: Arguments,
    factory: ToppingFactory,
    children: Vec<(ToppingSpec, Option<String>)>,
}

impl ToppingSpec {
    /// Spec for a statically known kind.
    pub fn of<T: ToppingKind>(arguments: Arguments) -> Self {
        Self::from_factory(
            T::KIND,
            arguments,
            Arc::new(|args: &Arguments| Ok(Box::new(T::from_arguments(args)?) as Box<dyn Topping>)),
        )
    }

    pub fn from_factory(kind: impl Into<String>, arguments: Arguments, factory: ToppingFactory) -> Self {
        Self {
            kind: kind.into(),
            arguments,
            factory,
            children: Vec::new(),
        }
    }

    /// Add or replace an argument.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key, value);
        self
    }

    /// Append a child built right after `prepare`.
    pub fn child(mut self, child: ToppingSpec) -> Self {
        self.children.push((child, None));
        self
    }

    pub fn named_child(mut self, child: ToppingSpec, name: impl Into<String>) -> Self {
        self.children.push((child, Some(name.into())));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Construct the widget. It is not attached to anything yet.
    pub fn build(self) -> ToppingResult<Arc<Widget>> {
        Widget::build(self)
    }
}

impl std::fmt::Debug for ToppingSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToppingSpec")
            .field("kind", &self.kind)
            .field("arguments", &self.arguments)
            .field("children", &self.children.len())
            .finish()
    }
}

/// Anything that can be added as a child: a spec or an existing, detached
/// widget.
pub trait IntoWidget {
    fn into_widget(self) -> ToppingResult<Arc<Widget>>;
}

impl IntoWidget for ToppingSpec {
    fn into_widget(self) -> ToppingResult<Arc<Widget>> {
        self.build()
    }
}

impl IntoWidget for Arc<Widget> {
    fn into_widget(self) -> ToppingResult<Arc<Widget>> {
        Ok(self)
    }
}

impl IntoWidget for &Arc<Widget> {
    fn into_widget(self) -> ToppingResult<Arc<Widget>> {
        Ok(self.clone())
    }
}

/// Handed to [`Topping::prepare`].
pub struct PrepareContext<'a> {
    kind: &'a str,
    arguments: &'a Arguments,
    cell: &'a ValueCell,
    children: Vec<Arc<Widget>>,
}

impl<'a> PrepareContext<'a> {
    pub fn kind(&self) -> &str {
        self.kind
    }

    pub fn arguments(&self) -> &Arguments {
        self.arguments
    }

    /// The widget's value cell, for installing hooks.
    pub fn cell(&self) -> &ValueCell {
        self.cell
    }

    /// Set the initial value through the preprocessor, without notifying.
    pub fn init_value(&self, value: Value) {
        self.cell.set_silently(value);
    }

    /// Build and append a child.
    pub fn add(&mut self, child: impl IntoWidget) -> ToppingResult<Arc<Widget>> {
        self.push(child.into_widget()?, None)
    }

    pub fn add_named(
        &mut self,
        child: impl IntoWidget,
        name: impl Into<String>,
    ) -> ToppingResult<Arc<Widget>> {
        self.push(child.into_widget()?, Some(name.into()))
    }

    fn push(&mut self, child: Arc<Widget>, name: Option<String>) -> ToppingResult<Arc<Widget>> {
        if child.is_linked() {
            return Err(ToppingError::AlreadyAttached {
                kind: child.kind.clone(),
            });
        }
        if self.children.iter().any(|c| Arc::ptr_eq(c, &child)) {
            return Err(ToppingError::AlreadyAttached {
                kind: child.kind.clone(),
            });
        }
        let name = name.or_else(|| child.name());
        if let Some(name) = &name {
            if self.children.iter().any(|c| c.name().as_deref() == Some(name)) {
                return Err(ToppingError::DuplicateName { name: name.clone() });
            }
        }
        child.node.lock().name = name;
        self.children.push(child.clone());
        Ok(child)
    }
}

/// What a [`Topping`] sees while rendering.
pub struct RenderContext<'a> {
    /// The widget's id, `None` when rendering a detached widget.
    pub id: Option<WidgetId>,
    /// The widget's value, read through its getter.
    pub value: Value,
    /// Markup of each child, in order.
    pub children: &'a [String],
    pub arguments: &'a Arguments,
    /// Whether a click handler is installed.
    pub clickable: bool,
}

impl RenderContext<'_> {
    /// All children's markup concatenated.
    pub fn children_html(&self) -> String {
        self.children.concat()
    }
}

pub(crate) struct Attachment {
    pub(crate) id: WidgetId,
    pub(crate) tree: Weak<TreeShared>,
}

struct NodeLinks {
    name: Option<String>,
    parent: Weak<Widget>,
    children: Vec<Arc<Widget>>,
    attachment: Option<Attachment>,
}

/// A node of the widget tree.
pub struct Widget {
    kind: String,
    arguments: Arguments,
    topping: Box<dyn Topping>,
    cell: ValueCell,
    node: Mutex<NodeLinks>,
    clicked: RwLock<Option<ClickHandler>>,
}

impl Widget {
    fn build(spec: ToppingSpec) -> ToppingResult<Arc<Widget>> {
        let ToppingSpec {
            kind,
            arguments,
            factory,
            children: pending,
        } = spec;

        let mut topping = factory(&arguments)?;
        let cell = ValueCell::default();
        let children = {
            let mut cx = PrepareContext {
                kind: &kind,
                arguments: &arguments,
                cell: &cell,
                children: Vec::new(),
            };
            topping.prepare(&mut cx)?;
            for (child, name) in pending {
                match name {
                    Some(name) => cx.add_named(child, name)?,
                    None => cx.add(child)?,
                };
            }
            cx.children
        };

        tracing::trace!(kind = %kind, children = children.len(), "widget constructed");
        Ok(Self::assemble(kind, arguments, topping, cell, children))
    }

    pub(crate) fn assemble(
        kind: String,
        arguments: Arguments,
        topping: Box<dyn Topping>,
        cell: ValueCell,
        children: Vec<Arc<Widget>>,
    ) -> Arc<Widget> {
        Arc::new_cyclic(|this| {
            for child in &children {
                child.node.lock().parent = this.clone();
            }
            Widget {
                kind,
                arguments,
                topping,
                cell,
                node: Mutex::new(NodeLinks {
                    name: None,
                    parent: Weak::new(),
                    children,
                    attachment: None,
                }),
                clicked: RwLock::new(None),
            }
        })
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The construction arguments, unknown keys included.
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn name(&self) -> Option<String> {
        self.node.lock().name.clone()
    }

    /// Tree id, while attached.
    pub fn id(&self) -> Option<WidgetId> {
        self.node.lock().attachment.as_ref().map(|a| a.id)
    }

    pub fn parent(&self) -> Option<Arc<Widget>> {
        self.node.lock().parent.upgrade()
    }

    /// Snapshot of the children, in render order.
    pub fn children(&self) -> Vec<Arc<Widget>> {
        self.node.lock().children.clone()
    }

    /// Child with the given name.
    pub fn child(&self, name: &str) -> Option<Arc<Widget>> {
        self.children()
            .into_iter()
            .find(|c| c.name().as_deref() == Some(name))
    }

    /// The tree this widget is attached to.
    pub fn tree(&self) -> Option<WidgetTree> {
        let node = self.node.lock();
        let shared = node.attachment.as_ref()?.tree.upgrade()?;
        Some(WidgetTree::from_shared(shared))
    }

    pub fn is_attached(&self) -> bool {
        self.node.lock().attachment.is_some()
    }

    fn is_linked(&self) -> bool {
        let node = self.node.lock();
        node.attachment.is_some() || node.parent.strong_count() > 0
    }

    /// Downcast the kind-specific state.
    pub fn topping<T: Topping>(&self) -> Option<&T> {
        let topping: &dyn Any = self.topping.as_ref();
        topping.downcast_ref::<T>()
    }

    pub fn renders_inline(&self) -> bool {
        self.topping.inline_children()
    }

    pub fn cell(&self) -> &ValueCell {
        &self.cell
    }

    /// The value, read through the widget's getter.
    pub fn value(&self) -> Value {
        self.cell.get()
    }

    /// Write through the preprocessor; marks the widget dirty when attached.
    /// Returns `false` when the preprocessor suppressed the write.
    pub fn set_value(&self, value: Value) -> bool {
        self.cell.set(value)
    }

    /// Write through the preprocessor without scheduling a re-render.
    pub fn set_value_silently(&self, value: Value) -> bool {
        self.cell.set_silently(value)
    }

    /// Store a final value, bypassing the preprocessor.
    pub fn store_value(&self, value: Value) {
        self.cell.store(value);
    }

    /// Schedule a re-render of this widget. No-op when detached.
    pub fn mark_dirty(&self, flags: DirtyFlags) {
        if let (Some(id), Some(tree)) = (self.id(), self.tree()) {
            tree.mark_dirty(id, flags);
        }
    }

    /// Install the click handler. Any widget with a handler is clickable.
    pub fn set_clicked(&self, handler: impl Fn(&Click) + Send + Sync + 'static) {
        *self.clicked.write() = Some(Arc::new(handler));
        self.mark_dirty(DirtyFlags::STYLE);
    }

    pub fn clear_clicked(&self) {
        if self.clicked.write().take().is_some() {
            self.mark_dirty(DirtyFlags::STYLE);
        }
    }

    pub fn is_clickable(&self) -> bool {
        self.clicked.read().is_some()
    }

    /// Invoke the click handler. Returns `false` when none is installed.
    pub fn click(self: &Arc<Self>) -> bool {
        let Some(handler) = self.clicked.read().clone() else {
            return false;
        };
        handler(&Click {
            widget: self.clone(),
            tree: self.tree(),
        });
        true
    }

    /// Append a child and return it.
    ///
    /// When this widget is attached, the child's whole subtree is registered
    /// with the tree and receives ids.
    pub fn add(self: &Arc<Self>, child: impl IntoWidget) -> ToppingResult<Arc<Widget>> {
        self.add_child(child.into_widget()?, None)
    }

    /// Append a child under a sibling-unique name.
    pub fn add_named(
        self: &Arc<Self>,
        child: impl IntoWidget,
        name: impl Into<String>,
    ) -> ToppingResult<Arc<Widget>> {
        self.add_child(child.into_widget()?, Some(name.into()))
    }

    fn add_child(self: &Arc<Self>, child: Arc<Widget>, name: Option<String>) -> ToppingResult<Arc<Widget>> {
        if Arc::ptr_eq(self, &child) || self.ancestors().any(|a| Arc::ptr_eq(&a, &child)) {
            return Err(ToppingError::WouldCreateCycle);
        }
        let name = name.or_else(|| child.name());

        {
            let mut links = self.node.lock();
            if let Some(name) = &name {
                if links.children.iter().any(|c| c.name().as_deref() == Some(name)) {
                    return Err(ToppingError::DuplicateName { name: name.clone() });
                }
            }
            let mut child_links = child.node.lock();
            if child_links.attachment.is_some() || child_links.parent.strong_count() > 0 {
                return Err(ToppingError::AlreadyAttached {
                    kind: child.kind.clone(),
                });
            }
            child_links.parent = Arc::downgrade(self);
            child_links.name = name;
            links.children.push(child.clone());
        }

        if let Some(tree) = self.tree() {
            tree.register_subtree(&child, self);
        }
        Ok(child)
    }

    /// Detach this widget from its parent and unregister its subtree.
    /// Idempotent.
    pub fn remove(self: &Arc<Self>) {
        let tree = self.tree();
        let parent = {
            let mut links = self.node.lock();
            let parent = links.parent.upgrade();
            links.parent = Weak::new();
            parent
        };
        if let Some(parent) = &parent {
            parent.node.lock().children.retain(|c| !Arc::ptr_eq(c, self));
        }
        if let Some(tree) = tree {
            tree.unregister_subtree(self, parent.as_ref());
        }
    }

    /// Iterate from the parent up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = Arc<Widget>> {
        std::iter::successors(self.parent(), |w| w.parent())
    }

    /// This widget followed by all descendants, depth first.
    pub fn subtree(self: &Arc<Self>) -> Vec<Arc<Widget>> {
        let mut out = Vec::new();
        let mut stack = vec![self.clone()];
        while let Some(widget) = stack.pop() {
            stack.extend(widget.children().into_iter().rev());
            out.push(widget);
        }
        out
    }

    /// Dispatch point for routed events. Returns `true` when the widget
    /// reacted.
    ///
    /// A click aimed at a widget with a handler calls the handler. Otherwise
    /// the kind's event preprocessor may produce a value, which is written
    /// through [`Widget::set_value`].
    pub fn on_event(self: &Arc<Self>, event: &Event) -> bool {
        if event.kind == EventKind::Click && !event.is_bubbled() && self.click() {
            return true;
        }
        match self.topping.event_preprocessor(event) {
            Some(value) => {
                self.set_value(value);
                true
            }
            None => false,
        }
    }

    /// Render this widget given its children's markup.
    pub fn render(&self, children: &[String]) -> Result<String, RenderError> {
        let cx = RenderContext {
            id: self.id(),
            value: self.value(),
            children,
            arguments: &self.arguments,
            clickable: self.is_clickable(),
        };
        self.topping.render(&cx)
    }

    pub(crate) fn attach_to(&self, attachment: Option<Attachment>) {
        self.node.lock().attachment = attachment;
    }

    /// Attach this node unless it already is, returning its children as seen
    /// under the same lock. A child pushed after this call finds the node
    /// attached and registers itself.
    pub(crate) fn attach_listing_children(&self, attachment: Attachment) -> Option<Vec<Arc<Widget>>> {
        let mut node = self.node.lock();
        if node.attachment.is_some() {
            return None;
        }
        node.attachment = Some(attachment);
        Some(node.children.clone())
    }
}

impl std::fmt::Debug for Widget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Widget")
            .field("kind", &self.kind)
            .field("id", &self.id())
            .field("name", &self.name())
            .field("value", &self.cell.raw())
            .finish()
    }
}
