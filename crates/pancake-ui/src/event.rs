//! Client event routing.
//!
//! The transport decodes a browser action into `(widget id, event kind,
//! payload)` and hands it to an [`EventRouter`]. The router resolves the
//! target, lets it handle the event, then bubbles the event to each ancestor
//! with `origin` pointing at the target. Composite widgets such as
//! `DictInput` react to the bubbled copy.

use crate::markup::{CHANGE_RESPONSE, CLICK_RESPONSE};
use crate::tree::WidgetTree;
use crate::value::Value;
use crate::widget::Widget;
use crate::widget_id::WidgetId;
use pancake_core::profiling::profile_function;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Kind of client event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A clickable node was clicked (`"onclick"`).
    Click,
    /// An input reported a new value (`"value_changed"`).
    ValueChanged,
    /// Any other event name, passed through untouched.
    Other(String),
}

impl EventKind {
    pub fn parse(name: &str) -> Self {
        match name {
            CLICK_RESPONSE => EventKind::Click,
            CHANGE_RESPONSE => EventKind::ValueChanged,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Click => CLICK_RESPONSE,
            EventKind::ValueChanged => CHANGE_RESPONSE,
            EventKind::Other(name) => name,
        }
    }
}

impl From<&str> for EventKind {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

/// An event delivered to a widget.
#[derive(Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Transport-encoded payload, if the client sent one.
    pub value: Option<Value>,
    /// The widget the event was aimed at, set on bubbled copies.
    pub origin: Option<Arc<Widget>>,
}

impl Event {
    pub fn new(kind: impl Into<EventKind>, value: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            value,
            origin: None,
        }
    }

    /// The copy handed to ancestors of `origin`.
    pub fn bubbled_from(&self, origin: Arc<Widget>) -> Self {
        Self {
            kind: self.kind.clone(),
            value: self.value.clone(),
            origin: Some(origin),
        }
    }

    pub fn is_bubbled(&self) -> bool {
        self.origin.is_some()
    }

    /// Payload of a `value_changed` aimed at the receiving widget itself.
    pub fn value_change(&self) -> Option<Value> {
        match (&self.kind, &self.origin) {
            (EventKind::ValueChanged, None) => self.value.clone(),
            _ => None,
        }
    }
}

impl std::fmt::Debug for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("origin", &self.origin.as_ref().and_then(|w| w.id()))
            .finish()
    }
}

/// Outcome of routing one client event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// At least one widget reacted.
    Handled,
    /// The target is gone or nobody reacted.
    Ignored,
    /// The target's handler panicked; the panic was contained and logged.
    Failed,
}

/// Routes decoded client events into a [`WidgetTree`].
#[derive(Clone)]
pub struct EventRouter {
    tree: WidgetTree,
}

impl EventRouter {
    pub fn new(tree: WidgetTree) -> Self {
        Self { tree }
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Deliver an event to widget `id` and bubble it to its ancestors.
    ///
    /// An id that no longer resolves is not an error: the client may still
    /// show a widget that was detached after it rendered.
    pub fn handle(
        &self,
        id: WidgetId,
        kind: impl Into<EventKind>,
        payload: Option<Value>,
    ) -> Dispatch {
        profile_function!();

        let Some(target) = self.tree.resolve(id) else {
            tracing::debug!(%id, "event for unknown widget ignored");
            return Dispatch::Ignored;
        };

        let event = Event::new(kind, payload);
        tracing::trace!(%id, kind = event.kind.as_str(), "dispatching event");

        let mut outcome = deliver(&target, &event);

        let bubbled = event.bubbled_from(target.clone());
        let mut current = target.parent();
        while let Some(ancestor) = current {
            if deliver(&ancestor, &bubbled) == Dispatch::Handled && outcome == Dispatch::Ignored {
                outcome = Dispatch::Handled;
            }
            current = ancestor.parent();
        }

        outcome
    }
}

fn deliver(widget: &Arc<Widget>, event: &Event) -> Dispatch {
    match catch_unwind(AssertUnwindSafe(|| widget.on_event(event))) {
        Ok(true) => Dispatch::Handled,
        Ok(false) => Dispatch::Ignored,
        Err(payload) => {
            tracing::error!(
                id = ?widget.id(),
                kind = widget.kind(),
                event = event.kind.as_str(),
                "event handler panicked: {}",
                panic_message(payload.as_ref())
            );
            Dispatch::Failed
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
