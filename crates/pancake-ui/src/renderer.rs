//! Full and incremental HTML rendering.
//!
//! Every widget fragment is wrapped in a node carrying its DOM id:
//!
//! ```text
//! <div id="pk-3" data-pk-kind="Button">...</div>
//! ```
//!
//! so a [`Patch`] entry replaces exactly one client node. Each widget renders
//! in isolation: a failing or panicking widget is logged and replaced by a
//! placeholder, and its siblings render normally.

use crate::dirty::DirtyFlags;
use crate::event::panic_message;
use crate::markup::escape;
use crate::metrics::{RenderStats, StatsTimer};
use crate::tree::WidgetTree;
use crate::widget::Widget;
use crate::widget_id::WidgetId;
use indexmap::IndexMap;
use pancake_core::alloc::HashMap;
use pancake_core::profiling::{self, profile_function, profile_scope};
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Class of the placeholder emitted for a widget that failed to render.
pub const RENDER_ERROR_CLASS: &str = "pk-render-error";

/// Fragments to replace on the client, in ascending id order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    fragments: IndexMap<WidgetId, String>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn get(&self, id: WidgetId) -> Option<&str> {
        self.fragments.get(&id).map(String::as_str)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.fragments.contains_key(&id)
    }

    pub fn ids(&self) -> Vec<WidgetId> {
        self.fragments.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &str)> {
        self.fragments.iter().map(|(id, html)| (*id, html.as_str()))
    }

    pub fn into_fragments(self) -> IndexMap<WidgetId, String> {
        self.fragments
    }
}

/// Renders a [`WidgetTree`] to HTML.
#[derive(Debug, Default)]
pub struct RenderEngine {
    last_stats: RenderStats,
}

impl RenderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the most recent pass.
    pub fn last_stats(&self) -> &RenderStats {
        &self.last_stats
    }

    /// Render the whole tree, for a client that has nothing yet.
    ///
    /// Pending dirty entries are consumed: the client receives everything.
    pub fn full_render(&mut self, tree: &WidgetTree) -> String {
        profile_function!();
        profiling::new_frame();
        let timer = StatsTimer::start();
        let mut stats = RenderStats::new();

        let discarded = tree.take_dirty();
        let html = render_node(&tree.root(), true, &mut stats);
        stats.fragments = 1;

        timer.finish(&mut stats);
        tracing::debug!(discarded = discarded.len(), "full render: {}", stats.summary());
        self.last_stats = stats;
        html
    }

    /// Render only what changed since the last pass.
    ///
    /// The dirty set is swapped out in one step, so a change arriving while
    /// this runs lands in the next patch. Ids that no longer resolve are
    /// skipped, as are ids whose dirty ancestor's fragment already contains
    /// them.
    pub fn incremental_render(&mut self, tree: &WidgetTree) -> Patch {
        profile_function!();
        profiling::new_frame();
        let timer = StatsTimer::start();
        let mut stats = RenderStats::new();

        let dirty = tree.take_dirty();
        let mut ids: Vec<_> = dirty.keys().copied().collect();
        ids.sort_unstable();

        let mut patch = Patch::default();
        for id in ids {
            let Some(widget) = tree.resolve(id) else {
                stats.stale_skipped += 1;
                continue;
            };
            if covered_by_dirty_ancestor(&widget, &dirty) {
                stats.covered_skipped += 1;
                continue;
            }
            profile_scope!("render_fragment");
            let html = render_node(&widget, true, &mut stats);
            patch.fragments.insert(id, html);
        }
        stats.fragments = patch.len();

        timer.finish(&mut stats);
        if !patch.is_empty() {
            tracing::debug!("incremental render: {}", stats.summary());
        }
        self.last_stats = stats;
        patch
    }

    /// Render a single widget and its subtree, attached or not.
    pub fn render_widget(&mut self, widget: &Arc<Widget>) -> String {
        let mut stats = RenderStats::new();
        let html = render_node(widget, true, &mut stats);
        stats.fragments = 1;
        self.last_stats = stats;
        html
    }
}

fn covered_by_dirty_ancestor(widget: &Widget, dirty: &HashMap<WidgetId, DirtyFlags>) -> bool {
    widget
        .ancestors()
        .filter_map(|ancestor| ancestor.id())
        .any(|id| dirty.get(&id).is_some_and(|flags| flags.needs_render()))
}

fn render_node(widget: &Arc<Widget>, wrap: bool, stats: &mut RenderStats) -> String {
    let wrap_children = !widget.renders_inline();
    let children: Vec<String> = widget
        .children()
        .iter()
        .map(|child| render_node(child, wrap_children, stats))
        .collect();

    stats.widgets_rendered += 1;
    let inner = match catch_unwind(AssertUnwindSafe(|| widget.render(&children))) {
        Ok(Ok(html)) => html,
        Ok(Err(err)) => {
            stats.failures += 1;
            tracing::warn!(id = ?widget.id(), kind = widget.kind(), error = %err, "widget render failed");
            placeholder()
        }
        Err(payload) => {
            stats.failures += 1;
            tracing::error!(
                id = ?widget.id(),
                kind = widget.kind(),
                "widget render panicked: {}",
                panic_message(payload.as_ref())
            );
            placeholder()
        }
    };

    if wrap { wrap_fragment(widget, &inner) } else { inner }
}

fn wrap_fragment(widget: &Widget, inner: &str) -> String {
    match widget.id() {
        Some(id) => format!(
            "<div id=\"{}\" data-pk-kind=\"{}\">{}</div>",
            id.dom_id(),
            escape(widget.kind()),
            inner
        ),
        None => format!("<div data-pk-kind=\"{}\">{}</div>", escape(widget.kind()), inner),
    }
}

fn placeholder() -> String {
    format!("<div class=\"{}\"></div>", RENDER_ERROR_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::value::Value;
    use crate::widget::{RenderContext, Topping, ToppingKind, ToppingSpec};
    use crate::widgets::{Label, Row};
    use crate::Arguments;

    struct Exploding;

    impl Topping for Exploding {
        fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
            match cx.value.as_str() {
                Some("panic") => panic!("exploded"),
                _ => Err(RenderError::new("refused")),
            }
        }
    }

    impl ToppingKind for Exploding {
        const KIND: &'static str = "Exploding";

        fn from_arguments(_: &Arguments) -> crate::ToppingResult<Self> {
            Ok(Exploding)
        }
    }

    #[test]
    fn test_full_render_wraps_every_widget() {
        let tree = WidgetTree::new();
        let label = tree.add(Label::spec("hi")).unwrap();
        let html = RenderEngine::new().full_render(&tree);
        assert!(html.starts_with("<div id=\"pk-0\" data-pk-kind=\"Root\">"));
        assert!(html.contains(&format!("id=\"{}\"", label.id().unwrap().dom_id())));
        assert!(html.contains(">hi</label>"));
        assert!(!tree.is_dirty());
    }

    #[test]
    fn test_incremental_only_dirty() {
        let tree = WidgetTree::new();
        let a = tree.add(Label::spec("a")).unwrap();
        let b = tree.add(Label::spec("b")).unwrap();
        let mut engine = RenderEngine::new();
        engine.full_render(&tree);

        a.set_value(Value::from("a2"));
        let patch = engine.incremental_render(&tree);
        assert_eq!(patch.ids(), vec![a.id().unwrap()]);
        assert!(patch.get(a.id().unwrap()).unwrap().contains("a2"));
        assert!(!patch.contains(b.id().unwrap()));
        assert!(!tree.is_dirty());

        assert!(engine.incremental_render(&tree).is_empty());
    }

    #[test]
    fn test_covered_and_stale_ids() {
        let tree = WidgetTree::new();
        let row = tree.add(Row::spec()).unwrap();
        let inner = row.add(Label::spec("x")).unwrap();
        let gone = tree.add(Label::spec("gone")).unwrap();
        let mut engine = RenderEngine::new();
        engine.full_render(&tree);

        inner.set_value(Value::from("y"));
        row.add(Label::spec("z")).unwrap();
        gone.set_value(Value::from("bye"));
        let gone_id = gone.id().unwrap();
        tree.detach(&gone);

        let patch = engine.incremental_render(&tree);
        // the root is dirty because a child was removed, so it covers everything
        assert_eq!(patch.ids(), vec![WidgetId::ROOT]);
        assert!(!patch.contains(gone_id));
        assert!(engine.last_stats().covered_skipped >= 2);
    }

    #[test]
    fn test_ascending_order() {
        let tree = WidgetTree::new();
        let labels: Vec<_> = (0..5).map(|i| tree.add(Label::spec(format!("{}", i))).unwrap()).collect();
        let mut engine = RenderEngine::new();
        engine.full_render(&tree);
        for label in labels.iter().rev() {
            label.set_value(Value::from("changed"));
        }
        let ids = engine.incremental_render(&tree).ids();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_failures_are_contained() {
        let tree = WidgetTree::new();
        tree.add(ToppingSpec::of::<Exploding>(Arguments::new())).unwrap();
        let boom = tree.add(ToppingSpec::of::<Exploding>(Arguments::new())).unwrap();
        boom.store_value(Value::from("panic"));
        tree.add(Label::spec("survivor")).unwrap();

        let mut engine = RenderEngine::new();
        let html = engine.full_render(&tree);
        assert!(html.contains("survivor"));
        assert_eq!(html.matches(RENDER_ERROR_CLASS).count(), 2);
        assert_eq!(engine.last_stats().failures, 2);
    }

    #[test]
    fn test_patch_wire_format() {
        let tree = WidgetTree::new();
        let label = tree.add(Label::spec("a")).unwrap();
        let mut engine = RenderEngine::new();
        engine.full_render(&tree);
        label.set_value(Value::from("b"));
        let patch = engine.incremental_render(&tree);
        let json = serde_json::to_value(&patch).unwrap();
        let key = label.id().unwrap().to_string();
        assert!(json[key.as_str()].as_str().unwrap().contains(">b</label>"));
    }
}
