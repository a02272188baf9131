//! Pancake UI - reactive widget tree rendered to HTML
//!
//! This crate provides the server side of a browser UI:
//! - Reactive value cells with pre/post-processing hooks
//! - A widget tree with stable ids and a dirty set
//! - Full and incremental HTML rendering
//! - Routing of client events back into widget values
//! - A name-based registry of widget kinds
//!
//! ## Quick Start
//!
//! ```rust
//! use pancake_ui::widgets::{Button, Label, Row};
//! use pancake_ui::{EventRouter, RenderEngine, WidgetTree};
//!
//! let tree = WidgetTree::new();
//! let row = tree.add(Row::spec()).unwrap();
//! let status = row.add(Label::spec("idle")).unwrap();
//! let button = row.add(Button::spec("Go")).unwrap();
//!
//! let target = status.clone();
//! button.set_clicked(move |_| {
//!     target.set_value("running".into());
//! });
//!
//! let mut engine = RenderEngine::new();
//! let page = engine.full_render(&tree);
//! assert!(page.contains("Go"));
//!
//! // The transport decodes `{"widgetId": .., "eventType": "onclick"}`:
//! EventRouter::new(tree.clone()).handle(button.id().unwrap(), "onclick", None);
//!
//! let patch = engine.incremental_render(&tree);
//! assert_eq!(patch.ids(), vec![status.id().unwrap()]);
//! ```

pub mod arguments;
pub mod dirty;
pub mod error;
pub mod event;
pub mod markup;
pub mod metrics;
pub mod registry;
pub mod renderer;
pub mod tree;
pub mod value;
pub mod widget;
pub mod widget_id;
pub mod widgets;

pub use arguments::Arguments;
pub use dirty::DirtyFlags;
pub use error::{ImageError, ImageResult, RenderError, ToppingError, ToppingResult, ValueError};
pub use event::{Dispatch, Event, EventKind, EventRouter};
pub use metrics::RenderStats;
pub use registry::{KindDescriptor, ToppingFactory, ToppingRegistry};
pub use renderer::{Patch, RenderEngine};
pub use tree::WidgetTree;
pub use value::{Preprocessed, Value, ValueCell};
pub use widget::{
    Click, ClickHandler, IntoWidget, PrepareContext, RenderContext, Topping, ToppingKind,
    ToppingSpec, Widget,
};
pub use widget_id::WidgetId;
