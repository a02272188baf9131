//! Pancake - reactive widgets served to a browser
//!
//! Pancake keeps the UI on the server. Widgets hold values, a
//! [`WidgetTree`] tracks which of them changed, and the client receives
//! either a full page or a patch of the changed fragments. Client events flow
//! back into widget values and click handlers.
//!
//! - **Widgets**: [`widgets`] plus the [`recipes`], all reachable by kind name
//!   through [`registry()`]
//! - **Sessions**: [`Plate`] with named [`Page`]s and navigation
//! - **Wire protocol**: [`InboundEvent`] in, [`RenderMessage`] out
//!
//! The HTTP or WebSocket transport is left to the host: it forwards decoded
//! events to [`Plate::handle`] and ships the results of [`Plate::poll`].
//!
//! # Quick Start
//!
//! ```
//! use pancake::prelude::*;
//!
//! let plate = Plate::new(PlateConfig::default());
//! plate
//!     .add_page(FnPage::new("Counter", |cx| {
//!         let label = cx.add_named(Label::spec("0"), "count")?;
//!         let button = cx.add(Button::spec("+1"))?;
//!         button.set_clicked(move |_| {
//!             let next = label.value().as_i64().unwrap_or(0) + 1;
//!             label.set_value(next.into());
//!         });
//!         Ok(())
//!     }))
//!     .unwrap();
//!
//! let RenderMessage::Full { html } = plate.connect() else { unreachable!() };
//! assert!(html.contains("+1"));
//!
//! let button = plate.page("Counter").unwrap().children()[1].id().unwrap();
//! plate.handle(&InboundEvent::new(button, EventKind::Click, None));
//!
//! let messages = plate.poll();
//! assert!(matches!(&messages[..], [RenderMessage::Patch { fragments }] if fragments.len() == 1));
//! ```

pub mod config;
pub mod page;
pub mod plate;
pub mod protocol;
pub mod recipes;

pub use config::PlateConfig;
pub use page::{FnPage, Page, PageContext};
pub use plate::{Plate, WeakPlate};
pub use protocol::{EventError, InboundEvent, RenderMessage};
pub use recipes::{ExclaimButton, FunctionArguments, FunctionTopping};

pub use pancake_core as core;
pub use pancake_ui as ui;
pub use pancake_ui::widgets;
pub use pancake_ui::{
    Arguments, Dispatch, EventKind, IntoWidget, Patch, ToppingError, ToppingRegistry,
    ToppingResult, ToppingSpec, Value, Widget, WidgetId, WidgetTree,
};

/// The built-in kinds plus the recipes.
pub fn registry() -> ToppingRegistry {
    let mut registry = ToppingRegistry::builtin();
    recipes::register_recipes(&mut registry);
    registry
}

/// Commonly used items.
pub mod prelude {
    pub use crate::widgets::{
        Button, Card, Column, DictInput, FloatingCard, ImageBox, ImageCard, Input, Label,
        Paragraph, Row, Slider, Text, ToolBox,
    };
    pub use crate::{
        Dispatch, EventKind, ExclaimButton, FnPage, FunctionTopping, InboundEvent, Page, PageContext, Plate,
        PlateConfig, RenderMessage, ToppingResult, Value, WeakPlate, Widget, WidgetTree,
    };
}
