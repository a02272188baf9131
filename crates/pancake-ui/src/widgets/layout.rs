//! Layout containers.
//!
//! Containers hold no value; they wrap each child's fragment in a grid cell.

use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingResult};
use crate::markup::Tag;
use crate::value::ValueCell;
use crate::widget::{RenderContext, Topping, ToppingKind, ToppingSpec, Widget};
use std::sync::Arc;

/// Grid columns the page width is split into.
const GRID_COLUMNS: usize = 12;

/// Top of every tree: children stacked vertically.
#[derive(Debug)]
pub struct Root;

impl Root {
    pub(crate) fn widget() -> Arc<Widget> {
        Widget::assemble(
            Self::KIND.to_string(),
            Arguments::new(),
            Box::new(Root),
            ValueCell::default(),
            Vec::new(),
        )
    }
}

impl ToppingKind for Root {
    const KIND: &'static str = "Root";

    fn from_arguments(_: &Arguments) -> ToppingResult<Self> {
        Ok(Root)
    }
}

impl Topping for Root {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div().class("pk-root").html(cx.children_html()).render())
    }
}

/// Children side by side, sharing the width evenly.
#[derive(Debug)]
pub struct Row {
    padding: bool,
}

impl Row {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }
}

impl ToppingKind for Row {
    const KIND: &'static str = "Row";

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            padding: arguments.bool(Self::KIND, "padding", true)?,
        })
    }
}

impl Topping for Row {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let span = GRID_COLUMNS / cx.children.len().max(1);
        let mut row = Tag::div().class(if self.padding { "w3-row-padding" } else { "w3-row" });
        for child in cx.children {
            row.push(
                Tag::div()
                    .class(format!("w3-col s{} w3-center", span))
                    .html(child.as_str()),
            );
        }
        Ok(row.render())
    }
}

/// Children stacked vertically.
#[derive(Debug)]
pub struct Column {
    centering: bool,
    padding: bool,
}

impl Column {
    pub fn spec() -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new())
    }
}

impl ToppingKind for Column {
    const KIND: &'static str = "Column";

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            centering: arguments.bool(Self::KIND, "centering", true)?,
            padding: arguments.bool(Self::KIND, "padding", true)?,
        })
    }
}

impl Topping for Column {
    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let mut column = Tag::div().class(if self.centering { "w3-col w3-center" } else { "w3-col" });
        let cell = if self.padding { "w3-row w3-margin-bottom" } else { "w3-row" };
        for child in cx.children {
            column.push(Tag::div().class(cell).html(child.as_str()));
        }
        Ok(column.render())
    }
}
