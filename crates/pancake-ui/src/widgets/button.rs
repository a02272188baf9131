use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingResult};
use crate::markup::Tag;
use crate::value::{Value, display_value};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec, Widget};

/// Push button whose value is its title.
///
/// Clicks are reported to the server and invoke the handler installed with
/// [`Widget::set_clicked`].
#[derive(Debug)]
pub struct Button {
    title: String,
}

impl Button {
    pub fn spec(title: impl Into<String>) -> ToppingSpec {
        ToppingSpec::of::<Self>(Arguments::new().with("title", title.into()))
    }

    /// Change the title. Schedules a re-render.
    pub fn set_title(widget: &Widget, title: impl Into<String>) -> bool {
        if widget.topping::<Self>().is_none() {
            return false;
        }
        widget.set_value(Value::from(title.into()))
    }

    pub fn title(widget: &Widget) -> Option<String> {
        widget.topping::<Self>()?;
        Some(display_value(&widget.value()))
    }
}

impl ToppingKind for Button {
    const KIND: &'static str = "Button";
    const PRIMARY: Option<&'static str> = Some("title");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        Ok(Self {
            title: arguments.require_text(Self::KIND, "title")?,
        })
    }
}

impl Topping for Button {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        cx.init_value(Value::from(self.title.clone()));
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::new("button")
            .class("button")
            .click_response()
            .text(display_value(&cx.value))
            .render())
    }
}
