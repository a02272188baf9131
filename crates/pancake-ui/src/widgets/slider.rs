use crate::arguments::Arguments;
use crate::dirty::DirtyFlags;
use crate::error::{RenderError, ToppingResult};
use crate::event::Event;
use crate::markup::Tag;
use crate::value::{Preprocessed, Value, display_value, get_number};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec, Widget};
use crate::widgets::Label;
use parking_lot::RwLock;
use std::sync::Arc;

/// Formats a slider value for its label.
pub type DisplayFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Range input with a caption showing `"{label}: {value}"`.
///
/// The caption is a child [`Label`] rendered inside the slider's own markup.
/// A display function changes the caption only; the stored value stays
/// numeric.
pub struct Slider {
    label: String,
    range: (Value, Value),
    initial: Value,
    display: Arc<RwLock<Option<DisplayFn>>>,
}

impl Slider {
    pub fn spec(
        label: impl Into<String>,
        range_min: impl Into<Value>,
        range_max: impl Into<Value>,
        value: Option<Value>,
    ) -> ToppingSpec {
        let mut arguments = Arguments::new()
            .with("label", label.into())
            .with("range_min", range_min)
            .with("range_max", range_max);
        if let Some(value) = value {
            arguments.insert("value", value);
        }
        ToppingSpec::of::<Self>(arguments)
    }

    /// Install a display function and refresh the caption.
    pub fn set_display(widget: &Widget, display: impl Fn(&Value) -> String + Send + Sync + 'static) -> bool {
        let Some(slider) = widget.topping::<Self>() else {
            return false;
        };
        *slider.display.write() = Some(Arc::new(display));
        widget.set_value(widget.value());
        widget.mark_dirty(DirtyFlags::STYLE);
        true
    }

    /// Remove the display function and refresh the caption.
    pub fn clear_display(widget: &Widget) -> bool {
        let Some(slider) = widget.topping::<Self>() else {
            return false;
        };
        *slider.display.write() = None;
        widget.set_value(widget.value());
        true
    }

    pub fn range(&self) -> (&Value, &Value) {
        (&self.range.0, &self.range.1)
    }
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slider")
            .field("label", &self.label)
            .field("range", &self.range)
            .field("has_display", &self.display.read().is_some())
            .finish()
    }
}

impl ToppingKind for Slider {
    const KIND: &'static str = "Slider";
    const PRIMARY: Option<&'static str> = Some("label");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let label = arguments.require_text(Self::KIND, "label")?;
        arguments.require_f64(Self::KIND, "range_min")?;
        arguments.require_f64(Self::KIND, "range_max")?;
        let range = (
            get_number(&arguments.value("range_min")),
            get_number(&arguments.value("range_max")),
        );
        arguments.f64(Self::KIND, "value")?;
        let initial = match arguments.value("value") {
            Value::Null => range.0.clone(),
            value => get_number(&value),
        };
        Ok(Self {
            label,
            range,
            initial,
            display: Arc::new(RwLock::new(None)),
        })
    }
}

impl Topping for Slider {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let caption = cx.add(Label::spec(self.label.clone()))?;

        let label = self.label.clone();
        let display = self.display.clone();
        cx.cell().set_preprocessor(move |value| {
            let value = get_number(&value);
            let shown = match display.read().as_ref() {
                Some(display) => display(&value),
                None => display_value(&value),
            };
            caption.set_value(Value::from(format!("{}: {}", label, shown)));
            Preprocessed::Store(value)
        });
        cx.cell().set_postprocessor(|raw| Ok(get_number(raw)));
        cx.init_value(self.initial.clone());
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        Ok(Tag::div()
            .child(
                Tag::div()
                    .class("w3-left w3-small w3-monospace")
                    .html(cx.children_html()),
            )
            .child(
                Tag::new("input")
                    .attr("type", "range")
                    .attr("min", display_value(&self.range.0))
                    .attr("max", display_value(&self.range.1))
                    .attr("value", display_value(&cx.value))
                    .style("width", "100%")
                    .change_response(),
            )
            .render())
    }

    fn event_preprocessor(&self, event: &Event) -> Option<Value> {
        event.value_change()
    }

    fn inline_children(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToppingError;
    use crate::renderer::RenderEngine;

    #[test]
    fn test_caption_follows_value() {
        let slider = Slider::spec("Vol", 0, 10, Some(Value::from(3))).build().unwrap();
        let mut engine = RenderEngine::new();
        assert!(engine.render_widget(&slider).contains("Vol: 3"));

        slider.set_value(Value::from(8));
        let html = engine.render_widget(&slider);
        assert!(html.contains("Vol: 8"));
        assert!(html.contains("value=\"8\""));
    }

    #[test]
    fn test_defaults_to_range_min() {
        let slider = Slider::spec("Vol", 2, 10, None).build().unwrap();
        assert_eq!(slider.value(), Value::from(2));
    }

    #[test]
    fn test_client_strings_become_numbers() {
        let slider = Slider::spec("Vol", 0, 1, None).build().unwrap();
        slider.set_value(Value::from("0.25"));
        assert_eq!(slider.value(), Value::from(0.25));
    }

    #[test]
    fn test_display_function() {
        let slider = Slider::spec("Vol", 0, 10, Some(Value::from(4))).build().unwrap();
        assert!(Slider::set_display(&slider, |v| format!("{}%", v.as_f64().unwrap_or(0.0) * 10.0)));
        let caption = slider.children()[0].value();
        assert_eq!(caption, Value::from("Vol: 40%"));
        assert_eq!(slider.value(), Value::from(4));

        Slider::clear_display(&slider);
        assert_eq!(slider.children()[0].value(), Value::from("Vol: 4"));
    }

    #[test]
    fn test_requires_range() {
        let err = ToppingSpec::of::<Slider>(Arguments::new().with("label", "Vol").with("range_min", 0))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ToppingError::MissingArgument { argument: "range_max", .. }
        ));
    }

    #[test]
    fn test_rejects_non_numeric_range() {
        let err = Slider::spec("Vol", "low", 10, None).build().unwrap_err();
        assert!(matches!(
            err,
            ToppingError::InvalidArgument { argument: "range_min", .. }
        ));
    }
}
