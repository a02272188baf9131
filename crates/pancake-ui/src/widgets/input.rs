use crate::arguments::Arguments;
use crate::error::{RenderError, ToppingResult};
use crate::event::Event;
use crate::markup::Tag;
use crate::value::{Value, display_value, get_number};
use crate::widget::{PrepareContext, RenderContext, Topping, ToppingKind, ToppingSpec};

/// Type an [`Input`] reports its value as, taken from its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// No default: numeric text becomes a number, anything else stays text.
    Untyped,
    Text,
    Integer,
    Float,
    Boolean,
}

impl InputType {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => InputType::Untyped,
            Value::Bool(_) => InputType::Boolean,
            Value::Number(n) if n.is_f64() => InputType::Float,
            Value::Number(_) => InputType::Integer,
            _ => InputType::Text,
        }
    }

    /// Convert `raw` to this type. `None` when it does not convert.
    pub fn coerce(&self, raw: &Value) -> Option<Value> {
        match self {
            InputType::Untyped => Some(get_number(raw)),
            InputType::Text => Some(Value::from(display_value(raw))),
            InputType::Integer => match raw {
                Value::Number(n) if n.is_i64() || n.is_u64() => Some(raw.clone()),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            InputType::Float => match raw {
                Value::Number(n) => n.as_f64().map(Value::from),
                Value::String(s) => s.trim().parse::<f64>().ok().map(Value::from),
                _ => None,
            },
            InputType::Boolean => match raw {
                Value::Bool(_) => Some(raw.clone()),
                Value::String(s) => s.trim().parse::<bool>().ok().map(Value::from),
                _ => None,
            },
        }
    }
}

/// Single-line text field.
///
/// The client always sends text; reading the value converts it back to the
/// type of `default`, falling back to the text itself when it does not
/// convert.
#[derive(Debug)]
pub struct Input {
    label: Option<String>,
    default: Value,
    placeholder: Option<String>,
    value_type: InputType,
}

impl Input {
    pub fn spec(label: impl Into<String>, default: impl Into<Value>) -> ToppingSpec {
        ToppingSpec::of::<Self>(
            Arguments::new()
                .with("label", label.into())
                .with("default", default),
        )
    }

    pub fn value_type(&self) -> InputType {
        self.value_type
    }
}

impl ToppingKind for Input {
    const KIND: &'static str = "Input";
    const PRIMARY: Option<&'static str> = Some("label");

    fn from_arguments(arguments: &Arguments) -> ToppingResult<Self> {
        let default = arguments.value("default");
        let placeholder = match arguments.text(Self::KIND, "placeholder")? {
            Some(placeholder) => Some(placeholder),
            None if default.is_null() => None,
            None => Some(display_value(&default)),
        };
        Ok(Self {
            label: arguments.text(Self::KIND, "label")?,
            value_type: InputType::of(&default),
            default,
            placeholder,
        })
    }
}

impl Topping for Input {
    fn prepare(&mut self, cx: &mut PrepareContext<'_>) -> ToppingResult<()> {
        let initial = match &self.default {
            Value::Null => Value::from(""),
            other => other.clone(),
        };
        cx.init_value(initial);

        let value_type = self.value_type;
        cx.cell()
            .set_postprocessor(move |raw| Ok(value_type.coerce(raw).unwrap_or_else(|| raw.clone())));
        Ok(())
    }

    fn render(&self, cx: &RenderContext<'_>) -> Result<String, RenderError> {
        let mut div = Tag::div();
        if let Some(label) = &self.label {
            div.push(Tag::div().class("w3-left w3-small w3-monospace").text(label.as_str()));
        }
        let mut input = Tag::new("input")
            .class("w3-input w3-border w3-round-large")
            .attr("type", "text")
            .attr("value", display_value(&cx.value));
        if let Some(placeholder) = &self.placeholder {
            input = input.attr("placeholder", placeholder.as_str());
        }
        div.push(
            input
                .style("padding-bottom", "2px")
                .style("padding-top", "2px")
                .change_response(),
        );
        Ok(div.render())
    }

    fn event_preprocessor(&self, event: &Event) -> Option<Value> {
        event.value_change()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_inference() {
        assert_eq!(InputType::of(&Value::Null), InputType::Untyped);
        assert_eq!(InputType::of(&Value::from(5)), InputType::Integer);
        assert_eq!(InputType::of(&Value::from(0.5)), InputType::Float);
        assert_eq!(InputType::of(&Value::from("x")), InputType::Text);
        assert_eq!(InputType::of(&Value::from(true)), InputType::Boolean);
    }

    #[test]
    fn test_integer_coercion() {
        let input = Input::spec("n", 5).build().unwrap();
        assert_eq!(input.value(), Value::from(5));
        input.set_value(Value::from("7"));
        assert_eq!(input.value(), Value::from(7));
        input.set_value(Value::from("abc"));
        assert_eq!(input.value(), Value::from("abc"));
    }

    #[test]
    fn test_float_coercion() {
        let input = Input::spec("x", 1.5).build().unwrap();
        input.set_value(Value::from("2"));
        assert_eq!(input.value(), Value::from(2.0));
    }

    #[test]
    fn test_untyped_parses_numbers() {
        let input = ToppingSpec::of::<Input>(Arguments::new()).build().unwrap();
        assert_eq!(input.value(), Value::from(""));
        input.set_value(Value::from("12"));
        assert_eq!(input.value(), Value::from(12));
        input.set_value(Value::from("twelve"));
        assert_eq!(input.value(), Value::from("twelve"));
    }

    #[test]
    fn test_text_keeps_digits_as_text() {
        let input = Input::spec("name", "bob").build().unwrap();
        input.set_value(Value::from(42));
        assert_eq!(input.value(), Value::from("42"));
    }

    #[test]
    fn test_markup() {
        let input = Input::spec("Count", 5).build().unwrap();
        let html = input.render(&[]).unwrap();
        assert!(html.contains("<div class=\"w3-left w3-small w3-monospace\">Count</div>"));
        assert!(html.contains("placeholder=\"5\""));
        assert!(html.contains("value=\"5\""));
        assert!(html.contains("data-pk-event=\"value_changed\""));
    }
}
